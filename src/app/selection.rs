// logtail-rs - A windowed terminal viewer for large remote logs
// Copyright (C) 2025  Simon Peter Rothgang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use super::{App, SelectionState};
use crate::log_text::{LogTextManager, selection_span};

/// Start a selection at `line`. Nothing is pinned until the drag moves.
pub(super) fn begin(app: &mut App, line: usize) {
    let sel = SelectionState { anchor: line, focus: line, dragging: true };
    app.selection = Some(sel);
    pin(app, sel);
}

/// Move the focus end of an in-progress drag.
pub(super) fn extend(app: &mut App, line: usize) {
    let Some(sel) = app.selection.as_mut().filter(|s| s.dragging) else {
        return;
    };
    sel.focus = line;
    let sel = *sel;
    pin(app, sel);
}

/// End the drag. A click that never moved selects nothing.
pub(super) fn finish(app: &mut App) {
    let Some(sel) = app.selection.as_mut() else {
        return;
    };
    if sel.is_collapsed() {
        app.clear_selection();
    } else {
        sel.dragging = false;
    }
}

/// Keep the selected rows mounted. The span is clipped to what is mounted
/// now, which always includes the previous span while the guard is active.
/// A collapsed selection releases the guard.
fn pin(app: &mut App, sel: SelectionState) {
    let rendered = app.manager.viewport().render().clone();
    let span = if sel.is_collapsed() {
        None
    } else {
        selection_span(sel.anchor, sel.focus, &rendered)
    };
    app.manager.set_selection_span(span);
    app.mark_dirty();
}

pub(super) fn try_copy_selection(app: &mut App) -> bool {
    let Some(sel) = app.selection else {
        return false;
    };
    let mut text = extract_selection(&app.manager, sel);
    if text.trim().is_empty() {
        return false;
    }
    if !text.ends_with('\n') {
        text.push('\n');
    }
    match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!("clipboard copy failed: {err}");
            false
        }
    }
}

/// Selected lines joined with `\n`. Rows that are not loaded copy as empty lines.
fn extract_selection(manager: &LogTextManager, sel: SelectionState) -> String {
    sel.lines()
        .map(|index| manager.line_for_display(index).text())
        .collect::<Vec<_>>()
        .join("\n")
}
