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

use crate::log_text::LogTextManager;
use crate::source::LogInfo;
use crate::ui::VirtualList;
use std::cell::Cell;
use std::ops::RangeInclusive;
use std::rc::Rc;
use tokio::sync::mpsc;

/// Events produced by background tasks other than line fetches.
#[derive(Debug)]
pub enum AppEvent {
    /// Fresh metadata from the length poller.
    LogInfo(LogInfo),
    PollFailed(String),
}

/// A line-wise mouse selection. Both ends are absolute log line indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionState {
    pub anchor: usize,
    pub focus: usize,
    pub dragging: bool,
}

impl SelectionState {
    #[must_use]
    pub fn lines(&self) -> RangeInclusive<usize> {
        self.anchor.min(self.focus)..=self.anchor.max(self.focus)
    }

    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}

pub struct App {
    pub manager: LogTextManager,
    pub log_name: String,
    pub list: VirtualList,
    /// Stick to the last line while the log grows.
    pub follow: bool,
    pub should_quit: bool,
    /// Set by the manager's change sink and by input handling.
    pub dirty: Rc<Cell<bool>>,
    pub selection: Option<SelectionState>,
    /// Area where log rows were rendered (for mouse mapping).
    pub rendered_log_area: ratatui::layout::Rect,
    pub last_error: Option<String>,
    pub event_tx: mpsc::UnboundedSender<AppEvent>,
    pub event_rx: mpsc::UnboundedReceiver<AppEvent>,
    /// Force a full terminal clear on next render frame.
    pub force_redraw: bool,
}

impl App {
    /// Wire a manager into a fresh app. The manager's change sink marks the
    /// app dirty so the next loop iteration redraws.
    #[must_use]
    pub fn new(manager: LogTextManager, log_name: String, list: VirtualList) -> Self {
        let dirty = Rc::new(Cell::new(true));
        let sink_dirty = Rc::clone(&dirty);
        let manager = manager.with_change_sink(move || sink_dirty.set(true));
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            manager,
            log_name,
            list,
            follow: false,
            should_quit: false,
            dirty,
            selection: None,
            rendered_log_area: ratatui::layout::Rect::default(),
            last_error: None,
            event_tx,
            event_rx,
            force_redraw: false,
        }
    }

    pub fn mark_dirty(&self) {
        self.dirty.set(true);
    }

    /// Returns whether a redraw was pending and clears the flag.
    pub fn take_dirty(&self) -> bool {
        self.dirty.replace(false)
    }

    pub fn clear_selection(&mut self) {
        if self.selection.take().is_some() {
            self.manager.set_selection_span(None);
            self.mark_dirty();
        }
    }
}
