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

use crate::app::App;
use crate::ui::theme;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::{UnicodeWidthChar as _, UnicodeWidthStr as _};

const HEADER_PAD: u16 = 2;
const MAX_NAME_WIDTH: usize = 40;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let padded = Rect {
        x: area.x + HEADER_PAD,
        y: area.y,
        width: area.width.saturating_sub(HEADER_PAD * 2),
        height: area.height,
    };

    let sep = || Span::styled("  \u{2502}  ", Style::default().fg(theme::DIM));
    let manager = &app.manager;
    let total = manager.num_lines();

    let mut spans = vec![
        Span::styled(
            "logtail",
            Style::default().fg(theme::RUST_ORANGE).add_modifier(Modifier::BOLD),
        ),
        sep(),
        Span::styled(
            truncate_to_width(&app.log_name, MAX_NAME_WIDTH),
            Style::default().fg(Color::White),
        ),
        Span::styled(format!(" ({})", manager.log().log_type()), Style::default().fg(theme::DIM)),
        sep(),
        Span::styled(format!("{total} lines"), Style::default().fg(Color::White)),
        Span::styled(
            format!(", {}% cached", cached_percent(manager.cached_line_count(), total)),
            Style::default().fg(theme::DIM),
        ),
    ];

    let pending = manager.pending_ranges().covered_len();
    if pending > 0 {
        spans.push(sep());
        spans.push(Span::styled(
            format!("fetching {pending}"),
            Style::default().fg(theme::STATUS_FETCHING),
        ));
    }
    if app.follow {
        spans.push(sep());
        spans.push(Span::styled(
            "FOLLOW",
            Style::default().fg(theme::STATUS_FOLLOW).add_modifier(Modifier::BOLD),
        ));
    }
    if let Some(error) = &app.last_error {
        spans.push(sep());
        spans.push(Span::styled(error.clone(), Style::default().fg(theme::STATUS_ERROR)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), padded);
}

fn cached_percent(cached: usize, total: usize) -> usize {
    if total == 0 { 100 } else { (cached.min(total) * 100) / total }
}

/// Cut `text` to at most `max` display columns, marking the cut with `…`.
fn truncate_to_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_owned();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}
