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

mod header;
mod log_view;
pub mod theme;
mod virtual_list;

pub use virtual_list::{DEFAULT_OVERSCAN_ROWS, VirtualList};

use crate::app::App;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr as _;

const FOOTER_PAD: u16 = 2;
const FOOTER_HINTS: &[(&str, &str)] = &[
    ("q", "quit"),
    ("j/k", "scroll"),
    ("PgUp/PgDn", "page"),
    ("g/G", "top/bottom"),
    ("f", "follow"),
    ("drag", "select"),
    ("y", "copy"),
    ("Esc", "clear"),
];

pub fn render(frame: &mut Frame, app: &mut App) {
    let [header, header_sep, body, footer_sep, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    header::render(frame, header, app);
    render_separator(frame, header_sep);
    log_view::render(frame, body, app);
    render_separator(frame, footer_sep);
    render_footer(frame, footer);
}

fn render_separator(frame: &mut Frame, area: Rect) {
    if area.height == 0 {
        return;
    }
    let line = theme::SEPARATOR_CHAR.repeat(usize::from(area.width));
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(line, Style::default().fg(theme::DIM)))),
        area,
    );
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let padded = Rect {
        x: area.x + FOOTER_PAD,
        y: area.y,
        width: area.width.saturating_sub(FOOTER_PAD * 2),
        height: area.height,
    };
    let spans = footer_spans(usize::from(padded.width));
    frame.render_widget(Paragraph::new(Line::from(spans)), padded);
}

/// Key hints that fit in `width` columns; hints that would overflow are dropped.
fn footer_spans(width: usize) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut used = 0;
    for (key, action) in FOOTER_HINTS {
        let hint_width = key.width() + 1 + action.width() + 2;
        if used + hint_width > width {
            break;
        }
        used += hint_width;
        spans.push(Span::styled(*key, Style::default().fg(theme::RUST_ORANGE)));
        spans.push(Span::styled(format!(" {action}  "), Style::default().fg(theme::DIM)));
    }
    spans
}
