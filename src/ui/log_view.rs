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

use super::theme;
use crate::app::App;
use crate::log_text::LogLine;
use ansi_to_tui::IntoText as _;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

/// Render one decoded log line, keeping any ANSI colours it carries.
/// Stderr and header lines get the stream colour on top.
pub fn style_line(line: &LogLine) -> Line<'static> {
    let spans: Vec<Span<'static>> = match line.text.as_bytes().into_text() {
        Ok(text) => text
            .lines
            .into_iter()
            .flat_map(|l| l.spans)
            .map(|s| Span::styled(s.content.into_owned(), s.style))
            .collect(),
        Err(_) => vec![Span::raw(line.text.clone())],
    };
    let styled = Line::from(spans);
    match theme::stream_color(line.stream) {
        Some(color) => styled.patch_style(Style::default().fg(color)),
        None => styled,
    }
}

pub fn placeholder_line() -> Line<'static> {
    Line::from(Span::styled(theme::PLACEHOLDER_CHAR, Style::default().fg(theme::DIM)))
}

fn gutter_width(total: usize) -> usize {
    total.max(1).to_string().len()
}

pub fn render(frame: &mut Frame, area: Rect, app: &mut App) {
    app.rendered_log_area = area;
    app.list.set_viewport_height(usize::from(area.height));
    let total = app.manager.num_lines();
    if app.follow {
        app.list.scroll_to_bottom(total);
    }
    app.list.mount(&mut app.manager);

    if total == 0 {
        let empty = Line::from(Span::styled(
            "(log is empty)",
            Style::default().fg(theme::DIM).add_modifier(Modifier::ITALIC),
        ));
        frame.render_widget(Paragraph::new(empty), area);
        return;
    }

    let width = gutter_width(total);
    let selected = app.selection.map(|sel| sel.lines());
    let mut lines = Vec::with_capacity(usize::from(area.height));
    for index in app.list.visible_range(total) {
        let mut spans =
            vec![Span::styled(format!("{:>width$} ", index + 1), Style::default().fg(theme::DIM))];
        spans.extend(app.list.row(&app.manager, index).spans);
        let mut line = Line::from(spans);
        if selected.as_ref().is_some_and(|lines| lines.contains(&index)) {
            line = line.patch_style(Style::default().bg(theme::SELECTION_BG));
        }
        lines.push(line);
    }
    frame.render_widget(Paragraph::new(lines), area);
}
