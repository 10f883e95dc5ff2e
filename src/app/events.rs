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

use super::selection::{self, try_copy_selection};
use super::{App, AppEvent};
use crate::log_text::FetchCompletion;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

const MOUSE_SCROLL_LINES: isize = 3;

pub fn handle_terminal_event(app: &mut App, event: Event) {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key),
        Event::Mouse(mouse) => handle_mouse_event(app, mouse),
        Event::Resize(..) | Event::FocusGained => app.mark_dirty(),
        _ => {}
    }
}

pub fn handle_completion(app: &mut App, completion: FetchCompletion) {
    // The header shows pending and cached counts, so any applied result redraws.
    match app.manager.apply_completion(completion) {
        Ok(()) => {
            app.last_error = None;
            app.mark_dirty();
        }
        Err(err) if err.is_fetch_failure() => {
            app.last_error = Some(err.to_string());
            app.mark_dirty();
        }
        Err(_) => {}
    }
}

pub fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::LogInfo(info) => {
            app.manager.set_log_num_lines(info.num_lines);
            // Retry holes left by failed fetches, and fetch rows that just appeared.
            app.list.mark_stale();
            app.mark_dirty();
        }
        AppEvent::PollFailed(message) => {
            tracing::warn!("log length poll failed: {message}");
            app.last_error = Some(message);
            app.mark_dirty();
        }
    }
}

fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => match mouse_line(app, mouse) {
            Some(line) => selection::begin(app, line),
            None => app.clear_selection(),
        },
        MouseEventKind::Drag(MouseButton::Left) => {
            if let Some(line) = mouse_line(app, mouse) {
                selection::extend(app, line);
            }
        }
        MouseEventKind::Up(MouseButton::Left) => selection::finish(app),
        MouseEventKind::ScrollUp => scroll(app, -MOUSE_SCROLL_LINES),
        MouseEventKind::ScrollDown => scroll(app, MOUSE_SCROLL_LINES),
        _ => {}
    }
}

/// Map a mouse position inside the log pane to an absolute line index.
fn mouse_line(app: &App, mouse: MouseEvent) -> Option<usize> {
    let area = app.rendered_log_area;
    if mouse.column < area.x
        || mouse.column >= area.right()
        || mouse.row < area.y
        || mouse.row >= area.bottom()
    {
        return None;
    }
    let line = app.list.scroll_offset() + usize::from(mouse.row - area.y);
    (line < app.manager.num_lines()).then_some(line)
}

fn handle_key(app: &mut App, key: KeyEvent) {
    let total = app.manager.num_lines();
    match (key.code, key.modifiers) {
        // Ctrl+C: copy when something is selected, quit otherwise
        (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => {
            if !try_copy_selection(app) {
                app.should_quit = true;
            }
        }
        // Ctrl+L: force full terminal redraw
        (KeyCode::Char('l'), m) if m.contains(KeyModifiers::CONTROL) => {
            app.force_redraw = true;
        }
        (KeyCode::Char('q'), _) => app.should_quit = true,
        (KeyCode::Esc, _) => app.clear_selection(),
        (KeyCode::Char('y'), _) => {
            if try_copy_selection(app) {
                app.clear_selection();
            }
        }
        (KeyCode::Down | KeyCode::Char('j'), _) => scroll(app, 1),
        (KeyCode::Up | KeyCode::Char('k'), _) => scroll(app, -1),
        (KeyCode::PageDown | KeyCode::Char(' '), _) => {
            app.list.page_down(total);
            app.follow = app.list.is_at_bottom(total);
            app.mark_dirty();
        }
        (KeyCode::PageUp, _) => {
            app.list.page_up(total);
            app.follow = false;
            app.mark_dirty();
        }
        (KeyCode::Home | KeyCode::Char('g'), _) => {
            app.list.scroll_to_top();
            app.follow = false;
            app.mark_dirty();
        }
        (KeyCode::End | KeyCode::Char('G'), _) => {
            app.list.scroll_to_bottom(total);
            app.follow = true;
            app.mark_dirty();
        }
        (KeyCode::Char('f'), _) => {
            app.follow = !app.follow;
            app.mark_dirty();
        }
        _ => {}
    }
}

fn scroll(app: &mut App, delta: isize) {
    let total = app.manager.num_lines();
    app.list.scroll_by(delta, total);
    if delta < 0 {
        app.follow = false;
    }
    app.mark_dirty();
}
