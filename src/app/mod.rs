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

mod events;
mod poll;
mod selection;
mod state;

pub use events::{handle_app_event, handle_completion, handle_terminal_event};
pub use poll::start_length_polling;
pub use state::{App, AppEvent, SelectionState};

use crate::Cli;
use crate::log_text::LogTextManager;
use crate::source::{LogInfo, LogSource};
use crate::ui::VirtualList;
use crossterm::event::EventStream;
use futures::{FutureExt as _, StreamExt};
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Build the app for `info`, with the manager already told the current length.
pub fn create_app(cli: &Cli, info: &LogInfo, source: Rc<dyn LogSource>) -> App {
    let mut manager = LogTextManager::new(info.identity(), source, cli.text_config());
    manager.set_log_num_lines(info.num_lines);
    let mut app = App::new(manager, info.name.clone(), VirtualList::new(cli.overscan_rows));
    app.follow = cli.follow;
    app
}

// ---------------------------------------------------------------------------
// TUI event loop
// ---------------------------------------------------------------------------

pub async fn run_tui(app: &mut App) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    // Mouse capture drives selection and wheel scrolling (ignore error on unsupported terminals)
    let _ = crossterm::execute!(
        std::io::stdout(),
        crossterm::event::EnableMouseCapture,
        crossterm::event::EnableFocusChange,
    );

    let mut events = EventStream::new();
    let tick_duration = Duration::from_millis(16);
    let mut last_render = Instant::now();

    let result = loop {
        // Phase 1: wait for at least one event or the next frame tick
        let time_to_next = tick_duration.saturating_sub(last_render.elapsed());
        tokio::select! {
            Some(Ok(event)) = events.next() => {
                events::handle_terminal_event(app, event);
            }
            Some(completion) = app.manager.next_completion() => {
                events::handle_completion(app, completion);
            }
            Some(event) = app.event_rx.recv() => {
                events::handle_app_event(app, event);
            }
            () = tokio::time::sleep(time_to_next) => {}
        }

        // Phase 2: drain all remaining queued events (non-blocking)
        loop {
            // Terminal events first (keeps scrolling responsive)
            if let Some(Some(Ok(event))) = events.next().now_or_never() {
                events::handle_terminal_event(app, event);
                continue;
            }
            if let Some(Some(completion)) = app.manager.next_completion().now_or_never() {
                events::handle_completion(app, completion);
                continue;
            }
            match app.event_rx.try_recv() {
                Ok(event) => events::handle_app_event(app, event),
                Err(_) => break,
            }
        }

        if app.should_quit {
            break Ok(());
        }

        // Phase 3: render once, only when something changed
        if app.force_redraw {
            if let Err(err) = terminal.clear() {
                break Err(err.into());
            }
            app.force_redraw = false;
            app.mark_dirty();
        }
        if app.take_dirty()
            && let Err(err) = terminal.draw(|f| crate::ui::render(f, app))
        {
            break Err(err.into());
        }
        last_render = Instant::now();
    };

    app.manager.dispose();

    // Restore terminal
    let _ = crossterm::execute!(
        std::io::stdout(),
        crossterm::event::DisableMouseCapture,
        crossterm::event::DisableFocusChange,
    );
    ratatui::restore();

    result
}
