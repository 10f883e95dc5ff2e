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

use super::{App, AppEvent};
use crate::source::LogSource;
use std::rc::Rc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Re-query the log length every `interval` so a growing log keeps growing
/// on screen. A zero interval disables polling.
pub fn start_length_polling(
    app: &App,
    source: Rc<dyn LogSource>,
    log_id: String,
    interval: Duration,
) {
    if interval.is_zero() {
        tracing::debug!("Skipping length polling (interval is zero)");
        return;
    }

    let event_tx = app.event_tx.clone();
    tokio::task::spawn_local(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick fires immediately; the caller already has fresh info.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let event = match source.log_info(&log_id).await {
                Ok(info) => AppEvent::LogInfo(info),
                Err(err) => AppEvent::PollFailed(format!("{err:#}")),
            };
            if event_tx.send(event).is_err() {
                tracing::debug!("app gone, stopping length polling");
                break;
            }
        }
    });
}
