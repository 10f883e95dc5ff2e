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

//! Where log lines come from.
//!
//! Sources are polled from a single-threaded `LocalSet`, so the trait is
//! `?Send` and implementations may use `RefCell` for their own bookkeeping.

pub mod file;
pub mod http;

pub use file::FileLogSource;
pub use http::HttpLogSource;

use crate::log_text::{LogIdentity, LogType};
use std::ops::Range;

/// Metadata describing one log at the time it was queried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogInfo {
    pub id: String,
    pub name: String,
    pub log_type: LogType,
    pub num_lines: usize,
}

impl LogInfo {
    #[must_use]
    pub fn identity(&self) -> LogIdentity {
        LogIdentity::new(self.id.clone(), self.log_type)
    }
}

#[async_trait::async_trait(?Send)]
pub trait LogSource {
    /// Current metadata, including the line count as of now. Called again
    /// periodically to follow a log that is still growing.
    async fn log_info(&self, id: &str) -> anyhow::Result<LogInfo>;

    /// Raw (undecoded) lines for `range`, in order. May return fewer lines
    /// than asked for if the source knows fewer.
    async fn fetch_lines(
        &self,
        log: &LogIdentity,
        range: Range<usize>,
    ) -> anyhow::Result<Vec<String>>;
}
