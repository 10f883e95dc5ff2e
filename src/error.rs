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

use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    #[error("Log source unreachable")]
    SourceUnavailable,
    #[error("Log not found")]
    LogNotFound,
    #[error("Invalid arguments")]
    InvalidArguments,
}

impl AppError {
    pub const SOURCE_UNAVAILABLE_EXIT_CODE: i32 = 20;
    pub const LOG_NOT_FOUND_EXIT_CODE: i32 = 21;
    pub const INVALID_ARGUMENTS_EXIT_CODE: i32 = 22;

    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::SourceUnavailable => Self::SOURCE_UNAVAILABLE_EXIT_CODE,
            Self::LogNotFound => Self::LOG_NOT_FOUND_EXIT_CODE,
            Self::InvalidArguments => Self::INVALID_ARGUMENTS_EXIT_CODE,
        }
    }

    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::SourceUnavailable => {
                "Could not reach the log source. Check --url (or LOGTAIL_URL) and the network."
            }
            Self::LogNotFound => "The requested log does not exist on the source.",
            Self::InvalidArguments => {
                "Pass either a log file path, or --url together with --log-id."
            }
        }
    }
}

/// Why a fetch completion did not (fully) land in the line cache.
///
/// None of these are fatal: the manager logs them and keeps going. Lines that
/// did not land stay placeholders until a later reconcile asks for them again.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LogFetchError {
    #[error("fetching lines {range:?} failed: {message}")]
    Remote { range: Range<usize>, message: String },
    #[error("fetching lines {range:?} returned {received} of {expected} lines")]
    ShortRead { range: Range<usize>, expected: usize, received: usize },
    #[error("lines {range:?} completed past the known log length {num_lines}")]
    StaleRange { range: Range<usize>, num_lines: usize },
    #[error("completion from epoch {epoch} arrived after dispose")]
    Disposed { epoch: u64 },
}

impl LogFetchError {
    /// Remote and short-read failures leave a hole that the next reconcile retries.
    #[must_use]
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::Remote { .. } | Self::ShortRead { .. })
    }
}
