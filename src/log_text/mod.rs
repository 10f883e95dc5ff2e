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

//! Windowed line cache for logs too large to hold in memory.
//!
//! A [`LogTextManager`] sits between a virtualized list and a [`LogSource`]:
//! the list reports which rows it mounted, the manager works out which line
//! ranges are missing, fetches them in bounded chunks and hands back either
//! a loaded line or a placeholder for every row.
//!
//! [`LogSource`]: crate::source::LogSource

mod chunk_store;
mod fetch;
mod line;
mod manager;
pub mod ranges;
mod selection;
mod viewport;

pub use chunk_store::ChunkStore;
pub use fetch::{
    DEFAULT_COALESCE_GAP_LINES, DEFAULT_DOWNLOAD_OVERSCAN_LINES, DEFAULT_MAX_CHUNK_LINES,
    FetchCoordinator, FetchPriority, FetchRequest, LogTextConfig,
};
pub use line::{LineStream, LogIdentity, LogLine, LogType};
pub use manager::{ChangeSink, DisplayLine, FetchCompletion, LogTextManager};
pub use ranges::RangeSet;
pub use selection::{SelectionGuard, selection_span};
pub use viewport::{RenderInfo, ViewportTracker};
