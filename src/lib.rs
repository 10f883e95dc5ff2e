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

pub mod app;
pub mod error;
pub mod log_text;
pub mod source;
pub mod ui;

use clap::Parser;
use log_text::{LogTextConfig, LogType};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "logtail", about = "Scroll through huge build logs without downloading them")]
pub struct Cli {
    /// Local log file to view (instead of --url/--log-id)
    #[arg(conflicts_with = "log_id")]
    pub file: Option<PathBuf>,

    /// Base URL of the log server, e.g. http://ci.local:8010
    #[arg(long, env = "LOGTAIL_URL")]
    pub url: Option<String>,

    /// Id of the log to open on the server
    #[arg(long)]
    pub log_id: Option<String>,

    /// Line encoding for local files (stdio, text, html)
    #[arg(long, default_value = "text")]
    pub log_type: LogType,

    /// Extra lines fetched on each side of the mounted rows
    #[arg(long, default_value_t = log_text::DEFAULT_DOWNLOAD_OVERSCAN_LINES)]
    pub download_overscan: usize,

    /// Upper bound on lines per fetch request
    #[arg(long, default_value_t = log_text::DEFAULT_MAX_CHUNK_LINES)]
    pub max_chunk_lines: usize,

    /// Merge holes separated by at most this many cached lines
    #[arg(long, default_value_t = log_text::DEFAULT_COALESCE_GAP_LINES)]
    pub coalesce_gap: usize,

    /// Rows mounted above and below the visible area
    #[arg(long, default_value_t = ui::DEFAULT_OVERSCAN_ROWS)]
    pub overscan_rows: usize,

    /// How often to re-query the log length (0 disables polling)
    #[arg(long, default_value_t = 2000)]
    pub poll_interval_ms: u64,

    /// Start at the bottom and stick to it while the log grows
    #[arg(long, short)]
    pub follow: bool,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Write tracing diagnostics to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Tracing filter directives (overrides RUST_LOG)
    #[arg(long)]
    pub log_filter: Option<String>,

    /// Append to --log-file instead of truncating it
    #[arg(long)]
    pub log_append: bool,
}

impl Cli {
    #[must_use]
    pub fn text_config(&self) -> LogTextConfig {
        LogTextConfig {
            download_overscan: self.download_overscan,
            max_chunk_lines: self.max_chunk_lines.max(1),
            coalesce_gap: self.coalesce_gap,
        }
    }

    /// Id shown for the log and passed to the source.
    #[must_use]
    pub fn log_key(&self) -> Option<String> {
        match (&self.file, &self.log_id) {
            (Some(path), _) => Some(path.display().to_string()),
            (None, Some(id)) => Some(id.clone()),
            (None, None) => None,
        }
    }
}
