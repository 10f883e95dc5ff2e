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

use super::{LogInfo, LogSource};
use crate::error::AppError;
use crate::log_text::{LogIdentity, LogType};
use anyhow::Context as _;
use std::cell::RefCell;
use std::io::SeekFrom;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncReadExt as _, AsyncSeekExt as _};

const SCAN_BUFFER_BYTES: usize = 64 * 1024;

/// Byte offsets of line boundaries, extended incrementally as the file grows.
#[derive(Debug, Default)]
struct LineIndex {
    /// Byte offset just past each `\n` seen so far.
    line_ends: Vec<u64>,
}

impl LineIndex {
    fn complete_end(&self) -> u64 {
        self.line_ends.last().copied().unwrap_or(0)
    }

    /// Only newline-terminated lines count. A trailing partial line may
    /// still be mid-write and would otherwise be cached truncated.
    fn num_lines(&self) -> usize {
        self.line_ends.len()
    }

    fn line_start(&self, index: usize) -> u64 {
        if index == 0 { 0 } else { self.line_ends[index - 1] }
    }

    fn line_end(&self, index: usize) -> u64 {
        self.line_ends.get(index).copied().unwrap_or_else(|| self.complete_end())
    }
}

/// Serves a local file as a log. `log_info` rescans only the bytes appended
/// since the previous call.
pub struct FileLogSource {
    path: PathBuf,
    log_type: LogType,
    index: RefCell<LineIndex>,
}

impl FileLogSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, log_type: LogType) -> Self {
        Self { path: path.into(), log_type, index: RefCell::new(LineIndex::default()) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn open(&self) -> anyhow::Result<tokio::fs::File> {
        match tokio::fs::File::open(&self.path).await {
            Ok(file) => Ok(file),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(anyhow::Error::new(AppError::LogNotFound)
                    .context(format!("{} does not exist", self.path.display())))
            }
            Err(err) => Err(anyhow::Error::new(err)
                .context(format!("failed to open log file {}", self.path.display()))),
        }
    }

    /// Scan bytes appended since the last refresh and return the line count.
    async fn refresh_index(&self) -> anyhow::Result<usize> {
        let scan_from = self.index.borrow().complete_end();
        let mut file = self.open().await?;
        file.seek(SeekFrom::Start(scan_from)).await.context("failed to seek log file")?;

        let mut new_ends = Vec::new();
        let mut offset = scan_from;
        let mut buf = vec![0u8; SCAN_BUFFER_BYTES];
        loop {
            let read = file.read(&mut buf).await.context("failed to read log file")?;
            if read == 0 {
                break;
            }
            for (i, byte) in buf[..read].iter().enumerate() {
                if *byte == b'\n' {
                    new_ends.push(offset + i as u64 + 1);
                }
            }
            offset += read as u64;
        }

        let mut index = self.index.borrow_mut();
        // A concurrent refresh already indexed these bytes.
        if index.complete_end() != scan_from {
            return Ok(index.num_lines());
        }
        index.line_ends.extend(new_ends);
        Ok(index.num_lines())
    }
}

#[async_trait::async_trait(?Send)]
impl LogSource for FileLogSource {
    async fn log_info(&self, id: &str) -> anyhow::Result<LogInfo> {
        let num_lines = self.refresh_index().await?;
        let name = self
            .path
            .file_name()
            .map_or_else(|| self.path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Ok(LogInfo { id: id.to_owned(), name, log_type: self.log_type, num_lines })
    }

    async fn fetch_lines(
        &self,
        _log: &LogIdentity,
        range: Range<usize>,
    ) -> anyhow::Result<Vec<String>> {
        if range.end > self.index.borrow().num_lines() {
            self.refresh_index().await?;
        }
        let (start_byte, end_byte, count) = {
            let index = self.index.borrow();
            let end = range.end.min(index.num_lines());
            if range.start >= end {
                return Ok(Vec::new());
            }
            (index.line_start(range.start), index.line_end(end - 1), end - range.start)
        };

        let mut file = self.open().await?;
        file.seek(SeekFrom::Start(start_byte)).await.context("failed to seek log file")?;
        let span = usize::try_from(end_byte - start_byte).context("line span too large")?;
        let mut bytes = vec![0u8; span];
        file.read_exact(&mut bytes).await.context("log file shrank while reading")?;

        let text = String::from_utf8_lossy(&bytes);
        Ok(text
            .split('\n')
            .take(count)
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_owned())
            .collect())
    }
}
