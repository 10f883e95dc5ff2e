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
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::ops::Range;
use std::time::Duration;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct LogsEnvelope {
    logs: Vec<LogEntry>,
}

#[derive(Debug, Deserialize)]
struct LogEntry {
    #[serde(default)]
    name: String,
    #[serde(rename = "type", default)]
    log_type: String,
    num_lines: usize,
}

#[derive(Debug, Deserialize)]
struct ContentsEnvelope {
    logchunks: Vec<LogChunk>,
}

#[derive(Debug, Deserialize)]
struct LogChunk {
    firstline: usize,
    content: String,
}

/// Buildbot-style REST log API:
/// `GET {base}/api/v2/logs/{id}` and `GET {base}/api/v2/logs/{id}/contents?offset=&limit=`.
pub struct HttpLogSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpLogSource {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("logtail-rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_owned() })
    }

    #[must_use]
    pub fn log_url(&self, id: &str) -> String {
        format!("{}/api/v2/logs/{id}", self.base_url)
    }

    #[must_use]
    pub fn contents_url(&self, id: &str, range: &Range<usize>) -> String {
        format!("{}/contents?offset={}&limit={}", self.log_url(id), range.start, range.len())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> anyhow::Result<T> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(err) => {
                return Err(anyhow::Error::new(AppError::SourceUnavailable)
                    .context(format!("GET {url} failed: {err}")));
            }
        };
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(anyhow::Error::new(AppError::LogNotFound).context(format!("GET {url}")));
        }
        if !status.is_success() {
            anyhow::bail!("GET {url} returned HTTP {status}");
        }
        response.json::<T>().await.with_context(|| format!("failed to decode response from {url}"))
    }
}

#[async_trait::async_trait(?Send)]
impl LogSource for HttpLogSource {
    async fn log_info(&self, id: &str) -> anyhow::Result<LogInfo> {
        let url = self.log_url(id);
        let envelope: LogsEnvelope = self.get_json(&url).await?;
        let Some(entry) = envelope.logs.into_iter().next() else {
            return Err(anyhow::Error::new(AppError::LogNotFound)
                .context(format!("{url} returned no log entries")));
        };
        let log_type = LogType::from_code(&entry.log_type).unwrap_or_else(|| {
            tracing::warn!("log {id} has unknown type `{}`, showing as text", entry.log_type);
            LogType::Text
        });
        Ok(LogInfo { id: id.to_owned(), name: entry.name, log_type, num_lines: entry.num_lines })
    }

    async fn fetch_lines(
        &self,
        log: &LogIdentity,
        range: Range<usize>,
    ) -> anyhow::Result<Vec<String>> {
        if range.is_empty() {
            return Ok(Vec::new());
        }
        let url = self.contents_url(log.id(), &range);
        let envelope: ContentsEnvelope = self.get_json(&url).await?;
        Ok(lines_from_chunks(envelope.logchunks, &range))
    }
}

/// Flatten API chunks into the contiguous run of lines starting at `range.start`.
/// Anything outside `range` or after a gap is dropped.
fn lines_from_chunks(mut chunks: Vec<LogChunk>, range: &Range<usize>) -> Vec<String> {
    chunks.sort_by_key(|c| c.firstline);
    let mut lines = Vec::with_capacity(range.len());
    for chunk in &chunks {
        for (index, text) in (chunk.firstline..).zip(chunk.content.lines()) {
            let next = range.start + lines.len();
            if index < next {
                continue;
            }
            if index > next || index >= range.end {
                return lines;
            }
            lines.push(text.to_owned());
        }
    }
    lines
}
