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

use std::fmt;
use std::str::FromStr;

/// How the raw lines of a log are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogType {
    /// Every line carries a one-character stream tag (`o`, `e`, `h`).
    Stdio,
    #[default]
    Text,
    Html,
}

impl LogType {
    /// Parse either the single-letter API code or the long name.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "s" | "stdio" => Some(Self::Stdio),
            "t" | "text" => Some(Self::Text),
            "h" | "html" => Some(Self::Html),
            _ => None,
        }
    }

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Stdio => "s",
            Self::Text => "t",
            Self::Html => "h",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Stdio => "stdio",
            Self::Text => "text",
            Self::Html => "html",
        }
    }
}

impl FromStr for LogType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s)
            .ok_or_else(|| format!("unknown log type `{s}` (expected stdio, text or html)"))
    }
}

impl fmt::Display for LogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Opaque log id plus its type. Fixed for the lifetime of a manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogIdentity {
    id: String,
    log_type: LogType,
}

impl LogIdentity {
    #[must_use]
    pub fn new(id: impl Into<String>, log_type: LogType) -> Self {
        Self { id: id.into(), log_type }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn log_type(&self) -> LogType {
        self.log_type
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStream {
    Stdout,
    Stderr,
    Header,
}

/// A decoded log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub stream: LineStream,
    pub text: String,
}

impl LogLine {
    #[must_use]
    pub fn stdout(text: impl Into<String>) -> Self {
        Self { stream: LineStream::Stdout, text: text.into() }
    }

    #[must_use]
    pub fn decode(mut raw: String, log_type: LogType) -> Self {
        if log_type != LogType::Stdio {
            return Self::stdout(raw);
        }
        let stream = match raw.as_bytes().first() {
            Some(b'o') => LineStream::Stdout,
            Some(b'e') => LineStream::Stderr,
            Some(b'h') => LineStream::Header,
            // Untagged stdio lines show up when a producer forgets the prefix.
            _ => return Self::stdout(raw),
        };
        raw.drain(..1);
        Self { stream, text: raw }
    }
}
