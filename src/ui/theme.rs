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

use crate::log_text::LineStream;
use ratatui::style::Color;

// Accent
pub const RUST_ORANGE: Color = Color::Rgb(244, 118, 0);

// UI chrome
pub const DIM: Color = Color::DarkGray;
pub const SEPARATOR_CHAR: &str = "─";

// Log rows
pub const PLACEHOLDER_CHAR: &str = "·";
pub const SELECTION_BG: Color = Color::Rgb(40, 44, 52);
pub const STREAM_STDERR: Color = Color::Red;
pub const STREAM_HEADER: Color = Color::Cyan;

// Status colors
pub const STATUS_FOLLOW: Color = Color::Green;
pub const STATUS_FETCHING: Color = Color::Cyan;
pub const STATUS_ERROR: Color = Color::Red;

/// Foreground for a stream, or `None` to keep the line's own ANSI colours.
pub fn stream_color(stream: LineStream) -> Option<Color> {
    match stream {
        LineStream::Stdout => None,
        LineStream::Stderr => Some(STREAM_STDERR),
        LineStream::Header => Some(STREAM_HEADER),
    }
}
