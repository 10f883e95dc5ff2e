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

//! Row virtualization for the log pane.
//!
//! Only the rows inside the mounted window (visible rows plus overscan) are
//! ever styled. Before mounting, the window goes through the manager's
//! render override so a pinned selection stays mounted; after mounting the
//! manager is told which rows it has to fetch.

use super::log_view;
use crate::log_text::{DisplayLine, LogTextManager, RenderInfo, ranges};
use ratatui::text::Line;
use std::collections::HashMap;
use std::ops::Range;

pub const DEFAULT_OVERSCAN_ROWS: usize = 50;

#[derive(Debug, Clone)]
pub struct VirtualList {
    scroll_offset: usize,
    viewport_height: usize,
    overscan_rows: usize,
    /// Window passed to `request_rows` on the last mount.
    last_info: Option<RenderInfo>,
    /// Request rows on the next mount even if the window did not move.
    stale: bool,
    /// Styled rows for loaded lines inside the mounted window.
    mounted: HashMap<usize, Line<'static>>,
}

impl VirtualList {
    #[must_use]
    pub fn new(overscan_rows: usize) -> Self {
        Self {
            scroll_offset: 0,
            viewport_height: 0,
            overscan_rows,
            last_info: None,
            stale: false,
            mounted: HashMap::new(),
        }
    }

    #[must_use]
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    #[must_use]
    pub fn viewport_height(&self) -> usize {
        self.viewport_height
    }

    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height = height;
    }

    fn max_offset(&self, total: usize) -> usize {
        total.saturating_sub(self.viewport_height)
    }

    fn clamp(&mut self, total: usize) {
        self.scroll_offset = self.scroll_offset.min(self.max_offset(total));
    }

    /// Scroll by `delta` rows (positive = down).
    pub fn scroll_by(&mut self, delta: isize, total: usize) {
        self.scroll_offset = if delta < 0 {
            self.scroll_offset.saturating_sub(delta.unsigned_abs())
        } else {
            self.scroll_offset.saturating_add(delta.unsigned_abs())
        };
        self.clamp(total);
    }

    pub fn page_down(&mut self, total: usize) {
        let page = isize::try_from(self.viewport_height.max(1)).unwrap_or(isize::MAX);
        self.scroll_by(page, total);
    }

    pub fn page_up(&mut self, total: usize) {
        let page = isize::try_from(self.viewport_height.max(1)).unwrap_or(isize::MAX);
        self.scroll_by(-page, total);
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }

    pub fn scroll_to_bottom(&mut self, total: usize) {
        self.scroll_offset = self.max_offset(total);
    }

    #[must_use]
    pub fn is_at_bottom(&self, total: usize) -> bool {
        self.scroll_offset >= self.max_offset(total)
    }

    #[must_use]
    pub fn visible_range(&self, total: usize) -> Range<usize> {
        let start = self.scroll_offset.min(total);
        start..start.saturating_add(self.viewport_height).min(total)
    }

    /// Visible rows plus overscan, before any override.
    #[must_use]
    pub fn render_info(&self, total: usize) -> RenderInfo {
        let visible = self.visible_range(total);
        let overscan = ranges::pad(&visible, self.overscan_rows, total);
        RenderInfo::new(overscan, visible)
    }

    pub fn mark_stale(&mut self) {
        self.stale = true;
    }

    /// One mount pass. Returns the mounted window.
    pub fn mount(&mut self, manager: &mut LogTextManager) -> Range<usize> {
        let total = manager.num_lines();
        self.clamp(total);
        let info = manager.range_to_render_override(self.render_info(total));
        self.mounted.retain(|row, _| info.overscan.contains(row));
        if self.stale || self.last_info.as_ref() != Some(&info) {
            manager.request_rows(&info);
            self.stale = false;
            self.last_info = Some(info.clone());
        }
        info.overscan
    }

    /// Styled content for `index`. Loaded rows are styled once and reused
    /// while they stay mounted; placeholders are never kept.
    pub fn row(&mut self, manager: &LogTextManager, index: usize) -> Line<'static> {
        if let Some(line) = self.mounted.get(&index) {
            return line.clone();
        }
        match manager.line_for_display(index) {
            DisplayLine::Loaded(line) => {
                let styled = log_view::style_line(line);
                self.mounted.insert(index, styled.clone());
                styled
            }
            DisplayLine::Placeholder => log_view::placeholder_line(),
        }
    }

    /// Number of rows currently holding styled content.
    #[must_use]
    pub fn mounted_rows(&self) -> usize {
        self.mounted.len()
    }
}
