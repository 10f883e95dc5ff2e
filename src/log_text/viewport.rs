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

/// What a virtualized list reports after a mount pass. Both ranges are
/// half-open; `overscan` is the mounted window and contains `visible`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderInfo {
    pub overscan: Range<usize>,
    pub visible: Range<usize>,
}

impl RenderInfo {
    #[must_use]
    pub fn new(overscan: Range<usize>, visible: Range<usize>) -> Self {
        Self { overscan, visible }
    }
}

/// Last reported windows. Every update replaces the previous value outright.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewportTracker {
    render: Range<usize>,
    visible: Range<usize>,
    /// Mounted window as computed before any selection widening.
    baseline: Option<Range<usize>>,
}

impl ViewportTracker {
    pub fn on_range_rendered(&mut self, overscan: Range<usize>) {
        self.render = overscan;
    }

    pub fn on_visible(&mut self, visible: Range<usize>) {
        self.visible = visible;
    }

    pub fn update(&mut self, info: &RenderInfo) {
        self.on_range_rendered(info.overscan.clone());
        self.on_visible(info.visible.clone());
    }

    pub fn record_baseline(&mut self, overscan: Range<usize>) {
        self.baseline = Some(overscan);
    }

    #[must_use]
    pub fn render(&self) -> &Range<usize> {
        &self.render
    }

    #[must_use]
    pub fn visible(&self) -> &Range<usize> {
        &self.visible
    }

    #[must_use]
    pub fn baseline(&self) -> Option<&Range<usize>> {
        self.baseline.as_ref()
    }
}
