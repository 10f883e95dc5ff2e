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

use super::ranges;
use std::ops::Range;

/// Keeps rows under an active text selection mounted.
///
/// While `Active`, every mounted window handed to the list is widened to also
/// cover the selected rows, so scrolling never unmounts part of a selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SelectionGuard {
    #[default]
    Inactive,
    Active(Range<usize>),
}

impl SelectionGuard {
    /// An empty span means the selection collapsed.
    pub fn activate(&mut self, span: Range<usize>) {
        *self = if span.is_empty() { Self::Inactive } else { Self::Active(span) };
    }

    pub fn deactivate(&mut self) {
        *self = Self::Inactive;
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }

    #[must_use]
    pub fn span(&self) -> Option<&Range<usize>> {
        match self {
            Self::Active(span) => Some(span),
            Self::Inactive => None,
        }
    }

    #[must_use]
    pub fn widen(&self, overscan: Range<usize>) -> Range<usize> {
        match self {
            Self::Inactive => overscan,
            Self::Active(span) => ranges::hull(&overscan, span),
        }
    }
}

/// Rows of `rendered` covered by a selection between two row indices
/// (inclusive, either order). `None` when the selection misses `rendered`.
#[must_use]
pub fn selection_span(
    anchor_row: usize,
    focus_row: usize,
    rendered: &Range<usize>,
) -> Option<Range<usize>> {
    let top = anchor_row.min(focus_row).max(rendered.start);
    let bottom = anchor_row.max(focus_row).saturating_add(1).min(rendered.end);
    (top < bottom).then_some(top..bottom)
}
