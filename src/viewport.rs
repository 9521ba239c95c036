//! Windowed renderer math. Domain-agnostic: knows row heights and scroll
//! offsets, never rows. The host renders only the indices in
//! `visible_range` and positions each at `index * row_height`, while
//! `content_height` keeps the scrollbar honest.
//!
//! Recomputing the window is O(1) per scroll event and must never trigger a
//! recompile of the row sequence.

use std::ops::Range;

pub const DEFAULT_OVERSCAN: usize = 2;

/// Scroll window over a fixed-height row list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    row_height: u32,
    height: u32,
    scroll_top: u32,
    overscan: usize,
}

impl Viewport {
    pub fn new(row_height: u32, height: u32) -> Self {
        Viewport {
            row_height: row_height.max(1),
            height,
            scroll_top: 0,
            overscan: DEFAULT_OVERSCAN,
        }
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn overscan(&self) -> usize {
        self.overscan
    }

    pub fn scroll_top(&self) -> u32 {
        self.scroll_top
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn set_height(&mut self, height: u32) {
        self.height = height;
    }

    /// Total scrollable height for `len` rows.
    pub fn content_height(&self, len: usize) -> u32 {
        len as u32 * self.row_height
    }

    /// Rows visible at an offset, rounded up.
    fn rows_per_page(&self) -> usize {
        self.height.div_ceil(self.row_height) as usize
    }

    /// Half-open index range of rows to materialize, overscan included.
    pub fn visible_range(&self, len: usize) -> Range<usize> {
        if len == 0 {
            return 0..0;
        }
        let start = ((self.scroll_top / self.row_height) as usize).saturating_sub(self.overscan);
        let start = start.min(len - 1);
        let end = (start + self.rows_per_page() + 2 * self.overscan).min(len - 1);
        start..end + 1
    }

    /// Scroll by a signed pixel delta, clamped to the content extent.
    pub fn scroll_by(&mut self, delta: i32, len: usize) {
        let max = self.content_height(len).saturating_sub(self.height);
        let next = self.scroll_top as i64 + delta as i64;
        self.scroll_top = next.clamp(0, max as i64) as u32;
    }

    pub fn set_scroll_top(&mut self, scroll_top: u32, len: usize) {
        let max = self.content_height(len).saturating_sub(self.height);
        self.scroll_top = scroll_top.min(max);
    }

    /// Minimal scroll to bring `index` into view: align top if the row is
    /// above the window, align bottom if below, otherwise leave the offset
    /// alone so a one-row cursor move inside the window causes no jitter.
    pub fn scroll_to_item(&mut self, index: usize) {
        let top = index as u32 * self.row_height;
        let bottom = top + self.row_height;
        if top < self.scroll_top {
            self.scroll_top = top;
        } else if bottom > self.scroll_top + self.height {
            self.scroll_top = bottom - self.height;
        }
    }

    /// First row index at or below the top edge (no overscan), for mapping
    /// pointer coordinates back to row indices.
    pub fn first_visible(&self) -> usize {
        (self.scroll_top / self.row_height) as usize
    }
}
