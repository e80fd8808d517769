// 📄 Pagination Coordinator - two independent windows over one ordered list
//
// Compact view:  user-selectable page size (5/10/20/30 by default)
// Expanded view: fixed page size of 30
//
// The windows never talk to each other. Both slice the same sorted order,
// so a sort change shows up in both on the next read.

use crate::error::{LedgerError, LedgerResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

pub const EXPANDED_PAGE_SIZE: usize = 30;
pub const DEFAULT_COMPACT_PAGE_SIZE: usize = 5;
pub const DEFAULT_PAGE_SIZE_OPTIONS: [usize; 4] = [5, 10, 20, 30];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    Compact,
    Expanded,
}

impl ViewKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewKind::Compact => "compact",
            ViewKind::Expanded => "expanded",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(ViewKind::Compact),
            "expanded" => Ok(ViewKind::Expanded),
            _ => Err(format!("Unknown view: {}", s)),
        }
    }
}

// ============================================================================
// PAGE WINDOW
// ============================================================================

/// 1-based page index plus page size. The total is always derived from the
/// collection handed to [`PageWindow::slice`], never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    pub page_index: usize,
    pub page_size: usize,
}

impl PageWindow {
    pub fn new(page_size: usize) -> Self {
        PageWindow {
            page_index: 1,
            page_size: page_size.max(1),
        }
    }

    /// Number of pages needed for `total` rows; an empty list still has one page
    pub fn total_pages(&self, total: usize) -> usize {
        total.div_ceil(self.page_size).max(1)
    }

    /// `[(page-1)*size, page*size)` clamped to `0..total`
    pub fn range(&self, total: usize) -> Range<usize> {
        if self.page_index == 0 {
            return 0..0;
        }
        let start = (self.page_index - 1).saturating_mul(self.page_size).min(total);
        let end = self.page_index.saturating_mul(self.page_size).min(total);
        start..end
    }

    pub fn slice<'s, T>(&self, ordered: &'s [T]) -> &'s [T] {
        &ordered[self.range(ordered.len())]
    }
}

// ============================================================================
// PAGINATION COORDINATOR
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationCoordinator {
    compact: PageWindow,
    expanded: PageWindow,
    page_size_options: Vec<usize>,
}

impl PaginationCoordinator {
    pub fn new(compact_page_size: usize, page_size_options: Vec<usize>) -> Self {
        PaginationCoordinator {
            compact: PageWindow::new(compact_page_size),
            expanded: PageWindow::new(EXPANDED_PAGE_SIZE),
            page_size_options,
        }
    }

    pub fn window(&self, kind: ViewKind) -> PageWindow {
        match kind {
            ViewKind::Compact => self.compact,
            ViewKind::Expanded => self.expanded,
        }
    }

    pub fn page_size_options(&self) -> &[usize] {
        &self.page_size_options
    }

    /// Out-of-range pages are accepted as-is and simply render empty
    pub fn set_page(&mut self, kind: ViewKind, page_index: usize) {
        match kind {
            ViewKind::Compact => self.compact.page_index = page_index,
            ViewKind::Expanded => self.expanded.page_index = page_index,
        }
    }

    /// Compact window only; resets it to page 1
    pub fn set_page_size(&mut self, page_size: usize) -> LedgerResult<()> {
        if !self.page_size_options.contains(&page_size) {
            return Err(LedgerError::InvalidPageSize {
                size: page_size,
                allowed: self.page_size_options.clone(),
            });
        }
        self.compact = PageWindow::new(page_size);
        Ok(())
    }

    /// Move the compact window to the page holding the last of `total` rows
    pub fn jump_to_last_compact_page(&mut self, total: usize) {
        self.compact.page_index = self.compact.total_pages(total);
    }
}

impl Default for PaginationCoordinator {
    fn default() -> Self {
        Self::new(DEFAULT_COMPACT_PAGE_SIZE, DEFAULT_PAGE_SIZE_OPTIONS.to_vec())
    }
}

// ============================================================================
// TESTS
// ============================================================================
