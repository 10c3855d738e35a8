use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Page sizes offered by the page-size selector.
pub const PAGE_SIZE_OPTIONS: [usize; 7] = [5, 10, 20, 30, 40, 50, 100];

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Pages of context shown on each side of the current page.
const WINDOW_DELTA: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationState {
    pub page_index: usize,
    pub page_size: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationState {
    pub fn new(page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(Error::InvalidPageSize(page_size));
        }
        Ok(Self {
            page_index: 0,
            page_size,
        })
    }

    /// `ceil(rows / page_size)`; zero rows gives zero pages.
    pub fn page_count(&self, rows: usize) -> usize {
        rows.div_ceil(self.page_size)
    }

    /// Keep `page_index < max(page_count, 1)`.
    pub fn clamp(&mut self, rows: usize) {
        let last = self.page_count(rows).max(1) - 1;
        self.page_index = self.page_index.min(last);
    }

    /// Change the page size, keeping the first visible row on screen.
    pub fn resize(&mut self, page_size: usize, rows: usize) -> Result<()> {
        if page_size == 0 {
            return Err(Error::InvalidPageSize(page_size));
        }
        let top_row = self.page_index * self.page_size;
        self.page_size = page_size;
        self.page_index = top_row / page_size;
        self.clamp(rows);
        Ok(())
    }

    pub fn offset(&self) -> usize {
        self.page_index * self.page_size
    }

    pub fn can_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next(&self, rows: usize) -> bool {
        self.page_index + 1 < self.page_count(rows)
    }
}

/// One-based page numbers to show around the current page.
///
/// Two pages on each side of the current one, widened to five pages when
/// the current page is near either edge.
pub fn page_window(page_index: usize, page_count: usize) -> Vec<usize> {
    let total = page_count.max(1);
    let current = (page_index + 1).min(total);

    let mut start = current.saturating_sub(WINDOW_DELTA).max(1);
    let mut end = (current + WINDOW_DELTA).min(total);

    if current <= WINDOW_DELTA + 1 {
        end = total.min(WINDOW_DELTA * 2 + 1);
    }
    if current + WINDOW_DELTA >= total {
        start = total.saturating_sub(WINDOW_DELTA * 2).max(1);
    }

    (start..=end).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_page_size_rejected() {
        assert!(matches!(
            PaginationState::new(0),
            Err(Error::InvalidPageSize(0))
        ));
        let mut state = PaginationState::default();
        assert!(state.resize(0, 10).is_err());
        assert_eq!(state.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_resize_keeps_top_row() {
        let mut state = PaginationState {
            page_index: 3,
            page_size: 10,
        };
        state.resize(20, 100).unwrap();
        assert_eq!(state.page_index, 1);

        state.resize(100, 100).unwrap();
        assert_eq!(state.page_index, 0);
    }

    #[test]
    fn test_clamp_on_shrink() {
        let mut state = PaginationState {
            page_index: 4,
            page_size: 10,
        };
        state.clamp(12);
        assert_eq!(state.page_index, 1);
        state.clamp(0);
        assert_eq!(state.page_index, 0);
    }

    #[test]
    fn test_page_window_edges() {
        assert_eq!(page_window(0, 10), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(4, 10), vec![3, 4, 5, 6, 7]);
        assert_eq!(page_window(9, 10), vec![6, 7, 8, 9, 10]);
        assert_eq!(page_window(0, 3), vec![1, 2, 3]);
        assert_eq!(page_window(0, 0), vec![1]);
    }
}
