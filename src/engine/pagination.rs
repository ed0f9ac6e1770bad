//! Pagination
//!
//! In internal mode the controller owns `page` and `rows_per_page` and slices
//! the processed rows itself. In external mode the caller owns the page, the
//! page size and the total; the controller never slices and turns every
//! change into a [`PageRequest`] for the caller to act on.

/// Page state owned by the caller in external (server-paged) mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemotePage {
    pub page: usize,
    pub rows_per_page: usize,
    pub total: usize,
}

/// A change the caller must apply in external mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    Page(usize),
    RowsPerPage(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PageMode {
    Internal { page: usize, rows_per_page: usize },
    External(RemotePage),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    mode: PageMode,
}

impl Pagination {
    pub fn internal(rows_per_page: usize) -> Self {
        Self {
            mode: PageMode::Internal {
                page: 0,
                rows_per_page: rows_per_page.max(1),
            },
        }
    }

    pub fn external(remote: RemotePage) -> Self {
        Self {
            mode: PageMode::External(remote),
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self.mode, PageMode::External(_))
    }

    pub fn page(&self) -> usize {
        match &self.mode {
            PageMode::Internal { page, .. } => *page,
            PageMode::External(remote) => remote.page,
        }
    }

    pub fn rows_per_page(&self) -> usize {
        match &self.mode {
            PageMode::Internal { rows_per_page, .. } => *rows_per_page,
            PageMode::External(remote) => remote.rows_per_page,
        }
    }

    /// Total used for labels: the caller's total in external mode, else the
    /// filtered row count.
    pub fn total(&self, filtered_count: usize) -> usize {
        match &self.mode {
            PageMode::Internal { .. } => filtered_count,
            PageMode::External(remote) => remote.total,
        }
    }

    pub fn page_count(&self, filtered_count: usize) -> usize {
        let total = self.total(filtered_count);
        let per_page = self.rows_per_page().max(1);
        total.div_ceil(per_page).max(1)
    }

    /// Rows for the current page. External mode returns `rows` unchanged.
    pub fn slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        match &self.mode {
            PageMode::Internal {
                page,
                rows_per_page,
            } => {
                let start = page.saturating_mul(*rows_per_page).min(rows.len());
                let end = start.saturating_add(*rows_per_page).min(rows.len());
                &rows[start..end]
            }
            PageMode::External(_) => rows,
        }
    }

    pub fn set_page(&mut self, new_page: usize) -> Option<PageRequest> {
        match &mut self.mode {
            PageMode::Internal { page, .. } => {
                *page = new_page;
                None
            }
            PageMode::External(_) => Some(PageRequest::Page(new_page)),
        }
    }

    /// Change the page size. Zero is rejected; internal mode resets to the
    /// first page.
    pub fn set_rows_per_page(&mut self, new_size: usize) -> Option<PageRequest> {
        if new_size == 0 {
            return None;
        }
        match &mut self.mode {
            PageMode::Internal {
                page,
                rows_per_page,
            } => {
                *rows_per_page = new_size;
                *page = 0;
                None
            }
            PageMode::External(_) => Some(PageRequest::RowsPerPage(new_size)),
        }
    }

    /// Return to the first page, as a search or filter change requires
    pub fn reset_page(&mut self) -> Option<PageRequest> {
        self.set_page(0)
    }

    /// Keep the internal page within `0..page_count`
    pub fn clamp(&mut self, filtered_count: usize) {
        let last = self.page_count(filtered_count) - 1;
        if let PageMode::Internal { page, .. } = &mut self.mode {
            if *page > last {
                *page = last;
            }
        }
    }

    /// Replace the caller-owned page state. Ignored in internal mode, since
    /// the mode is fixed for the table's lifetime.
    pub fn update_remote(&mut self, remote: RemotePage) -> bool {
        match &mut self.mode {
            PageMode::External(current) => {
                *current = remote;
                true
            }
            PageMode::Internal { .. } => false,
        }
    }

    /// Label such as `11–20 of 25`
    pub fn label(&self, filtered_count: usize) -> String {
        let total = self.total(filtered_count);
        if total == 0 {
            return "0–0 of 0".to_string();
        }
        let start = self.page().saturating_mul(self.rows_per_page());
        let from = start.saturating_add(1).min(total);
        let to = start.saturating_add(self.rows_per_page()).min(total);
        format!("{}–{} of {}", from, to, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_slice() {
        let rows: Vec<usize> = (0..25).collect();
        let mut pagination = Pagination::internal(10);

        assert_eq!(pagination.slice(&rows), &rows[0..10]);
        pagination.set_page(2);
        assert_eq!(pagination.slice(&rows), &rows[20..25]);
        pagination.set_page(5);
        assert!(pagination.slice(&rows).is_empty());
    }

    #[test]
    fn test_rows_per_page_resets_page() {
        let mut pagination = Pagination::internal(10);
        pagination.set_page(2);
        assert_eq!(pagination.set_rows_per_page(25), None);
        assert_eq!(pagination.page(), 0);
        assert_eq!(pagination.rows_per_page(), 25);

        assert_eq!(pagination.set_rows_per_page(0), None);
        assert_eq!(pagination.rows_per_page(), 25);
    }

    #[test]
    fn test_external_forwards_requests() {
        let remote = RemotePage {
            page: 1,
            rows_per_page: 20,
            total: 95,
        };
        let mut pagination = Pagination::external(remote);
        let rows: Vec<usize> = (0..20).collect();

        assert_eq!(pagination.slice(&rows).len(), 20);
        assert_eq!(pagination.set_page(3), Some(PageRequest::Page(3)));
        assert_eq!(pagination.page(), 1);
        assert_eq!(
            pagination.set_rows_per_page(50),
            Some(PageRequest::RowsPerPage(50))
        );
        assert_eq!(pagination.rows_per_page(), 20);
        assert_eq!(pagination.reset_page(), Some(PageRequest::Page(0)));
        assert_eq!(pagination.total(7), 95);
        assert_eq!(pagination.label(7), "21–40 of 95");
    }

    #[test]
    fn test_update_remote_only_in_external_mode() {
        let mut internal = Pagination::internal(10);
        assert!(!internal.update_remote(RemotePage {
            page: 4,
            rows_per_page: 10,
            total: 100,
        }));
        assert!(!internal.is_external());
    }

    #[test]
    fn test_clamp_after_shrink() {
        let mut pagination = Pagination::internal(10);
        pagination.set_page(4);
        pagination.clamp(25);
        assert_eq!(pagination.page(), 2);
        pagination.clamp(0);
        assert_eq!(pagination.page(), 0);
    }

    #[test]
    fn test_labels() {
        let mut pagination = Pagination::internal(10);
        assert_eq!(pagination.label(0), "0–0 of 0");
        assert_eq!(pagination.label(25), "1–10 of 25");
        pagination.set_page(2);
        assert_eq!(pagination.label(25), "21–25 of 25");
        assert_eq!(pagination.page_count(25), 3);
    }
}
