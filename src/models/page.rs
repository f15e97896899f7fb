use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Requested slice of a result list. Absence means "everything".
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
pub struct PageRequest {
    /// Zero-based page index.
    pub page: usize,
    /// Items per page.
    pub per_page: usize,
}

/// One page of results plus the total count across all pages.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
}

impl<T> Page<T> {
    /// Slices `items` according to `request`; `None` returns a single
    /// all-inclusive page.
    pub fn from_vec(items: Vec<T>, request: Option<PageRequest>) -> Self {
        let total = items.len();
        match request {
            None => Self {
                per_page: total,
                items,
                total,
                page: 0,
            },
            Some(req) => {
                let per_page = req.per_page.max(1);
                let start = (req.page * per_page).min(total);
                let end = (start + per_page).min(total);
                Self {
                    items: items.into_iter().skip(start).take(end - start).collect(),
                    total,
                    page: req.page,
                    per_page,
                }
            }
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_within_bounds() {
        let page = Page::from_vec(
            (0..10).collect::<Vec<_>>(),
            Some(PageRequest { page: 1, per_page: 4 }),
        );
        assert_eq!(page.items, vec![4, 5, 6, 7]);
        assert_eq!(page.total, 10);
    }

    #[test]
    fn out_of_range_page_is_empty_not_panicking() {
        let page = Page::from_vec(vec![1, 2, 3], Some(PageRequest { page: 5, per_page: 10 }));
        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
    }

    #[test]
    fn unpaged_returns_everything() {
        let page = Page::from_vec(vec![1, 2, 3], None);
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.per_page, 3);
    }
}
