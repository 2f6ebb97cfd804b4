use serde::{Deserialize, Serialize};

use crate::error::{KeepsakeError, Result};

/// One page of a remote collection.
///
/// `items.len() <= page_size` always holds, and `page * page_size` is the
/// offset of `items[0]` within the full collection. Backends that return a
/// bare array never say how large the collection is; such pages carry no
/// total and a short page is taken as the end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourcePage<T> {
    items: Vec<T>,
    total_count: Option<u64>,
    page: u32,
    page_size: u32,
}

impl<T> ResourcePage<T> {
    pub fn new(items: Vec<T>, total_count: u64, page: u32, page_size: u32) -> Result<Self> {
        Self::build(items, Some(total_count), page, page_size)
    }

    /// A page from a backend that did not report the collection size.
    pub fn without_total(items: Vec<T>, page: u32, page_size: u32) -> Result<Self> {
        Self::build(items, None, page, page_size)
    }

    fn build(items: Vec<T>, total_count: Option<u64>, page: u32, page_size: u32) -> Result<Self> {
        if page_size == 0 {
            return Err(KeepsakeError::unexpected_shape("page size must be positive"));
        }
        if items.len() > page_size as usize {
            return Err(KeepsakeError::unexpected_shape(format!(
                "{} items returned for a page of {page_size}",
                items.len()
            )));
        }
        Ok(Self {
            items,
            total_count,
            page,
            page_size,
        })
    }

    /// Cut one page out of a fully loaded collection.
    pub fn from_full(all: Vec<T>, page: u32, page_size: u32) -> Result<Self> {
        let total = all.len() as u64;
        let offset = u64::from(page) * u64::from(page_size);
        let items = all
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(page_size as usize)
            .collect();
        Self::new(items, total, page, page_size)
    }

    pub fn empty(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            total_count: Some(0),
            page: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Collection size as reported by the backend, if it reported one.
    pub fn total(&self) -> Option<u64> {
        self.total_count
    }

    /// Reported collection size, or the number of records known to exist up
    /// to the end of this page when no size was reported.
    pub fn total_count(&self) -> u64 {
        self.total_count
            .unwrap_or_else(|| self.offset() + self.items.len() as u64)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.page_size)
    }

    /// Number of pages in the collection; an empty collection has one
    /// (empty) page. Unknown without a reported total.
    pub fn page_count(&self) -> Option<u64> {
        self.total_count
            .map(|total| page_count(total, self.page_size))
    }

    pub fn is_last_page(&self) -> bool {
        match self.page_count() {
            Some(count) => u64::from(self.page) + 1 >= count,
            None => self.has_room(),
        }
    }

    pub fn has_room(&self) -> bool {
        self.items.len() < self.page_size as usize
    }

    pub(crate) fn items_mut(&mut self) -> &mut Vec<T> {
        &mut self.items
    }

    /// Shift a reported total after a local write. No-op without one.
    pub(crate) fn adjust_total(&mut self, delta: i64) {
        if let Some(total) = self.total_count.as_mut() {
            *total = total.saturating_add_signed(delta);
        }
    }
}

pub(crate) fn page_count(total: u64, page_size: u32) -> u64 {
    let size = u64::from(page_size.max(1));
    total.div_ceil(size).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_oversized_page() {
        let err = ResourcePage::new(vec![1, 2, 3], 3, 0, 2).unwrap_err();
        assert!(err.to_string().contains("3 items returned for a page of 2"));
    }

    #[test]
    fn test_from_full_slices_last_page() {
        let all: Vec<u32> = (0..25).collect();
        let page = ResourcePage::from_full(all, 1, 20).unwrap();
        assert_eq!(page.items(), &[20, 21, 22, 23, 24]);
        assert_eq!(page.total_count(), 25);
        assert_eq!(page.offset(), 20);
        assert_eq!(page.page_count(), Some(2));
        assert!(page.is_last_page());
    }

    #[test]
    fn test_from_full_past_the_end_is_empty() {
        let page = ResourcePage::from_full(vec![1, 2, 3], 4, 10).unwrap();
        assert!(page.items().is_empty());
        assert_eq!(page.total_count(), 3);
    }

    #[test]
    fn test_page_without_total_ends_on_short_page() {
        let full = ResourcePage::without_total((0..10).collect::<Vec<u32>>(), 2, 10).unwrap();
        assert_eq!(full.total(), None);
        assert_eq!(full.page_count(), None);
        assert_eq!(full.total_count(), 30, "lower bound through the end of this page");
        assert!(!full.is_last_page());

        let short = ResourcePage::without_total(vec![1, 2, 3], 3, 10).unwrap();
        assert!(short.is_last_page());
        assert_eq!(short.total_count(), 33);
    }

    #[test]
    fn test_adjust_total_needs_a_reported_total() {
        let mut known = ResourcePage::new(vec![1], 5, 0, 10).unwrap();
        known.adjust_total(-1);
        assert_eq!(known.total(), Some(4));
        known.adjust_total(-9);
        assert_eq!(known.total(), Some(0));

        let mut unknown = ResourcePage::without_total(vec![1], 0, 10).unwrap();
        unknown.adjust_total(1);
        assert_eq!(unknown.total(), None);
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 20), 1);
        assert_eq!(page_count(20, 20), 1);
        assert_eq!(page_count(21, 20), 2);
        assert_eq!(page_count(25, 20), 2);
    }
}
