//! Pagination and query state for list views.
//!
//! [`QuerySpec`] describes what a list view wants to see; [`QueryState`] is the
//! single owner of that spec for one view and knows how user actions (page,
//! page size, sort, identifying filters) change it and whether the change
//! needs a new fetch.

mod page;
pub mod sort;

use std::collections::BTreeMap;

use crate::error::Result;
use crate::types::{ListMode, ResourceKind};

pub use page::ResourcePage;
pub use sort::{SortDirection, SortSpec};

/// Parameters describing which page of a collection to request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    /// Zero-based page index.
    pub page: u32,
    pub page_size: u32,
    /// Text typed into the search box. Applied page-locally, never sent.
    pub search_text: String,
    pub sort: Option<SortSpec>,
    /// Identifying filters such as `album_id` or `kid_id`.
    pub filters: BTreeMap<String, String>,
}

impl QuerySpec {
    pub fn for_kind(kind: ResourceKind) -> Self {
        Self {
            page: 0,
            page_size: kind.default_page_size(),
            search_text: String::new(),
            sort: None,
            filters: BTreeMap::new(),
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Zero-based offset of the first requested item.
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.page_size)
    }

    /// Query parameters for a list endpoint using `mode`.
    pub fn params(&self, mode: ListMode) -> Vec<(String, String)> {
        let mut params = Vec::new();
        match mode {
            ListMode::Paged => {
                params.push(("page".to_string(), (self.page + 1).to_string()));
                params.push(("limit".to_string(), self.page_size.to_string()));
            }
            ListMode::Offset => {
                params.push(("limit".to_string(), self.page_size.to_string()));
                params.push(("offset".to_string(), self.offset().to_string()));
            }
            ListMode::Full => {}
        }
        if let Some(sort) = &self.sort {
            params.push(("sort_by".to_string(), sort.field.clone()));
            params.push(("order".to_string(), sort.direction.as_str().to_string()));
        }
        for (key, value) in &self.filters {
            params.push((key.clone(), value.clone()));
        }
        params
    }
}

/// Source of truth for what one list view currently requests.
#[derive(Debug, Clone)]
pub struct QueryState {
    kind: ResourceKind,
    spec: QuerySpec,
    total_count: Option<u64>,
}

impl QueryState {
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            spec: QuerySpec::for_kind(kind),
            total_count: None,
        }
    }

    /// Start from an explicit spec, validating its page size.
    pub fn with_spec(kind: ResourceKind, spec: QuerySpec) -> Result<Self> {
        kind.validate_page_size(spec.page_size)?;
        Ok(Self {
            kind,
            spec,
            total_count: None,
        })
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn spec(&self) -> &QuerySpec {
        &self.spec
    }

    pub fn page(&self) -> u32 {
        self.spec.page
    }

    pub fn page_size(&self) -> u32 {
        self.spec.page_size
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.spec.sort.as_ref()
    }

    pub fn search_text(&self) -> &str {
        &self.spec.search_text
    }

    /// Total reported by the last successful fetch, adjusted by local
    /// reconciliation. `None` until a fetch lands or when the backend does
    /// not report one, in which case paging is unbounded.
    pub fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    pub fn page_count(&self) -> Option<u64> {
        self.total_count
            .map(|total| page::page_count(total, self.spec.page_size))
    }

    pub fn last_page(&self) -> Option<u32> {
        self.page_count()
            .map(|count| u32::try_from(count - 1).unwrap_or(u32::MAX))
    }

    /// Move to page `n`, clamped to the known page range.
    ///
    /// Returns `true` when the requested page changed and a fetch is needed.
    pub fn set_page(&mut self, n: u32) -> bool {
        let target = match self.last_page() {
            Some(last) => n.min(last),
            None => n,
        };
        if target == self.spec.page {
            return false;
        }
        self.spec.page = target;
        true
    }

    /// Change the page size and go back to the first page.
    ///
    /// Returns `Ok(true)` when a fetch is needed.
    pub fn set_page_size(&mut self, size: u32) -> Result<bool> {
        self.kind.validate_page_size(size)?;
        if size == self.spec.page_size {
            return Ok(false);
        }
        self.spec.page_size = size;
        self.spec.page = 0;
        Ok(true)
    }

    /// Update the search text. Search is page-local, so this never needs a
    /// fetch; returns whether the text changed.
    pub fn set_search(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if text == self.spec.search_text {
            return false;
        }
        self.spec.search_text = text;
        true
    }

    /// Change the server-side ordering. Resets to the first page.
    pub fn set_sort(&mut self, sort: Option<SortSpec>) -> bool {
        if sort == self.spec.sort {
            return false;
        }
        self.spec.sort = sort;
        self.spec.page = 0;
        true
    }

    /// Set or clear an identifying filter. Resets to the first page.
    pub fn set_filter(&mut self, key: &str, value: Option<String>) -> bool {
        let changed = match value {
            Some(value) => self.spec.filters.insert(key.to_string(), value.clone()) != Some(value),
            None => self.spec.filters.remove(key).is_some(),
        };
        if changed {
            self.spec.page = 0;
        }
        changed
    }

    pub fn record_total(&mut self, total: Option<u64>) {
        self.total_count = total;
    }

    pub fn adjust_total(&mut self, delta: i64) {
        if let Some(total) = self.total_count.as_mut() {
            *total = total.saturating_add_signed(delta);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paged_params_are_one_based() {
        let spec = QuerySpec::for_kind(ResourceKind::Users).with_page(1);
        assert_eq!(
            spec.params(ListMode::Paged),
            vec![
                ("page".to_string(), "2".to_string()),
                ("limit".to_string(), "20".to_string()),
            ]
        );
        assert_eq!(spec.offset(), 20);
    }

    #[test]
    fn test_offset_params_include_filters() {
        let spec = QuerySpec::for_kind(ResourceKind::Photos)
            .with_page(2)
            .with_filter("album_id", "9");
        assert_eq!(
            spec.params(ListMode::Offset),
            vec![
                ("limit".to_string(), "24".to_string()),
                ("offset".to_string(), "48".to_string()),
                ("album_id".to_string(), "9".to_string()),
            ]
        );
    }

    #[test]
    fn test_sort_params() {
        let spec = QuerySpec::for_kind(ResourceKind::Milestones).with_sort(SortSpec::desc("achieved_on"));
        assert_eq!(
            spec.params(ListMode::Full),
            vec![
                ("sort_by".to_string(), "achieved_on".to_string()),
                ("order".to_string(), "desc".to_string()),
            ]
        );
    }

    #[test]
    fn test_set_page_without_total_accepts_any_page() {
        let mut state = QueryState::new(ResourceKind::Users);
        assert!(state.set_page(7));
        assert_eq!(state.page(), 7);
    }

    #[test]
    fn test_set_page_clamps_to_known_range() {
        let mut state = QueryState::new(ResourceKind::Users);
        state.record_total(Some(25));
        assert!(state.set_page(9));
        assert_eq!(state.page(), 1);
        assert!(!state.set_page(1), "same page is a no-op");
    }

    #[test]
    fn test_set_page_on_empty_collection_stays_on_first_page() {
        let mut state = QueryState::new(ResourceKind::Users);
        state.record_total(Some(0));
        assert!(!state.set_page(3));
        assert_eq!(state.page(), 0);
    }

    #[test]
    fn test_set_page_is_unbounded_without_total() {
        let mut state = QueryState::new(ResourceKind::Photos);
        state.record_total(Some(24));
        state.record_total(None);
        assert!(state.set_page(5));
        assert_eq!(state.page(), 5);
        assert_eq!(state.page_count(), None);
    }

    #[test]
    fn test_set_page_size_resets_page() {
        let mut state = QueryState::new(ResourceKind::Users);
        state.set_page(3);
        assert!(state.set_page_size(100).unwrap());
        assert_eq!(state.page(), 0);
        assert_eq!(state.page_size(), 100);
        assert!(!state.set_page_size(100).unwrap());
    }

    #[test]
    fn test_set_page_size_rejects_unlisted_size() {
        let mut state = QueryState::new(ResourceKind::Photos);
        assert!(state.set_page_size(20).is_err());
        assert_eq!(state.page_size(), 24);
    }

    #[test]
    fn test_search_never_moves_the_page() {
        let mut state = QueryState::new(ResourceKind::Users);
        state.set_page(2);
        assert!(state.set_search("an"));
        assert!(!state.set_search("an"));
        assert_eq!(state.page(), 2);
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut state = QueryState::new(ResourceKind::Photos);
        state.set_page(3);
        assert!(state.set_filter("album_id", Some("4".to_string())));
        assert_eq!(state.page(), 0);
        assert!(!state.set_filter("album_id", Some("4".to_string())));
        assert!(state.set_filter("album_id", None));
    }

    #[test]
    fn test_adjust_total_saturates() {
        let mut state = QueryState::new(ResourceKind::Users);
        state.adjust_total(-1);
        assert_eq!(state.total_count(), None);
        state.record_total(Some(1));
        state.adjust_total(-2);
        assert_eq!(state.total_count(), Some(0));
    }

    #[test]
    fn test_with_spec_validates_page_size() {
        let spec = QuerySpec::for_kind(ResourceKind::Users).with_page_size(12);
        assert!(QueryState::with_spec(ResourceKind::Users, spec).is_err());
    }
}
