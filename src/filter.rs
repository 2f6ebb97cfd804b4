//! Client-side filtering of an already loaded page.
//!
//! Narrowing is purely for display: it never requests data, never changes the
//! total count and never moves the pager. A record that matches but lives on
//! a page that is not loaded will not show up.

use crate::model::Record;

/// A record that survived the filter, with the field that matched.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredRecord<'a, R> {
    pub record: &'a R,
    /// Index into `search_fields()` of the first matching field, `None` when
    /// the filter was empty.
    pub matched_field: Option<usize>,
}

/// Case-insensitive substring filter over a record's search fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientFilter {
    needle: String,
}

impl ClientFilter {
    pub fn new(text: &str) -> Self {
        Self {
            needle: text.trim().to_lowercase(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// Index of the first field containing the needle.
    pub fn match_fields(&self, fields: &[&str]) -> Option<usize> {
        fields
            .iter()
            .position(|field| field.to_lowercase().contains(&self.needle))
    }

    pub fn matches<R: Record>(&self, record: &R) -> bool {
        self.is_empty() || self.match_fields(&record.search_fields()).is_some()
    }

    /// Keep the matching records, preserving their order.
    pub fn apply<'a, R: Record>(&self, items: &'a [R]) -> Vec<FilteredRecord<'a, R>> {
        if self.is_empty() {
            return items
                .iter()
                .map(|record| FilteredRecord {
                    record,
                    matched_field: None,
                })
                .collect();
        }

        items
            .iter()
            .filter_map(|record| {
                self.match_fields(&record.search_fields())
                    .map(|index| FilteredRecord {
                        record,
                        matched_field: Some(index),
                    })
            })
            .collect()
    }
}

/// Records of `items` matching `text`, in their original order.
pub fn filter_records<'a, R: Record>(items: &'a [R], text: &str) -> Vec<&'a R> {
    ClientFilter::new(text)
        .apply(items)
        .into_iter()
        .map(|filtered| filtered.record)
        .collect()
}
