//! Local filter overlay for loaded listings.
//!
//! Gives instant feedback while a server-side search is still pending: the
//! overlay never touches the loaded items and never triggers a fetch, it only
//! derives the visible subsequence from `(items, search_text)`.

use crate::models::{Catalog, ListingItem};

/// Case-insensitive substring filter over a fixed set of text fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOverlay {
    fields: Vec<String>,
}

impl FilterOverlay {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Overlay searching the fields a catalog screen displays.
    #[must_use]
    pub fn for_catalog(catalog: Catalog) -> Self {
        Self::new(catalog.search_fields().iter().copied())
    }

    /// Items matching `search_text`, in their loaded order.
    ///
    /// A blank search returns every item.
    #[must_use]
    pub fn apply<'a>(&self, items: &'a [ListingItem], search_text: &str) -> Vec<&'a ListingItem> {
        let query = normalize_query(search_text);
        items
            .iter()
            .filter(|item| self.matches_normalized(item, &query))
            .collect()
    }

    /// Whether `item` matches `search_text`.
    #[must_use]
    pub fn matches(&self, item: &ListingItem, search_text: &str) -> bool {
        self.matches_normalized(item, &normalize_query(search_text))
    }

    fn matches_normalized(&self, item: &ListingItem, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        self.fields.iter().any(|field| {
            item.text_field(field)
                .is_some_and(|text| text.to_lowercase().contains(query))
        })
    }
}

fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}
