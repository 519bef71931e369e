//! Listing request payloads.
//!
//! Flattens a [`ListingQuery`] plus page bookkeeping into the JSON body the
//! listing endpoints expect. Absent fields are left out rather than sent as
//! `null`, and keys serialize in a stable order.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::ListingQuery;

/// JSON body of one listing page request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ListingPayload(Map<String, Value>);

impl ListingPayload {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Requested 1-based page number
    #[must_use]
    pub fn page(&self) -> Option<u64> {
        self.get("page").and_then(Value::as_u64)
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// Build the request body for `page` of `query`.
#[must_use]
pub fn build_payload(query: &ListingQuery, page: u32, page_size: usize) -> ListingPayload {
    let mut body = Map::new();

    if let Some(origin) = query.origin() {
        body.insert("latitude".to_string(), Value::from(origin.latitude()));
        body.insert("longitude".to_string(), Value::from(origin.longitude()));
    }
    body.insert("page".to_string(), Value::from(page));
    body.insert("perPage".to_string(), Value::from(page_size));
    body.insert(
        "sortBy".to_string(),
        Value::from(query.sort_key().as_str()),
    );
    if let Some(min_rating) = query.min_rating() {
        body.insert("minRating".to_string(), Value::from(min_rating));
    }
    if let Some(search_text) = query.search_text() {
        body.insert("searchText".to_string(), Value::from(search_text));
    }
    for (name, value) in query.category_filters() {
        body.insert(name.clone(), Value::from(value.as_str()));
    }

    ListingPayload(body)
}
