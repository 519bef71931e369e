//! Listing query model

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Catalog, SessionContext};
use crate::error::{Error, Result};
use crate::util::normalize_text_option;

/// Highest value accepted for `min_rating`
pub const MAX_RATING: f64 = 5.0;

/// Payload keys owned by the query builder; category filters may not reuse them.
pub const RESERVED_PAYLOAD_KEYS: [&str; 7] = [
    "latitude",
    "longitude",
    "page",
    "perPage",
    "sortBy",
    "minRating",
    "searchText",
];

/// Server-side ordering of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Rating,
    Newest,
    Name,
    PriceAsc,
    PriceDesc,
    Views,
    Experience,
}

impl SortKey {
    pub const ALL: [Self; 7] = [
        Self::Rating,
        Self::Newest,
        Self::Name,
        Self::PriceAsc,
        Self::PriceDesc,
        Self::Views,
        Self::Experience,
    ];

    /// Wire value sent as `sortBy`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rating => "rating",
            Self::Newest => "newest",
            Self::Name => "name",
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
            Self::Views => "views",
            Self::Experience => "experience",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == normalized)
            .ok_or_else(|| Error::validation(format!("unknown sort key '{s}'")))
    }
}

/// A validated latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::validation(format!(
                "latitude {latitude} is outside [-90, 90]"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::validation(format!(
                "longitude {longitude} is outside [-180, 180]"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Immutable description of the catalog subset a screen wants.
///
/// Two queries that compare equal describe the same epoch: switching between
/// them keeps the loaded pages, anything else resets the list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuery {
    sort_key: SortKey,
    min_rating: Option<f64>,
    category_filters: BTreeMap<String, String>,
    search_text: Option<String>,
    origin: Option<Coordinate>,
}

impl ListingQuery {
    #[must_use]
    pub const fn new(sort_key: SortKey) -> Self {
        Self {
            sort_key,
            min_rating: None,
            category_filters: BTreeMap::new(),
            search_text: None,
            origin: None,
        }
    }

    /// Default filters a screen mounts with: default sort, user's origin.
    #[must_use]
    pub fn defaults_for(catalog: Catalog, context: &SessionContext) -> Self {
        Self {
            origin: context.origin(),
            ..Self::new(catalog.default_sort_key())
        }
    }

    #[must_use]
    pub fn with_sort_key(mut self, sort_key: SortKey) -> Self {
        self.sort_key = sort_key;
        self
    }

    /// Set a rating floor; `None` removes it.
    pub fn with_min_rating(mut self, min_rating: Option<f64>) -> Result<Self> {
        if let Some(rating) = min_rating {
            if !rating.is_finite() || !(0.0..=MAX_RATING).contains(&rating) {
                return Err(Error::validation(format!(
                    "min rating {rating} is outside [0, {MAX_RATING}]"
                )));
            }
        }
        self.min_rating = min_rating;
        Ok(self)
    }

    /// Add (or with an empty value, remove) a category filter such as `state` or `city`.
    pub fn with_category(mut self, name: &str, value: impl Into<String>) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::validation("category filter name must not be empty"));
        }
        if RESERVED_PAYLOAD_KEYS.contains(&name) {
            return Err(Error::validation(format!(
                "category filter '{name}' collides with a reserved query field"
            )));
        }

        match normalize_text_option(Some(value.into())) {
            Some(value) => {
                self.category_filters.insert(name.to_string(), value);
            }
            None => {
                self.category_filters.remove(name);
            }
        }
        Ok(self)
    }

    #[must_use]
    pub fn with_search_text(mut self, search_text: impl Into<String>) -> Self {
        self.search_text = normalize_text_option(Some(search_text.into()));
        self
    }

    #[must_use]
    pub fn with_origin(mut self, origin: Option<Coordinate>) -> Self {
        self.origin = origin;
        self
    }

    /// Check that the query only uses what `catalog` supports.
    pub fn validate_for(&self, catalog: Catalog) -> Result<()> {
        if !catalog.supports(self.sort_key) {
            return Err(Error::validation(format!(
                "{catalog} cannot be sorted by '{}'",
                self.sort_key
            )));
        }
        Ok(())
    }

    #[must_use]
    pub const fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    #[must_use]
    pub const fn min_rating(&self) -> Option<f64> {
        self.min_rating
    }

    #[must_use]
    pub const fn category_filters(&self) -> &BTreeMap<String, String> {
        &self.category_filters
    }

    #[must_use]
    pub fn search_text(&self) -> Option<&str> {
        self.search_text.as_deref()
    }

    #[must_use]
    pub const fn origin(&self) -> Option<Coordinate> {
        self.origin
    }
}
