//! Listing catalogs and their per-screen behavior

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::SortKey;
use crate::error::Error;

/// One paginated, filterable catalog shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Catalog {
    Places,
    TopPlaces,
    Guiders,
    Photographers,
}

impl Catalog {
    pub const ALL: [Self; 4] = [
        Self::Places,
        Self::TopPlaces,
        Self::Guiders,
        Self::Photographers,
    ];

    /// Endpoint path relative to the API base URL
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Places => "/places/get",
            Self::TopPlaces => "/places",
            Self::Guiders => "/guiders/all",
            Self::Photographers => "/photographers/all",
        }
    }

    /// Sort keys the screen offers
    #[must_use]
    pub const fn sort_keys(self) -> &'static [SortKey] {
        match self {
            Self::Places => &[
                SortKey::Rating,
                SortKey::Newest,
                SortKey::Name,
                SortKey::Views,
            ],
            Self::TopPlaces => &[SortKey::Rating, SortKey::Views, SortKey::Name],
            Self::Guiders | Self::Photographers => &[
                SortKey::Rating,
                SortKey::Newest,
                SortKey::Name,
                SortKey::PriceAsc,
                SortKey::PriceDesc,
                SortKey::Experience,
            ],
        }
    }

    #[must_use]
    pub fn supports(self, sort_key: SortKey) -> bool {
        self.sort_keys().contains(&sort_key)
    }

    #[must_use]
    pub const fn default_sort_key(self) -> SortKey {
        SortKey::Rating
    }

    /// Text fields the local filter overlay searches
    #[must_use]
    pub const fn search_fields(self) -> &'static [&'static str] {
        match self {
            Self::Places | Self::TopPlaces => &["name", "city", "state", "description"],
            Self::Guiders => &["name", "city", "state", "languages"],
            Self::Photographers => &["name", "city", "state", "specialization"],
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Places => "places",
            Self::TopPlaces => "top_places",
            Self::Guiders => "guiders",
            Self::Photographers => "photographers",
        }
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Catalog {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|catalog| catalog.as_str() == normalized)
            .ok_or_else(|| Error::validation(format!("unknown catalog '{s}'")))
    }
}
