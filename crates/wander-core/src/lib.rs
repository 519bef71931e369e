//! wander-core - Core library for Wander
//!
//! This crate contains the listing models, query builder, paginated list
//! synchronizer, local filter overlay and marketplace API client shared by
//! every Wander front end.

pub mod api;
pub mod config;
pub mod error;
pub mod media;
pub mod models;
pub mod pagination;
pub mod payload;
pub mod search;
pub mod state;
pub mod util;

pub use api::{ApiClient, ListingTransport};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use models::{Catalog, ListingId, ListingItem, ListingQuery, SessionContext, SortKey};
pub use pagination::{ListSynchronizer, ListingFeed, PageOutcome, SyncOptions};
pub use state::ListPhase;
