//! Data models for Wander

mod booking;
mod catalog;
mod context;
mod listing;
mod query;

pub use booking::{Booking, BookingKind, BookingRequest, BookingStatus, DashboardStats};
pub use catalog::Catalog;
pub use context::SessionContext;
pub use listing::{ListingId, ListingItem};
pub use query::{Coordinate, ListingQuery, SortKey, MAX_RATING, RESERVED_PAYLOAD_KEYS};
