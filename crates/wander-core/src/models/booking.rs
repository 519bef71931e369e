//! Booking request and admin dashboard models

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ListingId;
use crate::error::{Error, Result};
use crate::util::normalize_text_option;

/// Upper bound on party size accepted client-side
pub const MAX_GUESTS: u32 = 50;

/// What kind of listing a booking is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingKind {
    Place,
    Guider,
    Photographer,
}

impl BookingKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Place => "place",
            Self::Guider => "guider",
            Self::Photographer => "photographer",
        }
    }
}

impl FromStr for BookingKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "place" => Ok(Self::Place),
            "guider" | "guide" => Ok(Self::Guider),
            "photographer" => Ok(Self::Photographer),
            other => Err(Error::validation(format!("unknown booking kind '{other}'"))),
        }
    }
}

/// Server-side booking lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            other => Err(Error::validation(format!(
                "unknown booking status '{other}'"
            ))),
        }
    }
}

/// A booking request as submitted by a traveller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    /// Listing category being booked
    pub listing_type: BookingKind,
    /// Id of the place, guide, or photographer
    pub listing_id: ListingId,
    /// First day of the booking
    pub start_date: NaiveDate,
    /// Last day of the booking (inclusive)
    pub end_date: NaiveDate,
    /// Party size
    pub guests: u32,
    /// Free-form note for the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl BookingRequest {
    /// Build a validated request.
    pub fn new(
        listing_type: BookingKind,
        listing_id: ListingId,
        start_date: NaiveDate,
        end_date: NaiveDate,
        guests: u32,
        message: Option<String>,
    ) -> Result<Self> {
        let request = Self {
            listing_type,
            listing_id,
            start_date,
            end_date,
            guests,
            message: normalize_text_option(message),
        };
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<()> {
        if let ListingId::Text(id) = &self.listing_id {
            if id.trim().is_empty() {
                return Err(Error::validation("listing id must not be empty"));
            }
        }
        if self.end_date < self.start_date {
            return Err(Error::validation(format!(
                "end date {} is before start date {}",
                self.end_date, self.start_date
            )));
        }
        if self.guests == 0 {
            return Err(Error::validation("at least one guest is required"));
        }
        if self.guests > MAX_GUESTS {
            return Err(Error::validation(format!(
                "party of {} exceeds the {MAX_GUESTS} guest limit",
                self.guests
            )));
        }
        Ok(())
    }

    /// Number of booked days, counting both ends.
    #[must_use]
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

/// A booking as stored by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(alias = "_id")]
    pub id: ListingId,
    pub listing_type: BookingKind,
    pub listing_id: ListingId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub guests: u32,
    pub status: BookingStatus,
    #[serde(default)]
    pub total_price: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Admin dashboard counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_bookings: u64,
    pub pending_bookings: u64,
    pub confirmed_bookings: u64,
    pub total_revenue: f64,
    pub total_users: u64,
}
