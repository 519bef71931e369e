//! Booking and admin dashboard endpoints.

use serde::Serialize;

use super::{parse_ack, parse_envelope, ApiClient};
use crate::error::{Error, Result};
use crate::models::{Booking, BookingRequest, BookingStatus, DashboardStats, ListingId};

#[derive(Debug, Serialize)]
struct StatusUpdate {
    status: BookingStatus,
}

impl ApiClient {
    /// Submit a booking request; returns the stored booking.
    pub async fn submit_booking(&self, request: &BookingRequest) -> Result<Booking> {
        request.validate()?;
        tracing::debug!(
            listing_type = request.listing_type.as_str(),
            listing_id = %request.listing_id,
            "Submitting booking request"
        );
        let body = self
            .send(self.client.post(self.url("/bookings")).json(request))
            .await?;
        parse_envelope(&body)
    }

    /// Bookings visible to the current session.
    pub async fn list_bookings(&self) -> Result<Vec<Booking>> {
        let body = self.send(self.client.get(self.url("/bookings"))).await?;
        parse_envelope(&body)
    }

    pub async fn update_booking_status(
        &self,
        id: &ListingId,
        status: BookingStatus,
    ) -> Result<Booking> {
        let url = self.url(&booking_path(id)?);
        let body = self
            .send(self.client.patch(url).json(&StatusUpdate { status }))
            .await?;
        parse_envelope(&body)
    }

    pub async fn delete_booking(&self, id: &ListingId) -> Result<()> {
        let url = self.url(&booking_path(id)?);
        let body = self.send(self.client.delete(url)).await?;
        parse_ack(&body)
    }

    /// Admin dashboard counters from `GET /admin/stats`.
    pub async fn admin_stats(&self) -> Result<DashboardStats> {
        let body = self.send(self.client.get(self.url("/admin/stats"))).await?;
        parse_envelope(&body)
    }
}

fn booking_path(id: &ListingId) -> Result<String> {
    let id = id.to_string();
    let id = id.trim();
    if id.is_empty() {
        return Err(Error::validation("booking id must not be empty"));
    }
    Ok(format!("/bookings/{}", urlencoding::encode(id)))
}
