use std::sync::Arc;

use serde::Serialize;
use wander_core::media::resolve_image_url;
use wander_core::models::{Booking, DashboardStats};
use wander_core::{ApiClient, ClientConfig, ListingId, ListingItem, SessionContext};

use crate::error::CliError;

/// Everything a command needs to talk to the marketplace.
#[derive(Debug, Clone)]
pub struct Session {
    pub config: ClientConfig,
    pub context: SessionContext,
    pub client: Arc<ApiClient>,
}

impl Session {
    pub fn connect(config: ClientConfig, context: SessionContext) -> Result<Self, CliError> {
        let client = Arc::new(ApiClient::new(&config, &context)?);
        Ok(Self {
            config,
            context,
            client,
        })
    }
}

/// Explicit flags win over `WANDER_API_BASE_URL`.
pub fn resolve_config(
    api_url: Option<&str>,
    upload_url: Option<&str>,
) -> Result<ClientConfig, CliError> {
    let config = match api_url {
        Some(api_url) => ClientConfig::new(api_url)?,
        None => ClientConfig::from_env()?,
    };
    match upload_url {
        Some(upload_url) => Ok(config.with_upload_base_url(upload_url)?),
        None => Ok(config),
    }
}

pub fn resolve_context(token: Option<&str>) -> SessionContext {
    match token {
        Some(token) => SessionContext::new().with_access_token(token),
        None => SessionContext::new(),
    }
}

/// Numeric IDs stay numeric so they serialize the way the server sent them.
pub fn parse_listing_id(raw: &str) -> ListingId {
    let trimmed = raw.trim();
    trimmed
        .parse::<i64>()
        .map_or_else(|_| ListingId::from(trimmed), ListingId::from)
}

pub fn parse_booking_id(raw: &str) -> Result<ListingId, CliError> {
    if raw.trim().is_empty() {
        return Err(CliError::EmptyBookingId);
    }
    Ok(parse_listing_id(raw))
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ListingSummary {
    pub id: String,
    pub name: Option<String>,
    pub location: Option<String>,
    pub rating: Option<String>,
    pub image_url: Option<String>,
}

pub fn summarize_listing(item: &ListingItem, upload_base: &str) -> ListingSummary {
    let location = ["city", "state"]
        .iter()
        .filter_map(|field| item.text_field(field))
        .filter(|value| !value.trim().is_empty())
        .collect::<Vec<_>>();

    ListingSummary {
        id: item.id.to_string(),
        name: item.display_name(),
        location: (!location.is_empty()).then(|| location.join(", ")),
        rating: item.text_field("rating"),
        image_url: item
            .image_path()
            .map(|path| resolve_image_url(upload_base, path)),
    }
}

pub fn format_listing_lines(summaries: &[ListingSummary]) -> Vec<String> {
    summaries
        .iter()
        .map(|summary| {
            let mut line = format!(
                "{}  {}",
                summary.id,
                summary.name.as_deref().unwrap_or("(unnamed)")
            );
            if let Some(location) = &summary.location {
                line.push_str(&format!("  [{location}]"));
            }
            if let Some(rating) = &summary.rating {
                line.push_str(&format!("  rating {rating}"));
            }
            if let Some(image_url) = &summary.image_url {
                line.push_str(&format!("  {image_url}"));
            }
            line
        })
        .collect()
}

pub fn format_booking_lines(bookings: &[Booking]) -> Vec<String> {
    bookings
        .iter()
        .map(|booking| {
            let mut line = format!(
                "{}  {} {}  {}..{}  {} guest{}  {}",
                booking.id,
                booking.listing_type.as_str(),
                booking.listing_id,
                booking.start_date,
                booking.end_date,
                booking.guests,
                if booking.guests == 1 { "" } else { "s" },
                booking.status,
            );
            if let Some(total) = booking.total_price {
                line.push_str(&format!("  total {total:.2}"));
            }
            line
        })
        .collect()
}

pub fn format_stats_lines(stats: &DashboardStats) -> Vec<String> {
    vec![
        format!("Total bookings:     {}", stats.total_bookings),
        format!("Pending bookings:   {}", stats.pending_bookings),
        format!("Confirmed bookings: {}", stats.confirmed_bookings),
        format!("Total revenue:      {:.2}", stats.total_revenue),
        format!("Total users:        {}", stats.total_users),
    ]
}
