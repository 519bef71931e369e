use wander_core::models::{BookingRequest, BookingStatus};

use crate::cli::BookArgs;
use crate::commands::common::{
    format_booking_lines, parse_booking_id, parse_listing_id, Session,
};
use crate::error::CliError;

pub async fn run_book(session: &Session, args: BookArgs) -> Result<(), CliError> {
    let request = BookingRequest::new(
        args.kind,
        parse_listing_id(&args.id),
        args.from,
        args.to,
        args.guests,
        args.message,
    )?;

    let booking = session.client.submit_booking(&request).await?;
    tracing::info!(booking_id = %booking.id, days = request.days(), "Booking submitted");
    println!("{}", booking.id);
    Ok(())
}

pub async fn run_bookings(session: &Session, as_json: bool) -> Result<(), CliError> {
    let bookings = session.client.list_bookings().await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&bookings)?);
    } else if bookings.is_empty() {
        println!("No bookings");
    } else {
        for line in format_booking_lines(&bookings) {
            println!("{line}");
        }
    }

    Ok(())
}

pub async fn run_booking_status(
    session: &Session,
    id: &str,
    status: BookingStatus,
) -> Result<(), CliError> {
    let id = parse_booking_id(id)?;
    let booking = session.client.update_booking_status(&id, status).await?;
    println!("{} {}", booking.id, booking.status);
    Ok(())
}

pub async fn run_cancel(session: &Session, id: &str) -> Result<(), CliError> {
    let id = parse_booking_id(id)?;
    session.client.delete_booking(&id).await?;
    println!("Cancelled {id}");
    Ok(())
}
