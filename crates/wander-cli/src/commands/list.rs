use std::sync::Arc;

use wander_core::models::Coordinate;
use wander_core::{ListingFeed, ListingQuery, PageOutcome, SessionContext, SyncOptions};

use crate::cli::ListArgs;
use crate::commands::common::{format_listing_lines, summarize_listing, ListingSummary, Session};
use crate::error::CliError;

pub async fn run_list(session: &Session, args: &ListArgs) -> Result<(), CliError> {
    let query = build_query(args, &session.context)?;
    let options = SyncOptions {
        page_size: args.page_size.unwrap_or(session.config.page_size),
        ..SyncOptions::default()
    };
    let feed = ListingFeed::new(Arc::clone(&session.client), args.catalog, query, options)?;

    feed.mount().await?;
    for _ in 1..args.pages {
        if feed.load_more().await? == PageOutcome::Skipped {
            break;
        }
    }
    let cursor = feed.cursor();
    tracing::debug!(
        catalog = %args.catalog,
        pages = cursor.page_number,
        has_more = cursor.has_more,
        "Listing fetch finished"
    );

    let items = feed.visible_items(args.filter.as_deref().unwrap_or_default());
    let summaries = items
        .iter()
        .map(|item| summarize_listing(item, &session.config.upload_base_url))
        .collect::<Vec<ListingSummary>>();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else {
        for line in format_listing_lines(&summaries) {
            println!("{line}");
        }
        if cursor.has_more {
            println!("(more available, rerun with --pages {})", args.pages + 1);
        }
    }

    Ok(())
}

/// Catalog defaults for the session, overridden by whatever flags were given.
pub fn build_query(args: &ListArgs, context: &SessionContext) -> Result<ListingQuery, CliError> {
    let context = match (args.lat, args.lon) {
        (Some(latitude), Some(longitude)) => context
            .clone()
            .with_origin(Coordinate::new(latitude, longitude)?),
        _ => context.clone(),
    };

    let mut query = ListingQuery::defaults_for(args.catalog, &context)
        .with_min_rating(args.min_rating)?;
    if let Some(sort_key) = args.sort {
        query = query.with_sort_key(sort_key);
    }
    if let Some(search) = &args.search {
        query = query.with_search_text(search.as_str());
    }
    for (name, value) in [
        ("state", &args.state),
        ("city", &args.city),
        ("status", &args.status),
    ] {
        if let Some(value) = value {
            query = query.with_category(name, value.as_str())?;
        }
    }

    query.validate_for(args.catalog)?;
    Ok(query)
}
