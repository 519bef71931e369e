use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use wander_core::models::{BookingKind, BookingStatus};
use wander_core::{Catalog, SortKey};

#[derive(Parser)]
#[command(name = "wander")]
#[command(about = "Browse places, tour guides and photographers from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Marketplace API base URL (defaults to WANDER_API_BASE_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Base URL that uploaded images are served from
    #[arg(long, global = true, value_name = "URL")]
    pub upload_url: Option<String>,

    /// Bearer token for booking and admin endpoints
    #[arg(long, global = true, value_name = "TOKEN")]
    pub token: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List a catalog page by page
    #[command(alias = "ls")]
    List(ListArgs),
    /// Request a booking
    Book(BookArgs),
    /// List bookings visible to the session
    Bookings {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change the status of a booking
    BookingStatus {
        /// Booking ID
        #[arg(long)]
        id: String,
        /// New status (pending, confirmed, cancelled, completed)
        #[arg(long)]
        status: BookingStatus,
    },
    /// Cancel and delete a booking
    Cancel {
        /// Booking ID
        #[arg(long)]
        id: String,
    },
    /// Show admin dashboard counters
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct ListArgs {
    /// Catalog to list (places, top-places, guiders, photographers)
    pub catalog: Catalog,
    /// Server-side sort order
    #[arg(long, value_name = "KEY")]
    pub sort: Option<SortKey>,
    /// Only listings rated at least this high (0-5)
    #[arg(long, value_name = "N")]
    pub min_rating: Option<f64>,
    /// Server-side search text
    #[arg(long, value_name = "TEXT")]
    pub search: Option<String>,
    /// Category filter: state
    #[arg(long)]
    pub state: Option<String>,
    /// Category filter: city
    #[arg(long)]
    pub city: Option<String>,
    /// Category filter: status
    #[arg(long)]
    pub status: Option<String>,
    /// Latitude of the traveller's position
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,
    /// Longitude of the traveller's position
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,
    /// Maximum number of pages to fetch
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub pages: u32,
    /// Items per page
    #[arg(long, value_name = "N")]
    pub page_size: Option<usize>,
    /// Narrow the fetched items locally without another request
    #[arg(long, value_name = "TEXT")]
    pub filter: Option<String>,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct BookArgs {
    /// Listing kind (place, guider, photographer)
    #[arg(long)]
    pub kind: BookingKind,
    /// Listing ID
    #[arg(long)]
    pub id: String,
    /// First day (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub from: NaiveDate,
    /// Last day, inclusive (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub to: NaiveDate,
    /// Party size
    #[arg(long, default_value_t = 1)]
    pub guests: u32,
    /// Note for the provider
    #[arg(long)]
    pub message: Option<String>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
