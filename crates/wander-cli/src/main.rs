//! Wander CLI - browse the tour marketplace from the terminal
//!
//! Lists places, guides and photographers page by page and manages bookings.

mod cli;
mod commands;
mod error;


use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::book::{run_book, run_booking_status, run_bookings, run_cancel};
use crate::commands::common::{resolve_config, resolve_context, Session};
use crate::commands::completions::run_completions;
use crate::commands::list::run_list;
use crate::commands::stats::run_stats;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wander=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Commands::Completions { shell, output } = &cli.command {
        return run_completions(*shell, output.as_deref());
    }

    let config = resolve_config(cli.api_url.as_deref(), cli.upload_url.as_deref())?;
    let session = Session::connect(config, resolve_context(cli.token.as_deref()))?;

    match cli.command {
        Commands::List(args) => run_list(&session, &args).await?,
        Commands::Book(args) => run_book(&session, args).await?,
        Commands::Bookings { json } => run_bookings(&session, json).await?,
        Commands::BookingStatus { id, status } => {
            run_booking_status(&session, &id, status).await?;
        }
        Commands::Cancel { id } => run_cancel(&session, &id).await?,
        Commands::Stats { json } => run_stats(&session, json).await?,
        Commands::Completions { .. } => {}
    }

    Ok(())
}
