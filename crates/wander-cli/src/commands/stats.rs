use crate::commands::common::{format_stats_lines, Session};
use crate::error::CliError;

pub async fn run_stats(session: &Session, as_json: bool) -> Result<(), CliError> {
    let stats = session.client.admin_stats().await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        for line in format_stats_lines(&stats) {
            println!("{line}");
        }
    }

    Ok(())
}
