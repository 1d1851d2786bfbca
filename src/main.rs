mod assemble;
mod cli;
mod error;
mod fetch;
mod range;
mod report;

use crate::assemble::{assemble, Task};
use crate::cli::{Cli, Format};
use crate::fetch::{CompletedItemsSource, CompletedQuery, TodoistClient};
use crate::range::DateRange;
use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Cli::parse();
    init_logging(args.verbose);

    if args.no_color {
        colored::control::set_override(false);
    }

    let client = TodoistClient::new(&args.endpoint);
    let mut tasks = fetch_tasks(&client, &args)?;
    report::sort_tasks(&mut tasks);
    let groups = report::group_tasks(&tasks);
    debug!(projects = groups.len(), "grouped tasks");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let written = match args.format {
        Format::Text => report::render_text(&groups, !args.no_color, &mut out),
        Format::Json => report::render_json(&groups, &mut out),
    };
    written.with_context(|| "failed to write report")?;
    out.flush()?;

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("donelist=debug")
        } else {
            EnvFilter::new("donelist=warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Runs everything up to the point of printing: parses the date range, asks the source for the
/// completed items in it, and assembles them into tasks. The first stage to fail stops the run.
fn fetch_tasks(source: &impl CompletedItemsSource, args: &Cli) -> Result<Vec<Task>> {
    let range = DateRange::parse(&args.since_date, &args.until_date)?;
    info!(since = %range.since, until = %range.until, "fetching completed items");

    let query = CompletedQuery::new(&args.token, &range);
    let payload = source
        .fetch_completed(&query)
        .with_context(|| format!("could not get completed items from {}", args.endpoint))?;
    debug!(
        items = payload.items.len(),
        projects = payload.projects.len(),
        "decoded completed items"
    );

    let tasks = assemble(&payload).with_context(|| "failed to read completed items")?;
    Ok(tasks)
}
