use crate::fetch::DEFAULT_ENDPOINT;
use clap::{Parser, ValueEnum};

/// Donelist, a report of everything you finished, grouped by project.
#[derive(Parser, Debug)]
pub struct Cli {
    /// Completed tasks since this date, in MM/DD/YYYY format.
    #[arg(long = "SinceDate", default_value = "")]
    pub since_date: String,
    /// Completed tasks until this date (inclusive), in MM/DD/YYYY format.
    #[arg(long = "UntilDate", default_value = "")]
    pub until_date: String,
    /// The Todoist API token.
    #[arg(long = "Token", env = "TODOIST_TOKEN", default_value = "", hide_env_values = true)]
    pub token: String,
    /// The completed-items endpoint to query.
    #[arg(long, env = "TODOIST_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
    /// Which format to print the report in.
    #[arg(short, long, default_value = "text")]
    pub format: Format,
    /// Never color project headers (this is also respected through `NO_COLOR`).
    #[arg(long)]
    pub no_color: bool,
    /// Log what's happening to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

/// The format of the printed report.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
#[clap(rename_all = "snake_case")]
pub enum Format {
    /// Project headers followed by indented task lines, the default.
    Text,
    /// A JSON array of projects and their tasks.
    Json,
}
