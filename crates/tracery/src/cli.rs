use std::path::PathBuf;

use clap::Parser;

/// Tracery — temporal transaction network explorer for ledger forensics.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Ledger query service endpoint.
    #[arg(
        long,
        default_value = "http://127.0.0.1:9050/query",
        env = "TRACERY_ENDPOINT"
    )]
    pub endpoint: String,

    /// API token (optional; some endpoints embed auth in the URL).
    #[arg(long, env = "TRACERY_API_TOKEN")]
    pub api_token: Option<String>,

    /// Read the API token from a file instead of the environment.
    #[arg(long)]
    pub token_file: Option<PathBuf>,

    /// Billing project identifier passed to the query service.
    #[arg(
        long,
        default_value = "scam-transaction-detection",
        env = "TRACERY_PROJECT"
    )]
    pub project: String,

    /// Suspected scam address to distinguish in the rendered network.
    #[arg(long)]
    pub address: String,

    /// Center of the ±5 minute transaction window
    /// (`YYYY-MM-DD HH:MM:SS` or RFC 3339).
    #[arg(long)]
    pub timestamp: String,

    /// Node layout: `spring`, `circular`, or anything else for random
    /// placement.
    #[arg(long, default_value = "spring")]
    pub layout: String,

    /// Output image path (overwritten on every run).
    #[arg(long, default_value = "visualizations/graph.png")]
    pub output: PathBuf,

    /// Maximum query attempts before giving up.
    #[arg(long, default_value = "3")]
    pub max_attempts: usize,

    /// Per-attempt timeout in seconds while waiting for query results.
    #[arg(long, default_value = "30")]
    pub attempt_timeout: u64,
}
