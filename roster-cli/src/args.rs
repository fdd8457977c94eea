use clap::Parser;
use roster::{SourceConfig, DEFAULT_ENDPOINT};

/// Browse a remote user list, rename and delete users
#[derive(Debug, Parser)]
#[command(name = "roster", version)]
pub struct Args {
    /// The GraphQL endpoint to talk to
    #[arg(short('e'), long, env = "ROSTER_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
    /// The page of users to load
    #[arg(long, env = "ROSTER_PAGE", default_value_t = 1)]
    pub page: i64,
    /// How many users a page holds
    #[arg(long, env = "ROSTER_LIMIT", default_value_t = 5)]
    pub limit: i64,
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short('v'), long)]
    pub verbose: bool
}

impl Args {
    pub fn source_config(&self) -> SourceConfig {
        SourceConfig {
            page: self.page,
            limit: self.limit
        }
    }

    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}
