//! PulseLens command line interface.
//!
//! Composition root: loads config, optionally signs in against the identity
//! provider, fetches mention rows, and runs the requested view.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pulselens")]
#[command(about = "PulseLens mention tracking command line interface")]
struct Cli {
    /// Identity provider email; with a password, commands run signed in.
    #[arg(long, env = "PULSELENS_EMAIL", global = true)]
    email: Option<String>,

    /// Identity provider password.
    #[arg(long, env = "PULSELENS_PASSWORD", global = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch one topic table, filter it, and print or export a report.
    Report {
        /// Source table to report on; defaults to the first configured table.
        #[arg(long)]
        topic: Option<String>,

        /// Inclusive range start, YYYY-MM-DD.
        #[arg(long)]
        from: Option<String>,

        /// Inclusive range end, YYYY-MM-DD.
        #[arg(long)]
        to: Option<String>,

        /// Free-text filter over account name, handle, and narrative.
        #[arg(long)]
        query: Option<String>,

        /// Write a CSV report to this path.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// All sources grouped by account handle.
    Accounts {
        /// Narrow groups by handle or account name.
        #[arg(long)]
        query: Option<String>,
    },

    /// All sources grouped by calendar date.
    Timeline {
        /// Narrow groups by date.
        #[arg(long)]
        query: Option<String>,
    },

    /// Yesterday's and today's entries per source table.
    Today {
        /// Write a CSV export to this path.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = pulselens_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    commands::run(cli, &config).await
}
