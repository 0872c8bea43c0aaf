//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for ipcountry using clap's derive macros.

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_PATH;

/// ipcountry - resolve client IPs to countries
#[derive(Parser, Debug)]
#[command(name = "ipcountry")]
#[command(version)]
#[command(about = "Resolve a client IP (or its timezone) to a country", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(long, short = 'c', global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server (default when no command is given)
    Serve,

    /// Load IP ranges from a CSV file
    ///
    /// Without --update the table is truncated and reloaded;
    /// with --update rows are merged by (first_ip, last_ip).
    Seed {
        /// CSV file path (default: ingestion.csv_path)
        #[arg(long, short = 'f')]
        file: Option<String>,

        /// Merge into existing ranges instead of replacing them
        #[arg(long)]
        update: bool,
    },

    /// Resolve an address against the stored ranges
    Lookup {
        /// IPv4 address or numeric IP
        ip: Option<String>,

        /// Timezone hint (default: lookup.default_timezone)
        #[arg(long, short = 't')]
        timezone: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
}
