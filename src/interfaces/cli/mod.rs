//! CLI interface module
//!
//! This module provides command-line interface functionality for ipcountry.

pub mod commands;

use std::fmt;

use crate::cli::{Commands, ConfigCommands};
use crate::config::get_config;
use crate::storage::StorageFactory;
use commands::{config_generate, lookup_address, seed_ranges};

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    ParseError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<crate::errors::IpCountryError> for CliError {
    fn from(err: crate::errors::IpCountryError) -> Self {
        match err {
            crate::errors::IpCountryError::MalformedAddress(_)
            | crate::errors::IpCountryError::CsvFormat(_)
            | crate::errors::IpCountryError::Validation(_) => CliError::ParseError(err.to_string()),
            _ => CliError::StorageError(err.to_string()),
        }
    }
}

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(cmd: Commands) -> Result<(), CliError> {
    // Generate doesn't need DB connection, handle it separately
    if let Commands::Config {
        action: ConfigCommands::Generate { output_path, force },
    } = cmd
    {
        return config_generate(output_path, force).await;
    }

    let config = get_config();
    let storage = StorageFactory::create(&config).await?;

    match cmd {
        Commands::Seed { file, update } => {
            let path = file.unwrap_or_else(|| config.ingestion.csv_path.clone());
            seed_ranges(storage, path, update).await
        }

        Commands::Lookup { ip, timezone, json } => {
            let timezone =
                timezone.unwrap_or_else(|| config.lookup.default_timezone.clone());
            lookup_address(storage, ip, timezone, json).await
        }

        Commands::Serve => Err(CliError::CommandError(
            "serve is handled by server mode".to_string(),
        )),

        Commands::Config { .. } => Err(CliError::CommandError(
            "config commands do not use storage".to_string(),
        )),
    }
}
