//! `lookup` command: resolve an address from the command line

use std::sync::Arc;

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::{CountryStatus, LookupRequest, LookupService, Resolver};
use crate::storage::RangeStore;

pub async fn lookup_address(
    storage: Arc<dyn RangeStore>,
    ip: Option<String>,
    timezone: String,
    json: bool,
) -> Result<(), CliError> {
    let service = LookupService::new(Resolver::new(storage), timezone.clone());
    let outcome = service.check(LookupRequest::new(ip, Some(timezone))).await;

    if json {
        let body = serde_json::to_string_pretty(&outcome)
            .map_err(|e| CliError::CommandError(format!("Failed to serialize result: {}", e)))?;
        println!("{}", body);
        return Ok(());
    }

    let status = match outcome.status {
        CountryStatus::Success => outcome.status.to_string().green(),
        CountryStatus::IpNotInRange | CountryStatus::NotFound => {
            outcome.status.to_string().yellow()
        }
        CountryStatus::Unknown => outcome.status.to_string().red(),
    };

    println!(
        "{} {}",
        "IP:".bold(),
        outcome.ip.as_deref().unwrap_or("-").cyan()
    );
    println!("{} {}", "Timezone:".bold(), outcome.timezone);
    println!("{} {}", "Country:".bold(), outcome.country.bold());
    println!("{} {}", "Status:".bold(), status);

    Ok(())
}
