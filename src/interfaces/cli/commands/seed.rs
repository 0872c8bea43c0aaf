//! `seed` command: load the range table from CSV

use std::path::PathBuf;
use std::sync::Arc;

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::ingestion::{ConsoleObserver, IngestionPipeline};
use crate::storage::{RangeStore, WriteMode};

pub async fn seed_ranges(
    storage: Arc<dyn RangeStore>,
    file_path: String,
    update: bool,
) -> Result<(), CliError> {
    let mode = if update {
        WriteMode::Update
    } else {
        WriteMode::Replace
    };

    let path = PathBuf::from(&file_path);
    if !path.exists() {
        return Err(CliError::CommandError(format!(
            "CSV file not found: {}",
            file_path
        )));
    }

    let pipeline = IngestionPipeline::with_observer(storage, Arc::new(ConsoleObserver));
    let report = pipeline.run(&path, mode).await?;

    println!(
        "{} {} mode: {} rows applied, {} records in store",
        "✓".bold().green(),
        report.mode.to_string().yellow(),
        report.written.to_string().green(),
        report.records_after.to_string().cyan()
    );

    Ok(())
}
