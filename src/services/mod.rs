//! Service layer for business logic
//!
//! Shared between the HTTP API and the CLI.

pub mod ingestion;
pub mod lookup;
pub mod resolver;

pub use ingestion::{IngestObserver, IngestReport, IngestionPipeline};
pub use lookup::{LookupOutcome, LookupRequest, LookupService};
pub use resolver::{CountryStatus, Resolution, ResolveObserver, Resolver, Tier};
