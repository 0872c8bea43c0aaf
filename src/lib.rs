//! ipcountry - resolve a client IP address (or its timezone) to a country
//!
//! The range table is seeded from CSV and queried with
//! `first_ip <= ip AND last_ip >= ip`. When no range matches, the
//! timezone hint decides the country.
//!
//! # Features
//! - **server**: HTTP server mode (default)
//! - **cli**: Command-line interface (seed / lookup / config)
//!
//! # Architecture
//! - `storage`: `RangeStore` trait, memory and SeaORM backends
//! - `services`: ingestion pipeline, resolution engine, lookup facade
//! - `api`: HTTP handlers and authorization middleware
//! - `interfaces`: CLI commands
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging

#[cfg(feature = "server")]
pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
