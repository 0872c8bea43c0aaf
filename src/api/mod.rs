//! HTTP API
//!
//! - `services`: `/check-ip` handlers
//! - `middleware`: shared-key + bearer token gate
//! - `jwt`: HS256 token validation

pub mod constants;
pub mod jwt;
pub mod middleware;
pub mod services;
