pub mod auth;

pub use auth::{AuthGate, IpAuthorization};
