pub mod check_ip;

pub use check_ip::{CheckIpParams, CheckIpService, check_ip_routes};
