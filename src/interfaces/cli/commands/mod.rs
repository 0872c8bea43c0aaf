//! CLI command implementations

mod config_gen;
mod lookup;
mod seed;

pub use config_gen::config_generate;
pub use lookup::lookup_address;
pub use seed::seed_ranges;
