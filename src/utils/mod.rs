pub mod csv_handler;
pub mod ip;
