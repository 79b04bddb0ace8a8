pub mod config;
pub mod constants;
pub mod dc_client;
pub mod error;
pub mod importer;
pub mod logging;
pub mod reshape;
pub mod resolve;
pub mod table;
