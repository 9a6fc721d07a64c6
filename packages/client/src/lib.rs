//! Terminal client for the Hiroba broadcast chat server.

pub mod command;
pub mod config;
pub mod error;
pub mod line;
pub mod runner;

// Re-export entry points
pub use config::ClientConfig;
pub use error::ClientError;
pub use runner::run_client;
