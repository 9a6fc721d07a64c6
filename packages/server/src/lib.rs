//! Line-oriented TCP broadcast chat server.
//!
//! Each connection sends its display name as the first line, then every line
//! it sends is relayed verbatim to all other connected peers. Join and leave
//! notices are broadcast when peers arrive and depart.

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::ServerConfig;
pub use error::ServerError;
pub use ui::{Server, ServerHandle, run as run_server};
