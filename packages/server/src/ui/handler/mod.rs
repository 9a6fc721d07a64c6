//! Handler modules for TCP connections and the admin HTTP endpoints.

pub mod connection;
pub mod http;

// Re-export HTTP handlers
pub use http::{health_check, list_sessions};

// Re-export the TCP connection handler
pub use connection::handle_connection;
