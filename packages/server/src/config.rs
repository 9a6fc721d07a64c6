//! Server configuration.
//!
//! Values come from command-line flags, falling back to `HIROBA_*`
//! environment variables and then to the documented defaults.

use std::time::Duration;

use clap::Parser;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 1234;
pub const DEFAULT_MAX_WORKERS: u32 = 50;
pub const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 10;

/// Configuration for the broadcast server
#[derive(Debug, Clone, Parser)]
#[command(name = "hiroba-server", version, about = "Line-oriented TCP broadcast chat server")]
pub struct ServerConfig {
    /// Host to listen on
    #[arg(long, env = "HIROBA_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "HIROBA_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Maximum number of connections handled concurrently; further
    /// connections wait for a free worker before their handshake
    #[arg(
        long,
        env = "HIROBA_MAX_WORKERS",
        default_value_t = DEFAULT_MAX_WORKERS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_workers: u32,

    /// Seconds to let workers drain on shutdown before they are cancelled
    #[arg(long, env = "HIROBA_SHUTDOWN_GRACE_SECS", default_value_t = DEFAULT_SHUTDOWN_GRACE_SECS)]
    pub shutdown_grace_secs: u64,

    /// Port for the admin HTTP API (disabled when unset)
    #[arg(long, env = "HIROBA_ADMIN_PORT")]
    pub admin_port: Option<u16>,
}

impl ServerConfig {
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// `host:port`, as shown in logs.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers as usize
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_workers: DEFAULT_MAX_WORKERS,
            shutdown_grace_secs: DEFAULT_SHUTDOWN_GRACE_SECS,
            admin_port: None,
        }
    }
}
