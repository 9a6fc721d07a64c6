//! Client configuration.

use clap::Parser;
use hiroba_server::config::{DEFAULT_HOST, DEFAULT_PORT};

/// Configuration for the terminal client
#[derive(Debug, Clone, Parser)]
#[command(name = "hiroba-client", version, about = "Terminal client for Hiroba chat")]
pub struct ClientConfig {
    /// Display name sent as the first line
    #[arg(short, long, env = "HIROBA_NAME")]
    pub name: String,

    /// Server host
    #[arg(long, env = "HIROBA_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Server port
    #[arg(short, long, env = "HIROBA_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
}

impl ClientConfig {
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
