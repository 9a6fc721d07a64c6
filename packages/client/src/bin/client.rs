//! Terminal chat client.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-client -- --name alice
//! ```

use std::sync::Arc;

use clap::Parser;
use hiroba_client::ClientConfig;
use hiroba_server::infrastructure::repository::InMemoryMessageRepository;
use hiroba_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let config = ClientConfig::parse();
    let repository = Arc::new(InMemoryMessageRepository::new());

    if let Err(e) = hiroba_client::run_client(config, repository).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
