//! TCP chat server implementation.

mod admin;
mod handler;
mod listener;
mod runner;
mod signal;
pub mod state;

pub use admin::{bind_admin, spawn_admin};
pub use listener::{Server, ServerHandle};
pub use runner::run;
pub use signal::shutdown_signal;
