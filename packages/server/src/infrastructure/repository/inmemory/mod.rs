//! インメモリ実装

pub mod message;
pub mod registry;

pub use message::InMemoryMessageRepository;
pub use registry::InMemorySessionRegistry;
