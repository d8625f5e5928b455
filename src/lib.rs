//! Emotion Survey Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod catalog;
pub mod config;
pub mod playback;
pub mod response_log;
pub mod server;
pub mod stats;

// Re-export commonly used types for convenience
pub use catalog::{Catalog, Song};
pub use playback::PlaybackStateStore;
pub use response_log::{ResponseLog, ResponseRow};
pub use server::{run_server, RequestsLoggingLevel, ServerConfig};
