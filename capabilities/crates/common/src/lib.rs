//! Common utilities for Arogyam stdio capabilities.
//!
//! This crate provides helpers for:
//! - Serving tools to an MCP client over stdin/stdout (rmcp)
//! - Logging to stderr so stdout stays reserved for the protocol
//! - Error handling patterns
//! - The historical patient-surge database shared by hospital capabilities

use serde::Serialize;

pub mod server;
pub mod surge;
mod surge_table;

pub use server::{ServeError, Tool, ToolServer};
pub use surge::{
    MonthRecord, SurgeDataError, SurgeDataRepository, SurgeDatabase, SurgeEntry,
};

// ============ Error Type ============

/// Error type for capability operations.
///
/// Serializes to `{"error": "..."}`, which is the body a tool returns when a
/// call fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilityError {
    pub error: String,
}

impl CapabilityError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

impl std::fmt::Display for CapabilityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl std::error::Error for CapabilityError {}

// ============ Logging ============

/// Install a tracing subscriber that writes to stderr.
///
/// Honors `RUST_LOG`, defaulting to `info`. Calling it twice is harmless.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}

// Re-export commonly used items
pub use rmcp;
pub use serde;
pub use serde_json;
