//! Error type for building the MCP server.
//!
//! Request-time failures never reach this type: tool calls are shaped into
//! MCP results by the tools domain, and the HTTP documentation routes answer
//! with their own status codes.

use thiserror::Error;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure while assembling the server.
#[derive(Debug, Error)]
pub enum Error {
    /// The tool catalogue could not be registered.
    #[error("Tool error: {0}")]
    Tool(#[from] crate::domains::tools::ToolError),
}
