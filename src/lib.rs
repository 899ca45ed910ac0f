//! FortunaMCP library.
//!
//! An MCP server that hands out random values. Every tool is an operation
//! contract: a declared parameter list with constraints, cross-parameter
//! rules and a binding to the random engine. The dispatcher validates each
//! call against its contract before the engine is touched.
//!
//! # Architecture
//!
//! - **engine**: the [`engine::RandomEngine`] trait and its `rand_distr` implementation
//! - **domains::tools**: contracts, the catalogue, the registry and the dispatcher
//! - **core**: configuration, errors, the MCP handler and the transports
//!
//! # Example
//!
//! ```rust,no_run
//! use fortuna_mcp::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config.clone())?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;
pub mod engine;

pub use core::{Config, Error, McpServer, Result};
