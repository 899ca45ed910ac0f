//! Tools domain module.
//!
//! This module handles all tool-related functionality for the MCP server.
//! Every tool is a random value generation operation described by a
//! declarative contract and served through one generic dispatch routine.
//!
//! ## Architecture
//!
//! - `contract.rs` - Parameter kinds, bounds, cross-field rules, result coercion
//! - `catalogue.rs` - The declared operations and their exact bounds
//! - `registry.rs` - Contract registry (register / lookup)
//! - `dispatcher.rs` - Validation and engine dispatch for every call
//! - `router.rs` - rmcp ToolRouter built from the registry
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Add a method to `engine::RandomEngine` and implement it
//! 2. Declare an `OperationContract` in `catalogue.rs`
//!
//! The router, the HTTP dispatch and the tool listing pick it up from the
//! registry.

pub mod catalogue;
pub mod contract;
mod dispatcher;
mod error;
mod registry;
pub mod router;

pub use contract::{OperationContract, ToolValue};
pub use dispatcher::{Dispatcher, validate};
pub use error::{FailureTarget, ToolError, ValidationFailure};
pub use registry::ContractRegistry;
pub use router::{build_tool_router, call_result};
