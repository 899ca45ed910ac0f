//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating tool calls to the [`Dispatcher`].
//!
//! ## Tool Architecture
//!
//! Tools are declared as data in `domains/tools/catalogue.rs`. The
//! ToolRouter is built from the contract registry in
//! `domains/tools/router.rs`, and HTTP calls go through the same dispatcher.
//! **Adding a new tool does NOT require modifying this file!**

use rmcp::{
    ErrorData as McpError, ServerHandler, handler::server::tool::ToolRouter, model::*,
    tool_handler,
};
use std::sync::Arc;
use tracing::info;

use super::config::Config;
use crate::domains::tools::{Dispatcher, build_tool_router, call_result};
use crate::engine::{RandomEngine, ThreadRngEngine};

/// Instructions advertised to clients on initialization.
pub const INSTRUCTIONS: &str = "This server specializes in random value generation. \
When randomness is needed, use the provided tools instead of inventing values. \
Use the fortuna_info tool for information about FortunaMCP and its engine.";

/// The main MCP server handler.
///
/// This struct implements the `ServerHandler` trait from rmcp and routes
/// every tool call through the shared dispatcher.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Validates calls and forwards them to the engine.
    dispatcher: Arc<Dispatcher>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server backed by the default engine.
    pub fn new(config: Config) -> super::Result<Self> {
        Self::with_engine(config, Arc::new(ThreadRngEngine::new()))
    }

    /// Create a new MCP server backed by `engine`.
    pub fn with_engine(
        config: Config,
        engine: Arc<dyn RandomEngine>,
    ) -> super::Result<Self> {
        let dispatcher = Arc::new(Dispatcher::standard(engine)?);
        info!(
            "Registered {} operations (engine: {} {})",
            dispatcher.registry().len(),
            dispatcher.engine().name(),
            dispatcher.engine().version()
        );

        Ok(Self {
            tool_router: build_tool_router::<Self>(dispatcher.clone()),
            config: Arc::new(config),
            dispatcher,
        })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Get the dispatcher shared by every transport.
    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport).
    ///
    /// Returns the serialized `CallToolResult`, or the protocol error for
    /// unknown operations and engine failures.
    pub fn call_tool(
        &self,
        name: &str,
        arguments: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<serde_json::Value, McpError> {
        let result = call_result(self.dispatcher.invoke(name, arguments))?;
        serde_json::to_value(&result).map_err(|e| McpError::internal_error(e.to_string(), None))
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }
}
