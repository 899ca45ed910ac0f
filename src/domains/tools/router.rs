//! Tool Router - builds the rmcp ToolRouter from the contract registry.
//!
//! Every registered contract becomes one route. All routes share the same
//! dispatcher, so adding an operation only means adding a contract to the
//! catalogue.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter},
    model::{CallToolResult, Content},
};
use serde_json::json;

use super::contract::ToolValue;
use super::dispatcher::Dispatcher;
use super::error::ToolError;

/// Message returned to clients when the engine fails.
const INTERNAL_ERROR_MESSAGE: &str = "Internal error while generating a random value";

/// Build the tool router with one route per registered operation.
pub fn build_tool_router<S>(dispatcher: Arc<Dispatcher>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    dispatcher
        .registry()
        .contracts()
        .iter()
        .fold(ToolRouter::new(), |router, contract| {
            router.with_route(create_route(contract.to_tool(), dispatcher.clone()))
        })
}

/// Create a ToolRoute for STDIO/TCP transport.
fn create_route<S>(tool: rmcp::model::Tool, dispatcher: Arc<Dispatcher>) -> ToolRoute<S>
where
    S: Send + Sync + 'static,
{
    let name = tool.name.to_string();
    ToolRoute::new_dyn(tool, move |ctx: ToolCallContext<'_, S>| {
        let args = ctx.arguments.clone().unwrap_or_default();
        let dispatcher = dispatcher.clone();
        let name = name.clone();
        async move { call_result(dispatcher.invoke(&name, &args)) }.boxed()
    })
}

/// Shape a dispatch outcome into the MCP tool-call result.
///
/// Validation failures are tool errors the caller can read and correct.
/// Unknown operations are protocol errors. Engine failures are reported as a
/// generic internal error; details only go to the log.
pub fn call_result(outcome: Result<ToolValue, ToolError>) -> Result<CallToolResult, McpError> {
    match outcome {
        Ok(value) => Ok(CallToolResult {
            content: vec![Content::text(value.to_text())],
            structured_content: Some(json!({ "result": value })),
            is_error: Some(false),
            meta: None,
        }),
        Err(ToolError::Validation(failure)) => Ok(CallToolResult {
            content: vec![Content::text(format!("Validation failed: {}", failure))],
            structured_content: Some(json!({ "error": failure })),
            is_error: Some(true),
            meta: None,
        }),
        Err(e @ ToolError::UnknownOperation(_)) => Err(McpError::invalid_params(e.to_string(), None)),
        Err(_) => Err(McpError::internal_error(INTERNAL_ERROR_MESSAGE, None)),
    }
}
