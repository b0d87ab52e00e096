//! Tool implementations exposed over MCP.
//!
//! Each module registers its tools against the registry; handlers render
//! plain-text output and report Steam failures as in-band tool errors
//! (`isError: true`) rather than JSON-RPC errors.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ServerError;

use super::protocol::{McpError, ToolsCallResult};
use super::registry::McpRegistry;

mod library;
mod players;
mod render;
mod search;
mod store;

pub fn register_all_tools(registry: &mut McpRegistry) {
    search::register_tools(registry);
    store::register_tools(registry);
    library::register_tools(registry);
    players::register_tools(registry);
}

/// Deserialize tool arguments, reporting bad shapes as invalid params.
fn parse_args<T: DeserializeOwned>(arguments: Value) -> Result<T, McpError> {
    serde_json::from_value(arguments).map_err(|e| McpError::InvalidParams(e.to_string()))
}

/// Render a Steam-side failure as an in-band tool error.
fn error_result(error: &ServerError) -> ToolsCallResult {
    ToolsCallResult::error(format!("Error: {}", error))
}
