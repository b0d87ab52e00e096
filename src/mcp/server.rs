//! MCP stdio server
//!
//! Reads newline-delimited JSON-RPC requests from stdin and writes
//! responses to stdout. All diagnostics go through `tracing` (stderr);
//! stdout belongs to the protocol.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

use super::context::ToolContext;
use super::protocol::{
    methods, InitializeParams, InitializeResult, McpError, McpRequest, McpResponse, PingResult,
    ServerCapabilities, ServerInfo, ToolsCallParams, ToolsCapability, ToolsListResult,
    MCP_PROTOCOL_VERSION,
};
use super::registry::McpRegistry;

pub const SERVER_NAME: &str = "steam-mcp";

/// One MCP session over a message stream. Tracks the initialize handshake
/// and dispatches requests against the registry.
pub struct McpConnection {
    registry: Arc<McpRegistry>,
    context: ToolContext,
    initialized: bool,
}

impl McpConnection {
    pub fn new(registry: Arc<McpRegistry>, context: ToolContext) -> Self {
        Self {
            registry,
            context,
            initialized: false,
        }
    }

    /// Handle a single raw message. Returns `None` for notifications,
    /// which get no response.
    pub async fn handle_message(&mut self, text: &str) -> Option<McpResponse> {
        let request: McpRequest = match serde_json::from_str(text) {
            Ok(req) => req,
            Err(e) => {
                return Some(McpResponse::error(None, McpError::ParseError(e.to_string())));
            }
        };

        let request_id = match request.id.clone() {
            Some(id) => id,
            None => {
                // Notification; only the initialized notification is expected.
                if request.method != methods::INITIALIZED {
                    debug!(method = %request.method, "ignoring unexpected notification");
                }
                return None;
            }
        };

        let result = match request.method.as_str() {
            methods::INITIALIZE => self.handle_initialize(&request),
            methods::PING => serde_json::to_value(PingResult {})
                .map_err(|e| McpError::InternalError(e.to_string())),
            methods::TOOLS_LIST => {
                if !self.initialized {
                    Err(McpError::InvalidRequest("Not initialized".to_string()))
                } else {
                    self.handle_tools_list()
                }
            }
            methods::TOOLS_CALL => {
                if !self.initialized {
                    Err(McpError::InvalidRequest("Not initialized".to_string()))
                } else {
                    self.handle_tools_call(&request).await
                }
            }
            methods::SHUTDOWN => {
                // Client is disconnecting gracefully
                return None;
            }
            other => Err(McpError::MethodNotFound(other.to_string())),
        };

        Some(match result {
            Ok(value) => McpResponse::success(request_id, value),
            Err(error) => McpResponse::error(Some(request_id), error),
        })
    }

    fn handle_initialize(&mut self, request: &McpRequest) -> Result<serde_json::Value, McpError> {
        let params: InitializeParams = request
            .params
            .clone()
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| McpError::InvalidParams(e.to_string()))?
            .unwrap_or_default();

        if let Some(client) = &params.client_info {
            debug!(name = %client.name, version = %client.version, "MCP client connected");
        }

        self.initialized = true;

        let result = InitializeResult {
            protocol_version: MCP_PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability { list_changed: None }),
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
    }

    fn handle_tools_list(&self) -> Result<serde_json::Value, McpError> {
        let result = ToolsListResult {
            tools: self.registry.list_tools(),
        };
        serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
    }

    async fn handle_tools_call(&self, request: &McpRequest) -> Result<serde_json::Value, McpError> {
        let params: ToolsCallParams = request
            .params
            .clone()
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| McpError::InvalidParams(e.to_string()))?
            .ok_or_else(|| McpError::InvalidParams("Missing params".to_string()))?;

        let tool = self
            .registry
            .get_tool(&params.name)
            .ok_or_else(|| McpError::MethodNotFound(format!("Unknown tool: {}", params.name)))?;

        let arguments = params.arguments.unwrap_or(serde_json::json!({}));
        let result = (tool.handler)(self.context.clone(), arguments).await?;

        serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
    }
}

/// Run the stdio message loop until stdin closes.
pub async fn run_stdio(registry: Arc<McpRegistry>, context: ToolContext) -> anyhow::Result<()> {
    let mut connection = McpConnection::new(registry, context);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    info!("Steam MCP server running on stdio");

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        if let Some(response) = connection.handle_message(&line).await {
            match serde_json::to_string(&response) {
                Ok(json) => {
                    stdout.write_all(json.as_bytes()).await?;
                    stdout.write_all(b"\n").await?;
                    stdout.flush().await?;
                }
                Err(e) => {
                    error!("Failed to serialize MCP response: {}", e);
                }
            }
        }
    }

    debug!("stdin closed, shutting down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CliConfig, Config, EnvConfig};
    use crate::mcp::registry::ToolBuilder;
    use crate::mcp::tools;
    use crate::search::SearchCache;
    use crate::steam::SteamClient;
    use std::time::Duration;

    fn test_connection(registry: McpRegistry) -> McpConnection {
        let config = Arc::new(Config::resolve(&CliConfig::default(), EnvConfig::default()));
        let steam = Arc::new(SteamClient::new(Duration::from_secs(5)).unwrap());
        let search_cache = Arc::new(SearchCache::new(
            steam.clone(),
            config.api_key.clone(),
            config.refresh_interval,
        ));
        McpConnection::new(
            Arc::new(registry),
            ToolContext {
                steam,
                search_cache,
                config,
            },
        )
    }

    async fn initialize(connection: &mut McpConnection) {
        let response = connection
            .handle_message(r#"{"jsonrpc": "2.0", "id": 1, "method": "initialize"}"#)
            .await
            .unwrap();
        assert!(response.error.is_none());
    }

    #[tokio::test]
    async fn test_parse_error() {
        let mut connection = test_connection(McpRegistry::default());
        let response = connection.handle_message("not json").await.unwrap();
        assert_eq!(response.error.unwrap().code, -32700);
        assert!(response.id.is_none());
    }

    #[tokio::test]
    async fn test_tools_rejected_before_initialize() {
        let mut connection = test_connection(McpRegistry::default());
        let response = connection
            .handle_message(r#"{"jsonrpc": "2.0", "id": 1, "method": "tools/list"}"#)
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, -32600);
    }

    #[tokio::test]
    async fn test_initialize_reports_server_info() {
        let mut connection = test_connection(McpRegistry::default());
        let response = connection
            .handle_message(
                r#"{"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {"protocolVersion": "2024-11-05", "clientInfo": {"name": "test", "version": "0.1"}}}"#,
            )
            .await
            .unwrap();
        let result = response.result.unwrap();
        assert_eq!(result["serverInfo"]["name"], SERVER_NAME);
        assert_eq!(result["protocolVersion"], MCP_PROTOCOL_VERSION);
    }

    #[tokio::test]
    async fn test_initialized_notification_gets_no_response() {
        let mut connection = test_connection(McpRegistry::default());
        initialize(&mut connection).await;
        let response = connection
            .handle_message(r#"{"jsonrpc": "2.0", "method": "notifications/initialized"}"#)
            .await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_ping() {
        let mut connection = test_connection(McpRegistry::default());
        let response = connection
            .handle_message(r#"{"jsonrpc": "2.0", "id": 7, "method": "ping"}"#)
            .await
            .unwrap();
        assert!(response.error.is_none());
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let mut connection = test_connection(McpRegistry::default());
        let response = connection
            .handle_message(r#"{"jsonrpc": "2.0", "id": 1, "method": "bogus/method"}"#)
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[tokio::test]
    async fn test_tools_list_contains_registered_tools() {
        let mut registry = McpRegistry::default();
        tools::register_all_tools(&mut registry);
        let mut connection = test_connection(registry);
        initialize(&mut connection).await;

        let response = connection
            .handle_message(r#"{"jsonrpc": "2.0", "id": 2, "method": "tools/list"}"#)
            .await
            .unwrap();
        let tools = response.result.unwrap()["tools"].as_array().unwrap().clone();
        assert_eq!(tools.len(), 9);
        assert!(tools.iter().any(|t| t["name"] == "search-apps"));
        assert!(tools.iter().any(|t| t["name"] == "get-news"));
    }

    #[tokio::test]
    async fn test_tools_call_unknown_tool() {
        let mut connection = test_connection(McpRegistry::default());
        initialize(&mut connection).await;
        let response = connection
            .handle_message(
                r#"{"jsonrpc": "2.0", "id": 3, "method": "tools/call", "params": {"name": "nope"}}"#,
            )
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[tokio::test]
    async fn test_tools_call_dispatches_handler() {
        let mut registry = McpRegistry::default();
        registry.register_tool(
            ToolBuilder::new("echo")
                .description("echoes back")
                .build(|_ctx, params| async move {
                    let text = params["text"].as_str().unwrap_or("").to_string();
                    Ok(crate::mcp::protocol::ToolsCallResult::text(text))
                }),
        );
        let mut connection = test_connection(registry);
        initialize(&mut connection).await;

        let response = connection
            .handle_message(
                r#"{"jsonrpc": "2.0", "id": 4, "method": "tools/call", "params": {"name": "echo", "arguments": {"text": "hi"}}}"#,
            )
            .await
            .unwrap();
        let result = response.result.unwrap();
        assert_eq!(result["content"][0]["text"], "hi");
    }
}
