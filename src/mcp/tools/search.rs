//! Fuzzy app search tool backed by the cached catalog.

use serde::Deserialize;
use serde_json::json;

use crate::mcp::protocol::ToolsCallResult;
use crate::mcp::registry::{McpRegistry, ToolBuilder};

use super::{error_result, parse_args};

const DEFAULT_LIMIT: usize = 10;
const MAX_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
struct SearchAppsArgs {
    query: String,
    #[serde(default)]
    limit: Option<usize>,
}

pub fn register_tools(registry: &mut McpRegistry) {
    registry.register_tool(
        ToolBuilder::new("search-apps")
            .description(
                "Search for Steam games by name using fuzzy matching. Handles typos, \
                 partial names, and variations. Returns top matching games with app IDs \
                 and similarity scores. Uses a cached list of ~240k Steam apps.",
            )
            .input_schema(json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search query to find Steam apps by name"
                    },
                    "limit": {
                        "type": "number",
                        "minimum": 1,
                        "maximum": 50,
                        "default": 10,
                        "description": "Maximum number of results to return (1-50, default 10)"
                    }
                },
                "required": ["query"]
            }))
            .build(|ctx, arguments| async move {
                let args: SearchAppsArgs = parse_args(arguments)?;
                let limit = args.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

                let hits = match ctx.search_cache.search(&args.query, limit).await {
                    Ok(hits) => hits,
                    Err(e) => return Ok(error_result(&e)),
                };

                if hits.is_empty() {
                    return Ok(ToolsCallResult::text(format!(
                        "No apps found matching \"{}\".",
                        args.query
                    )));
                }

                let lines: Vec<String> = hits
                    .iter()
                    .map(|hit| {
                        format!(
                            "{} (appid: {}) - match: {}",
                            hit.app.name, hit.app.appid, hit.score
                        )
                    })
                    .collect();

                Ok(ToolsCallResult::text(format!(
                    "Found {} result(s) for \"{}\":\n\n{}",
                    hits.len(),
                    args.query,
                    lines.join("\n")
                )))
            }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_args_require_query() {
        let parsed: Result<SearchAppsArgs, _> = parse_args(json!({"limit": 5}));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_args_default_limit() {
        let args: SearchAppsArgs = parse_args(json!({"query": "dota"})).unwrap();
        assert!(args.limit.is_none());
        assert_eq!(
            args.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
            10
        );
    }

    #[test]
    fn test_limit_clamped() {
        assert_eq!(500usize.clamp(1, MAX_LIMIT), 50);
        assert_eq!(0usize.clamp(1, MAX_LIMIT), 1);
    }
}
