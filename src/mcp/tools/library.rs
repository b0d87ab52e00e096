//! Game library tools: owned games and recently played games.
//!
//! Both need an API key and a Steam ID; credentials resolve through the
//! tool context and missing ones surface as in-band errors.

use serde::Deserialize;
use serde_json::json;

use crate::mcp::protocol::ToolsCallResult;
use crate::mcp::registry::{McpRegistry, ToolBuilder};

use super::render::minutes_to_hours;
use super::{error_result, parse_args};

const STEAMID_DESCRIPTION: &str =
    "64-bit Steam ID of the user. Defaults to STEAM_USER_ID environment variable if not provided.";

#[derive(Debug, Deserialize)]
struct LibraryArgs {
    #[serde(default)]
    steamid: Option<String>,
}

pub fn register_tools(registry: &mut McpRegistry) {
    register_get_games(registry);
    register_get_recent_games(registry);
}

fn register_get_games(registry: &mut McpRegistry) {
    registry.register_tool(
        ToolBuilder::new("get-games")
            .description(
                "Retrieve all games owned by a Steam user. Returns game names, App IDs, \
                 and total playtime in hours. Requires STEAM_API_KEY environment variable.",
            )
            .input_schema(json!({
                "type": "object",
                "properties": {
                    "steamid": {
                        "type": "string",
                        "description": STEAMID_DESCRIPTION
                    }
                }
            }))
            .build(|ctx, arguments| async move {
                let args: LibraryArgs = parse_args(arguments)?;

                let api_key = match ctx.api_key() {
                    Ok(key) => key.to_string(),
                    Err(e) => return Ok(error_result(&e)),
                };
                let steam_id = match ctx.resolve_steam_id(args.steamid) {
                    Ok(id) => id,
                    Err(e) => return Ok(error_result(&e)),
                };

                let mut games = match ctx.steam.fetch_owned_games(&api_key, &steam_id).await {
                    Ok(games) => games,
                    Err(e) => return Ok(error_result(&e)),
                };

                if games.is_empty() {
                    return Ok(ToolsCallResult::text(format!(
                        "No games found for Steam ID {}. The profile may be private.",
                        steam_id
                    )));
                }

                games.sort_by(|a, b| b.playtime_forever.cmp(&a.playtime_forever));

                let lines: Vec<String> = games
                    .iter()
                    .map(|g| {
                        format!(
                            "{} (appid: {}) - {} hours",
                            g.name,
                            g.appid,
                            minutes_to_hours(g.playtime_forever)
                        )
                    })
                    .collect();

                Ok(ToolsCallResult::text(format!(
                    "{} games owned by Steam ID {}:\n\n{}",
                    games.len(),
                    steam_id,
                    lines.join("\n")
                )))
            }),
    );
}

fn register_get_recent_games(registry: &mut McpRegistry) {
    registry.register_tool(
        ToolBuilder::new("get-recent-games")
            .description(
                "Retrieve games played by a Steam user in the last 2 weeks. Returns game \
                 names, App IDs, recent playtime, and total playtime in hours. Requires \
                 STEAM_API_KEY environment variable.",
            )
            .input_schema(json!({
                "type": "object",
                "properties": {
                    "steamid": {
                        "type": "string",
                        "description": STEAMID_DESCRIPTION
                    }
                }
            }))
            .build(|ctx, arguments| async move {
                let args: LibraryArgs = parse_args(arguments)?;

                let api_key = match ctx.api_key() {
                    Ok(key) => key.to_string(),
                    Err(e) => return Ok(error_result(&e)),
                };
                let steam_id = match ctx.resolve_steam_id(args.steamid) {
                    Ok(id) => id,
                    Err(e) => return Ok(error_result(&e)),
                };

                let mut games = match ctx.steam.fetch_recent_games(&api_key, &steam_id).await {
                    Ok(games) => games,
                    Err(e) => return Ok(error_result(&e)),
                };

                if games.is_empty() {
                    return Ok(ToolsCallResult::text(format!(
                        "No recently played games found for Steam ID {}. The profile may \
                         be private or no games were played in the last 2 weeks.",
                        steam_id
                    )));
                }

                games.sort_by(|a, b| b.playtime_2weeks.cmp(&a.playtime_2weeks));

                let lines: Vec<String> = games
                    .iter()
                    .map(|g| {
                        format!(
                            "{} (appid: {}) - {} hours (last 2 weeks) / {} hours (total)",
                            g.name,
                            g.appid,
                            minutes_to_hours(g.playtime_2weeks),
                            minutes_to_hours(g.playtime_forever)
                        )
                    })
                    .collect();

                Ok(ToolsCallResult::text(format!(
                    "{} game(s) played recently by Steam ID {}:\n\n{}",
                    games.len(),
                    steam_id,
                    lines.join("\n")
                )))
            }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_steamid_optional() {
        let args: LibraryArgs = parse_args(serde_json::json!({})).unwrap();
        assert!(args.steamid.is_none());
        let args: LibraryArgs =
            parse_args(serde_json::json!({"steamid": "76561198000000000"})).unwrap();
        assert_eq!(args.steamid.as_deref(), Some("76561198000000000"));
    }
}
