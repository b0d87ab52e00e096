//! Player profile tools: summaries, friend list, achievements.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::ServerError;
use crate::mcp::protocol::ToolsCallResult;
use crate::mcp::registry::{McpRegistry, ToolBuilder};
use crate::steam::models::{PlayerAchievement, PlayerSummary};

use super::render::{format_date, format_datetime, persona_state_name};
use super::{error_result, parse_args};

const STEAMID_DESCRIPTION: &str =
    "64-bit Steam ID of the user. Defaults to STEAM_USER_ID environment variable if not provided.";

/// GetPlayerSummaries accepts at most this many IDs per call.
const SUMMARY_BATCH_SIZE: usize = 100;

/// Public community visibility state.
const VISIBILITY_PUBLIC: i32 = 3;

pub fn register_tools(registry: &mut McpRegistry) {
    register_get_player_summaries(registry);
    register_get_friend_list(registry);
    register_get_player_achievements(registry);
}

// ============================================================================
// get-player-summaries
// ============================================================================

#[derive(Debug, Deserialize)]
struct PlayerSummariesArgs {
    #[serde(default)]
    steamids: Option<String>,
}

fn register_get_player_summaries(registry: &mut McpRegistry) {
    registry.register_tool(
        ToolBuilder::new("get-player-summaries")
            .description(
                "Get Steam profile information for one or more users. Returns display \
                 name, avatar, online status, currently playing game, and more. Accepts \
                 up to 100 Steam IDs.",
            )
            .input_schema(json!({
                "type": "object",
                "properties": {
                    "steamids": {
                        "type": "string",
                        "description": "Comma-delimited list of 64-bit Steam IDs (up to 100). Defaults to STEAM_USER_ID environment variable if not provided."
                    }
                }
            }))
            .build(|ctx, arguments| async move {
                let args: PlayerSummariesArgs = parse_args(arguments)?;

                let api_key = match ctx.api_key() {
                    Ok(key) => key.to_string(),
                    Err(e) => return Ok(error_result(&e)),
                };

                let ids = args
                    .steamids
                    .filter(|s| !s.trim().is_empty())
                    .or_else(|| ctx.config.default_steam_id.clone());
                let Some(ids) = ids else {
                    return Ok(error_result(&ServerError::Configuration(
                        "No Steam IDs provided. Pass a steamids argument or set the \
                         STEAM_USER_ID environment variable."
                            .to_string(),
                    )));
                };

                let id_list: Vec<String> =
                    ids.split(',').map(|id| id.trim().to_string()).collect();

                let players = match ctx.steam.fetch_player_summaries(&api_key, &id_list).await {
                    Ok(players) => players,
                    Err(e) => return Ok(error_result(&e)),
                };

                if players.is_empty() {
                    return Ok(ToolsCallResult::text(
                        "No player profiles found for the provided Steam IDs.",
                    ));
                }

                let summaries: Vec<String> = players.iter().map(render_summary).collect();
                Ok(ToolsCallResult::text(summaries.join("\n\n")))
            }),
    );
}

fn render_summary(player: &PlayerSummary) -> String {
    let mut lines = vec![
        format!("**{}** ({})", player.personaname, player.steamid),
        format!("  Status: {}", persona_state_name(player.personastate)),
        format!("  Profile: {}", player.profileurl),
        format!("  Avatar: {}", player.avatarfull),
    ];

    if player.communityvisibilitystate == VISIBILITY_PUBLIC {
        if let Some(realname) = &player.realname {
            lines.push(format!("  Real Name: {}", realname));
        }
        if let Some(game) = &player.gameextrainfo {
            lines.push(format!("  Currently Playing: {}", game));
        }
        if let Some(created) = player.timecreated {
            lines.push(format!("  Account Created: {}", format_date(created)));
        }
        if let Some(country) = &player.loccountrycode {
            lines.push(format!("  Country: {}", country));
        }
    } else {
        lines.push("  Profile Visibility: Private".to_string());
    }

    if let Some(lastlogoff) = player.lastlogoff {
        lines.push(format!("  Last Online: {}", format_datetime(lastlogoff)));
    }

    lines.join("\n")
}

// ============================================================================
// get-friend-list
// ============================================================================

#[derive(Debug, Deserialize)]
struct FriendListArgs {
    #[serde(default)]
    steamid: Option<String>,
    #[serde(default)]
    relationship: Option<String>,
}

fn register_get_friend_list(registry: &mut McpRegistry) {
    registry.register_tool(
        ToolBuilder::new("get-friend-list")
            .description(
                "Get the friend list for a Steam user. Returns friend display names, \
                 Steam IDs, and when they became friends. Only works if the user's \
                 profile is public.",
            )
            .input_schema(json!({
                "type": "object",
                "properties": {
                    "steamid": {
                        "type": "string",
                        "description": STEAMID_DESCRIPTION
                    },
                    "relationship": {
                        "type": "string",
                        "enum": ["all", "friend"],
                        "description": "Relationship filter. \"friend\" (default) returns only friends, \"all\" returns all relationships."
                    }
                }
            }))
            .build(|ctx, arguments| async move {
                let args: FriendListArgs = parse_args(arguments)?;

                let api_key = match ctx.api_key() {
                    Ok(key) => key.to_string(),
                    Err(e) => return Ok(error_result(&e)),
                };
                let steam_id = match ctx.resolve_steam_id(args.steamid) {
                    Ok(id) => id,
                    Err(e) => return Ok(error_result(&e)),
                };

                let friends = match ctx
                    .steam
                    .fetch_friend_list(&api_key, &steam_id, args.relationship.as_deref())
                    .await
                {
                    Ok(friends) => friends,
                    Err(e) => return Ok(error_result(&e)),
                };

                if friends.is_empty() {
                    return Ok(ToolsCallResult::text(format!(
                        "No friends found for Steam ID {}. The profile may be private \
                         or the friend list may be empty.",
                        steam_id
                    )));
                }

                // Batch-resolve display names; enrichment failures leave
                // friends listed without a name.
                let mut names: HashMap<String, String> = HashMap::new();
                for batch in friends.chunks(SUMMARY_BATCH_SIZE) {
                    let ids: Vec<String> = batch.iter().map(|f| f.steamid.clone()).collect();
                    match ctx.steam.fetch_player_summaries(&api_key, &ids).await {
                        Ok(summaries) => {
                            for summary in summaries {
                                names.insert(summary.steamid, summary.personaname);
                            }
                        }
                        Err(e) => {
                            debug!("friend name enrichment failed: {}", e);
                        }
                    }
                }

                let lines: Vec<String> = friends
                    .iter()
                    .map(|f| {
                        let name = names.get(&f.steamid).map(|n| n.as_str()).unwrap_or("Unknown");
                        format!(
                            "{} ({}) - Friends since {}",
                            name,
                            f.steamid,
                            format_date(f.friend_since)
                        )
                    })
                    .collect();

                Ok(ToolsCallResult::text(format!(
                    "{} friends for Steam ID {}:\n\n{}",
                    friends.len(),
                    steam_id,
                    lines.join("\n")
                )))
            }),
    );
}

// ============================================================================
// get-player-achievements
// ============================================================================

#[derive(Debug, Deserialize)]
struct PlayerAchievementsArgs {
    appid: u32,
    #[serde(default)]
    steamid: Option<String>,
    #[serde(default)]
    language: Option<String>,
}

fn register_get_player_achievements(registry: &mut McpRegistry) {
    registry.register_tool(
        ToolBuilder::new("get-player-achievements")
            .description(
                "Get a player's achievements for a specific game. Shows which \
                 achievements are unlocked, unlock times, and global unlock percentages. \
                 Requires STEAM_API_KEY.",
            )
            .input_schema(json!({
                "type": "object",
                "properties": {
                    "appid": {
                        "type": "number",
                        "description": "Steam application ID of the game."
                    },
                    "steamid": {
                        "type": "string",
                        "description": STEAMID_DESCRIPTION
                    },
                    "language": {
                        "type": "string",
                        "description": "Language code for localized achievement names and descriptions (e.g., 'english', 'french', 'german')."
                    }
                },
                "required": ["appid"]
            }))
            .build(|ctx, arguments| async move {
                let args: PlayerAchievementsArgs = parse_args(arguments)?;

                let api_key = match ctx.api_key() {
                    Ok(key) => key.to_string(),
                    Err(e) => return Ok(error_result(&e)),
                };
                let steam_id = match ctx.resolve_steam_id(args.steamid) {
                    Ok(id) => id,
                    Err(e) => return Ok(error_result(&e)),
                };

                let achievements = match ctx
                    .steam
                    .fetch_player_achievements(
                        &api_key,
                        &steam_id,
                        args.appid,
                        args.language.as_deref(),
                    )
                    .await
                {
                    Ok(achievements) => achievements,
                    Err(e) => return Ok(error_result(&e)),
                };

                if achievements.is_empty() {
                    return Ok(ToolsCallResult::text(format!(
                        "No achievements found for app {}. The game may have no achievements.",
                        args.appid
                    )));
                }

                // Global percentages are enrichment only; a failure here must
                // not sink the whole response.
                let globals = match ctx
                    .steam
                    .fetch_global_achievement_percentages(args.appid)
                    .await
                {
                    Ok(globals) => globals
                        .into_iter()
                        .map(|g| (g.name, g.percent))
                        .collect::<HashMap<String, f64>>(),
                    Err(e) => {
                        debug!("global achievement enrichment failed: {}", e);
                        HashMap::new()
                    }
                };

                Ok(ToolsCallResult::text(render_achievements(
                    args.appid,
                    &steam_id,
                    achievements,
                    &globals,
                )))
            }),
    );
}

fn render_achievements(
    appid: u32,
    steam_id: &str,
    achievements: Vec<PlayerAchievement>,
    globals: &HashMap<String, f64>,
) -> String {
    let total = achievements.len();
    let (mut unlocked, mut locked): (Vec<_>, Vec<_>) =
        achievements.into_iter().partition(|a| a.achieved == 1);

    let format_achievement = |a: &PlayerAchievement| {
        let status = if a.achieved == 1 { "UNLOCKED" } else { "LOCKED" };
        let name = a.name.as_deref().unwrap_or(&a.apiname);
        let desc = a
            .description
            .as_deref()
            .map(|d| format!(" - {}", d))
            .unwrap_or_default();
        let pct = globals
            .get(&a.apiname)
            .map(|p| format!(" ({:.1}% of players)", p))
            .unwrap_or_default();
        let when = if a.achieved == 1 && a.unlocktime > 0 {
            format!(" [{}]", format_date(a.unlocktime))
        } else {
            String::new()
        };
        format!("[{}] {}{}{}{}", status, name, desc, pct, when)
    };

    let mut lines = vec![
        format!("Achievements for app {} (Steam ID: {})", appid, steam_id),
        format!(
            "Progress: {}/{} ({:.1}%)",
            unlocked.len(),
            total,
            unlocked.len() as f64 / total as f64 * 100.0
        ),
        String::new(),
    ];

    if !unlocked.is_empty() {
        lines.push(format!("--- Unlocked ({}) ---", unlocked.len()));
        // Most recent unlocks first
        unlocked.sort_by(|a, b| b.unlocktime.cmp(&a.unlocktime));
        lines.extend(unlocked.iter().map(&format_achievement));
    }

    if !locked.is_empty() {
        lines.push(String::new());
        lines.push(format!("--- Locked ({}) ---", locked.len()));
        // Easiest (highest global percentage) first
        locked.sort_by(|a, b| {
            let pct_a = globals.get(&a.apiname).copied().unwrap_or(0.0);
            let pct_b = globals.get(&b.apiname).copied().unwrap_or(0.0);
            pct_b.partial_cmp(&pct_a).unwrap_or(std::cmp::Ordering::Equal)
        });
        lines.extend(locked.iter().map(&format_achievement));
    }

    lines.join("\n")
}
