//! Storefront tools: store details, current player count, news.
//!
//! None of these require an API key; the underlying endpoints are public.

use serde::Deserialize;
use serde_json::json;

use crate::mcp::protocol::ToolsCallResult;
use crate::mcp::registry::{McpRegistry, ToolBuilder};
use crate::steam::models::StoreData;

use super::render::{
    format_date, format_price, format_requirements, group_thousands, strip_html,
};
use super::{error_result, parse_args};

const MAX_SCREENSHOTS: usize = 5;
const MAX_VIDEOS: usize = 3;

pub fn register_tools(registry: &mut McpRegistry) {
    register_get_store_details(registry);
    register_get_current_players(registry);
    register_get_news(registry);
}

// ============================================================================
// get-store-details
// ============================================================================

#[derive(Debug, Deserialize)]
struct StoreDetailsArgs {
    appid: u32,
    #[serde(default)]
    cc: Option<String>,
    #[serde(default)]
    language: Option<String>,
}

fn register_get_store_details(registry: &mut McpRegistry) {
    registry.register_tool(
        ToolBuilder::new("get-store-details")
            .description(
                "Fetch comprehensive store information for a Steam game including pricing, \
                 descriptions, screenshots, videos, system requirements, and reviews. \
                 Supports region-specific pricing. No Steam API key required.",
            )
            .input_schema(json!({
                "type": "object",
                "properties": {
                    "appid": {
                        "type": "number",
                        "description": "Steam application ID"
                    },
                    "cc": {
                        "type": "string",
                        "description": "Two-letter country code for regional pricing (e.g., 'us', 'gb', 'de')"
                    },
                    "language": {
                        "type": "string",
                        "description": "Language for descriptions (e.g., 'english', 'french', 'german')"
                    }
                },
                "required": ["appid"]
            }))
            .build(|ctx, arguments| async move {
                let args: StoreDetailsArgs = parse_args(arguments)?;

                let data = match ctx
                    .steam
                    .fetch_store_details(args.appid, args.cc.as_deref(), args.language.as_deref())
                    .await
                {
                    Ok(data) => data,
                    Err(e) => return Ok(error_result(&e)),
                };

                let Some(data) = data else {
                    return Ok(ToolsCallResult::error(format!(
                        "App {} not found or store page unavailable.",
                        args.appid
                    )));
                };

                Ok(ToolsCallResult::text(render_store_details(&data)))
            }),
    );
}

fn render_store_details(data: &StoreData) -> String {
    let platforms: Vec<&str> = [
        data.platforms.windows.then_some("Windows"),
        data.platforms.mac.then_some("macOS"),
        data.platforms.linux.then_some("Linux"),
    ]
    .into_iter()
    .flatten()
    .collect();

    let mut sections = vec![
        format!("# {}", data.name),
        format!("**Type:** {}", data.kind),
        format!("**App ID:** {}", data.steam_appid),
        format!(
            "**Price:** {}",
            format_price(data.is_free, data.price_overview.as_ref())
        ),
        format!("**Platforms:** {}", platforms.join(", ")),
        format!(
            "**Store Page:** https://store.steampowered.com/app/{}",
            data.steam_appid
        ),
    ];

    if !data.short_description.is_empty() {
        sections.push(format!(
            "\n**Description:** {}",
            strip_html(&data.short_description)
        ));
    }

    if !data.developers.is_empty() {
        sections.push(format!("**Developers:** {}", data.developers.join(", ")));
    }
    if !data.publishers.is_empty() {
        sections.push(format!("**Publishers:** {}", data.publishers.join(", ")));
    }

    if !data.genres.is_empty() {
        let genres: Vec<&str> = data.genres.iter().map(|g| g.description.as_str()).collect();
        sections.push(format!("**Genres:** {}", genres.join(", ")));
    }
    if !data.categories.is_empty() {
        let categories: Vec<&str> = data
            .categories
            .iter()
            .map(|c| c.description.as_str())
            .collect();
        sections.push(format!("**Categories:** {}", categories.join(", ")));
    }

    if let Some(metacritic) = &data.metacritic {
        sections.push(format!("**Metacritic:** {}/100", metacritic.score));
    }
    if let Some(recommendations) = &data.recommendations {
        sections.push(format!(
            "**Recommendations:** {}",
            group_thousands(recommendations.total)
        ));
    }

    if let Some(release) = &data.release_date {
        let status = if release.coming_soon {
            " (Coming Soon)"
        } else {
            ""
        };
        sections.push(format!("**Release Date:** {}{}", release.date, status));
    }

    if let Some(languages) = &data.supported_languages {
        sections.push(format!("**Languages:** {}", strip_html(languages)));
    }

    if let Some(controller) = &data.controller_support {
        sections.push(format!("**Controller Support:** {}", controller));
    }

    if data.required_age.years() > 0 {
        sections.push(format!("**Required Age:** {}+", data.required_age.years()));
    }

    for (label, reqs) in [
        ("PC", data.pc_requirements.as_ref()),
        ("Mac", data.mac_requirements.as_ref()),
        ("Linux", data.linux_requirements.as_ref()),
    ] {
        let formatted = format_requirements(reqs);
        if formatted != "Not specified" {
            sections.push(format!("\n**{} Requirements:**\n{}", label, formatted));
        }
    }

    if let Some(website) = &data.website {
        sections.push(format!("**Website:** {}", website));
    }

    if !data.header_image.is_empty() {
        sections.push(format!("**Header Image:** {}", data.header_image));
    }

    if !data.screenshots.is_empty() {
        let shots: Vec<&str> = data
            .screenshots
            .iter()
            .take(MAX_SCREENSHOTS)
            .map(|s| s.path_full.as_str())
            .collect();
        sections.push(format!("\n**Screenshots:**\n{}", shots.join("\n")));
    }

    if !data.movies.is_empty() {
        let videos: Vec<String> = data
            .movies
            .iter()
            .take(MAX_VIDEOS)
            .map(|m| {
                let url = m
                    .mp4
                    .get("max")
                    .or_else(|| m.webm.get("max"))
                    .map(|s| s.as_str())
                    .unwrap_or(&m.thumbnail);
                format!("{}: {}", m.name, url)
            })
            .collect();
        sections.push(format!("\n**Videos:**\n{}", videos.join("\n")));
    }

    sections.join("\n")
}

// ============================================================================
// get-current-players
// ============================================================================

#[derive(Debug, Deserialize)]
struct CurrentPlayersArgs {
    appid: u32,
}

fn register_get_current_players(registry: &mut McpRegistry) {
    registry.register_tool(
        ToolBuilder::new("get-current-players")
            .description(
                "Get the current number of players in a Steam game. \
                 Does not require an API key.",
            )
            .input_schema(json!({
                "type": "object",
                "properties": {
                    "appid": {
                        "type": "number",
                        "description": "Steam application ID of the game."
                    }
                },
                "required": ["appid"]
            }))
            .build(|ctx, arguments| async move {
                let args: CurrentPlayersArgs = parse_args(arguments)?;

                match ctx.steam.fetch_current_players(args.appid).await {
                    Ok(count) => Ok(ToolsCallResult::text(format!(
                        "App {} currently has {} players in-game on Steam.",
                        args.appid,
                        group_thousands(count)
                    ))),
                    Err(e) => Ok(error_result(&e)),
                }
            }),
    );
}

// ============================================================================
// get-news
// ============================================================================

#[derive(Debug, Deserialize)]
struct NewsArgs {
    appid: u32,
    #[serde(default)]
    count: Option<u32>,
    #[serde(default)]
    maxlength: Option<u32>,
}

fn register_get_news(registry: &mut McpRegistry) {
    registry.register_tool(
        ToolBuilder::new("get-news")
            .description(
                "Get the latest news articles for a Steam game. Returns titles, URLs, \
                 content snippets, and dates. Does not require an API key.",
            )
            .input_schema(json!({
                "type": "object",
                "properties": {
                    "appid": {
                        "type": "number",
                        "description": "Steam application ID of the game."
                    },
                    "count": {
                        "type": "number",
                        "minimum": 1,
                        "maximum": 50,
                        "description": "Number of news entries to return (1-50, default 5)."
                    },
                    "maxlength": {
                        "type": "number",
                        "minimum": 0,
                        "description": "Maximum length of each news entry's content. 0 returns full content. Default 500."
                    }
                },
                "required": ["appid"]
            }))
            .build(|ctx, arguments| async move {
                let args: NewsArgs = parse_args(arguments)?;

                let items = match ctx
                    .steam
                    .fetch_news(args.appid, args.count, args.maxlength)
                    .await
                {
                    Ok(items) => items,
                    Err(e) => return Ok(error_result(&e)),
                };

                if items.is_empty() {
                    return Ok(ToolsCallResult::text(format!(
                        "No news found for app {}.",
                        args.appid
                    )));
                }

                let articles: Vec<String> = items
                    .iter()
                    .map(|item| {
                        let author = if item.author.is_empty() {
                            String::new()
                        } else {
                            format!(" by {}", item.author)
                        };
                        let mut lines = vec![
                            format!("**{}**{}", item.title, author),
                            format!("  Date: {} | Feed: {}", format_date(item.date), item.feedlabel),
                            format!("  URL: {}", item.url),
                        ];
                        let contents = strip_html(&item.contents);
                        if !contents.is_empty() {
                            lines.push(format!("  {}", contents));
                        }
                        lines.join("\n")
                    })
                    .collect();

                Ok(ToolsCallResult::text(format!(
                    "Latest news for app {}:\n\n{}",
                    args.appid,
                    articles.join("\n\n")
                )))
            }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steam::models::{Platforms, RequiredAge};

    fn minimal_store_data() -> StoreData {
        StoreData {
            kind: "game".to_string(),
            name: "Dota 2".to_string(),
            steam_appid: 570,
            required_age: RequiredAge::Number(0),
            is_free: true,
            controller_support: None,
            short_description: String::new(),
            supported_languages: None,
            header_image: String::new(),
            website: None,
            developers: vec![],
            publishers: vec![],
            price_overview: None,
            platforms: Platforms {
                windows: true,
                mac: true,
                linux: true,
            },
            metacritic: None,
            categories: vec![],
            genres: vec![],
            screenshots: vec![],
            movies: vec![],
            recommendations: None,
            release_date: None,
            pc_requirements: None,
            mac_requirements: None,
            linux_requirements: None,
        }
    }

    #[test]
    fn test_render_store_details_core_fields() {
        let text = render_store_details(&minimal_store_data());
        assert!(text.starts_with("# Dota 2"));
        assert!(text.contains("**Type:** game"));
        assert!(text.contains("**Price:** Free to Play"));
        assert!(text.contains("**Platforms:** Windows, macOS, Linux"));
        assert!(text.contains("https://store.steampowered.com/app/570"));
        // Empty optional sections stay out of the output
        assert!(!text.contains("**Developers:**"));
        assert!(!text.contains("**Required Age:**"));
    }

    #[test]
    fn test_render_store_details_required_age_shown_when_positive() {
        let mut data = minimal_store_data();
        data.required_age = RequiredAge::Number(18);
        let text = render_store_details(&data);
        assert!(text.contains("**Required Age:** 18+"));
    }

    #[test]
    fn test_render_store_details_caps_screenshots() {
        use crate::steam::models::Screenshot;
        let mut data = minimal_store_data();
        data.screenshots = (0..8)
            .map(|i| Screenshot {
                id: i,
                path_thumbnail: format!("thumb{}.jpg", i),
                path_full: format!("full{}.jpg", i),
            })
            .collect();
        let text = render_store_details(&data);
        assert!(text.contains("full4.jpg"));
        assert!(!text.contains("full5.jpg"));
    }

    #[test]
    fn test_news_args_defaults() {
        let args: NewsArgs = parse_args(serde_json::json!({"appid": 570})).unwrap();
        assert_eq!(args.appid, 570);
        assert!(args.count.is_none());
        assert!(args.maxlength.is_none());
    }
}
