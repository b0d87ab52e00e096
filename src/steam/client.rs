//! HTTP client for the Steam Web API.
//!
//! One thin method per endpoint; each maps transport failures and
//! non-success statuses to `ServerError::Upstream` naming the endpoint.
//! Base URLs are injectable so tests can point the client at a mock server.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ServerError;
use crate::search::AppCatalog;

use super::models::{
    AppListResponse, CurrentPlayersResponse, Friend, FriendListResponse, GlobalAchievementPercentage,
    GlobalAchievementsResponse, NewsItem, NewsResponse, OwnedGame, OwnedGamesResponse,
    PlayerAchievement, PlayerAchievementsResponse, PlayerSummariesResponse, PlayerSummary,
    RecentGame, RecentGamesResponse, SteamApp, StoreData, StoreDetailsResponse,
};

const API_BASE: &str = "https://api.steampowered.com";
const STORE_BASE: &str = "https://store.steampowered.com";

/// Page size for the paginated app list endpoint.
const APP_LIST_PAGE_SIZE: u32 = 50_000;

pub struct SteamClient {
    http: reqwest::Client,
    api_base: String,
    store_base: String,
}

impl SteamClient {
    pub fn new(timeout: Duration) -> Result<Self, ServerError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServerError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_base: API_BASE.to_string(),
            store_base: STORE_BASE.to_string(),
        })
    }

    /// Client with overridden base URLs, for tests against a mock server.
    pub fn with_base_urls(
        timeout: Duration,
        api_base: impl Into<String>,
        store_base: impl Into<String>,
    ) -> Result<Self, ServerError> {
        let mut client = Self::new(timeout)?;
        client.api_base = api_base.into().trim_end_matches('/').to_string();
        client.store_base = store_base.into().trim_end_matches('/').to_string();
        Ok(client)
    }

    async fn send(
        &self,
        base: &str,
        path: &str,
        query: &[(&str, String)],
        what: &str,
    ) -> Result<reqwest::Response, ServerError> {
        let url = format!("{}{}", base, path);
        debug!(%url, what, "Steam API request");
        self.http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| ServerError::Upstream(format!("Failed to fetch {}: {}", what, e)))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        base: &str,
        path: &str,
        query: &[(&str, String)],
        what: &str,
    ) -> Result<T, ServerError> {
        let response = self.send(base, path, query, what).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ServerError::upstream_status(what, status.as_u16()));
        }
        response
            .json()
            .await
            .map_err(|e| ServerError::Upstream(format!("Failed to parse {} response: {}", what, e)))
    }

    /// Fetch the complete app catalog, following `last_appid` pagination
    /// until the endpoint reports no more results.
    pub async fn fetch_app_list(&self, api_key: &str) -> Result<Vec<SteamApp>, ServerError> {
        let mut all_apps = Vec::new();
        let mut last_appid: Option<u32> = None;

        loop {
            let mut query = vec![
                ("key", api_key.to_string()),
                ("max_results", APP_LIST_PAGE_SIZE.to_string()),
                ("include_games", "true".to_string()),
                ("include_dlc", "true".to_string()),
                ("include_software", "true".to_string()),
                ("include_videos", "true".to_string()),
                ("include_hardware", "true".to_string()),
            ];
            if let Some(id) = last_appid {
                query.push(("last_appid", id.to_string()));
            }

            let page: AppListResponse = self
                .get_json(&self.api_base, "/IStoreService/GetAppList/v1/", &query, "app list")
                .await?;
            let page = page.response;

            if page.apps.is_empty() {
                break;
            }

            last_appid = page.last_appid.or_else(|| page.apps.last().map(|a| a.appid));
            let more = page.have_more_results;
            all_apps.extend(page.apps);

            if !more {
                break;
            }
        }

        debug!(count = all_apps.len(), "fetched app list");
        Ok(all_apps)
    }

    /// Fetch storefront details for one app. Returns `Ok(None)` when the
    /// store reports the app as unavailable rather than failing.
    pub async fn fetch_store_details(
        &self,
        appid: u32,
        cc: Option<&str>,
        language: Option<&str>,
    ) -> Result<Option<StoreData>, ServerError> {
        let mut query = vec![("appids", appid.to_string())];
        if let Some(cc) = cc {
            query.push(("cc", cc.to_string()));
        }
        if let Some(language) = language {
            query.push(("l", language.to_string()));
        }

        let mut response: StoreDetailsResponse = self
            .get_json(&self.store_base, "/api/appdetails/", &query, "store details")
            .await?;

        Ok(response
            .remove(&appid.to_string())
            .filter(|entry| entry.success)
            .and_then(|entry| entry.data))
    }

    pub async fn fetch_owned_games(
        &self,
        api_key: &str,
        steam_id: &str,
    ) -> Result<Vec<OwnedGame>, ServerError> {
        let query = vec![
            ("key", api_key.to_string()),
            ("steamid", steam_id.to_string()),
            ("include_appinfo", "1".to_string()),
            ("include_played_free_games", "1".to_string()),
            ("format", "json".to_string()),
        ];
        let response: OwnedGamesResponse = self
            .get_json(
                &self.api_base,
                "/IPlayerService/GetOwnedGames/v0001/",
                &query,
                "owned games",
            )
            .await?;
        Ok(response.response.games)
    }

    pub async fn fetch_recent_games(
        &self,
        api_key: &str,
        steam_id: &str,
    ) -> Result<Vec<RecentGame>, ServerError> {
        let query = vec![
            ("key", api_key.to_string()),
            ("steamid", steam_id.to_string()),
            ("format", "json".to_string()),
        ];
        let response: RecentGamesResponse = self
            .get_json(
                &self.api_base,
                "/IPlayerService/GetRecentlyPlayedGames/v0001/",
                &query,
                "recent games",
            )
            .await?;
        Ok(response.response.games)
    }

    pub async fn fetch_player_summaries(
        &self,
        api_key: &str,
        steam_ids: &[String],
    ) -> Result<Vec<PlayerSummary>, ServerError> {
        let query = vec![
            ("key", api_key.to_string()),
            ("steamids", steam_ids.join(",")),
            ("format", "json".to_string()),
        ];
        let response: PlayerSummariesResponse = self
            .get_json(
                &self.api_base,
                "/ISteamUser/GetPlayerSummaries/v0002/",
                &query,
                "player summaries",
            )
            .await?;
        Ok(response.response.players)
    }

    pub async fn fetch_friend_list(
        &self,
        api_key: &str,
        steam_id: &str,
        relationship: Option<&str>,
    ) -> Result<Vec<Friend>, ServerError> {
        let query = vec![
            ("key", api_key.to_string()),
            ("steamid", steam_id.to_string()),
            ("relationship", relationship.unwrap_or("friend").to_string()),
            ("format", "json".to_string()),
        ];
        let response = self
            .send(
                &self.api_base,
                "/ISteamUser/GetFriendList/v0001/",
                &query,
                "friend list",
            )
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            // Steam answers 401 for private friend lists, not an empty list.
            return Err(ServerError::Upstream(
                "This user's friend list is not public. Friend lists are only \
                 visible for profiles with public visibility."
                    .to_string(),
            ));
        }
        if !status.is_success() {
            return Err(ServerError::upstream_status("friend list", status.as_u16()));
        }

        let response: FriendListResponse = response.json().await.map_err(|e| {
            ServerError::Upstream(format!("Failed to parse friend list response: {}", e))
        })?;
        Ok(response.friendslist.map(|f| f.friends).unwrap_or_default())
    }

    pub async fn fetch_player_achievements(
        &self,
        api_key: &str,
        steam_id: &str,
        appid: u32,
        language: Option<&str>,
    ) -> Result<Vec<PlayerAchievement>, ServerError> {
        let mut query = vec![
            ("key", api_key.to_string()),
            ("steamid", steam_id.to_string()),
            ("appid", appid.to_string()),
            ("format", "json".to_string()),
        ];
        if let Some(language) = language {
            query.push(("l", language.to_string()));
        }

        let response: PlayerAchievementsResponse = self
            .get_json(
                &self.api_base,
                "/ISteamUserStats/GetPlayerAchievements/v0001/",
                &query,
                "player achievements",
            )
            .await?;

        match response.playerstats {
            Some(stats) if stats.success => Ok(stats.achievements),
            _ => Err(ServerError::Upstream(
                "Could not retrieve achievements. The game may have no \
                 achievements, or the user's profile may be private."
                    .to_string(),
            )),
        }
    }

    pub async fn fetch_global_achievement_percentages(
        &self,
        appid: u32,
    ) -> Result<Vec<GlobalAchievementPercentage>, ServerError> {
        let query = vec![("gameid", appid.to_string()), ("format", "json".to_string())];
        let response: GlobalAchievementsResponse = self
            .get_json(
                &self.api_base,
                "/ISteamUserStats/GetGlobalAchievementPercentagesForApp/v0002/",
                &query,
                "global achievement percentages",
            )
            .await?;
        Ok(response
            .achievementpercentages
            .map(|p| p.achievements)
            .unwrap_or_default())
    }

    pub async fn fetch_current_players(&self, appid: u32) -> Result<u64, ServerError> {
        let query = vec![("appid", appid.to_string()), ("format", "json".to_string())];
        let response: CurrentPlayersResponse = self
            .get_json(
                &self.api_base,
                "/ISteamUserStats/GetNumberOfCurrentPlayers/v0001/",
                &query,
                "current players",
            )
            .await?;
        Ok(response.response.player_count)
    }

    pub async fn fetch_news(
        &self,
        appid: u32,
        count: Option<u32>,
        maxlength: Option<u32>,
    ) -> Result<Vec<NewsItem>, ServerError> {
        let query = vec![
            ("appid", appid.to_string()),
            ("count", count.unwrap_or(5).to_string()),
            ("maxlength", maxlength.unwrap_or(500).to_string()),
            ("format", "json".to_string()),
        ];
        let response: NewsResponse = self
            .get_json(&self.api_base, "/ISteamNews/GetNewsForApp/v0002/", &query, "news")
            .await?;
        Ok(response.appnews.map(|n| n.newsitems).unwrap_or_default())
    }
}

#[async_trait]
impl AppCatalog for SteamClient {
    async fn fetch_app_list(&self, api_key: &str) -> Result<Vec<SteamApp>, ServerError> {
        SteamClient::fetch_app_list(self, api_key).await
    }
}
