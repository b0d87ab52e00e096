//! Response models for the Steam Web API endpoints we consume.
//!
//! Fields mirror the JSON the official endpoints return. Optional fields
//! stay optional: Steam omits most of them depending on profile visibility
//! and content type.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One entry in the Steam app catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SteamApp {
    pub appid: u32,
    pub name: String,
}

// ============================================================================
// IStoreService/GetAppList
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AppListResponse {
    pub response: AppListPage,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppListPage {
    #[serde(default)]
    pub apps: Vec<SteamApp>,
    #[serde(default)]
    pub have_more_results: bool,
    #[serde(default)]
    pub last_appid: Option<u32>,
}

// ============================================================================
// store.steampowered.com/api/appdetails
// ============================================================================

pub type StoreDetailsResponse = HashMap<String, StoreDetailsEntry>;

#[derive(Debug, Deserialize)]
pub struct StoreDetailsEntry {
    pub success: bool,
    #[serde(default)]
    pub data: Option<StoreData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreData {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub steam_appid: u32,
    #[serde(default)]
    pub required_age: RequiredAge,
    pub is_free: bool,
    #[serde(default)]
    pub controller_support: Option<String>,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub supported_languages: Option<String>,
    #[serde(default)]
    pub header_image: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub developers: Vec<String>,
    #[serde(default)]
    pub publishers: Vec<String>,
    #[serde(default)]
    pub price_overview: Option<PriceOverview>,
    pub platforms: Platforms,
    #[serde(default)]
    pub metacritic: Option<Metacritic>,
    #[serde(default)]
    pub categories: Vec<Tagged>,
    #[serde(default)]
    pub genres: Vec<GenreTag>,
    #[serde(default)]
    pub screenshots: Vec<Screenshot>,
    #[serde(default)]
    pub movies: Vec<Movie>,
    #[serde(default)]
    pub recommendations: Option<Recommendations>,
    #[serde(default)]
    pub release_date: Option<ReleaseDate>,
    #[serde(default)]
    pub pc_requirements: Option<Requirements>,
    #[serde(default)]
    pub mac_requirements: Option<Requirements>,
    #[serde(default)]
    pub linux_requirements: Option<Requirements>,
}

/// `required_age` arrives as a number for most apps but as a string for a
/// handful of store entries.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(untagged)]
pub enum RequiredAge {
    #[default]
    #[serde(skip)]
    Unknown,
    Number(u32),
    Text(String),
}

impl RequiredAge {
    pub fn years(&self) -> u32 {
        match self {
            RequiredAge::Unknown => 0,
            RequiredAge::Number(n) => *n,
            RequiredAge::Text(s) => s.trim().parse().unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PriceOverview {
    pub currency: String,
    pub initial: u64,
    pub r#final: u64,
    pub discount_percent: u32,
    #[serde(default)]
    pub initial_formatted: String,
    #[serde(default)]
    pub final_formatted: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Platforms {
    pub windows: bool,
    pub mac: bool,
    pub linux: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Metacritic {
    pub score: u32,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tagged {
    pub id: u32,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenreTag {
    pub id: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Screenshot {
    pub id: u32,
    pub path_thumbnail: String,
    pub path_full: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Movie {
    pub id: u64,
    pub name: String,
    pub thumbnail: String,
    #[serde(default)]
    pub webm: HashMap<String, String>,
    #[serde(default)]
    pub mp4: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Recommendations {
    pub total: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseDate {
    pub coming_soon: bool,
    pub date: String,
}

/// System requirements arrive as an object with `minimum`/`recommended`
/// fields, or as an empty JSON array when the platform is unsupported.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Requirements {
    Fields {
        #[serde(default)]
        minimum: Option<String>,
        #[serde(default)]
        recommended: Option<String>,
    },
    Empty(Vec<serde_json::Value>),
}

// ============================================================================
// IPlayerService/GetOwnedGames
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct OwnedGamesResponse {
    pub response: OwnedGamesPage,
}

#[derive(Debug, Default, Deserialize)]
pub struct OwnedGamesPage {
    #[serde(default)]
    pub game_count: u32,
    #[serde(default)]
    pub games: Vec<OwnedGame>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwnedGame {
    pub appid: u32,
    #[serde(default)]
    pub name: String,
    pub playtime_forever: u32,
    #[serde(default)]
    pub playtime_2weeks: Option<u32>,
    #[serde(default)]
    pub img_icon_url: Option<String>,
    #[serde(default)]
    pub rtime_last_played: Option<i64>,
}

// ============================================================================
// IPlayerService/GetRecentlyPlayedGames
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RecentGamesResponse {
    pub response: RecentGamesPage,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecentGamesPage {
    #[serde(default)]
    pub total_count: u32,
    #[serde(default)]
    pub games: Vec<RecentGame>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecentGame {
    pub appid: u32,
    #[serde(default)]
    pub name: String,
    pub playtime_forever: u32,
    pub playtime_2weeks: u32,
}

// ============================================================================
// ISteamUser/GetPlayerSummaries
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PlayerSummariesResponse {
    pub response: PlayerSummariesPage,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlayerSummariesPage {
    #[serde(default)]
    pub players: Vec<PlayerSummary>,
}

/// Persona state: 0=Offline, 1=Online, 2=Busy, 3=Away, 4=Snooze,
/// 5=Looking to Trade, 6=Looking to Play.
/// Community visibility: 1=Private, 3=Public.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerSummary {
    pub steamid: String,
    pub personaname: String,
    pub profileurl: String,
    #[serde(default)]
    pub avatarfull: String,
    pub personastate: i32,
    pub communityvisibilitystate: i32,
    #[serde(default)]
    pub lastlogoff: Option<i64>,
    #[serde(default)]
    pub realname: Option<String>,
    #[serde(default)]
    pub timecreated: Option<i64>,
    #[serde(default)]
    pub gameextrainfo: Option<String>,
    #[serde(default)]
    pub loccountrycode: Option<String>,
}

// ============================================================================
// ISteamUser/GetFriendList
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct FriendListResponse {
    #[serde(default)]
    pub friendslist: Option<FriendsPage>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FriendsPage {
    #[serde(default)]
    pub friends: Vec<Friend>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Friend {
    pub steamid: String,
    pub relationship: String,
    pub friend_since: i64,
}

// ============================================================================
// ISteamUserStats/GetPlayerAchievements
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PlayerAchievementsResponse {
    #[serde(default)]
    pub playerstats: Option<PlayerStats>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlayerStats {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub achievements: Vec<PlayerAchievement>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerAchievement {
    pub apiname: String,
    /// 0 or 1.
    pub achieved: u8,
    #[serde(default)]
    pub unlocktime: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

// ============================================================================
// ISteamUserStats/GetGlobalAchievementPercentagesForApp
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct GlobalAchievementsResponse {
    #[serde(default)]
    pub achievementpercentages: Option<GlobalAchievementsPage>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GlobalAchievementsPage {
    #[serde(default)]
    pub achievements: Vec<GlobalAchievementPercentage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GlobalAchievementPercentage {
    pub name: String,
    pub percent: f64,
}

// ============================================================================
// ISteamUserStats/GetNumberOfCurrentPlayers
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CurrentPlayersResponse {
    pub response: CurrentPlayersPage,
}

#[derive(Debug, Default, Deserialize)]
pub struct CurrentPlayersPage {
    #[serde(default)]
    pub player_count: u64,
}

// ============================================================================
// ISteamNews/GetNewsForApp
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct NewsResponse {
    #[serde(default)]
    pub appnews: Option<NewsPage>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NewsPage {
    #[serde(default)]
    pub newsitems: Vec<NewsItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewsItem {
    pub gid: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub contents: String,
    #[serde(default)]
    pub feedlabel: String,
    pub date: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_list_page_defaults() {
        let page: AppListPage = serde_json::from_str("{}").unwrap();
        assert!(page.apps.is_empty());
        assert!(!page.have_more_results);
        assert_eq!(page.last_appid, None);
    }

    #[test]
    fn test_requirements_object_form() {
        let json = r#"{"minimum": "OS: Windows 10", "recommended": "OS: Windows 11"}"#;
        let reqs: Requirements = serde_json::from_str(json).unwrap();
        match reqs {
            Requirements::Fields {
                minimum,
                recommended,
            } => {
                assert_eq!(minimum.as_deref(), Some("OS: Windows 10"));
                assert_eq!(recommended.as_deref(), Some("OS: Windows 11"));
            }
            Requirements::Empty(_) => panic!("expected field form"),
        }
    }

    #[test]
    fn test_requirements_empty_array_form() {
        let reqs: Requirements = serde_json::from_str("[]").unwrap();
        assert!(matches!(reqs, Requirements::Empty(_)));
    }

    #[test]
    fn test_required_age_number_and_string() {
        let n: RequiredAge = serde_json::from_str("18").unwrap();
        assert_eq!(n.years(), 18);
        let s: RequiredAge = serde_json::from_str(r#""16""#).unwrap();
        assert_eq!(s.years(), 16);
        let junk: RequiredAge = serde_json::from_str(r#""none""#).unwrap();
        assert_eq!(junk.years(), 0);
    }

    #[test]
    fn test_store_details_entry_without_data() {
        let json = r#"{"123": {"success": false}}"#;
        let resp: StoreDetailsResponse = serde_json::from_str(json).unwrap();
        let entry = resp.get("123").unwrap();
        assert!(!entry.success);
        assert!(entry.data.is_none());
    }

    #[test]
    fn test_player_achievements_missing_playerstats() {
        let resp: PlayerAchievementsResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.playerstats.is_none());
    }
}
