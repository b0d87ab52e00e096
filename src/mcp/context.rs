//! MCP Tool Execution Context
//!
//! Provides access to shared server state for tool implementations.

use std::sync::Arc;

use crate::config::Config;
use crate::error::ServerError;
use crate::search::SearchCache;
use crate::steam::SteamClient;

/// Context provided to tool handlers during execution
#[derive(Clone)]
pub struct ToolContext {
    /// Steam Web API client
    pub steam: Arc<SteamClient>,

    /// Fuzzy app search cache
    pub search_cache: Arc<SearchCache>,

    /// Resolved server configuration
    pub config: Arc<Config>,
}

impl ToolContext {
    /// The API key, or the standard configuration error when unset.
    pub fn api_key(&self) -> Result<&str, ServerError> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(ServerError::missing_api_key)
    }

    /// Resolve a Steam ID: explicit tool argument first, then the
    /// configured default.
    pub fn resolve_steam_id(&self, explicit: Option<String>) -> Result<String, ServerError> {
        explicit
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.config.default_steam_id.clone())
            .ok_or_else(ServerError::missing_steam_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CliConfig, Config, EnvConfig};
    use crate::search::SearchCache;
    use std::time::Duration;

    fn context_with_env(env: EnvConfig) -> ToolContext {
        let config = Arc::new(Config::resolve(&CliConfig::default(), env));
        let steam = Arc::new(SteamClient::new(Duration::from_secs(5)).unwrap());
        let search_cache = Arc::new(SearchCache::new(
            steam.clone(),
            config.api_key.clone(),
            config.refresh_interval,
        ));
        ToolContext {
            steam,
            search_cache,
            config,
        }
    }

    #[test]
    fn test_api_key_missing() {
        let ctx = context_with_env(EnvConfig::default());
        assert!(matches!(
            ctx.api_key(),
            Err(ServerError::Configuration(_))
        ));
    }

    #[test]
    fn test_resolve_steam_id_prefers_explicit() {
        let ctx = context_with_env(EnvConfig {
            steam_user_id: Some("111".to_string()),
            ..Default::default()
        });
        assert_eq!(ctx.resolve_steam_id(Some("222".to_string())).unwrap(), "222");
        assert_eq!(ctx.resolve_steam_id(None).unwrap(), "111");
        // Blank explicit argument falls through to the default
        assert_eq!(ctx.resolve_steam_id(Some("  ".to_string())).unwrap(), "111");
    }

    #[test]
    fn test_resolve_steam_id_missing_everywhere() {
        let ctx = context_with_env(EnvConfig::default());
        assert!(matches!(
            ctx.resolve_steam_id(None),
            Err(ServerError::Configuration(_))
        ));
    }
}
