//! Server configuration.
//!
//! Configuration is resolved from two layers: environment variables and CLI
//! arguments. CLI values override the environment where both are present.
//! The API key is deliberately optional at startup: several tools work
//! without it, and key-requiring tools report its absence per call.

use std::time::Duration;

pub const DEFAULT_REFRESH_HOURS: u64 = 24;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// CLI arguments relevant to config resolution. Mirrors the clap struct in
/// `main.rs` so this module stays independent of the CLI parser.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub tool_prefix: Option<String>,
    pub refresh_hours: u64,
    pub request_timeout_secs: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            tool_prefix: None,
            refresh_hours: DEFAULT_REFRESH_HOURS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Snapshot of the environment variables the server reads.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub api_key: Option<String>,
    pub steam_user_id: Option<String>,
    pub tool_prefix: Option<String>,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: env_non_empty("STEAM_API_KEY"),
            steam_user_id: env_non_empty("STEAM_USER_ID"),
            tool_prefix: env_non_empty("TOOL_PREFIX"),
        }
    }
}

/// Resolved server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Steam Web API key. Absent is not fatal at startup; key-requiring
    /// operations fail with a `Configuration` error instead.
    pub api_key: Option<String>,
    /// Default 64-bit Steam ID used when a tool call omits `steamid`.
    pub default_steam_id: Option<String>,
    /// Prefix applied to every registered tool name.
    pub tool_prefix: String,
    /// Minimum age before the app list catalog is considered stale.
    pub refresh_interval: Duration,
    /// Timeout for individual Steam Web API requests.
    pub request_timeout: Duration,
}

impl Config {
    /// Merge CLI arguments over environment values.
    pub fn resolve(cli: &CliConfig, env: EnvConfig) -> Self {
        let tool_prefix = cli
            .tool_prefix
            .clone()
            .or(env.tool_prefix)
            .unwrap_or_default();

        Self {
            api_key: env.api_key,
            default_steam_id: env.steam_user_id,
            tool_prefix,
            refresh_interval: Duration::from_secs(cli.refresh_hours * 60 * 60),
            request_timeout: Duration::from_secs(cli.request_timeout_secs),
        }
    }
}

/// Read an environment variable, treating empty/whitespace values as unset.
fn env_non_empty(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults() {
        let config = Config::resolve(&CliConfig::default(), EnvConfig::default());
        assert_eq!(config.api_key, None);
        assert_eq!(config.default_steam_id, None);
        assert_eq!(config.tool_prefix, "");
        assert_eq!(config.refresh_interval, Duration::from_secs(24 * 60 * 60));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_cli_prefix_overrides_env() {
        let cli = CliConfig {
            tool_prefix: Some("cli-".to_string()),
            ..Default::default()
        };
        let env = EnvConfig {
            tool_prefix: Some("env-".to_string()),
            ..Default::default()
        };
        let config = Config::resolve(&cli, env);
        assert_eq!(config.tool_prefix, "cli-");
    }

    #[test]
    fn test_env_prefix_used_when_cli_absent() {
        let env = EnvConfig {
            tool_prefix: Some("steam-".to_string()),
            ..Default::default()
        };
        let config = Config::resolve(&CliConfig::default(), env);
        assert_eq!(config.tool_prefix, "steam-");
    }

    #[test]
    fn test_refresh_hours_converted_to_duration() {
        let cli = CliConfig {
            refresh_hours: 1,
            ..Default::default()
        };
        let config = Config::resolve(&cli, EnvConfig::default());
        assert_eq!(config.refresh_interval, Duration::from_secs(3600));
    }
}
