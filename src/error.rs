//! Error taxonomy for the server.
//!
//! Three kinds of failure are distinguishable by callers:
//! - `Configuration`: a required credential or setting is missing. Never
//!   retried, surfaced verbatim with remediation text.
//! - `Upstream`: a Steam Web API call failed (transport or HTTP status).
//!   Previously cached data, if any, remains usable.
//! - `Internal`: an invariant was violated. Indicates a bug.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{0}")]
    Configuration(String),

    #[error("{0}")]
    Upstream(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// The missing-API-key error, with remediation text.
    pub fn missing_api_key() -> Self {
        ServerError::Configuration(
            "STEAM_API_KEY environment variable is not set. \
             Get your key at https://steamcommunity.com/dev/apikey"
                .to_string(),
        )
    }

    /// The missing-Steam-ID error, raised when a tool gets neither an
    /// explicit steamid argument nor a STEAM_USER_ID fallback.
    pub fn missing_steam_id() -> Self {
        ServerError::Configuration(
            "No Steam ID provided. Pass a steamid argument or set the \
             STEAM_USER_ID environment variable."
                .to_string(),
        )
    }

    /// Upstream failure for a named endpoint with an HTTP status code.
    pub fn upstream_status(what: &str, status: u16) -> Self {
        ServerError::Upstream(format!("Failed to fetch {}: HTTP {}", what, status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_names_the_variable() {
        let err = ServerError::missing_api_key();
        assert!(matches!(err, ServerError::Configuration(_)));
        assert!(err.to_string().contains("STEAM_API_KEY"));
        assert!(err.to_string().contains("steamcommunity.com/dev/apikey"));
    }

    #[test]
    fn test_upstream_status_message() {
        let err = ServerError::upstream_status("app list", 503);
        assert_eq!(err.to_string(), "Failed to fetch app list: HTTP 503");
    }

    #[test]
    fn test_internal_is_prefixed() {
        let err = ServerError::Internal("index missing".to_string());
        assert_eq!(err.to_string(), "internal error: index missing");
    }
}
