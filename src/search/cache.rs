//! Fuzzy search cache over the Steam app catalog.
//!
//! Owns the in-memory catalog and its derived search index, refreshing both
//! from the catalog source at most once per refresh interval. Refresh is
//! lazy: every query checks freshness first, nothing runs on a timer.
//!
//! The whole state sits behind one async mutex, which doubles as the
//! single-flight guard: concurrent callers that find the catalog stale wait
//! on the same in-flight refresh instead of starting their own, and no
//! reader ever observes a catalog paired with a mismatched index.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

use super::index::{BitapIndexBuilder, IndexBuilder, SearchIndex};
use crate::error::ServerError;
use crate::steam::SteamApp;

/// Source of the full app catalog. Implemented by `SteamClient`; tests plug
/// in stubs.
#[async_trait]
pub trait AppCatalog: Send + Sync {
    async fn fetch_app_list(&self, api_key: &str) -> Result<Vec<SteamApp>, ServerError>;
}

/// One search result: the matched app and a similarity score in [0, 1],
/// rounded to two decimals, higher is better.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub app: SteamApp,
    pub score: f64,
}

struct CacheState {
    catalog: Vec<SteamApp>,
    /// Always rebuilt together with `catalog`: `Some` iff the catalog is
    /// non-empty.
    index: Option<Box<dyn SearchIndex>>,
    last_refresh: Option<Instant>,
}

pub struct SearchCache {
    source: Arc<dyn AppCatalog>,
    builder: Box<dyn IndexBuilder>,
    api_key: Option<String>,
    refresh_interval: Duration,
    state: Mutex<CacheState>,
}

impl SearchCache {
    pub fn new(
        source: Arc<dyn AppCatalog>,
        api_key: Option<String>,
        refresh_interval: Duration,
    ) -> Self {
        Self::with_builder(
            source,
            api_key,
            refresh_interval,
            Box::new(BitapIndexBuilder::default()),
        )
    }

    /// Cache with a custom matching strategy.
    pub fn with_builder(
        source: Arc<dyn AppCatalog>,
        api_key: Option<String>,
        refresh_interval: Duration,
        builder: Box<dyn IndexBuilder>,
    ) -> Self {
        Self {
            source,
            builder,
            api_key,
            refresh_interval,
            state: Mutex::new(CacheState {
                catalog: Vec::new(),
                index: None,
                last_refresh: None,
            }),
        }
    }

    /// Refresh the catalog if it is empty or older than the refresh
    /// interval. A no-op otherwise.
    pub async fn ensure_fresh(&self) -> Result<(), ServerError> {
        let mut state = self.state.lock().await;
        self.ensure_fresh_locked(&mut state).await
    }

    /// Fuzzy-search the catalog, refreshing it first when stale. Results
    /// come back best match first, truncated to `limit`. Errors from the
    /// refresh propagate unchanged; an empty result only ever means a
    /// successful search with zero matches.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, ServerError> {
        let mut state = self.state.lock().await;
        self.ensure_fresh_locked(&mut state).await?;

        if state.catalog.is_empty() {
            return Ok(Vec::new());
        }
        let index = state.index.as_ref().ok_or_else(|| {
            ServerError::Internal("search index missing after successful refresh".to_string())
        })?;

        let hits = index
            .query(query, limit)
            .into_iter()
            .map(|m| SearchHit {
                app: state.catalog[m.position].clone(),
                score: ((1.0 - m.distance) * 100.0).round() / 100.0,
            })
            .collect();
        Ok(hits)
    }

    async fn ensure_fresh_locked(&self, state: &mut CacheState) -> Result<(), ServerError> {
        if !state.catalog.is_empty() {
            if let Some(at) = state.last_refresh {
                if at.elapsed() < self.refresh_interval {
                    return Ok(());
                }
            }
        }

        // Credential check comes before any network access.
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(ServerError::missing_api_key)?;

        info!("Fetching Steam app list...");
        let fetched = self.source.fetch_app_list(api_key).await?;

        // Entries with empty display names are useless in a name index.
        let catalog: Vec<SteamApp> = fetched
            .into_iter()
            .filter(|app| !app.name.trim().is_empty())
            .collect();

        let index = if catalog.is_empty() {
            None
        } else {
            Some(self.builder.build(&catalog))
        };

        // Swap catalog, index and timestamp together; on any failure above
        // the previous state was left untouched.
        state.catalog = catalog;
        state.index = index;
        state.last_refresh = Some(Instant::now());

        info!(apps = state.catalog.len(), "Loaded apps into search index");
        Ok(())
    }
}
