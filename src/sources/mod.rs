//! Game sources.
//!
//! A game source fetches a player's recent games from a chess server and
//! normalizes them into [`Game`] records. Sources are looked up by site name
//! through a [`SourceRegistry`] that is built once at startup and handed to
//! the dispatcher.

pub mod lichess;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::AppConfig;
use crate::fetch::FetchError;
use crate::models::Game;

pub use lichess::LichessClient;

/// Errors that can occur while fetching games.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Malformed game on line {line}: {message}")]
    Malformed { line: usize, message: String },

    #[error("Invalid username: {0:?}")]
    InvalidUser(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// A chess server that can list a player's games.
#[async_trait]
pub trait GameSource: Send + Sync {
    /// Site identifier used in requests, e.g. `"lichess"`.
    fn site(&self) -> &str;

    /// Fetch the recent games of `user`.
    async fn fetch_games(&self, user: &str) -> Result<Vec<Game>, SourceError>;
}

/// Site name -> game source.
#[derive(Clone, Default)]
pub struct SourceRegistry {
    sources: HashMap<String, Arc<dyn GameSource>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry of every source enabled in `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, SourceError> {
        let mut registry = Self::new();
        if config.lichess.enabled {
            registry.register(Arc::new(LichessClient::from_config(&config.lichess)?));
        }
        Ok(registry)
    }

    /// Register `source` under its site name, replacing any previous one.
    pub fn register(&mut self, source: Arc<dyn GameSource>) {
        self.sources.insert(source.site().to_string(), source);
    }

    pub fn get(&self, site: &str) -> Option<Arc<dyn GameSource>> {
        self.sources.get(site).cloned()
    }

    /// Registered site names, sorted.
    pub fn sites(&self) -> Vec<String> {
        let mut sites: Vec<String> = self.sources.keys().cloned().collect();
        sites.sort();
        sites
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl std::fmt::Debug for SourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceRegistry")
            .field("sites", &self.sites())
            .finish()
    }
}
