//! Request dispatch: site + user -> game source -> profile engine.

use std::time::Duration;

use thiserror::Error;
use tracing::info;

use crate::calculate::ProfileEngine;
use crate::models::Profile;
use crate::sources::{SourceError, SourceRegistry};

/// Errors that can occur while building a profile for a request.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Unknown site: {0}")]
    UnknownSite(String),

    #[error("Failed to read user games: {0}")]
    Source(#[from] SourceError),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

/// Wires game sources to the profile engine.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: SourceRegistry,
    engine: ProfileEngine,
    timeout: Duration,
}

impl Dispatcher {
    pub fn new(registry: SourceRegistry, engine: ProfileEngine, timeout: Duration) -> Self {
        Self {
            registry,
            engine,
            timeout,
        }
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// Fetch `user`'s games from `site` and compute their profile, within the
    /// configured deadline.
    pub async fn profile(&self, site: &str, user: &str) -> Result<Profile, DispatchError> {
        let source = self
            .registry
            .get(site)
            .ok_or_else(|| DispatchError::UnknownSite(site.to_string()))?;

        let work = async {
            let games = source.fetch_games(user).await?;
            Ok::<_, DispatchError>(self.engine.compute(user, &games))
        };

        let profile = tokio::time::timeout(self.timeout, work)
            .await
            .map_err(|_| DispatchError::Timeout(self.timeout))??;

        info!(
            "Profiled {} on {} from {} games",
            user, site, profile.games_analyzed
        );
        Ok(profile)
    }
}
