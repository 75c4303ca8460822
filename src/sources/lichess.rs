//! Lichess game export client.
//!
//! Fetches a player's games from `GET /api/games/user/{user}` as NDJSON (one
//! JSON game per line) and normalizes them. All Lichess specifics live in
//! this module.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};
use url::Url;

use super::{GameSource, SourceError};
use crate::config::LichessConfig;
use crate::fetch::{Fetcher, FetcherConfig};
use crate::models::{Game, Outcome};

const NDJSON: &str = "application/x-ndjson";

// ── Lichess API response types ──────────────────────────────────────────────

/// A game as exported by Lichess.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LichessGame {
    pub id: Option<String>,

    /// Termination status, e.g. `"mate"`, `"resign"`, `"outoftime"`
    #[serde(default)]
    pub status: String,

    /// `"white"` or `"black"`, absent for draws and unfinished games
    pub winner: Option<String>,

    pub players: LichessPlayers,

    /// Space-separated SAN moves
    #[serde(default)]
    pub moves: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LichessPlayers {
    pub white: LichessPlayer,
    pub black: LichessPlayer,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LichessPlayer {
    /// Absent for anonymous players and the computer
    pub user: Option<LichessUser>,

    /// Present when the player is the Lichess AI
    pub ai_level: Option<u8>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LichessUser {
    pub name: String,
}

impl LichessPlayer {
    fn identifier(&self) -> String {
        match (&self.user, self.ai_level) {
            (Some(user), _) if !user.name.is_empty() => user.name.clone(),
            (_, Some(_)) => "stockfish".to_string(),
            _ => "anonymous".to_string(),
        }
    }
}

impl LichessGame {
    /// Convert into the normalized game representation.
    pub fn into_game(self) -> Game {
        let white = self.players.white.identifier();
        let black = self.players.black.identifier();
        let winner = match self.winner.as_deref() {
            Some("white") => Some(white.clone()),
            Some("black") => Some(black.clone()),
            _ => None,
        };

        Game {
            white,
            black,
            winner,
            outcome: parse_status(&self.status),
            moves: self.moves.split_whitespace().map(str::to_string).collect(),
        }
    }
}

/// Map a Lichess termination status to an [`Outcome`].
pub fn parse_status(status: &str) -> Outcome {
    match status {
        "mate" => Outcome::Checkmate,
        "resign" => Outcome::Resignation,
        "outoftime" | "timeout" => Outcome::Timeout,
        "stalemate" => Outcome::Stalemate,
        "draw" => Outcome::Draw,
        _ => Outcome::Unknown,
    }
}

/// Parse an NDJSON export body. Blank lines are skipped; any malformed line
/// fails the whole body.
pub fn parse_ndjson(body: &str) -> Result<Vec<Game>, SourceError> {
    body.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str::<LichessGame>(line)
                .map(LichessGame::into_game)
                .map_err(|e| SourceError::Malformed {
                    line: i + 1,
                    message: e.to_string(),
                })
        })
        .collect()
}

/// Lichess usernames: 2 to 30 characters of ASCII letters, digits, `_` and `-`.
pub fn is_valid_username(user: &str) -> bool {
    (2..=30).contains(&user.len())
        && user
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

// ── Lichess client implementation ───────────────────────────────────────────

/// Lichess game source.
#[derive(Debug, Clone)]
pub struct LichessClient {
    fetcher: Fetcher,
    base_url: Url,
    max_games: u32,
    rated: bool,
    perf_types: Vec<String>,
}

impl LichessClient {
    /// Create a new Lichess client.
    pub fn new(
        fetcher: Fetcher,
        base_url: Url,
        max_games: u32,
        rated: bool,
        perf_types: Vec<String>,
    ) -> Self {
        Self {
            fetcher,
            base_url,
            max_games,
            rated,
            perf_types,
        }
    }

    pub fn from_config(config: &LichessConfig) -> Result<Self, SourceError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| SourceError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        let fetcher = Fetcher::new(FetcherConfig {
            timeout: std::time::Duration::from_secs(config.timeout_seconds),
            user_agent: config.user_agent.clone(),
            ..FetcherConfig::default()
        })?;

        Ok(Self::new(
            fetcher,
            base_url,
            config.max_games,
            config.rated,
            config.perf_types.clone(),
        ))
    }

    /// Export URL for `user`'s games.
    pub fn games_url(&self, user: &str) -> Result<Url, SourceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SourceError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["api", "games", "user", user]);

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("max", &self.max_games.to_string());
            query.append_pair("rated", if self.rated { "true" } else { "false" });
            if !self.perf_types.is_empty() {
                query.append_pair("perfType", &self.perf_types.join(","));
            }
        }

        Ok(url)
    }
}

#[async_trait]
impl GameSource for LichessClient {
    fn site(&self) -> &str {
        "lichess"
    }

    async fn fetch_games(&self, user: &str) -> Result<Vec<Game>, SourceError> {
        if !is_valid_username(user) {
            return Err(SourceError::InvalidUser(user.to_string()));
        }

        let url = self.games_url(user)?;
        let body = self.fetcher.get_text(&url, NDJSON).await?;
        let games = parse_ndjson(&body)?;

        let unknown = games.iter().filter(|g| !g.outcome.is_known()).count();
        if unknown > 0 {
            warn!(
                "Lichess: {} of {} games for {} have no usable result",
                unknown,
                games.len(),
                user
            );
        }
        info!("Lichess: got {} games for {}", games.len(), user);
        Ok(games)
    }
}
