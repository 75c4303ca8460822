//! Profile computation engine.
//!
//! Derives a [`Profile`] from a player's games:
//! - Favourite openings per colour (raw move prefixes)
//! - Mate/win and resign/loss ratios
//! - Game length percentiles
//!
//! The engine is pure: no I/O, no state between calls, and the caller's games
//! are never reordered.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::{Color, Game, Outcome, Profile};

/// Engine configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Opening length in full moves (2 means the first 4 plies)
    #[serde(default = "default_opening_moves")]
    pub opening_moves: usize,

    /// How many openings to report per colour
    #[serde(default = "default_top_openings")]
    pub top_openings: usize,

    /// Duration percentiles to report, each in 1..=100
    #[serde(default = "default_percentiles")]
    pub percentiles: Vec<u32>,

    /// Match the subject against player names ignoring ASCII case.
    /// Off by default: identifiers are compared exactly.
    #[serde(default = "default_ignore_user_case")]
    pub ignore_user_case: bool,
}

fn default_opening_moves() -> usize {
    2
}

fn default_top_openings() -> usize {
    3
}

fn default_percentiles() -> Vec<u32> {
    vec![50, 75, 90]
}

fn default_ignore_user_case() -> bool {
    false
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            opening_moves: default_opening_moves(),
            top_openings: default_top_openings(),
            percentiles: default_percentiles(),
            ignore_user_case: default_ignore_user_case(),
        }
    }
}

impl EngineConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.opening_moves == 0 {
            return Err(EngineError::InvalidConfig(
                "opening_moves must be greater than 0".to_string(),
            ));
        }

        if self.opening_moves > usize::MAX / 2 {
            return Err(EngineError::InvalidConfig(format!(
                "opening_moves must be at most {}",
                usize::MAX / 2
            )));
        }

        if let Some(p) = self.percentiles.iter().find(|p| !(1..=100).contains(*p)) {
            return Err(EngineError::InvalidConfig(format!(
                "percentile {} is outside 1..=100",
                p
            )));
        }

        Ok(())
    }

    /// Number of plies making up an opening.
    pub fn opening_plies(&self) -> usize {
        self.opening_moves.saturating_mul(2)
    }
}

/// Computes profiles with a fixed, validated configuration.
#[derive(Debug, Clone, Default)]
pub struct ProfileEngine {
    config: EngineConfig,
}

impl ProfileEngine {
    /// Create an engine, rejecting invalid configuration up front.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compute the profile of `user` from their games.
    pub fn compute(&self, user: &str, games: &[Game]) -> Profile {
        let legit = legit_games(games);
        let ignore_case = self.config.ignore_user_case;
        let plies = self.config.opening_plies();

        let openings_white =
            top_openings(&legit, user, Color::White, plies, self.config.top_openings, ignore_case);
        let openings_black =
            top_openings(&legit, user, Color::Black, plies, self.config.top_openings, ignore_case);

        let mate_win_ratio = ratio(
            &legit,
            |g| g.won_by(user, ignore_case) && g.outcome == Outcome::Checkmate,
            |g| g.won_by(user, ignore_case),
        );
        let resign_loss_ratio = ratio(
            &legit,
            |g| g.lost_by(user, ignore_case) && g.outcome == Outcome::Resignation,
            |g| g.lost_by(user, ignore_case),
        );

        let duration_percentiles = duration_percentiles(&legit, &self.config.percentiles);

        debug!(
            user,
            total = games.len(),
            analyzed = legit.len(),
            "Computed profile"
        );

        Profile {
            user: user.to_string(),
            openings_white,
            openings_black,
            mate_win_ratio,
            resign_loss_ratio,
            duration_percentiles,
            games_analyzed: legit.len(),
        }
    }
}

/// Validate `config` and compute a profile in one step.
pub fn compute_profile(
    user: &str,
    games: &[Game],
    config: &EngineConfig,
) -> Result<Profile, EngineError> {
    Ok(ProfileEngine::new(config.clone())?.compute(user, games))
}

/// Games with a known outcome.
pub fn legit_games(games: &[Game]) -> Vec<&Game> {
    games.iter().filter(|g| g.outcome.is_known()).collect()
}

/// Most frequent openings played by `user` with `color`, in display form.
///
/// Ties keep the order in which the openings were first seen. Games shorter
/// than `plies` are skipped.
pub fn top_openings(
    games: &[&Game],
    user: &str,
    color: Color,
    plies: usize,
    count: usize,
    ignore_case: bool,
) -> Vec<String> {
    // Ply slices compare element-wise, so no separator is needed for the key.
    let mut counts: HashMap<&[String], usize> = HashMap::new();
    let mut first_seen: Vec<&[String]> = Vec::new();

    for &game in games {
        if game.color_of(user, ignore_case) != Some(color) {
            continue;
        }
        let Some(opening) = game.opening(plies) else {
            continue;
        };
        let seen = counts.entry(opening).or_insert(0);
        if *seen == 0 {
            first_seen.push(opening);
        }
        *seen += 1;
    }

    // Stable sort: equal counts stay in first-seen order.
    first_seen.sort_by_key(|opening| std::cmp::Reverse(counts[opening]));

    first_seen
        .into_iter()
        .take(count)
        .map(|opening| opening.join(" "))
        .collect()
}

/// Share of `denominator` games that also satisfy `numerator`.
/// `None` when no game satisfies `denominator`.
pub fn ratio<N, D>(games: &[&Game], numerator: N, denominator: D) -> Option<f64>
where
    N: Fn(&Game) -> bool,
    D: Fn(&Game) -> bool,
{
    let (num, den) = games
        .iter()
        .copied()
        .filter(|&g| denominator(g))
        .fold((0u32, 0u32), |(num, den), g| {
            (num + u32::from(numerator(g)), den + 1)
        });

    if den == 0 {
        None
    } else {
        Some(num as f64 / den as f64)
    }
}

/// Nearest-rank 0-based index for `percentile` among `n` sorted values.
///
/// The rank is `round(percentile / 100 * n)` with halves rounded up, taken as
/// 1-based and clamped into the slice. Returns `None` for `n == 0`.
pub fn nearest_rank_index(percentile: u32, n: usize) -> Option<usize> {
    if n == 0 {
        return None;
    }
    let rank = (percentile as usize * n + 50) / 100;
    Some(rank.saturating_sub(1).min(n - 1))
}

/// Game length in full moves at each requested percentile.
pub fn duration_percentiles(games: &[&Game], percentiles: &[u32]) -> BTreeMap<u32, u32> {
    let mut by_length: Vec<&Game> = games.to_vec();
    by_length.sort_by_key(|g| g.ply_count());

    percentiles
        .iter()
        .filter_map(|&p| {
            let index = nearest_rank_index(p, by_length.len())?;
            Some((p, by_length[index].full_moves() as u32))
        })
        .collect()
}
