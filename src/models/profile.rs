//! Profile model: statistical summary of a player's games.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Derived statistics for a single player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Subject of the profile
    pub user: String,

    /// Most frequent openings played as White, most frequent first
    pub openings_white: Vec<String>,

    /// Most frequent openings played as Black, most frequent first
    pub openings_black: Vec<String>,

    /// Wins by checkmate / all wins. `None` without any wins.
    pub mate_win_ratio: Option<f64>,

    /// Losses by resignation / all losses. `None` without any losses.
    pub resign_loss_ratio: Option<f64>,

    /// Percentile -> game length in full moves. Empty without any games.
    pub duration_percentiles: BTreeMap<u32, u32>,

    /// Number of games the statistics were derived from
    pub games_analyzed: usize,
}

impl Profile {
    /// A profile with no data, e.g. for a player without finished games.
    pub fn empty(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            openings_white: Vec::new(),
            openings_black: Vec::new(),
            mate_win_ratio: None,
            resign_loss_ratio: None,
            duration_percentiles: BTreeMap::new(),
            games_analyzed: 0,
        }
    }
}
