//! Game model: one normalized game between two players.

use serde::{Deserialize, Serialize};

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Checkmate,
    Resignation,
    Timeout,
    Stalemate,
    Draw,
    /// Unparseable, aborted or still in progress. Ignored by the engine.
    Unknown,
}

impl Outcome {
    /// Whether the game can be used for statistics at all.
    pub fn is_known(self) -> bool {
        self != Outcome::Unknown
    }
}

/// Side of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

/// A single game between two players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    /// Player with the white pieces
    pub white: String,

    /// Player with the black pieces
    pub black: String,

    /// Winning player, `None` for draws and undecided games.
    /// When present it is either `white` or `black`.
    pub winner: Option<String>,

    /// How the game ended
    pub outcome: Outcome,

    /// Plies in play order, e.g. `["e4", "e5", "Nf3"]`
    pub moves: Vec<String>,
}

impl Game {
    pub fn new(
        white: impl Into<String>,
        black: impl Into<String>,
        winner: Option<String>,
        outcome: Outcome,
        moves: Vec<String>,
    ) -> Self {
        Self {
            white: white.into(),
            black: black.into(),
            winner,
            outcome,
            moves,
        }
    }

    /// Number of half-moves played.
    pub fn ply_count(&self) -> usize {
        self.moves.len()
    }

    /// Length of the game in full moves (plies / 2, rounded down).
    pub fn full_moves(&self) -> usize {
        self.ply_count() / 2
    }

    /// The first `plies` half-moves, or `None` if the game is shorter.
    pub fn opening(&self, plies: usize) -> Option<&[String]> {
        self.moves.get(..plies)
    }

    /// Which colour `player` had in this game, if they played in it.
    pub fn color_of(&self, player: &str, ignore_case: bool) -> Option<Color> {
        if same_player(&self.white, player, ignore_case) {
            Some(Color::White)
        } else if same_player(&self.black, player, ignore_case) {
            Some(Color::Black)
        } else {
            None
        }
    }

    /// Whether `player` is the recorded winner.
    pub fn won_by(&self, player: &str, ignore_case: bool) -> bool {
        self.winner
            .as_deref()
            .is_some_and(|w| same_player(w, player, ignore_case))
    }

    /// Whether the game has a winner who is not `player`.
    pub fn lost_by(&self, player: &str, ignore_case: bool) -> bool {
        self.winner
            .as_deref()
            .is_some_and(|w| !same_player(w, player, ignore_case))
    }
}

/// Compare two player identifiers.
pub fn same_player(a: &str, b: &str, ignore_case: bool) -> bool {
    if ignore_case {
        a.eq_ignore_ascii_case(b)
    } else {
        a == b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(moves: &[&str]) -> Game {
        Game::new(
            "Alice",
            "bob",
            Some("Alice".to_string()),
            Outcome::Checkmate,
            moves.iter().map(|m| m.to_string()).collect(),
        )
    }

    #[test]
    fn test_full_moves_rounds_down() {
        assert_eq!(game(&["e4", "e5", "Nf3"]).full_moves(), 1);
        assert_eq!(game(&["e4", "e5", "Nf3", "Nc6"]).full_moves(), 2);
        assert_eq!(game(&[]).full_moves(), 0);
    }

    #[test]
    fn test_opening_short_game() {
        let g = game(&["e4", "e5"]);
        assert!(g.opening(4).is_none());
        assert_eq!(g.opening(2).map(|o| o.len()), Some(2));
    }

    #[test]
    fn test_color_of() {
        let g = game(&[]);
        assert_eq!(g.color_of("Alice", false), Some(Color::White));
        assert_eq!(g.color_of("alice", false), None);
        assert_eq!(g.color_of("alice", true), Some(Color::White));
        assert_eq!(g.color_of("BOB", true), Some(Color::Black));
        assert_eq!(g.color_of("carol", true), None);
    }

    #[test]
    fn test_won_and_lost() {
        let g = game(&[]);
        assert!(g.won_by("Alice", false));
        assert!(!g.lost_by("Alice", false));
        assert!(g.lost_by("bob", false));

        let mut draw = game(&[]);
        draw.winner = None;
        assert!(!draw.won_by("Alice", false));
        assert!(!draw.lost_by("Alice", false));
    }

    #[test]
    fn test_outcome_serde() {
        let json = serde_json::to_string(&Outcome::Resignation).unwrap();
        assert_eq!(json, "\"resignation\"");
        assert!(!Outcome::Unknown.is_known());
    }
}
