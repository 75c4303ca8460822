//! Core data models.

mod game;
mod profile;

pub use game::*;
pub use profile::*;
