//! # Chess Profile
//!
//! Builds a statistical profile of a chess player from their online games.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (games, profiles)
//! - **calculate**: Profile computation engine
//! - **sources**: Game sources (Lichess) and the site registry
//! - **fetch**: HTTP fetching
//! - **render**: HTML rendering of profiles
//! - **dispatch**: Site + user -> source -> engine wiring
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod dispatch;
pub mod fetch;
pub mod models;
pub mod render;
pub mod sources;

pub use calculate::{compute_profile, EngineConfig, EngineError, ProfileEngine};
pub use models::*;
