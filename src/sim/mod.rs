//! Deterministic logic module
//!
//! Everything the widgets decide lives here. This module must stay pure:
//! - No DOM, canvas or clock access (time is passed in)
//! - Seeded RNG only
//! - Tokens processed in spawn order

pub mod app;
pub mod collision;
pub mod geometry;
pub mod scratch;
pub mod state;
pub mod tick;

pub use app::{AppPhase, AppState};
pub use collision::{Resolution, landing_on, resolve};
pub use geometry::{Board, Lane, Rect};
pub use scratch::{ScratchState, coverage_ratio, passes_threshold};
pub use state::{Drag, GameEvent, GamePhase, GameState, Hero, PoppingToken, Token};
pub use tick::{Step, tick};
