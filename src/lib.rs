//! Isliye Manjao - scratch-off photo cards and a falling-emoji catch game
//!
//! Core modules:
//! - `sim`: Deterministic logic (scratch coverage, lane geometry, game session, app flow)
//! - `ui`: DOM/canvas widgets for the browser (wasm32 only)
//! - `platform`: Browser/native platform abstraction
//! - `deck`: The static photo cards
//! - `tuning`: Data-driven game balance

pub mod deck;
pub mod error;
pub mod platform;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod ui;

pub use deck::{CARDS, Card};
pub use error::Error;
pub use tuning::{Pace, Tuning};

/// Layout and gameplay constants
pub mod consts {
    /// Number of lanes in the play area
    pub const LANES: u8 = 3;

    /// Scratch brush radius (px)
    pub const BRUSH_RADIUS: f64 = 26.0;
    /// Alpha sampling stride in both axes (px)
    pub const SAMPLE_STEP: u32 = 6;
    /// Fraction of sampled pixels that must be clear before a card reveals
    pub const REVEAL_THRESHOLD: f64 = 0.4;
    /// Overlay height relative to width when the photo has no layout yet
    pub const FALLBACK_ASPECT: f64 = 0.7;

    /// Hero avatar box (px)
    pub const HERO_SIZE: f32 = 80.0;
    /// Gap between the hero's bottom edge and the board bottom (px)
    pub const HERO_BOTTOM_GAP: f32 = 16.0;
    /// Falling token box (px)
    pub const TOKEN_SIZE: f32 = 42.0;
    /// Vertical position a token spawns at (above the visible board)
    pub const TOKEN_SPAWN_Y: f32 = -40.0;
    /// Distance below the board bottom after which a token counts as missed
    pub const MISS_MARGIN: f32 = 50.0;

    /// Lives at the start of a run and the upper clamp
    pub const MAX_LIVES: u8 = 10;
}
