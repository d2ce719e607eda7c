//! Page-level flow: scratch screen, then the game
//!
//! Widgets report upward through these methods; none of them touch each
//! other's state.

use crate::deck::{self, CARDS};

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppPhase {
    #[default]
    Scratch,
    Game,
}

/// Controller state shared between the widgets' callbacks
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub phase: AppPhase,
    /// Deck indices in the order they were revealed
    revealed: Vec<usize>,
    /// Character the player is using
    selected: usize,
    /// Last target reported by the game
    target: usize,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A card finished revealing; returns true the first time for each card
    pub fn on_reveal(&mut self, card_id: &str) -> bool {
        let Some(index) = deck::index_of(card_id) else {
            log::warn!("Reveal for unknown card {}", card_id);
            return false;
        };
        if self.revealed.contains(&index) {
            return false;
        }
        self.revealed.push(index);
        log::info!(
            "Card {} revealed ({}/{})",
            card_id,
            self.revealed.len(),
            CARDS.len()
        );
        true
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed.len()
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.contains(&index)
    }

    pub fn all_revealed(&self) -> bool {
        self.revealed.len() == CARDS.len()
    }

    /// Navigation dot `index` lights up once that many cards are revealed
    pub fn dot_active(&self, index: usize) -> bool {
        index < self.revealed.len()
    }

    /// Move to the game; only allowed once every card is revealed
    pub fn start_game(&mut self) -> bool {
        if self.phase != AppPhase::Scratch || !self.all_revealed() {
            return false;
        }
        self.phase = AppPhase::Game;
        log::info!("Starting game");
        true
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Pick a character; out-of-range indices are rejected
    pub fn select(&mut self, index: usize) -> bool {
        if index >= CARDS.len() || index == self.selected {
            return false;
        }
        self.selected = index;
        true
    }

    pub fn target(&self) -> usize {
        self.target
    }

    /// The game changed its target
    pub fn on_target_change(&mut self, index: usize) {
        if index < CARDS.len() {
            self.target = index;
        }
    }

    /// Text for the "collect" badge
    pub fn collect_label(&self) -> &'static str {
        deck::card(self.target).emoji
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reveal_is_idempotent() {
        let mut app = AppState::new();
        assert!(app.on_reveal("card2"));
        assert!(!app.on_reveal("card2"));
        assert!(!app.on_reveal("card9"));
        assert_eq!(app.revealed_count(), 1);
        assert!(app.is_revealed(1));
        assert!(app.dot_active(0));
        assert!(!app.dot_active(1));
    }

    #[test]
    fn test_game_locked_until_all_revealed() {
        let mut app = AppState::new();
        app.on_reveal("card1");
        app.on_reveal("card3");
        assert!(!app.start_game());
        assert_eq!(app.phase, AppPhase::Scratch);

        app.on_reveal("card2");
        assert!(app.all_revealed());
        assert!(app.start_game());
        assert_eq!(app.phase, AppPhase::Game);
        assert!(!app.start_game());
    }

    #[test]
    fn test_select_and_target() {
        let mut app = AppState::new();
        assert_eq!(app.selected(), 0);
        assert!(app.select(2));
        assert!(!app.select(2));
        assert!(!app.select(3));
        assert_eq!(app.selected(), 2);

        app.on_target_change(1);
        assert_eq!(app.collect_label(), "🤯");
        app.on_target_change(7);
        assert_eq!(app.target(), 1);
    }
}
