//! Game state and core simulation types
//!
//! The session owns every live token; the renderer only ever sees ids and
//! copies, never references into the model.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::geometry::{Board, Lane};
use crate::consts::*;
use crate::deck::CARDS;
use crate::tuning::Tuning;

/// Current phase of the mini-game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Run ended; only an explicit restart leaves this phase
    GameOver,
}

/// A falling emoji
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token {
    pub id: u32,
    pub lane: Lane,
    /// Deck index of the emoji this token carries
    pub card: usize,
    /// Top edge, board-local
    pub y: f32,
}

/// A caught token playing its pop animation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoppingToken {
    pub token: Token,
    /// Clock time after which the element is removed
    pub remove_at_ms: f64,
}

/// The player's avatar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Hero {
    pub lane: Lane,
    /// Deck index of the selected character
    pub card: usize,
}

/// Something the renderer (or the controller) needs to react to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// New token entered the board
    Spawned { id: u32 },
    /// Token caught: starts popping
    Scored { id: u32 },
    /// Wrong catch: token removed, life lost
    LifeLost { id: u32 },
    /// Token fell off the board
    Missed { id: u32 },
    /// Pop animation finished
    PopFinished { id: u32 },
    /// Target emoji changed (also sent for the initial target)
    TargetChanged { card: usize },
    /// Hero moved lanes
    HeroMoved { lane: Lane },
    /// Hero re-skinned
    HeroChanged { card: usize },
    /// Lives hit zero; the loop must stop
    GameOver { score: u32 },
    /// Fresh run after game over
    Restarted,
}

/// In-progress avatar drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drag {
    /// Pointer position inside the hero box when the drag started
    pub grab_offset: f32,
}

/// One mini-game session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub tuning: Tuning,
    pub score: u32,
    lives: u8,
    /// Deck index of the emoji to collect
    target: usize,
    pub phase: GamePhase,
    pub hero: Hero,
    pub drag: Option<Drag>,
    /// Live tokens in spawn order
    pub tokens: Vec<Token>,
    pub popping: Vec<PoppingToken>,
    pub last_spawn_ms: f64,
    pub next_target_ms: f64,
    pub flash_until_ms: f64,
    /// Frames advanced since the session started
    pub frames: u64,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Start a session at clock time `now_ms` with `hero_card` selected
    pub fn new(seed: u64, tuning: Tuning, hero_card: usize, now_ms: f64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let target = rng.random_range(0..CARDS.len());
        let lives = tuning.start_lives.min(MAX_LIVES);
        let mut state = Self {
            seed,
            rng,
            score: 0,
            lives,
            target,
            phase: GamePhase::Playing,
            hero: Hero {
                lane: Lane::MIDDLE,
                card: if hero_card < CARDS.len() { hero_card } else { 0 },
            },
            drag: None,
            tokens: Vec::new(),
            popping: Vec::new(),
            last_spawn_ms: now_ms,
            next_target_ms: now_ms + tuning.target_interval_ms,
            flash_until_ms: now_ms + tuning.flash_ms,
            frames: 0,
            tuning,
            events: Vec::new(),
            next_id: 1,
        };
        state.events.push(GameEvent::TargetChanged { card: target });
        state
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    /// Deck index of the current target
    pub fn target(&self) -> usize {
        self.target
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Whether the "collect" flash is showing at `now_ms`
    pub fn flash_visible(&self, now_ms: f64) -> bool {
        now_ms < self.flash_until_ms
    }

    /// Take all events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Allocate a new token ID
    fn next_token_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Drop a token above the board in a random lane with a random emoji
    pub fn spawn_token(&mut self) -> Token {
        let lane = Lane::clamped(self.rng.random_range(0..LANES) as i64);
        let card = self.rng.random_range(0..CARDS.len());
        self.spawn_token_at(lane, card)
    }

    /// Drop a specific token above the board
    pub fn spawn_token_at(&mut self, lane: Lane, card: usize) -> Token {
        let token = Token {
            id: self.next_token_id(),
            lane,
            card: card.min(CARDS.len() - 1),
            y: TOKEN_SPAWN_Y,
        };
        self.tokens.push(token);
        self.events.push(GameEvent::Spawned { id: token.id });
        token
    }

    /// Switch to a uniformly random different target
    pub fn rotate_target(&mut self, now_ms: f64) {
        let others = CARDS.len() - 1;
        let step = 1 + self.rng.random_range(0..others);
        self.set_target((self.target + step) % CARDS.len(), now_ms);
    }

    /// Force the target (announces it with a flash)
    pub fn set_target(&mut self, card: usize, now_ms: f64) {
        if card >= CARDS.len() {
            return;
        }
        self.target = card;
        self.flash_until_ms = now_ms + self.tuning.flash_ms;
        self.events.push(GameEvent::TargetChanged { card });
    }

    /// Lose one life, never going below zero
    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
    }

    /// Re-skin the hero; score, lives and lane are untouched
    pub fn select_character(&mut self, card: usize) -> bool {
        if card >= CARDS.len() || card == self.hero.card {
            return false;
        }
        self.hero.card = card;
        self.events.push(GameEvent::HeroChanged { card });
        true
    }

    /// Put the hero in `lane`
    pub fn place_hero(&mut self, lane: Lane) {
        if self.hero.lane != lane {
            self.hero.lane = lane;
            self.events.push(GameEvent::HeroMoved { lane });
        }
    }

    /// Pointer went down on the hero at board-local `pointer_x`
    pub fn begin_drag(&mut self, board: &Board, pointer_x: f32) {
        if self.is_over() {
            return;
        }
        let hero = board.hero_rect(self.hero.lane);
        self.drag = Some(Drag {
            grab_offset: pointer_x - hero.left(),
        });
    }

    /// Pointer moved; snaps the hero to the lane under its center
    ///
    /// Returns the lane if the hero is being dragged.
    pub fn drag_to(&mut self, board: &Board, pointer_x: f32) -> Option<Lane> {
        let drag = self.drag?;
        let lane = board.lane_for_drag(pointer_x, drag.grab_offset);
        self.place_hero(lane);
        Some(lane)
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// End the run: stop everything and clear the board
    pub(crate) fn finish(&mut self) {
        if self.is_over() {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.drag = None;
        self.tokens.clear();
        self.popping.clear();
        log::info!("Game over with score {}", self.score);
        self.events.push(GameEvent::GameOver { score: self.score });
    }

    /// Restart after game over with full lives and zero score
    ///
    /// The target and its rotation schedule carry over.
    pub fn restart(&mut self, now_ms: f64) -> bool {
        if !self.is_over() {
            return false;
        }
        self.score = 0;
        self.lives = self.tuning.start_lives.min(MAX_LIVES);
        self.phase = GamePhase::Playing;
        self.tokens.clear();
        self.popping.clear();
        self.hero.lane = Lane::MIDDLE;
        self.last_spawn_ms = now_ms;
        self.frames = 0;
        log::info!("Game restarted with {} lives", self.lives);
        self.events.push(GameEvent::Restarted);
        true
    }
}
