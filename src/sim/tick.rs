//! Per-frame game step
//!
//! Tokens fall a fixed distance per frame (not per second), so the game runs
//! at whatever pace the display refreshes. Order within a frame:
//! game-over check, pop expiry, target rotation, spawn, then each live
//! token in spawn order: advance, collide, miss.

use super::collision::{Resolution, resolve};
use super::geometry::Board;
use super::state::{GameEvent, GamePhase, GameState, PoppingToken};

/// Whether the frame loop should be re-armed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Halt,
}

/// Advance the session by one animation frame
///
/// `board` is the play area as measured this frame and `now_ms` the frame
/// timestamp.
pub fn tick(state: &mut GameState, board: &Board, now_ms: f64) -> Step {
    if state.phase == GamePhase::GameOver {
        return Step::Halt;
    }
    if state.lives() == 0 {
        state.finish();
        return Step::Halt;
    }

    state.frames += 1;

    // Finish pops whose delay has run out
    let mut finished = Vec::new();
    state.popping.retain(|p| {
        let done = now_ms >= p.remove_at_ms;
        if done {
            finished.push(p.token.id);
        }
        !done
    });
    for id in finished {
        state.push_event(GameEvent::PopFinished { id });
    }

    if now_ms >= state.next_target_ms {
        state.rotate_target(now_ms);
        state.next_target_ms = now_ms + state.tuning.target_interval_ms;
        log::debug!("Target is now card {}", state.target());
    }

    if now_ms - state.last_spawn_ms > state.tuning.spawn_interval_ms {
        let token = state.spawn_token();
        state.last_spawn_ms = now_ms;
        log::debug!("Spawned token {} in lane {}", token.id, token.lane.index());
    }

    let hero_rect = board.hero_rect(state.hero.lane);
    let hero_card = state.hero.card;
    let target = state.target();
    let speed = state.tuning.token_speed;

    let mut i = 0;
    while i < state.tokens.len() {
        state.tokens[i].y += speed;
        let token = state.tokens[i];
        let rect = board.token_rect(token.lane, token.y);

        match resolve(board, &rect, &hero_rect, hero_card, token.card, target) {
            Resolution::None => {
                i += 1;
            }
            Resolution::Score => {
                state.tokens.remove(i);
                state.score += 1;
                state.popping.push(PoppingToken {
                    token,
                    remove_at_ms: now_ms + state.tuning.pop_delay_ms,
                });
                log::debug!("Caught token {} (score {})", token.id, state.score);
                state.push_event(GameEvent::Scored { id: token.id });
            }
            Resolution::LoseLife => {
                state.tokens.remove(i);
                state.lose_life();
                log::debug!("Token {} cost a life ({} left)", token.id, state.lives());
                state.push_event(GameEvent::LifeLost { id: token.id });
            }
            Resolution::Miss => {
                state.tokens.remove(i);
                state.push_event(GameEvent::Missed { id: token.id });
            }
        }
    }

    Step::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::TOKEN_SPAWN_Y;
    use crate::sim::geometry::Lane;
    use crate::tuning::Tuning;

    fn board() -> Board {
        Board::new(300.0, 500.0)
    }

    /// Tuning with no random spawns or target changes
    fn quiet() -> Tuning {
        Tuning {
            spawn_interval_ms: f64::MAX,
            target_interval_ms: f64::MAX,
            ..Tuning::default()
        }
    }

    /// Session with the fireworks character and fireworks target
    fn matched_state_with(tuning: Tuning) -> GameState {
        let mut state = GameState::new(42, tuning, 0, 0.0);
        state.set_target(0, 0.0);
        state.drain_events();
        state
    }

    fn matched_state() -> GameState {
        matched_state_with(quiet())
    }

    /// Tick until the live token count changes; returns the last frame time
    fn run_until_resolved(state: &mut GameState, board: &Board, mut now: f64) -> f64 {
        let before = state.tokens.len();
        while state.tokens.len() == before {
            now += 16.0;
            assert_eq!(tick(state, board, now), Step::Continue);
        }
        now
    }

    #[test]
    fn test_no_spawn_before_interval() {
        let mut state = matched_state_with(Tuning::default());
        tick(&mut state, &board(), 2500.0);
        assert!(state.tokens.is_empty());
        tick(&mut state, &board(), 2500.1);
        assert_eq!(state.tokens.len(), 1);
        // Spawned and advanced in the same frame
        assert!((state.tokens[0].y - (TOKEN_SPAWN_Y + 0.7)).abs() < 1e-4);
    }

    #[test]
    fn test_catching_target_scores() {
        let board = board();
        let mut state = matched_state();
        state.spawn_token_at(Lane::MIDDLE, 0);
        let now = run_until_resolved(&mut state, &board, 0.0);

        assert_eq!(state.score, 1);
        assert_eq!(state.lives(), 10);
        assert_eq!(state.popping.len(), 1);
        let events = state.drain_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::Scored { .. })));

        // Still popping before the delay, gone after
        tick(&mut state, &board, now + 100.0);
        assert_eq!(state.popping.len(), 1);
        tick(&mut state, &board, now + 200.0);
        assert!(state.popping.is_empty());
        assert!(
            state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::PopFinished { .. }))
        );
    }

    #[test]
    fn test_wrong_emoji_costs_life() {
        let board = board();
        let mut state = matched_state();
        state.spawn_token_at(Lane::MIDDLE, 2);
        run_until_resolved(&mut state, &board, 0.0);

        assert_eq!(state.score, 0);
        assert_eq!(state.lives(), 9);
        assert!(state.popping.is_empty());
    }

    #[test]
    fn test_wrong_character_costs_life() {
        let board = board();
        let mut state = matched_state();
        state.select_character(1);
        state.spawn_token_at(Lane::MIDDLE, 0);
        run_until_resolved(&mut state, &board, 0.0);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives(), 9);
    }

    #[test]
    fn test_miss_is_free() {
        let board = board();
        let mut state = matched_state();
        state.spawn_token_at(Lane::LEFT, 2);
        run_until_resolved(&mut state, &board, 0.0);
        assert_eq!(state.lives(), 10);
        assert!(
            state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::Missed { .. }))
        );
    }

    #[test]
    fn test_last_life_ends_game_next_frame() {
        let board = board();
        let mut state = matched_state();
        for _ in 0..9 {
            state.lose_life();
        }
        state.spawn_token_at(Lane::MIDDLE, 1);
        let now = run_until_resolved(&mut state, &board, 0.0);
        assert_eq!(state.lives(), 0);
        assert_eq!(state.phase, GamePhase::Playing);

        assert_eq!(tick(&mut state, &board, now + 16.0), Step::Halt);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(
            state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::GameOver { score: 0 }))
        );
        // Stays halted
        assert_eq!(tick(&mut state, &board, now + 5000.0), Step::Halt);
        assert!(state.tokens.is_empty());
    }

    #[test]
    fn test_restart_resumes_spawning() {
        let board = board();
        let mut state = matched_state_with(Tuning::default());
        for _ in 0..10 {
            state.lose_life();
        }
        tick(&mut state, &board, 16.0);
        assert!(state.is_over());

        assert!(state.restart(10_000.0));
        assert_eq!(state.lives(), 10);
        assert_eq!(state.score, 0);
        assert_eq!(tick(&mut state, &board, 12_600.0), Step::Continue);
        assert_eq!(state.tokens.len(), 1);
    }

    #[test]
    fn test_target_rotates_on_schedule() {
        let board = board();
        let mut state = matched_state_with(Tuning::default());
        tick(&mut state, &board, 14_999.0);
        assert_eq!(state.target(), 0);
        tick(&mut state, &board, 15_000.0);
        assert_ne!(state.target(), 0);
        assert!(state.flash_visible(15_500.0));
        assert!(!state.flash_visible(16_200.0));
        assert_eq!(state.next_target_ms, 30_000.0);
    }

    #[test]
    fn test_same_frame_removals() {
        let board = board();
        let mut state = matched_state();
        // Two landing tokens and one survivor, processed in one frame
        state.spawn_token_at(Lane::MIDDLE, 0);
        state.spawn_token_at(Lane::MIDDLE, 1);
        let survivor = state.spawn_token_at(Lane::RIGHT, 2).id;
        for t in state.tokens.iter_mut().take(2) {
            t.y = 370.0;
        }
        tick(&mut state, &board, 16.0);
        assert_eq!(state.score, 1);
        assert_eq!(state.lives(), 9);
        assert_eq!(state.tokens.len(), 1);
        assert_eq!(state.tokens[0].id, survivor);
    }

    #[test]
    fn test_determinism() {
        let board = board();
        let mut a = GameState::new(99999, Tuning::default(), 0, 0.0);
        let mut b = GameState::new(99999, Tuning::default(), 0, 0.0);
        let mut now = 0.0;
        for _ in 0..2000 {
            now += 16.0;
            tick(&mut a, &board, now);
            tick(&mut b, &board, now);
        }
        assert_eq!(a.tokens, b.tokens);
        assert_eq!(a.score, b.score);
        assert_eq!(a.lives(), b.lives());
        assert_eq!(a.target(), b.target());
    }
}
