//! Property tests for the deterministic core

use isliye_manjao::consts::{LANES, MAX_LIVES};
use isliye_manjao::sim::{
    Board, GameState, Lane, Resolution, ScratchState, Step, passes_threshold, resolve, tick,
};
use isliye_manjao::{CARDS, Tuning};
use proptest::prelude::*;

/// One thing a player (or the clock) can do to a running session
#[derive(Debug, Clone)]
enum Action {
    Frame(f64),
    Spawn(usize, usize),
    Move(usize),
    Select(usize),
    Drag(f32),
    Restart,
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        6 => (1.0..40.0f64).prop_map(Action::Frame),
        2 => (0..3usize, 0..3usize).prop_map(|(lane, card)| Action::Spawn(lane, card)),
        2 => (0..3usize).prop_map(Action::Move),
        1 => (0..3usize).prop_map(Action::Select),
        1 => (-200.0..600.0f32).prop_map(Action::Drag),
        1 => Just(Action::Restart),
    ]
}

proptest! {
    #[test]
    fn lane_is_always_valid(x in proptest::num::f32::ANY, width in -10.0..2000.0f32) {
        let board = Board::new(width, 500.0);
        let lane = board.lane_at(x);
        prop_assert!(lane.index() < LANES as usize);
    }

    #[test]
    fn drag_lane_is_always_valid(pointer in -5000.0..5000.0f32, grab in -100.0..100.0f32) {
        let board = Board::new(330.0, 500.0);
        prop_assert!(board.lane_for_drag(pointer, grab).index() < LANES as usize);
    }

    #[test]
    fn reveal_fires_once_iff_past_threshold(
        ratios in proptest::collection::vec(0.0..=1.0f64, 1..20),
        threshold in 0.05..0.95f64,
    ) {
        let mut scratch = ScratchState::new();
        scratch.arm();
        let mut fired = 0;
        for &ratio in &ratios {
            if scratch.check(ratio, threshold) {
                fired += 1;
            }
        }
        let expected = usize::from(ratios.iter().any(|&r| passes_threshold(r, threshold)));
        prop_assert_eq!(fired, expected);
        prop_assert_eq!(scratch.is_revealed(), expected == 1);
    }

    #[test]
    fn resolutions_are_exclusive(
        y in -100.0..700.0f32,
        token_lane in 0..3usize,
        hero_lane in 0..3usize,
        hero_card in 0..3usize,
        token_card in 0..3usize,
        target in 0..3usize,
    ) {
        let board = Board::new(300.0, 500.0);
        let token = board.token_rect(Lane::clamped(token_lane as i64), y);
        let hero = board.hero_rect(Lane::clamped(hero_lane as i64));

        match resolve(&board, &token, &hero, hero_card, token_card, target) {
            Resolution::Score => {
                prop_assert_eq!(token_lane, hero_lane);
                prop_assert!(hero_card == target && token_card == target);
            }
            Resolution::LoseLife => {
                prop_assert_eq!(token_lane, hero_lane);
                prop_assert!(hero_card != target || token_card != target);
            }
            Resolution::Miss => prop_assert!(board.is_below(y)),
            Resolution::None => prop_assert!(!board.is_below(y)),
        }
    }

    #[test]
    fn lives_and_score_stay_in_range(
        seed in any::<u64>(),
        actions in proptest::collection::vec(action(), 1..300),
    ) {
        let board = Board::new(330.0, 520.0);
        let mut state = GameState::new(seed, Tuning::default(), 0, 0.0);
        let mut now = 0.0;
        let mut halted = false;

        for action in actions {
            match action {
                Action::Frame(dt) => {
                    now += dt;
                    halted = tick(&mut state, &board, now) == Step::Halt;
                }
                Action::Spawn(lane, card) => {
                    if !state.is_over() {
                        state.spawn_token_at(Lane::clamped(lane as i64), card);
                    }
                }
                Action::Move(lane) => state.place_hero(Lane::clamped(lane as i64)),
                Action::Select(card) => {
                    state.select_character(card);
                }
                Action::Drag(x) => {
                    state.begin_drag(&board, 140.0);
                    state.drag_to(&board, x);
                    state.end_drag();
                }
                Action::Restart => {
                    if state.restart(now) {
                        halted = false;
                        prop_assert_eq!(state.score, 0);
                        prop_assert_eq!(state.lives(), MAX_LIVES);
                    }
                }
            }

            prop_assert!(state.lives() <= MAX_LIVES);
            prop_assert!(state.target() < CARDS.len());
            prop_assert!(state.hero.card < CARDS.len());
            prop_assert!(state.hero.lane.index() < LANES as usize);
            if halted {
                prop_assert!(state.is_over());
                prop_assert!(state.tokens.is_empty());
            }
        }
    }
}
