//! Isliye Manjao entry point
//!
//! On the web this mounts the page. Natively it plays headless sessions with
//! an auto-pilot and prints how they went.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
    log::info!("Isliye Manjao starting...");

    if let Err(e) = isliye_manjao::ui::start() {
        log::error!("Failed to mount page: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use isliye_manjao::{Pace, Tuning, platform};

    env_logger::init();
    log::info!("Isliye Manjao (native) starting...");
    log::info!("Native mode runs headless sessions - run with `trunk serve` for the web version");

    let seed = platform::seed();
    for tuning in [Tuning::load(), Tuning::from_preset(Pace::Frantic)] {
        let pace = tuning.pace;
        let report = autoplay::run(tuning, seed, autoplay::FRAMES);
        println!(
            "{:>7} pace: score {}, lives {}, {} frames{}",
            pace.as_str(),
            report.score,
            report.lives,
            report.frames,
            if report.over { " (game over)" } else { "" }
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless sessions driven by a simple auto-pilot
#[cfg(not(target_arch = "wasm32"))]
mod autoplay {
    use isliye_manjao::Tuning;
    use isliye_manjao::sim::{Board, GameState, Lane, Step, tick};

    /// 60 Hz clock
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Two minutes of play
    pub const FRAMES: u64 = 60 * 120;
    /// Frames between character checks, so target changes cost something
    const SWITCH_EVERY: u64 = 90;
    /// Tokens closer than this to the hero count as incoming (px)
    const LOOKAHEAD: f32 = 220.0;

    pub struct Report {
        pub score: u32,
        pub lives: u8,
        pub frames: u64,
        pub over: bool,
    }

    pub fn run(tuning: Tuning, seed: u64, frames: u64) -> Report {
        let board = Board::new(360.0, 520.0);
        let mut state = GameState::new(seed, tuning, 0, 0.0);
        let mut now = 0.0;
        let mut played = 0;

        for _ in 0..frames {
            now += FRAME_MS;
            played += 1;
            steer(&mut state, &board);
            let step = tick(&mut state, &board, now);
            for event in state.drain_events() {
                log::debug!("{:?}", event);
            }
            if step == Step::Halt {
                break;
            }
        }

        Report {
            score: state.score,
            lives: state.lives(),
            frames: played,
            over: state.is_over(),
        }
    }

    /// Catch the lowest incoming target when wearing the right face, dodge everything else
    fn steer(state: &mut GameState, board: &Board) {
        if state.frames % SWITCH_EVERY == 0 {
            state.select_character(state.target());
        }

        let hero_top = board.hero_top();
        let target = state.target();
        let matched = state.hero.card == target;
        let incoming = |lane: Lane| {
            state
                .tokens
                .iter()
                .any(|t| t.lane == lane && t.y < hero_top && t.y > hero_top - LOOKAHEAD)
        };

        let lowest = state
            .tokens
            .iter()
            .filter(|t| t.y < hero_top)
            .max_by(|a, b| a.y.total_cmp(&b.y))
            .copied();

        let lane = match lowest {
            Some(token) if matched && token.card == target => Some(token.lane),
            _ if incoming(state.hero.lane) => Lane::all().find(|lane| !incoming(*lane)),
            _ => None,
        };
        if let Some(lane) = lane {
            state.place_hero(lane);
        }
    }
}
