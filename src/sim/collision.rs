//! Token/hero contact and its resolution
//!
//! A token only counts while its bottom edge is crossing the hero's top edge,
//! so a token that has already fallen past the hero can't be counted twice.

use super::geometry::{Board, Rect};

/// What happens to a token this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Still falling
    None,
    /// Caught the target with the right character: +1 score, token pops
    Score,
    /// Any other contact: -1 life, token removed immediately
    LoseLife,
    /// Left the board without touching the hero: removed, no penalty
    Miss,
}

/// Whether `token` is landing on `hero` from above
pub fn landing_on(token: &Rect, hero: &Rect) -> bool {
    let from_above = token.bottom() >= hero.top() && token.top() < hero.top();
    from_above && token.overlaps_x(hero)
}

/// Resolve a token after it has advanced this frame
///
/// `hero_card`, `token_card` and `target_card` are deck indices. Exactly one
/// outcome applies per token per frame.
pub fn resolve(
    board: &Board,
    token: &Rect,
    hero: &Rect,
    hero_card: usize,
    token_card: usize,
    target_card: usize,
) -> Resolution {
    if landing_on(token, hero) {
        if hero_card == target_card && token_card == target_card {
            Resolution::Score
        } else {
            Resolution::LoseLife
        }
    } else if board.is_below(token.top()) {
        Resolution::Miss
    } else {
        Resolution::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geometry::Lane;

    fn board() -> Board {
        Board::new(300.0, 500.0)
    }

    #[test]
    fn test_landing_window() {
        let board = board();
        let hero = board.hero_rect(Lane::MIDDLE); // top = 404
        // Bottom just short of the hero
        assert!(!landing_on(&board.token_rect(Lane::MIDDLE, 361.0), &hero));
        // Bottom touching the hero top
        assert!(landing_on(&board.token_rect(Lane::MIDDLE, 362.0), &hero));
        // Top still above the hero top
        assert!(landing_on(&board.token_rect(Lane::MIDDLE, 403.9), &hero));
        // Already passed
        assert!(!landing_on(&board.token_rect(Lane::MIDDLE, 404.0), &hero));
    }

    #[test]
    fn test_other_lane_never_lands() {
        let board = board();
        let hero = board.hero_rect(Lane::LEFT);
        assert!(!landing_on(&board.token_rect(Lane::RIGHT, 380.0), &hero));
    }

    #[test]
    fn test_resolution_branches() {
        let board = board();
        let hero = board.hero_rect(Lane::MIDDLE);
        let landing = board.token_rect(Lane::MIDDLE, 380.0);

        assert_eq!(resolve(&board, &landing, &hero, 0, 0, 0), Resolution::Score);
        // Wrong token
        assert_eq!(resolve(&board, &landing, &hero, 0, 2, 0), Resolution::LoseLife);
        // Wrong character, right token
        assert_eq!(resolve(&board, &landing, &hero, 1, 0, 0), Resolution::LoseLife);
        // Neither matches the target
        assert_eq!(resolve(&board, &landing, &hero, 1, 1, 0), Resolution::LoseLife);
    }

    #[test]
    fn test_miss_and_falling() {
        let board = board();
        let hero = board.hero_rect(Lane::LEFT);
        let falling = board.token_rect(Lane::RIGHT, 100.0);
        assert_eq!(resolve(&board, &falling, &hero, 0, 0, 0), Resolution::None);

        let edge = board.token_rect(Lane::RIGHT, 550.0);
        assert_eq!(resolve(&board, &edge, &hero, 0, 0, 0), Resolution::None);

        let gone = board.token_rect(Lane::RIGHT, 550.5);
        assert_eq!(resolve(&board, &gone, &hero, 0, 0, 0), Resolution::Miss);
    }
}
