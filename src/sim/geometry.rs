//! Board geometry: lanes and axis-aligned boxes
//!
//! All positions are board-local CSS pixels with y growing downward. The
//! board is measured by the caller every frame, so nothing here caches a
//! width.

use glam::Vec2;

use crate::consts::*;

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.min.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.min.y + self.size.y
    }

    /// Open-interval overlap on the x axis (touching edges don't count)
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        self.left() < other.right() && self.right() > other.left()
    }
}

/// One of the three columns of the play area
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Lane(u8);

impl Lane {
    pub const LEFT: Lane = Lane(0);
    pub const MIDDLE: Lane = Lane(1);
    pub const RIGHT: Lane = Lane(2);

    /// Lane for any integer column, clamped to the board
    pub fn clamped(column: i64) -> Self {
        Lane(column.clamp(0, LANES as i64 - 1) as u8)
    }

    /// Lane for an in-range index
    pub fn from_index(index: usize) -> Option<Self> {
        (index < LANES as usize).then_some(Lane(index as u8))
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn all() -> impl Iterator<Item = Lane> {
        (0..LANES).map(Lane)
    }
}

impl Default for Lane {
    fn default() -> Self {
        Lane::MIDDLE
    }
}

/// Measured play area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Board {
    pub width: f32,
    pub height: f32,
}

impl Board {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn lane_width(&self) -> f32 {
        self.width / LANES as f32
    }

    /// Horizontal center of a lane
    pub fn lane_center(&self, lane: Lane) -> f32 {
        self.lane_width() * (lane.index() as f32 + 0.5)
    }

    /// Lane containing board-local `x`, clamped to the outer lanes
    ///
    /// A board with no measurable width snaps everything to the middle lane.
    pub fn lane_at(&self, x: f32) -> Lane {
        let lane_width = self.lane_width();
        if !(lane_width > 0.0) {
            return Lane::MIDDLE;
        }
        let column = (x / lane_width).floor();
        if column.is_nan() {
            return Lane::MIDDLE;
        }
        // Saturating cast handles +/- infinity
        Lane::clamped(column as i64)
    }

    /// Lane for a dragged hero
    ///
    /// `pointer_x` is board-local and `grab_offset` is where inside the hero
    /// box the drag started; the hero's center decides the lane.
    pub fn lane_for_drag(&self, pointer_x: f32, grab_offset: f32) -> Lane {
        self.lane_at(pointer_x - grab_offset + HERO_SIZE / 2.0)
    }

    /// Hero box when standing in `lane`
    pub fn hero_rect(&self, lane: Lane) -> Rect {
        Rect::new(
            self.lane_center(lane) - HERO_SIZE / 2.0,
            self.hero_top(),
            HERO_SIZE,
            HERO_SIZE,
        )
    }

    /// Top edge of the hero (fixed row near the board bottom)
    pub fn hero_top(&self) -> f32 {
        self.height - HERO_BOTTOM_GAP - HERO_SIZE
    }

    /// Token box for a token in `lane` at vertical position `y`
    pub fn token_rect(&self, lane: Lane, y: f32) -> Rect {
        Rect::new(
            self.lane_center(lane) - TOKEN_SIZE / 2.0,
            y,
            TOKEN_SIZE,
            TOKEN_SIZE,
        )
    }

    /// Whether a token at `y` has left the bottom of the board
    pub fn is_below(&self, y: f32) -> bool {
        y > self.height + MISS_MARGIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_at() {
        let board = Board::new(300.0, 500.0);
        assert_eq!(board.lane_at(0.0), Lane::LEFT);
        assert_eq!(board.lane_at(99.9), Lane::LEFT);
        assert_eq!(board.lane_at(100.0), Lane::MIDDLE);
        assert_eq!(board.lane_at(250.0), Lane::RIGHT);
    }

    #[test]
    fn test_lane_at_clamps_outside_board() {
        let board = Board::new(300.0, 500.0);
        assert_eq!(board.lane_at(-500.0), Lane::LEFT);
        assert_eq!(board.lane_at(10_000.0), Lane::RIGHT);
        assert_eq!(board.lane_at(f32::INFINITY), Lane::RIGHT);
        assert_eq!(board.lane_at(f32::NEG_INFINITY), Lane::LEFT);
        assert_eq!(board.lane_at(f32::NAN), Lane::MIDDLE);
    }

    #[test]
    fn test_zero_width_board() {
        let board = Board::new(0.0, 500.0);
        assert_eq!(board.lane_at(42.0), Lane::MIDDLE);
    }

    #[test]
    fn test_lane_for_drag_uses_hero_center() {
        let board = Board::new(300.0, 500.0);
        // Hero in middle lane spans 110..190; grabbed at its left edge
        let grab = 0.0;
        assert_eq!(board.lane_for_drag(110.0, grab), Lane::MIDDLE);
        // Dragging the left edge to 160 puts the center at 200
        assert_eq!(board.lane_for_drag(160.0, grab), Lane::RIGHT);
        assert_eq!(board.lane_for_drag(-30.0, grab), Lane::LEFT);
    }

    #[test]
    fn test_rects() {
        let board = Board::new(300.0, 500.0);
        let hero = board.hero_rect(Lane::MIDDLE);
        assert_eq!(hero.left(), 110.0);
        assert_eq!(hero.right(), 190.0);
        assert_eq!(hero.top(), 404.0);

        let token = board.token_rect(Lane::MIDDLE, 10.0);
        assert_eq!(token.left(), 129.0);
        assert!(token.overlaps_x(&hero));
        assert!(!board.token_rect(Lane::LEFT, 10.0).overlaps_x(&hero));
    }

    #[test]
    fn test_lane_from_index() {
        assert_eq!(Lane::from_index(2), Some(Lane::RIGHT));
        assert_eq!(Lane::from_index(3), None);
        assert_eq!(Lane::all().count(), 3);
    }
}
