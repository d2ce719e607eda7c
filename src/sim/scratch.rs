//! Scratch-off coverage and reveal state
//!
//! The overlay's alpha channel is sampled on a sparse grid rather than per
//! pixel; the reveal threshold is a strict inequality.

/// Fraction of sampled overlay pixels that are fully transparent
///
/// `rgba` is row-major RGBA8 data for a `width`×`height` surface. Samples
/// are taken every `step` pixels in both axes starting at the origin.
/// Returns 0 for an empty surface.
pub fn coverage_ratio(rgba: &[u8], width: u32, height: u32, step: u32) -> f64 {
    let step = step.max(1) as usize;
    let (width, height) = (width as usize, height as usize);

    let mut cleared = 0u64;
    let mut total = 0u64;
    for y in (0..height).step_by(step) {
        for x in (0..width).step_by(step) {
            total += 1;
            let alpha = (y * width + x) * 4 + 3;
            if rgba.get(alpha) == Some(&0) {
                cleared += 1;
            }
        }
    }

    if total == 0 {
        0.0
    } else {
        cleared as f64 / total as f64
    }
}

/// Whether `ratio` is past the reveal threshold
#[inline]
pub fn passes_threshold(ratio: f64, threshold: f64) -> bool {
    ratio > threshold
}

/// Per-card scratch interaction
///
/// Tracks the active stroke and the one-way reveal flag. Every method
/// answers what the widget should do next, so the canvas code stays dumb.
/// Nothing counts until the overlay has been painted: an unpainted canvas
/// is fully transparent and would read as fully scratched.
#[derive(Debug, Clone, Default)]
pub struct ScratchState {
    armed: bool,
    revealed: bool,
    drawing: bool,
}

impl ScratchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// The overlay has been painted; strokes and checks count from now on
    pub fn arm(&mut self) {
        self.armed = true;
    }

    /// Begin a stroke; returns true if the widget should stamp
    pub fn pointer_down(&mut self) -> bool {
        if !self.armed || self.revealed {
            return false;
        }
        self.drawing = true;
        true
    }

    /// Pointer moved; returns true if the widget should stamp and re-check
    pub fn pointer_move(&mut self) -> bool {
        self.armed && self.drawing && !self.revealed
    }

    pub fn pointer_up(&mut self) {
        self.drawing = false;
    }

    /// Feed a freshly measured coverage ratio
    ///
    /// Returns true exactly once: on the check that first crosses the
    /// threshold. Later calls are no-ops.
    pub fn check(&mut self, ratio: f64, threshold: f64) -> bool {
        if !self.armed || self.revealed || !passes_threshold(ratio, threshold) {
            return false;
        }
        self.revealed = true;
        self.drawing = false;
        true
    }
}
