//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall clock / RNG seed
//! - Pointer input (mouse and first touch)

#[cfg(target_arch = "wasm32")]
pub mod input;

/// Seed for a new run
#[cfg(target_arch = "wasm32")]
pub fn seed() -> u64 {
    js_sys::Date::now() as u64
}

#[cfg(not(target_arch = "wasm32"))]
pub fn seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// High-resolution timestamp in milliseconds (same clock as animation frames)
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}
