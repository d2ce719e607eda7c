//! Game balance and interaction tuning
//!
//! Never persisted. The page may pick a preset with `?pace=` and override
//! single fields with a `data-tuning` JSON attribute on the mount element.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};

/// Named tuning presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Pace {
    /// Slow spawns, slow tokens
    #[default]
    Gentle,
    /// Fast spawns, faster tokens
    Frantic,
}

impl Pace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pace::Gentle => "Gentle",
            Pace::Frantic => "Frantic",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "gentle" | "slow" => Some(Pace::Gentle),
            "frantic" | "fast" => Some(Pace::Frantic),
            _ => None,
        }
    }

    /// Milliseconds between token spawns
    pub fn spawn_interval_ms(&self) -> f64 {
        match self {
            Pace::Gentle => 2500.0,
            Pace::Frantic => 900.0,
        }
    }

    /// Token fall speed (px per frame)
    pub fn token_speed(&self) -> f32 {
        match self {
            Pace::Gentle => 0.7,
            Pace::Frantic => 1.2,
        }
    }
}

/// Tunable values for both widgets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub pace: Pace,

    // === Game ===
    /// Milliseconds between token spawns
    pub spawn_interval_ms: f64,
    /// Token fall speed (px per frame)
    pub token_speed: f32,
    /// Lives at the start of each run
    pub start_lives: u8,
    /// Milliseconds between target changes
    pub target_interval_ms: f64,
    /// How long the "collect" flash stays up
    pub flash_ms: f64,
    /// How long a caught token pops before it is removed
    pub pop_delay_ms: f64,

    // === Scratch ===
    /// Cleared fraction that reveals a card (strictly greater than)
    pub reveal_threshold: f64,
    /// Alpha sampling stride (px)
    pub sample_step: u32,
    /// Brush radius (px)
    pub brush_radius: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self::from_preset(Pace::Gentle)
    }
}

impl Tuning {
    /// Create tuning from a preset
    pub fn from_preset(pace: Pace) -> Self {
        Self {
            pace,
            spawn_interval_ms: pace.spawn_interval_ms(),
            token_speed: pace.token_speed(),
            start_lives: MAX_LIVES,
            target_interval_ms: 15_000.0,
            flash_ms: 1200.0,
            pop_delay_ms: 200.0,
            reveal_threshold: REVEAL_THRESHOLD,
            sample_step: SAMPLE_STEP,
            brush_radius: BRUSH_RADIUS,
        }
    }

    /// Apply a preset (only touches pace-dependent values)
    pub fn apply_preset(&mut self, pace: Pace) {
        self.pace = pace;
        self.spawn_interval_ms = pace.spawn_interval_ms();
        self.token_speed = pace.token_speed();
    }

    /// Parse overrides; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the game loop can't run with
    pub fn validate(&self) -> Result<()> {
        if !(self.spawn_interval_ms > 0.0) {
            return Err(Error::InvalidTuning(format!(
                "spawn_interval_ms must be positive, got {}",
                self.spawn_interval_ms
            )));
        }
        if !(self.token_speed > 0.0) {
            return Err(Error::InvalidTuning(format!(
                "token_speed must be positive, got {}",
                self.token_speed
            )));
        }
        if self.start_lives == 0 || self.start_lives > MAX_LIVES {
            return Err(Error::InvalidTuning(format!(
                "start_lives must be in 1..={}, got {}",
                MAX_LIVES, self.start_lives
            )));
        }
        if !(self.target_interval_ms > 0.0) {
            return Err(Error::InvalidTuning("target_interval_ms must be positive".into()));
        }
        if self.flash_ms < 0.0 || self.pop_delay_ms < 0.0 {
            return Err(Error::InvalidTuning("delays must not be negative".into()));
        }
        if !(self.reveal_threshold > 0.0 && self.reveal_threshold < 1.0) {
            return Err(Error::InvalidTuning(format!(
                "reveal_threshold must be in (0, 1), got {}",
                self.reveal_threshold
            )));
        }
        if self.sample_step == 0 {
            return Err(Error::InvalidTuning("sample_step must be at least 1".into()));
        }
        if !(self.brush_radius > 0.0) {
            return Err(Error::InvalidTuning("brush_radius must be positive".into()));
        }
        Ok(())
    }

    /// Build tuning for the page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load(root: &web_sys::Element) -> Self {
        let mut tuning = Self::default();

        let pace = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .and_then(|search| pace_from_query(&search));
        if let Some(pace) = pace {
            tuning.apply_preset(pace);
            log::info!("Using {} pace", pace.as_str());
        }

        if let Some(json) = root.get_attribute("data-tuning") {
            match merge_json(&tuning, &json) {
                Ok(merged) => {
                    log::info!("Loaded tuning overrides");
                    tuning = merged;
                }
                Err(e) => log::warn!("Ignoring tuning overrides: {}", e),
            }
        }

        tuning
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

/// Overlay a partial JSON object on top of `base`
pub fn merge_json(base: &Tuning, json: &str) -> Result<Tuning> {
    let mut value = serde_json::to_value(base)?;
    let overrides: serde_json::Value = serde_json::from_str(json)?;
    let serde_json::Value::Object(overrides) = overrides else {
        return Err(Error::InvalidTuning("expected a JSON object".into()));
    };
    if let serde_json::Value::Object(fields) = &mut value {
        for (key, v) in overrides {
            fields.insert(key, v);
        }
    }
    let tuning: Tuning = serde_json::from_value(value)?;
    tuning.validate()?;
    Ok(tuning)
}

/// Extract `pace=<name>` from a `?a=b&c=d` query string
pub fn pace_from_query(search: &str) -> Option<Pace> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "pace")
        .and_then(|(_, value)| Pace::from_str(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_gentle() {
        let t = Tuning::default();
        assert_eq!(t.pace, Pace::Gentle);
        assert_eq!(t.spawn_interval_ms, 2500.0);
        assert!((t.token_speed - 0.7).abs() < f32::EPSILON);
        assert_eq!(t.start_lives, 10);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_frantic_preset() {
        let t = Tuning::from_preset(Pace::Frantic);
        assert_eq!(t.spawn_interval_ms, 900.0);
        assert!((t.token_speed - 1.2).abs() < f32::EPSILON);
        // Lives still apply in the fast variant
        assert_eq!(t.start_lives, MAX_LIVES);
    }

    #[test]
    fn test_pace_from_str() {
        assert_eq!(Pace::from_str("FAST"), Some(Pace::Frantic));
        assert_eq!(Pace::from_str("gentle"), Some(Pace::Gentle));
        assert_eq!(Pace::from_str("ludicrous"), None);
    }

    #[test]
    fn test_from_json_partial() {
        let t = Tuning::from_json(r#"{ "start_lives": 3, "pop_delay_ms": 50 }"#).unwrap();
        assert_eq!(t.start_lives, 3);
        assert_eq!(t.pop_delay_ms, 50.0);
        assert_eq!(t.spawn_interval_ms, 2500.0);
    }

    #[test]
    fn test_from_json_rejects_bad_values() {
        assert!(matches!(
            Tuning::from_json(r#"{ "start_lives": 0 }"#),
            Err(Error::InvalidTuning(_))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "reveal_threshold": 1.5 }"#),
            Err(Error::InvalidTuning(_))
        ));
        assert!(matches!(Tuning::from_json("not json"), Err(Error::Config(_))));
    }

    #[test]
    fn test_merge_keeps_preset() {
        let base = Tuning::from_preset(Pace::Frantic);
        let merged = merge_json(&base, r#"{ "flash_ms": 500 }"#).unwrap();
        assert_eq!(merged.pace, Pace::Frantic);
        assert_eq!(merged.spawn_interval_ms, 900.0);
        assert_eq!(merged.flash_ms, 500.0);
        assert!(merge_json(&base, "[1, 2]").is_err());
    }

    #[test]
    fn test_pace_from_query() {
        assert_eq!(pace_from_query("?pace=frantic"), Some(Pace::Frantic));
        assert_eq!(pace_from_query("?x=1&pace=gentle"), Some(Pace::Gentle));
        assert_eq!(pace_from_query(""), None);
        assert_eq!(pace_from_query("?pace=warp"), None);
    }
}
