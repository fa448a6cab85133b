//! Timing, count and palette knobs for a deck.
//!
//! Defaults match the shipped presentation. With the `serde` feature the
//! whole tree is (de)serializable with every field optional, and with
//! `serde_json` a partial JSON document can override individual values.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::DeckError;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct TypewriterTiming {
    pub char_ms: u32,
    pub line_pause_ms: u32,
    pub code_char_ms: u32,
    pub terminal_char_ms: u32,
}

impl Default for TypewriterTiming {
    fn default() -> Self {
        Self {
            char_ms: 50,
            line_pause_ms: 400,
            code_char_ms: 15,
            terminal_char_ms: 30,
        }
    }
}

/// Section transition and input timing.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct NavigationTiming {
    /// Fade-out of the current section before the target becomes active.
    pub exit_ms: u32,
    /// Time after entering before another transition is accepted.
    pub settle_ms: u32,
    /// Delay between a next-button press (ripple) and navigation.
    pub button_ms: u32,
    /// Delay between the restart press and the reset.
    pub restart_ms: u32,
    pub swipe_threshold_px: f64,
}

impl Default for NavigationTiming {
    fn default() -> Self {
        Self {
            exit_ms: 400,
            settle_ms: 600,
            button_ms: 200,
            restart_ms: 300,
            swipe_threshold_px: 50.0,
        }
    }
}

/// Delays used by entry triggers and mini-games.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct Delays {
    pub intro_ms: u32,
    pub mystery_ms: u32,
    pub code_ms: u32,
    pub confetti_ms: u32,
    pub wish_line_ms: u32,
    pub timeline_ms: u32,
    pub compliment_ms: u32,
    pub closing_line_ms: u32,
    pub signature_extra_ms: u32,
    pub heart_ms: u32,
    pub heart_jitter_ms: u32,
    pub emoji_step_ms: u32,
    pub quiz_feedback_ms: u32,
    pub balloon_hide_ms: u32,
    pub balloon_unlock_ms: u32,
    pub fortune_reveal_ms: u32,
    pub candle_reveal_ms: u32,
    pub terminal_unlock_ms: u32,
    pub ripple_ms: u32,
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            intro_ms: 800,
            mystery_ms: 500,
            code_ms: 500,
            confetti_ms: 300,
            wish_line_ms: 400,
            timeline_ms: 500,
            compliment_ms: 600,
            closing_line_ms: 600,
            signature_extra_ms: 500,
            heart_ms: 600,
            heart_jitter_ms: 800,
            emoji_step_ms: 100,
            quiz_feedback_ms: 2000,
            balloon_hide_ms: 300,
            balloon_unlock_ms: 500,
            fortune_reveal_ms: 500,
            candle_reveal_ms: 800,
            terminal_unlock_ms: 500,
            ripple_ms: 600,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct ParticleConfig {
    pub count: usize,
    pub colors: Vec<String>,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 20,
            colors: ["#FFB6C1", "#E6E6FA", "#FFDAB9", "#98FB98", "#87CEEB", "#f8e1f4"]
                .map(String::from)
                .to_vec(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct ConfettiConfig {
    pub count: usize,
    pub stagger_ms: u32,
    pub mini_count: usize,
    pub smoke_puffs: usize,
    pub colors: Vec<String>,
}

impl Default for ConfettiConfig {
    fn default() -> Self {
        Self {
            count: 80,
            stagger_ms: 80,
            mini_count: 10,
            smoke_puffs: 5,
            colors: [
                "#667eea", "#764ba2", "#f093fb", "#ffecd2", "#fcb69f", "#FFB6C1", "#00b894", "#ffd93d",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

/// Complete deck configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct DeckConfig {
    pub typewriter: TypewriterTiming,
    pub navigation: NavigationTiming,
    pub delays: Delays,
    pub particles: ParticleConfig,
    pub confetti: ConfettiConfig,
    /// Pops required before the balloon section unlocks.
    pub balloon_threshold: u32,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            typewriter: TypewriterTiming::default(),
            navigation: NavigationTiming::default(),
            delays: Delays::default(),
            particles: ParticleConfig::default(),
            confetti: ConfettiConfig::default(),
            balloon_threshold: 6,
        }
    }
}

impl DeckConfig {
    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, DeckError> {
        let config: DeckConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DeckError> {
        if self.particles.colors.is_empty() {
            return Err(DeckError::EmptyPool("particles.colors"));
        }
        if self.confetti.colors.is_empty() {
            return Err(DeckError::EmptyPool("confetti.colors"));
        }
        if self.balloon_threshold == 0 {
            return Err(DeckError::Config("balloon_threshold must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(DeckConfig::default().validate().is_ok());
        assert_eq!(DeckConfig::default().balloon_threshold, 6);
    }

    #[test]
    fn empty_palette_is_rejected() {
        let mut cfg = DeckConfig::default();
        cfg.confetti.colors.clear();
        assert!(matches!(cfg.validate(), Err(DeckError::EmptyPool("confetti.colors"))));
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn partial_json_overrides_single_fields() {
        let cfg = DeckConfig::from_json(r#"{ "navigation": { "exit_ms": 10 }, "balloon_threshold": 3 }"#).unwrap();
        assert_eq!(cfg.navigation.exit_ms, 10);
        assert_eq!(cfg.navigation.settle_ms, 600);
        assert_eq!(cfg.balloon_threshold, 3);
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn malformed_json_is_a_config_error() {
        assert!(matches!(DeckConfig::from_json("{"), Err(DeckError::Config(_))));
    }
}
