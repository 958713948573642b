/*!
 * Pacing parameters for timeline layout.
 *
 * A `PacingConfig` is passed explicitly into every layout call; there is no
 * process-wide default state. The presets mirror the reading speeds that work
 * well for alphabetic (word-counted) and logographic (character-counted) text.
 */

use serde::{Deserialize, Serialize};

use crate::errors::TimingError;

/// How reading units are counted in a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageMode {
    /// Whitespace-delimited tokens (English, French, ...)
    #[serde(alias = "word-counted")]
    WordCounted,
    /// Non-whitespace characters (Chinese, Japanese)
    #[serde(alias = "character-counted")]
    CharacterCounted,
}

impl LanguageMode {
    /// Unit name used in log messages
    pub fn unit(&self) -> &'static str {
        match self {
            Self::WordCounted => "words",
            Self::CharacterCounted => "chars",
        }
    }
}

impl std::fmt::Display for LanguageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WordCounted => write!(f, "word-counted"),
            Self::CharacterCounted => write!(f, "character-counted"),
        }
    }
}

/// Reading-speed and spacing parameters, all times in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Units per minute (words or characters depending on the language mode)
    pub rate: f64,

    /// Floor applied to every estimated duration
    #[serde(default)]
    pub min_duration: f64,

    /// Gap between the end of one window and the start of the next
    #[serde(default)]
    pub pause: f64,

    /// Start time of the first window
    #[serde(default)]
    pub initial_offset: f64,

    /// Added to every window after the floor is applied
    #[serde(default)]
    pub extra_buffer: f64,
}

impl PacingConfig {
    /// Defaults for word-counted languages: 150 wpm, 1s floor, no buffer
    pub fn word_counted_default() -> Self {
        Self {
            rate: 150.0,
            min_duration: 1.0,
            pause: 0.2,
            initial_offset: 0.5,
            extra_buffer: 0.0,
        }
    }

    /// Defaults for character-counted languages: 180 cpm, 2s floor, 0.5s buffer
    pub fn character_counted_default() -> Self {
        Self {
            rate: 180.0,
            min_duration: 2.0,
            pause: 0.2,
            initial_offset: 0.5,
            extra_buffer: 0.5,
        }
    }

    /// Preset matching a language mode
    pub fn default_for(mode: LanguageMode) -> Self {
        match mode {
            LanguageMode::WordCounted => Self::word_counted_default(),
            LanguageMode::CharacterCounted => Self::character_counted_default(),
        }
    }

    /// Check that the configuration can drive a layout
    pub fn validate(&self) -> Result<(), TimingError> {
        check_rate(self.rate)?;
        check_non_negative("min_duration", self.min_duration)?;
        check_non_negative("pause", self.pause)?;
        check_non_negative("initial_offset", self.initial_offset)?;
        check_non_negative("extra_buffer", self.extra_buffer)?;
        Ok(())
    }
}

pub(crate) fn check_rate(rate: f64) -> Result<(), TimingError> {
    if !rate.is_finite() || rate <= 0.0 {
        return Err(TimingError::Configuration(format!(
            "rate must be a positive number, got {}",
            rate
        )));
    }
    Ok(())
}

pub(crate) fn check_non_negative(name: &str, value: f64) -> Result<(), TimingError> {
    if !value.is_finite() || value < 0.0 {
        return Err(TimingError::Configuration(format!(
            "{} must be a non-negative number of seconds, got {}",
            name, value
        )));
    }
    Ok(())
}
