/*!
 * Reading-time estimation for a single segment.
 */

use crate::errors::TimingError;
use super::pacing::{check_non_negative, check_rate, LanguageMode};

/// Count the reading units in `text` for the given mode
pub fn count_units(text: &str, mode: LanguageMode) -> usize {
    match mode {
        LanguageMode::WordCounted => text.split_whitespace().count(),
        LanguageMode::CharacterCounted => text.chars().filter(|c| !c.is_whitespace()).count(),
    }
}

/// Estimate how many seconds a reader needs for `text`.
///
/// `max(units / rate * 60, min_duration)`. An empty string yields
/// `min_duration`. Fails only when `rate` is not positive or
/// `min_duration` is negative.
pub fn estimate_duration(
    text: &str,
    rate: f64,
    min_duration: f64,
    mode: LanguageMode,
) -> Result<f64, TimingError> {
    check_rate(rate)?;
    check_non_negative("min_duration", min_duration)?;

    let units = count_units(text, mode);
    Ok((units as f64 / rate * 60.0).max(min_duration))
}
