//! Numeric value extraction from effect strings.

use crate::error::ValueParseError;

/// The leading value token of an effect string.
///
/// `"+15% Health"` yields `"+15%"`. An empty or blank effect yields `""`.
pub fn effect_value(effect: &str) -> &str {
    effect.split_whitespace().next().unwrap_or("")
}

/// Parse an effect value token into an integer.
///
/// Percent signs, plus signs and thousands separators are dropped; a leading
/// minus sign is kept.
pub fn parse_effect_value(value: &str) -> Result<i64, ValueParseError> {
    let cleaned: String = value
        .chars()
        .filter(|c| !matches!(c, '%' | '+' | ','))
        .collect();
    cleaned.parse().map_err(|_| ValueParseError {
        raw: value.to_string(),
    })
}
