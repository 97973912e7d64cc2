//! Free-text input validation for charges, percentages and sensor ids

use crate::error::{PriceError, Result};
use serde::{Deserialize, Deserializer};

const NUMBER_HINT: &str =
    "You should input a number in DKK. Either a whole number (integer) or decimal number (float)";
const PERCENTAGE_HINT: &str = "You should input a number in percentage, e.g. \"25\" for 25 %.";

/// Parse a user supplied amount such as `"2"`, `" 1.25 "` or `"1,25"`.
pub fn parse_number(field: &str, text: &str) -> Result<f64> {
    parse_finite(text).ok_or_else(|| PriceError::validation(field, NUMBER_HINT))
}

/// Parse a user supplied percentage; a trailing `%` is allowed.
pub fn parse_percentage(field: &str, text: &str) -> Result<f64> {
    let trimmed = text.trim();
    let bare = trimmed.strip_suffix('%').unwrap_or(trimmed);
    parse_finite(bare).ok_or_else(|| PriceError::validation(field, PERCENTAGE_HINT))
}

fn parse_finite(text: &str) -> Option<f64> {
    let normalized = text.trim().replace(',', ".");
    normalized
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Check that `id` looks like `domain.object_id`
pub fn validate_entity_id(field: &str, id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(PriceError::validation(field, "Sensor id cannot be empty"));
    }
    let Some((domain, object_id)) = id.split_once('.') else {
        return Err(PriceError::validation(
            field.to_string(),
            format!("'{}' is missing a domain prefix (e.g. sensor.nordpool)", id),
        ));
    };
    let valid_part = |part: &str| {
        !part.is_empty()
            && part
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
    };
    if !valid_part(domain) || !valid_part(object_id) {
        return Err(PriceError::validation(
            field.to_string(),
            format!("'{}' is not a valid entity id", id),
        ));
    }
    Ok(())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

/// Deserialize an amount written either as a YAML number or as text
pub fn number_or_text<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(value) => Ok(value),
        NumberOrText::Text(text) => parse_number("value", &text).map_err(serde::de::Error::custom),
    }
}

/// Deserialize a percentage written as a YAML number or as text like `25 %`
pub fn percentage_or_text<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(value) => Ok(value),
        NumberOrText::Text(text) => {
            parse_percentage("percentage", &text).map_err(serde::de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_accept_whitespace_and_decimal_comma() {
        assert_eq!(parse_number("charge", " 2 ").unwrap(), 2.0);
        assert_eq!(parse_number("charge", "1,25").unwrap(), 1.25);
        assert!(parse_number("charge", "two").is_err());
        assert!(parse_number("charge", "inf").is_err());
    }

    #[test]
    fn percentage_allows_percent_sign() {
        assert_eq!(parse_percentage("tax", "25 %").unwrap(), 25.0);
        let err = parse_percentage("tax", "lots").unwrap_err();
        assert!(err.to_string().contains("percentage"));
    }

    #[test]
    fn entity_ids_need_domain() {
        assert!(validate_entity_id("source.price_sensor", "sensor.nordpool_kwh_dk2").is_ok());
        assert!(validate_entity_id("source.price_sensor", "").is_err());
        assert!(validate_entity_id("source.price_sensor", "nordpool").is_err());
        assert!(validate_entity_id("source.price_sensor", "sensor.").is_err());
        assert!(validate_entity_id("source.price_sensor", "Sensor.Nordpool").is_err());
    }
}
