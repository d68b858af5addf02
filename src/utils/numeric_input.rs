/*
Accepted input
1234
1,234.5
１，２３４.５
 12 345 円
-0.75
3.5e2
1200yen   -> 1200 (trailing text is ignored)
*/
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer};

// '０' (U+FF10) - '0' (U+0030)
const FULL_WIDTH_DIGIT_OFFSET: u32 = 0xFEE0;

/// Strips thousands separators (`,` and `，`) and whitespace, and maps
/// full-width digits to ASCII. Signs and decimal points are kept as-is.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| *c != ',' && *c != '，' && !c.is_whitespace())
        .map(|c| match c {
            '０'..='９' => char::from_u32(c as u32 - FULL_WIDTH_DIGIT_OFFSET).unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// Parses the longest numeric prefix of the normalized text.
/// Anything that does not start with a number yields `fallback`.
pub fn parse(text: &str, fallback: f64) -> f64 {
    let normalized = normalize(text);
    numeric_prefix(&normalized)
        .and_then(|prefix| prefix.parse::<f64>().ok())
        .filter(|value| !value.is_nan())
        .unwrap_or(fallback)
}

pub fn parse_or_zero(text: &str) -> f64 {
    parse(text, 0.0)
}

// `str::parse::<f64>` already accepts "+1", "-.5", "7." and "Infinity",
// so the matched prefix is handed over unchanged.
static NUMERIC_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)")
        .expect("numeric prefix pattern is valid")
});

fn numeric_prefix(s: &str) -> Option<&str> {
    NUMERIC_PREFIX.find(s).map(|m| m.as_str())
}

/// Formats with `,` as the thousands separator and exactly `decimals`
/// fractional digits. Non-finite values render as "0".
pub fn format(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }

    let rendered = format!("{:.*}", decimals, round_half_away(value.abs(), decimals));
    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (rendered.as_str(), None),
    };

    let mut result = String::with_capacity(rendered.len() + int_part.len() / 3 + 1);
    let rounds_to_zero = rendered.chars().all(|c| c == '0' || c == '.');
    if value < 0.0 && !rounds_to_zero {
        result.push('-');
    }
    for (idx, digit) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            result.push(',');
        }
        result.push(digit);
    }
    if let Some(frac_part) = frac_part {
        result.push('.');
        result.push_str(frac_part);
    }
    result
}

// `{:.*}` rounds exact ties to even; amounts shown to users round ties
// away from zero instead (2.5 -> 3, 0.125 -> 0.13).
fn round_half_away(value: f64, decimals: usize) -> f64 {
    let Ok(exponent) = i32::try_from(decimals) else {
        return value;
    };
    let factor = 10f64.powi(exponent);
    let scaled = value * factor;
    if !scaled.is_finite() || scaled.fract().abs() != 0.5 || scaled / factor != value {
        return value;
    }
    (scaled + 0.5f64.copysign(scaled)) / factor
}

pub fn format_amount(value: f64) -> String {
    format(value, 2)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumeric {
    Number(f64),
    Text(String),
}

/// Serde adapter for request fields: accepts a JSON number or free-form
/// text. Text goes through [`parse_or_zero`]; null and non-finite values
/// ("Infinity", "1e400") become 0.
pub fn deserialize_numeric<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawNumeric>::deserialize(deserializer)?;
    let value = match raw {
        Some(RawNumeric::Number(value)) => value,
        Some(RawNumeric::Text(text)) => parse_or_zero(&text),
        None => 0.0,
    };
    Ok(if value.is_finite() { value } else { 0.0 })
}
