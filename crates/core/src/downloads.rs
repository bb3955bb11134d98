//! Human-readable download counts (`"1.2M+"`) to numbers and back.

use once_cell::sync::Lazy;
use regex::Regex;

static DOWNLOADS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)([KMBT]?)\+").expect("invalid downloads regex"));

static COUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*([KMBT]?)").expect("invalid count regex"));

/// Parse a download count such as `1.5M+` or `200K+`.
///
/// The trailing `+` is required and the first match anywhere in the string
/// wins. Anything that does not match yields `0.0`.
pub fn parse_downloads(input: &str) -> f64 {
    DOWNLOADS_RE
        .captures(input)
        .and_then(|caps| scaled(caps.get(1)?.as_str(), caps.get(2).map_or("", |m| m.as_str())))
        .unwrap_or(0.0)
}

/// Lenient variant of [`parse_downloads`] where the `+` suffix is optional.
///
/// Used for channel member counts, which are written as `15K` as often as `15K+`.
pub fn parse_count(input: &str) -> f64 {
    COUNT_RE
        .captures(input)
        .and_then(|caps| scaled(caps.get(1)?.as_str(), caps.get(2).map_or("", |m| m.as_str())))
        .unwrap_or(0.0)
}

/// Render a count with the largest fitting unit, e.g. `1_500_000.0` -> `1.5M`.
///
/// A value that rounds up to 1000 of one unit is shown in the next one
/// (`999_950.0` -> `1M`).
pub fn format_count(value: f64) -> String {
    const UNITS: [(f64, &str); 5] = [(1.0, ""), (1e3, "K"), (1e6, "M"), (1e9, "B"), (1e12, "T")];

    let value = value.max(0.0);
    let mut index = UNITS
        .iter()
        .rposition(|(scale, _)| value >= *scale)
        .unwrap_or(0);
    loop {
        let (scale, suffix) = UNITS[index];
        let rounded = if index == 0 {
            value.round()
        } else {
            (value / scale * 10.0).round() / 10.0
        };
        if rounded >= 1000.0 && index + 1 < UNITS.len() {
            index += 1;
            continue;
        }
        return if rounded.fract() == 0.0 {
            format!("{}{suffix}", rounded as u64)
        } else {
            format!("{rounded:.1}{suffix}")
        };
    }
}

fn scaled(number: &str, unit: &str) -> Option<f64> {
    let value: f64 = number.parse().ok()?;
    let factor = match unit {
        "K" => 1e3,
        "M" => 1e6,
        "B" => 1e9,
        "T" => 1e12,
        _ => 1.0,
    };
    Some(value * factor)
}
