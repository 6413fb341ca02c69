//! Field-level heuristics for the marketplace and short-video exports.
//!
//! Every function here is total: empty, absent or malformed input yields the
//! zero value of the target type instead of an error.

use crate::error::{InsightsError, Result};
use crate::utils::{parse_iso_date, period_label};
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Word the marketplace prepends or appends to sold counts ("Terjual").
pub const SOLD_MARKER: &str = "TERJUAL";

/// Magnitude suffix meaning "thousand" ("ribu").
pub const THOUSAND_SUFFIX: &str = "RB";

fn leading_number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?")
            .expect("leading number pattern is valid")
    })
}

fn leading_integer_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[+-]?[0-9]+").expect("leading integer pattern is valid"))
}

fn currency_marker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)rp").expect("currency marker pattern is valid"))
}

fn hashtag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"#[A-Za-z0-9_]+").expect("hashtag pattern is valid"))
}

/// Parses the longest numeric prefix of `raw`, ignoring leading whitespace.
/// `"4.9 stars"` gives 4.9, `"stars"` gives `None`.
pub fn parse_leading_float(raw: &str) -> Option<f64> {
    let candidate = raw.trim_start();
    let matched = leading_number_pattern().find(candidate)?;
    matched
        .as_str()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Decodes an abbreviated sold label: `"6RB+"` is 6000, `"1.5RB+"` is 1500,
/// `"800"` is 800. Already-normalized numbers pass through unchanged.
pub fn normalize_units_sold(raw: &str) -> f64 {
    let upper = raw
        .to_uppercase()
        .replace(SOLD_MARKER, "")
        .replace('+', "")
        .replace(',', "");
    let cleaned = upper.trim();

    let value = if cleaned.contains(THOUSAND_SUFFIX) {
        parse_leading_float(&cleaned.replacen(THOUSAND_SUFFIX, "", 1)).map(|v| v * 1000.0)
    } else {
        parse_leading_float(cleaned)
    };

    value.filter(|v| v.is_finite() && *v > 0.0).unwrap_or(0.0)
}

/// How sub-threshold prices are rescaled.
///
/// The marketplace export drops the trailing thousands for cheap items, so
/// `"96"` really means 96.000. With the default policy any parsed price
/// below 1000 is multiplied by 1000. Use [`PriceScalePolicy::disabled`] for
/// exports that always carry full prices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PriceScalePolicy {
    #[schemars(description = "Prices strictly below this value are treated as expressed in thousands.")]
    pub threshold: f64,
    #[schemars(description = "Factor applied to sub-threshold prices.")]
    pub multiplier: f64,
}

impl Default for PriceScalePolicy {
    fn default() -> Self {
        Self {
            threshold: 1000.0,
            multiplier: 1000.0,
        }
    }
}

impl PriceScalePolicy {
    pub fn disabled() -> Self {
        Self {
            threshold: 0.0,
            multiplier: 1.0,
        }
    }

    pub fn apply(&self, value: f64) -> f64 {
        if value < self.threshold {
            value * self.multiplier
        } else {
            value
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(InsightsError::InvalidPricePolicy(format!(
                "threshold must be finite and non-negative (got {})",
                self.threshold
            )));
        }
        if !self.multiplier.is_finite() || self.multiplier <= 0.0 {
            return Err(InsightsError::InvalidPricePolicy(format!(
                "multiplier must be finite and positive (got {})",
                self.multiplier
            )));
        }
        Ok(())
    }
}

/// Parses a dot-grouped price such as `"120.000"` or `"Rp96"` into whole
/// currency units, applying `policy` to small values.
pub fn normalize_price(raw: &str, policy: &PriceScalePolicy) -> u64 {
    let ungrouped = raw.replace('.', "");
    let cleaned = currency_marker_pattern().replace_all(&ungrouped, "");

    parse_leading_float(cleaned.trim())
        .map(|value| policy.apply(value))
        .filter(|value| value.is_finite() && *value > 0.0)
        .map(|value| value.round() as u64)
        .unwrap_or(0)
}

/// Leading-integer parse for counters (likes, plays, ...). Negative values
/// clamp to 0; values too large for `u64` saturate.
pub fn normalize_count(raw: &str) -> u64 {
    let cleaned = strip_quotes(raw);
    let Some(matched) = leading_integer_pattern().find(&cleaned) else {
        return 0;
    };

    let digits = matched.as_str();
    if digits.starts_with('-') {
        return 0;
    }

    digits.trim_start_matches('+').parse::<u64>().unwrap_or(u64::MAX)
}

pub fn normalize_rating(raw: &str) -> f64 {
    parse_leading_float(&strip_quotes(raw)).unwrap_or(0.0)
}

/// All `#tag` tokens in order of appearance.
pub fn extract_hashtags(text: &str) -> Vec<String> {
    hashtag_pattern()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Renders an ISO date or timestamp as `"May 10"`; empty for invalid input.
pub fn format_date_label(iso: &str) -> String {
    parse_iso_date(iso).map(period_label).unwrap_or_default()
}

/// Removes every double quote and surrounding whitespace.
pub fn strip_quotes(raw: &str) -> String {
    raw.replace('"', "").trim().to_string()
}

/// First `max_chars` characters of `caption`; always a prefix of it.
pub fn caption_preview(caption: &str, max_chars: usize) -> String {
    match caption.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => caption[..byte_idx].to_string(),
        None => caption.to_string(),
    }
}
