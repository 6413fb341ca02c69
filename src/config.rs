use crate::categories::CategoryRuleSet;
use crate::error::{InsightsError, Result};
use crate::normalizers::PriceScalePolicy;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Closed interval `[min, max]` a random multiplier is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Band {
    pub min: f64,
    pub max: f64,
}

impl Band {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn validate(&self, name: &str) -> Result<()> {
        let finite = self.min.is_finite() && self.max.is_finite();
        if !finite || self.min < 0.0 || self.min > self.max {
            return Err(InsightsError::InvalidBand {
                name: name.to_string(),
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// A promotional spike pinned to a fixed distance from the newest period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TrendEvent {
    #[schemars(description = "Periods counted back from the newest one (0 = newest).")]
    pub periods_back: usize,
    pub label: String,
    #[schemars(description = "Multiplier applied to both revenue and synthesized reach.")]
    pub boost: f64,
}

impl TrendEvent {
    pub fn new(periods_back: usize, label: &str, boost: f64) -> Self {
        Self {
            periods_back,
            label: label.to_string(),
            boost,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TrendSettings {
    #[schemars(description = "Daily revenue variance applied to the flat baseline.")]
    pub jitter: Band,
    pub events: Vec<TrendEvent>,
    #[schemars(description = "Inclusive lower bound of backfilled daily reach.")]
    pub synthetic_reach_min: u64,
    #[schemars(description = "Exclusive upper bound of backfilled daily reach.")]
    pub synthetic_reach_max: u64,
}

impl Default for TrendSettings {
    fn default() -> Self {
        Self {
            jitter: Band::new(0.7, 1.3),
            events: vec![
                TrendEvent::new(5, "Payday Sale", 1.8),
                TrendEvent::new(12, "Viral UGC", 1.4),
                TrendEvent::new(25, "Flash Sale", 1.5),
            ],
            synthetic_reach_min: 10_000,
            synthetic_reach_max: 60_000,
        }
    }
}

impl TrendSettings {
    pub fn event_at(&self, periods_back: usize) -> Option<&TrendEvent> {
        self.events.iter().find(|e| e.periods_back == periods_back)
    }

    pub fn validate(&self) -> Result<()> {
        self.jitter.validate("trend jitter")?;

        if self.synthetic_reach_min >= self.synthetic_reach_max {
            return Err(InsightsError::InvalidBand {
                name: "synthetic reach".to_string(),
                min: self.synthetic_reach_min as f64,
                max: self.synthetic_reach_max as f64,
            });
        }

        let mut offsets = HashSet::new();
        for event in &self.events {
            if event.label.trim().is_empty() {
                return Err(InsightsError::InvalidTrendEvent {
                    label: event.label.clone(),
                    details: "Event label must not be empty".to_string(),
                });
            }
            if !event.boost.is_finite() || event.boost <= 0.0 {
                return Err(InsightsError::InvalidTrendEvent {
                    label: event.label.clone(),
                    details: format!("Boost must be finite and positive (got {})", event.boost),
                });
            }
            if !offsets.insert(event.periods_back) {
                return Err(InsightsError::InvalidTrendEvent {
                    label: event.label.clone(),
                    details: format!(
                        "Another event is already pinned {} periods back",
                        event.periods_back
                    ),
                });
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct InsightsConfig {
    pub price_policy: PriceScalePolicy,

    #[schemars(description = "Maximum characters kept in a content caption preview.")]
    pub caption_preview_chars: usize,

    #[schemars(description = "Length of the top listings / top videos rankings.")]
    pub top_n: usize,

    #[schemars(description = "How many categories the executive revenue mix keeps.")]
    pub category_mix_limit: usize,

    pub category_rules: CategoryRuleSet,

    pub trend: TrendSettings,

    #[schemars(description = "Band the previous-period multiplier is drawn from.")]
    pub summary_variance: Band,

    #[schemars(description = "Tag shown in the highlights when no content carries one.")]
    pub fallback_tag: String,
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            price_policy: PriceScalePolicy::default(),
            caption_preview_chars: 50,
            top_n: 5,
            category_mix_limit: 4,
            category_rules: CategoryRuleSet::canonical(),
            trend: TrendSettings::default(),
            summary_variance: Band::new(0.85, 1.15),
            fallback_tag: "#tweelyforbag".to_string(),
        }
    }
}

impl InsightsConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.price_policy.validate()?;
        self.category_rules.validate()?;
        self.trend.validate()?;
        self.summary_variance.validate("summary variance")?;

        for (name, value) in [
            ("caption preview length", self.caption_preview_chars),
            ("top-N length", self.top_n),
            ("category mix limit", self.category_mix_limit),
        ] {
            if value == 0 {
                return Err(InsightsError::InvalidLimit {
                    name: name.to_string(),
                    value,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = InsightsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.trend.events.len(), 3);
        assert_eq!(config.trend.event_at(5).map(|e| e.label.as_str()), Some("Payday Sale"));
        assert!(config.trend.event_at(6).is_none());
    }

    #[test]
    fn test_partial_json_overrides() {
        let config = InsightsConfig::from_json_str(r#"{ "top_n": 3, "summary_variance": { "min": 1.0, "max": 1.0 } }"#)
            .unwrap();
        assert_eq!(config.top_n, 3);
        assert_eq!(config.summary_variance, Band::new(1.0, 1.0));
        assert_eq!(config.caption_preview_chars, 50);
        assert_eq!(config.category_rules, CategoryRuleSet::canonical());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = InsightsConfig::default();
        let json = config.to_json().unwrap();
        let parsed = InsightsConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_invalid_json_is_serialization_error() {
        let result = InsightsConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(InsightsError::SerializationError(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = InsightsConfig::from_json_file("/definitely/not/here/insights.json");
        assert!(matches!(result, Err(InsightsError::IoError(_))));
    }

    #[test]
    fn test_band_validation() {
        assert!(Band::new(0.7, 1.3).validate("jitter").is_ok());
        assert!(Band::new(1.3, 0.7).validate("jitter").is_err());
        assert!(Band::new(-0.1, 0.7).validate("jitter").is_err());
        assert!(Band::new(0.7, f64::INFINITY).validate("jitter").is_err());
        assert!(Band::new(0.7, 1.3).contains(1.0));
        assert!(!Band::new(0.7, 1.3).contains(1.31));
    }

    #[test]
    fn test_invalid_limits_rejected() {
        let config = InsightsConfig {
            top_n: 0,
            ..InsightsConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(InsightsError::InvalidLimit { .. })
        ));
    }

    #[test]
    fn test_trend_settings_validation() {
        let mut settings = TrendSettings::default();
        settings.events.push(TrendEvent::new(5, "Duplicate", 1.2));
        assert!(settings.validate().is_err());

        let settings = TrendSettings {
            events: vec![TrendEvent::new(1, "Zero", 0.0)],
            ..TrendSettings::default()
        };
        assert!(settings.validate().is_err());

        let settings = TrendSettings {
            synthetic_reach_min: 10,
            synthetic_reach_max: 10,
            ..TrendSettings::default()
        };
        assert!(settings.validate().is_err());
    }
}
