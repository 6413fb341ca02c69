use crate::utils::parse_iso_date;
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One marketplace product snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ListingRecord {
    #[schemars(description = "Row position in the parsed export (header is row 0). Unique within one parse, not stable across parses.")]
    pub id: usize,

    #[schemars(description = "Display name of the product. Never empty.")]
    pub name: String,

    #[schemars(description = "Unit price in whole currency units after the price scale policy was applied.")]
    pub price: u64,

    pub discount: String,

    #[schemars(description = "Promotional badge text, e.g. 'Flash Sale'. May be empty.")]
    pub promo_tag: String,

    #[schemars(description = "Average rating, 0 when the export value was unparseable.")]
    pub rating: f64,

    #[schemars(description = "Units sold decoded from the abbreviated sold label (e.g. '1.5RB+' -> 1500).")]
    pub units_sold: f64,

    #[schemars(description = "The sold label exactly as exported, kept for display.")]
    pub sold_label: String,

    pub image_url: String,
    pub source_url: String,
}

impl ListingRecord {
    /// Price multiplied by units sold.
    pub fn revenue(&self) -> f64 {
        self.price as f64 * self.units_sold
    }
}

/// One short-video post snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ContentRecord {
    pub id: usize,

    #[schemars(description = "Bounded-length prefix of the caption for compact display. Always a prefix of `caption`.")]
    pub caption_preview: String,

    pub caption: String,

    #[schemars(description = "Hashtags found in the caption, in order of appearance, including the leading '#'.")]
    pub tags: Vec<String>,

    pub likes: u64,
    pub shares: u64,
    pub plays: u64,
    pub comments: u64,

    #[schemars(description = "Publish date as exported (ISO-8601 date or timestamp).")]
    pub published: String,
}

impl ContentRecord {
    /// Likes + shares + comments.
    pub fn engagement(&self) -> u64 {
        self.likes
            .saturating_add(self.shares)
            .saturating_add(self.comments)
    }

    /// Likes + shares, the interaction count plotted on the engagement timeline.
    pub fn interactions(&self) -> u64 {
        self.likes.saturating_add(self.shares)
    }

    pub fn published_date(&self) -> Option<NaiveDate> {
        parse_iso_date(&self.published)
    }

    pub fn caption_is_truncated(&self) -> bool {
        self.caption_preview.len() < self.caption.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ReachOrigin {
    /// Sum of play counts of content actually published on that day
    Observed,
    /// Backfilled with a plausible random value
    Synthesized,
}

/// One point of a derived daily series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PeriodMetric {
    pub date: NaiveDate,

    #[schemars(description = "Short 'month day' label, e.g. 'May 10'.")]
    pub label: String,

    #[schemars(description = "Backfilled revenue for the period. Demo data, not a forecast.")]
    pub revenue: f64,

    pub reach: u64,
    pub reach_origin: ReachOrigin,

    #[schemars(description = "Name of the promotional event flagged on this period, if any.")]
    pub event: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MetricDelta {
    pub current: f64,
    pub previous: f64,
    #[schemars(description = "Percent change reported for the metric.")]
    pub delta_pct: f64,
}

/// Current-vs-previous triples for the headline commerce metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ComparativeSummary {
    pub revenue: MetricDelta,
    pub orders: MetricDelta,
    pub average_order_value: MetricDelta,
}

impl ComparativeSummary {
    pub fn metrics(&self) -> [(&'static str, MetricDelta); 3] {
        [
            ("revenue", self.revenue),
            ("orders", self.orders),
            ("average_order_value", self.average_order_value),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CategoryTotal {
    pub category: String,
    pub value: f64,
}

/// One point of the per-post engagement timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EngagementPoint {
    pub label: String,
    pub plays: u64,
    pub interactions: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum TrendWindow {
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
    #[schemars(description = "Year-to-date view, approximated by 90 daily periods.")]
    #[serde(rename = "ytd")]
    Quarter,
}

impl TrendWindow {
    pub fn periods(self) -> usize {
        match self {
            TrendWindow::Week => 7,
            TrendWindow::Month => 30,
            TrendWindow::Quarter => 90,
        }
    }
}
