//! Stateless roll-ups over a record set.

use crate::categories::CategoryRuleSet;
use crate::normalizers::format_date_label;
use crate::schema::{CategoryTotal, ContentRecord, EngagementPoint, ListingRecord};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Clamps an overflowed sum to `f64::MAX` so totals stay finite.
pub(crate) fn clamp_total(total: f64) -> f64 {
    if total.is_finite() {
        total
    } else {
        f64::MAX
    }
}

/// Sum of price x units sold; 0 for an empty set.
pub fn total_revenue(listings: &[ListingRecord]) -> f64 {
    clamp_total(listings.iter().map(ListingRecord::revenue).sum())
}

pub fn total_units_sold(listings: &[ListingRecord]) -> f64 {
    clamp_total(listings.iter().map(|l| l.units_sold).sum())
}

/// Sum of play counts.
pub fn total_reach(content: &[ContentRecord]) -> u64 {
    content
        .iter()
        .fold(0u64, |acc, c| acc.saturating_add(c.plays))
}

/// Sum of likes + shares + comments.
pub fn total_engagement(content: &[ContentRecord]) -> u64 {
    content
        .iter()
        .fold(0u64, |acc, c| acc.saturating_add(c.engagement()))
}

/// Engagement per play, 0 when nothing was played.
pub fn engagement_rate(content: &[ContentRecord]) -> f64 {
    let reach = total_reach(content);
    if reach == 0 {
        return 0.0;
    }
    total_engagement(content) as f64 / reach as f64
}

/// The `n` best sellers, ties kept in input order.
pub fn top_listings(listings: &[ListingRecord], n: usize) -> Vec<&ListingRecord> {
    let mut ranked: Vec<&ListingRecord> = listings.iter().collect();
    ranked.sort_by(|a, b| b.units_sold.total_cmp(&a.units_sold));
    ranked.truncate(n);
    ranked
}

/// The `n` most played posts, ties kept in input order.
pub fn top_content(content: &[ContentRecord], n: usize) -> Vec<&ContentRecord> {
    let mut ranked: Vec<&ContentRecord> = content.iter().collect();
    ranked.sort_by(|a, b| b.plays.cmp(&a.plays));
    ranked.truncate(n);
    ranked
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum CategoryMeasure {
    UnitsSold,
    Revenue,
}

impl CategoryMeasure {
    fn of(self, listing: &ListingRecord) -> f64 {
        match self {
            CategoryMeasure::UnitsSold => listing.units_sold,
            CategoryMeasure::Revenue => listing.revenue(),
        }
    }
}

/// Totals per category in rule order (fallback last). Every listing lands in
/// exactly one category; categories totalling zero are left out.
pub fn group_by_category(
    listings: &[ListingRecord],
    rules: &CategoryRuleSet,
    measure: CategoryMeasure,
) -> Vec<CategoryTotal> {
    let mut totals = vec![0.0; rules.rules.len() + 1];
    for listing in listings {
        totals[rules.position(&listing.name)] += measure.of(listing);
    }

    rules
        .categories()
        .zip(totals)
        .filter(|(_, value)| *value > 0.0)
        .map(|(category, value)| CategoryTotal {
            category: category.to_string(),
            value: clamp_total(value),
        })
        .collect()
}

/// Category totals sorted largest first (stable) and cut to `limit`.
pub fn ranked_category_mix(
    listings: &[ListingRecord],
    rules: &CategoryRuleSet,
    measure: CategoryMeasure,
    limit: usize,
) -> Vec<CategoryTotal> {
    let mut mix = group_by_category(listings, rules, measure);
    mix.sort_by(|a, b| b.value.total_cmp(&a.value));
    mix.truncate(limit);
    mix
}

/// Largest revenue category and its percentage of total revenue.
pub fn leading_category_share(
    listings: &[ListingRecord],
    rules: &CategoryRuleSet,
) -> Option<(String, f64)> {
    let revenue = total_revenue(listings);
    let leader = ranked_category_mix(listings, rules, CategoryMeasure::Revenue, 1)
        .into_iter()
        .next()?;

    let share = if revenue > 0.0 {
        leader.value / revenue * 100.0
    } else {
        0.0
    };
    Some((leader.category, share))
}

/// First hashtag of the first post, if any.
pub fn lead_tag(content: &[ContentRecord]) -> Option<&str> {
    content.first()?.tags.first().map(String::as_str)
}

/// Posts in publish order (stable; undated posts first) with plays and
/// likes + shares.
pub fn engagement_timeline(content: &[ContentRecord]) -> Vec<EngagementPoint> {
    let mut ordered: Vec<&ContentRecord> = content.iter().collect();
    ordered.sort_by_key(|c| c.published_date());

    ordered
        .into_iter()
        .map(|c| EngagementPoint {
            label: format_date_label(&c.published),
            plays: c.plays,
            interactions: c.interactions(),
        })
        .collect()
}

/// Headline numbers of the overview page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OverviewKpis {
    pub total_revenue: f64,
    pub total_units_sold: f64,
    pub total_reach: u64,
    pub total_engagement: u64,
    #[schemars(description = "Engagement divided by reach; 0 when reach is 0.")]
    pub engagement_rate: f64,
}

impl OverviewKpis {
    pub fn compute(listings: &[ListingRecord], content: &[ContentRecord]) -> Self {
        Self {
            total_revenue: total_revenue(listings),
            total_units_sold: total_units_sold(listings),
            total_reach: total_reach(content),
            total_engagement: total_engagement(content),
            engagement_rate: engagement_rate(content),
        }
    }

    pub fn engagement_rate_pct(&self) -> f64 {
        self.engagement_rate * 100.0
    }
}
