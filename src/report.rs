use crate::aggregation::{
    engagement_timeline, group_by_category, lead_tag, leading_category_share, ranked_category_mix,
    top_content, top_listings, total_revenue, CategoryMeasure, OverviewKpis,
};
use crate::config::InsightsConfig;
use crate::error::Result;
use crate::ingestion::RecordSets;
use crate::schema::{
    CategoryTotal, ComparativeSummary, ContentRecord, EngagementPoint, ListingRecord,
    PeriodMetric, ReachOrigin, TrendWindow,
};
use crate::summary::build_comparative_summary;
use crate::trend::TrendSynthesizer;
use chrono::NaiveDate;
use log::debug;
use rand::Rng;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Inputs for the risk / opportunity strip of the executive view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Highlights {
    #[schemars(description = "Name of the best-selling listing by units sold.")]
    pub top_listing: Option<String>,

    #[schemars(description = "First tag of the first content record, or the configured fallback tag.")]
    pub lead_tag: String,

    pub leading_category: Option<String>,

    #[schemars(description = "Leading category's share of total revenue in percent.")]
    pub leading_category_share_pct: f64,
}

impl Highlights {
    pub fn compute(records: &RecordSets, config: &InsightsConfig) -> Self {
        let (leading_category, leading_category_share_pct) =
            match leading_category_share(&records.listings, &config.category_rules) {
                Some((category, share)) => (Some(category), share),
                None => (None, 0.0),
            };

        Self {
            top_listing: top_listings(&records.listings, 1)
                .first()
                .map(|l| l.name.clone()),
            lead_tag: lead_tag(&records.content)
                .unwrap_or(config.fallback_tag.as_str())
                .to_string(),
            leading_category,
            leading_category_share_pct,
        }
    }
}

/// Everything the overview page shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OverviewReport {
    pub kpis: OverviewKpis,
    pub top_listings: Vec<ListingRecord>,
    pub top_content: Vec<ContentRecord>,

    #[schemars(description = "Units sold per category in rule order, zero categories omitted.")]
    pub category_units: Vec<CategoryTotal>,

    pub engagement_timeline: Vec<EngagementPoint>,
}

impl OverviewReport {
    pub fn build(records: &RecordSets, config: &InsightsConfig) -> Self {
        let report = Self {
            kpis: OverviewKpis::compute(&records.listings, &records.content),
            top_listings: top_listings(&records.listings, config.top_n)
                .into_iter()
                .cloned()
                .collect(),
            top_content: top_content(&records.content, config.top_n)
                .into_iter()
                .cloned()
                .collect(),
            category_units: group_by_category(
                &records.listings,
                &config.category_rules,
                CategoryMeasure::UnitsSold,
            ),
            engagement_timeline: engagement_timeline(&records.content),
        };

        debug!(
            "Overview report: {} listings, {} content records, {} categories",
            records.listings.len(),
            records.content.len(),
            report.category_units.len()
        );

        report
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_markdown(&self) -> String {
        let mut output = String::new();
        let kpis = &self.kpis;

        output.push_str("# Store Overview\n\n");
        output.push_str(&format!(
            "- **Total Revenue:** Rp {}\n",
            format_amount(kpis.total_revenue)
        ));
        output.push_str(&format!(
            "- **Units Sold:** {}\n",
            format_amount(kpis.total_units_sold)
        ));
        output.push_str(&format!(
            "- **Total Reach:** {}\n",
            format_amount(kpis.total_reach as f64)
        ));
        output.push_str(&format!(
            "- **Engagement Rate:** {:.2}%\n\n",
            kpis.engagement_rate_pct()
        ));

        output.push_str("## Top Listings\n\n");
        output.push_str("| # | Product | Price | Sold | Rating |\n");
        output.push_str("|---|---------|-------|------|--------|\n");
        for (rank, listing) in self.top_listings.iter().enumerate() {
            output.push_str(&format!(
                "| {} | {} | Rp {} | {} | {:.1} |\n",
                rank + 1,
                table_cell(&listing.name),
                format_amount(listing.price as f64),
                table_cell(&listing.sold_label),
                listing.rating
            ));
        }
        output.push('\n');

        output.push_str("## Top Videos\n\n");
        for (rank, record) in self.top_content.iter().enumerate() {
            output.push_str(&format!(
                "{}. {} ({} plays)\n",
                rank + 1,
                record.caption_preview,
                format_amount(record.plays as f64)
            ));
        }
        output.push('\n');

        output.push_str("## Units Sold by Category\n\n");
        for total in &self.category_units {
            output.push_str(&format!(
                "- {}: {}\n",
                total.category,
                format_amount(total.value)
            ));
        }
        output.push('\n');

        output
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(OverviewReport)
    }

    pub fn schema_as_json() -> Result<String> {
        Ok(serde_json::to_string_pretty(&Self::generate_json_schema())?)
    }
}

/// Everything the executive page shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExecutiveReport {
    pub window: TrendWindow,
    pub end_date: NaiveDate,
    pub summary: ComparativeSummary,

    #[schemars(description = "Daily series, oldest first. Revenue is demo backfill, not a forecast.")]
    pub trend: Vec<PeriodMetric>,

    #[schemars(description = "Revenue per category, largest first, cut to the configured limit.")]
    pub revenue_mix: Vec<CategoryTotal>,

    pub highlights: Highlights,
}

impl ExecutiveReport {
    pub fn build<R: Rng + ?Sized>(
        records: &RecordSets,
        config: &InsightsConfig,
        window: TrendWindow,
        end_date: NaiveDate,
        rng: &mut R,
    ) -> Result<Self> {
        let summary = build_comparative_summary(&records.listings, &config.summary_variance, rng)?;
        let trend = TrendSynthesizer::new(config.trend.clone())?.synthesize(
            window,
            end_date,
            total_revenue(&records.listings),
            &records.content,
            rng,
        );
        let revenue_mix = ranked_category_mix(
            &records.listings,
            &config.category_rules,
            CategoryMeasure::Revenue,
            config.category_mix_limit,
        );

        debug!(
            "Executive report for {:?} ending {}: {} trend points, {} mix categories",
            window,
            end_date,
            trend.len(),
            revenue_mix.len()
        );

        Ok(Self {
            window,
            end_date,
            summary,
            trend,
            revenue_mix,
            highlights: Highlights::compute(records, config),
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str("# Executive Summary\n\n");
        output.push_str(&format!(
            "**Window:** {} days ending {}\n\n",
            self.window.periods(),
            self.end_date
        ));

        output.push_str("## Headline Metrics\n\n");
        output.push_str("| Metric | Current | Previous | Change |\n");
        output.push_str("|--------|---------|----------|--------|\n");
        for (name, metric) in self.summary.metrics() {
            output.push_str(&format!(
                "| {} | {} | {} | {:+.1}% |\n",
                metric_title(name),
                format_amount(metric.current),
                format_amount(metric.previous),
                metric.delta_pct
            ));
        }
        output.push('\n');

        output.push_str("## Revenue Mix\n\n");
        for total in &self.revenue_mix {
            output.push_str(&format!(
                "- {}: Rp {}\n",
                total.category,
                format_amount(total.value)
            ));
        }
        output.push('\n');

        output.push_str("## Highlights\n\n");
        if let Some(listing) = &self.highlights.top_listing {
            output.push_str(&format!("- **Best Seller:** {}\n", listing));
        }
        output.push_str(&format!("- **Lead Tag:** {}\n", self.highlights.lead_tag));
        if let Some(category) = &self.highlights.leading_category {
            output.push_str(&format!(
                "- **Leading Category:** {} ({:.1}% of revenue)\n",
                category, self.highlights.leading_category_share_pct
            ));
        }
        output.push('\n');

        output.push_str("## Daily Trend\n\n");
        output.push_str("_Revenue is backfilled demo data._\n\n");
        output.push_str("| Day | Revenue | Reach | Event |\n");
        output.push_str("|-----|---------|-------|-------|\n");
        for point in &self.trend {
            let reach_marker = match point.reach_origin {
                ReachOrigin::Observed => "",
                ReachOrigin::Synthesized => "*",
            };
            output.push_str(&format!(
                "| {} | Rp {} | {}{} | {} |\n",
                table_cell(&point.label),
                format_amount(point.revenue),
                format_amount(point.reach as f64),
                reach_marker,
                table_cell(point.event.as_deref().unwrap_or(""))
            ));
        }
        output.push_str("\n\\* synthesized reach\n");

        output
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(ExecutiveReport)
    }

    pub fn schema_as_json() -> Result<String> {
        Ok(serde_json::to_string_pretty(&Self::generate_json_schema())?)
    }
}

fn metric_title(name: &str) -> &str {
    match name {
        "revenue" => "Revenue",
        "orders" => "Orders",
        "average_order_value" => "Avg. Order Value",
        other => other,
    }
}

/// Escapes `|` so free text cannot split a Markdown table cell.
fn table_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Whole-unit amount with `.` thousands separators, e.g. `1.250.000`.
fn format_amount(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
