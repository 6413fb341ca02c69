//! # Commerce Insights Builder
//!
//! Turns loosely formatted marketplace listing exports and short-video
//! exports into typed records, then derives the KPIs, rankings, category
//! mixes and daily trend series a store dashboard displays.
//!
//! ## Core Concepts
//!
//! - **Listing export**: comma-separated product rows with abbreviated prices
//!   (`96` meaning 96.000) and sold labels (`1.5RB+` meaning 1500)
//! - **Content export**: comma-separated video rows with play and interaction
//!   counters plus a caption carrying hashtags
//! - **Record sets**: the caller-owned listings and content an upload replaces
//! - **Reports**: the overview (totals, rankings, category units, engagement
//!   timeline) and the executive view (period comparison, trend, revenue mix)
//!
//! Parsing never fails: malformed rows are dropped and counted in the log.
//! Only configuration can be rejected.
//!
//! ## Example
//!
//! ```rust,ignore
//! use commerce_insights_builder::*;
//! use chrono::NaiveDate;
//! use rand::SeedableRng;
//!
//! let processor = InsightsProcessor::new(InsightsConfig::default())?;
//!
//! let mut records = RecordSets::from_provider(&DemoCatalog);
//! processor.ingest_listings(&mut records, SAMPLE_LISTINGS_CSV);
//!
//! let overview = processor.overview(&records);
//! println!("{}", overview.to_markdown());
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let end = NaiveDate::from_ymd_opt(2025, 7, 20).unwrap();
//! let executive = processor.executive(&records, TrendWindow::Month, end, &mut rng)?;
//! println!("{}", executive.to_json()?);
//! ```

pub mod aggregation;
pub mod categories;
pub mod config;
pub mod error;
pub mod ingestion;
pub mod normalizers;
pub mod report;
pub mod samples;
pub mod schema;
pub mod summary;
pub mod trend;
pub mod utils;

pub use aggregation::*;
pub use categories::{CategoryRule, CategoryRuleSet};
pub use config::{Band, InsightsConfig, TrendEvent, TrendSettings};
pub use error::{InsightsError, Result};
pub use ingestion::*;
pub use normalizers::*;
pub use report::{ExecutiveReport, Highlights, OverviewReport};
pub use samples::{
    DemoCatalog, EmptyCatalog, SeedDataProvider, SAMPLE_CONTENT_CSV, SAMPLE_LISTINGS_CSV,
};
pub use schema::*;
pub use summary::{average_order_value, build_comparative_summary};
pub use trend::TrendSynthesizer;
pub use utils::*;

use chrono::{Local, NaiveDate};
use log::{debug, info};
use rand::Rng;

/// Validated configuration plus the parsers and builders it drives.
pub struct InsightsProcessor {
    config: InsightsConfig,
    listing_parser: ListingParser,
    content_parser: ContentParser,
}

impl InsightsProcessor {
    pub fn new(config: InsightsConfig) -> Result<Self> {
        config.validate()?;

        let listing_parser = ListingParser::new(ListingColumns::STANDARD, config.price_policy)?;
        let content_parser =
            ContentParser::new(ContentColumns::STANDARD, config.caption_preview_chars)?;

        debug!(
            "Insights processor ready: {} category rules, top {} rankings",
            config.category_rules.rules.len(),
            config.top_n
        );

        Ok(Self {
            config,
            listing_parser,
            content_parser,
        })
    }

    pub fn from_json_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        Self::new(InsightsConfig::from_json_file(path)?)
    }

    pub fn config(&self) -> &InsightsConfig {
        &self.config
    }

    pub fn listing_parser(&self) -> &ListingParser {
        &self.listing_parser
    }

    pub fn content_parser(&self) -> &ContentParser {
        &self.content_parser
    }

    /// Replaces `records.listings` when `text` yields at least one listing.
    pub fn ingest_listings(&self, records: &mut RecordSets, text: &str) -> bool {
        let replaced = records.ingest_listings(&self.listing_parser, text);
        info!(
            "Listing upload {}; {} listings active",
            if replaced { "applied" } else { "ignored" },
            records.listings.len()
        );
        replaced
    }

    /// Replaces `records.content` when `text` yields at least one post.
    pub fn ingest_content(&self, records: &mut RecordSets, text: &str) -> bool {
        let replaced = records.ingest_content(&self.content_parser, text);
        info!(
            "Content upload {}; {} posts active",
            if replaced { "applied" } else { "ignored" },
            records.content.len()
        );
        replaced
    }

    pub fn overview(&self, records: &RecordSets) -> OverviewReport {
        OverviewReport::build(records, &self.config)
    }

    pub fn executive<R: Rng + ?Sized>(
        &self,
        records: &RecordSets,
        window: TrendWindow,
        end_date: NaiveDate,
        rng: &mut R,
    ) -> Result<ExecutiveReport> {
        ExecutiveReport::build(records, &self.config, window, end_date, rng)
    }

    /// Executive report ending today with thread-local randomness.
    pub fn executive_now(&self, records: &RecordSets, window: TrendWindow) -> Result<ExecutiveReport> {
        let today = Local::now().date_naive();
        self.executive(records, window, today, &mut rand::thread_rng())
    }
}

pub fn build_overview(records: &RecordSets) -> Result<OverviewReport> {
    Ok(InsightsProcessor::new(InsightsConfig::default())?.overview(records))
}

pub fn build_executive(records: &RecordSets, window: TrendWindow) -> Result<ExecutiveReport> {
    InsightsProcessor::new(InsightsConfig::default())?.executive_now(records, window)
}
