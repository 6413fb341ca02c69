//! Record parsers for the marketplace and short-video exports.
//!
//! Exports are split on [`FIELD_DELIMITER`] with no quoting support: a
//! delimiter inside a field shifts every later column. Rows narrower than
//! the column mapping, and listing rows without a name, are dropped.

use crate::error::{InsightsError, Result};
use crate::normalizers::{
    caption_preview, extract_hashtags, normalize_count, normalize_price, normalize_rating,
    normalize_units_sold, strip_quotes, PriceScalePolicy,
};
use crate::samples::SeedDataProvider;
use crate::schema::{ContentRecord, ListingRecord};
use log::{debug, info};
use serde::{Deserialize, Serialize};

pub const FIELD_DELIMITER: char = ',';

/// Source URL used when a listing row has none.
pub const PLACEHOLDER_SOURCE_URL: &str = "#";

pub const DEFAULT_CAPTION_PREVIEW_CHARS: usize = 50;

pub fn placeholder_image_url(row: usize) -> String {
    format!("https://picsum.photos/100/100?random={}", row)
}

const fn max_index(indices: &[usize]) -> usize {
    let mut max = 0;
    let mut i = 0;
    while i < indices.len() {
        if indices[i] > max {
            max = indices[i];
        }
        i += 1;
    }
    max
}

const fn all_distinct(indices: &[usize]) -> bool {
    let mut i = 0;
    while i < indices.len() {
        let mut j = i + 1;
        while j < indices.len() {
            if indices[i] == indices[j] {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

/// Column positions of the marketplace listing export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingColumns {
    pub source_url: usize,
    pub image_url: usize,
    pub name: usize,
    pub price: usize,
    pub discount: usize,
    pub promo_tag: usize,
    pub rating: usize,
    pub sold_label: usize,
}

impl ListingColumns {
    pub const STANDARD: Self = Self {
        source_url: 0,
        image_url: 1,
        name: 3,
        price: 4,
        discount: 5,
        promo_tag: 6,
        rating: 7,
        sold_label: 8,
    };

    const fn indices(&self) -> [usize; 8] {
        [
            self.source_url,
            self.image_url,
            self.name,
            self.price,
            self.discount,
            self.promo_tag,
            self.rating,
            self.sold_label,
        ]
    }

    /// Minimum number of columns a row needs to be considered.
    pub const fn required_width(&self) -> usize {
        max_index(&self.indices()) + 1
    }

    pub const fn is_well_formed(&self) -> bool {
        all_distinct(&self.indices())
    }
}

/// Column positions of the short-video export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentColumns {
    pub caption: usize,
    pub likes: usize,
    pub shares: usize,
    pub plays: usize,
    pub comments: usize,
    pub published: usize,
}

impl ContentColumns {
    pub const STANDARD: Self = Self {
        caption: 2,
        likes: 3,
        shares: 4,
        plays: 5,
        comments: 6,
        published: 9,
    };

    const fn indices(&self) -> [usize; 6] {
        [
            self.caption,
            self.likes,
            self.shares,
            self.plays,
            self.comments,
            self.published,
        ]
    }

    pub const fn required_width(&self) -> usize {
        max_index(&self.indices()) + 1
    }

    pub const fn is_well_formed(&self) -> bool {
        all_distinct(&self.indices())
    }
}

const _: () = assert!(ListingColumns::STANDARD.is_well_formed());
const _: () = assert!(ContentColumns::STANDARD.is_well_formed());

/// Yields `(row_index, columns)` for every data row, header excluded.
fn data_rows(text: &str) -> impl Iterator<Item = (usize, Vec<&str>)> {
    text.lines()
        .enumerate()
        .skip(1)
        .map(|(row, line)| (row, line.split(FIELD_DELIMITER).collect()))
}

pub struct ListingParser {
    columns: ListingColumns,
    price_policy: PriceScalePolicy,
}

impl Default for ListingParser {
    fn default() -> Self {
        Self {
            columns: ListingColumns::STANDARD,
            price_policy: PriceScalePolicy::default(),
        }
    }
}

impl ListingParser {
    pub fn new(columns: ListingColumns, price_policy: PriceScalePolicy) -> Result<Self> {
        if !columns.is_well_formed() {
            return Err(InsightsError::InvalidColumnMapping {
                record_kind: "listing".to_string(),
                details: format!("Two fields share a column: {:?}", columns),
            });
        }
        price_policy.validate()?;

        Ok(Self {
            columns,
            price_policy,
        })
    }

    pub fn columns(&self) -> &ListingColumns {
        &self.columns
    }

    /// Parses a whole export. Never fails: malformed rows are skipped and an
    /// export without usable rows yields an empty vector.
    pub fn parse(&self, text: &str) -> Vec<ListingRecord> {
        let width = self.columns.required_width();
        let mut records = Vec::new();
        let mut dropped = 0usize;

        for (row, cols) in data_rows(text) {
            if cols.len() < width {
                debug!(
                    "Dropping listing row {}: {} columns, mapping needs {}",
                    row,
                    cols.len(),
                    width
                );
                dropped += 1;
                continue;
            }

            match self.parse_row(row, &cols) {
                Some(record) => records.push(record),
                None => {
                    debug!("Dropping listing row {}: empty product name", row);
                    dropped += 1;
                }
            }
        }

        info!(
            "Parsed {} listing records ({} rows dropped)",
            records.len(),
            dropped
        );
        records
    }

    fn parse_row(&self, row: usize, cols: &[&str]) -> Option<ListingRecord> {
        let c = &self.columns;

        let name = strip_quotes(cols[c.name]);
        if name.is_empty() {
            return None;
        }

        let sold_label = cols[c.sold_label].trim().to_string();
        let units_sold = normalize_units_sold(&sold_label);

        let image_url = Some(strip_quotes(cols[c.image_url]))
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| placeholder_image_url(row));
        let source_url = Some(strip_quotes(cols[c.source_url]))
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| PLACEHOLDER_SOURCE_URL.to_string());

        Some(ListingRecord {
            id: row,
            name,
            price: normalize_price(cols[c.price], &self.price_policy),
            discount: strip_quotes(cols[c.discount]),
            promo_tag: strip_quotes(cols[c.promo_tag]),
            rating: normalize_rating(cols[c.rating]),
            units_sold,
            sold_label,
            image_url,
            source_url,
        })
    }
}

pub struct ContentParser {
    columns: ContentColumns,
    caption_preview_chars: usize,
}

impl Default for ContentParser {
    fn default() -> Self {
        Self {
            columns: ContentColumns::STANDARD,
            caption_preview_chars: DEFAULT_CAPTION_PREVIEW_CHARS,
        }
    }
}

impl ContentParser {
    pub fn new(columns: ContentColumns, caption_preview_chars: usize) -> Result<Self> {
        if !columns.is_well_formed() {
            return Err(InsightsError::InvalidColumnMapping {
                record_kind: "content".to_string(),
                details: format!("Two fields share a column: {:?}", columns),
            });
        }
        if caption_preview_chars == 0 {
            return Err(InsightsError::InvalidLimit {
                name: "caption preview length".to_string(),
                value: caption_preview_chars,
            });
        }

        Ok(Self {
            columns,
            caption_preview_chars,
        })
    }

    pub fn columns(&self) -> &ContentColumns {
        &self.columns
    }

    pub fn parse(&self, text: &str) -> Vec<ContentRecord> {
        let width = self.columns.required_width();
        let mut records = Vec::new();
        let mut dropped = 0usize;

        for (row, cols) in data_rows(text) {
            if cols.len() < width {
                debug!(
                    "Dropping content row {}: {} columns, mapping needs {}",
                    row,
                    cols.len(),
                    width
                );
                dropped += 1;
                continue;
            }
            records.push(self.parse_row(row, &cols));
        }

        info!(
            "Parsed {} content records ({} rows dropped)",
            records.len(),
            dropped
        );
        records
    }

    fn parse_row(&self, row: usize, cols: &[&str]) -> ContentRecord {
        let c = &self.columns;
        let caption = strip_quotes(cols[c.caption]);

        ContentRecord {
            id: row,
            caption_preview: caption_preview(&caption, self.caption_preview_chars),
            tags: extract_hashtags(&caption),
            caption,
            likes: normalize_count(cols[c.likes]),
            shares: normalize_count(cols[c.shares]),
            plays: normalize_count(cols[c.plays]),
            comments: normalize_count(cols[c.comments]),
            published: strip_quotes(cols[c.published]),
        }
    }
}

/// Parses a listing export with the standard mapping and price policy.
pub fn parse_listings(text: &str) -> Vec<ListingRecord> {
    ListingParser::default().parse(text)
}

/// Parses a short-video export with the standard mapping.
pub fn parse_content(text: &str) -> Vec<ContentRecord> {
    ContentParser::default().parse(text)
}

/// The record sets a caller keeps between uploads.
///
/// Each upload replaces a whole set; an upload that parses to nothing
/// leaves the current set in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSets {
    pub listings: Vec<ListingRecord>,
    pub content: Vec<ContentRecord>,
}

impl RecordSets {
    pub fn new(listings: Vec<ListingRecord>, content: Vec<ContentRecord>) -> Self {
        Self { listings, content }
    }

    pub fn from_provider<P: SeedDataProvider + ?Sized>(provider: &P) -> Self {
        Self::new(provider.listings(), provider.content())
    }

    /// Returns `true` when the set was replaced.
    pub fn replace_listings(&mut self, parsed: Vec<ListingRecord>) -> bool {
        if parsed.is_empty() {
            debug!("Listing upload produced no records; keeping current set");
            return false;
        }
        self.listings = parsed;
        true
    }

    pub fn replace_content(&mut self, parsed: Vec<ContentRecord>) -> bool {
        if parsed.is_empty() {
            debug!("Content upload produced no records; keeping current set");
            return false;
        }
        self.content = parsed;
        true
    }

    pub fn ingest_listings(&mut self, parser: &ListingParser, text: &str) -> bool {
        self.replace_listings(parser.parse(text))
    }

    pub fn ingest_content(&mut self, parser: &ContentParser, text: &str) -> bool {
        self.replace_content(parser.parse(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING_HEADER: &str =
        "url,image,shop,name,price,discount,tag,rating,sold";

    const CONTENT_HEADER: &str =
        "id,author,text,diggCount,shareCount,playCount,commentCount,musicName,duration,createTimeISO";

    #[test]
    fn test_standard_mapping_widths() {
        assert_eq!(ListingColumns::STANDARD.required_width(), 9);
        assert_eq!(ContentColumns::STANDARD.required_width(), 10);
        assert!(ListingColumns::STANDARD.is_well_formed());
    }

    #[test]
    fn test_header_only_yields_nothing() {
        assert!(parse_listings(LISTING_HEADER).is_empty());
        assert!(parse_content(CONTENT_HEADER).is_empty());
        assert!(parse_listings("").is_empty());
        assert!(parse_content("").is_empty());
    }

    #[test]
    fn test_listing_row_fields() {
        let text = format!(
            "{}\nhttps://shop/item/1,https://img/1.jpg,tweely,\"Mini Backpack\",96,36%,Diskon Rp3RB,4.9,6RB+",
            LISTING_HEADER
        );
        let records = parse_listings(&text);
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.id, 1);
        assert_eq!(record.name, "Mini Backpack");
        assert_eq!(record.price, 96_000);
        assert_eq!(record.discount, "36%");
        assert_eq!(record.promo_tag, "Diskon Rp3RB");
        assert_eq!(record.rating, 4.9);
        assert_eq!(record.units_sold, 6000.0);
        assert_eq!(record.sold_label, "6RB+");
        assert_eq!(record.image_url, "https://img/1.jpg");
        assert_eq!(record.source_url, "https://shop/item/1");
    }

    #[test]
    fn test_short_row_is_dropped_and_rest_kept() {
        let text = format!(
            "{}\n#,img,s,Tote,120.000,10%,,4.9,800\n#,img,s,Broken,96\n#,img,s,Pouch,25,50%,Flash Sale,4.6,10RB+",
            LISTING_HEADER
        );
        let records = parse_listings(&text);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Tote");
        assert_eq!(records[0].id, 1);
        assert_eq!(records[1].name, "Pouch");
        assert_eq!(records[1].id, 3);
    }

    #[test]
    fn test_nameless_row_is_dropped() {
        let text = format!(
            "{}\n#,img,s,\"\",96,36%,,4.9,6RB+\n#,img,s,   ,96,36%,,4.9,6RB+",
            LISTING_HEADER
        );
        assert!(parse_listings(&text).is_empty());
    }

    #[test]
    fn test_missing_image_and_url_get_placeholders() {
        let text = format!("{}\n,,s,Sleeve,75,30%,,4.9,450", LISTING_HEADER);
        let records = parse_listings(&text);
        assert_eq!(records[0].image_url, placeholder_image_url(1));
        assert_eq!(records[0].source_url, PLACEHOLDER_SOURCE_URL);
    }

    #[test]
    fn test_crlf_and_trailing_newline() {
        let text = format!(
            "{}\r\n#,img,s,Tote,120.000,10%,,4.9,800\r\n",
            LISTING_HEADER
        );
        let records = parse_listings(&text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sold_label, "800");
        assert_eq!(records[0].units_sold, 800.0);
    }

    #[test]
    fn test_embedded_delimiter_misaligns_columns() {
        // "Tote, Canvas" splits into two columns; everything after shifts by one.
        let text = format!(
            "{}\n#,img,s,Tote, Canvas,120.000,10%,,4.9,800",
            LISTING_HEADER
        );
        let records = parse_listings(&text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Tote");
        assert_eq!(records[0].price, 0);
    }

    #[test]
    fn test_garbage_input_never_panics() {
        let inputs = [
            "\u{0}\u{1}\u{2}",
            "\n\n\n",
            ",,,,,,,,,,,,,,,,",
            "header\n,,,,,,,,,,,,",
            "header\n\u{fffd},\u{fffd},\u{fffd},\u{fffd},\u{fffd},\u{fffd},\u{fffd},\u{fffd},\u{fffd},\u{fffd}",
        ];
        for input in inputs {
            let _ = parse_listings(input);
            let _ = parse_content(input);
        }
        let records = parse_listings(inputs[4]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].price, 0);
        assert_eq!(records[0].units_sold, 0.0);
    }

    #[test]
    fn test_content_row_fields() {
        let caption = "Get yours! Cecille Totebag #tweelyforbag #totebag and a long enough tail to truncate";
        let text = format!(
            "{}\n7301,tweely,\"{}\",830,118,121900,31,original sound,15,2025-05-10T08:00:00.000Z",
            CONTENT_HEADER, caption
        );
        let records = parse_content(&text);
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.id, 1);
        assert_eq!(record.caption, caption);
        assert_eq!(record.caption_preview.chars().count(), 50);
        assert!(record.caption.starts_with(&record.caption_preview));
        assert_eq!(record.tags, vec!["#tweelyforbag", "#totebag"]);
        assert_eq!(record.likes, 830);
        assert_eq!(record.shares, 118);
        assert_eq!(record.plays, 121_900);
        assert_eq!(record.comments, 31);
        assert_eq!(record.published, "2025-05-10T08:00:00.000Z");
    }

    #[test]
    fn test_content_short_row_is_dropped() {
        let text = format!(
            "{}\n1,a,short row,1,2,3,4\n2,b,full row,1,2,3,4,x,5,2025-06-01",
            CONTENT_HEADER
        );
        let records = parse_content(&text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].caption, "full row");
        assert_eq!(records[0].id, 2);
    }

    #[test]
    fn test_content_bad_counters_default_to_zero() {
        let text = format!("{}\n1,a,caption,lots,-4,,1e3,x,5,", CONTENT_HEADER);
        let records = parse_content(&text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].likes, 0);
        assert_eq!(records[0].shares, 0);
        assert_eq!(records[0].plays, 0);
        assert_eq!(records[0].comments, 1);
        assert_eq!(records[0].published, "");
    }

    #[test]
    fn test_mapping_validation() {
        let clashing = ListingColumns {
            price: 3,
            ..ListingColumns::STANDARD
        };
        assert!(ListingParser::new(clashing, PriceScalePolicy::default()).is_err());

        let clashing = ContentColumns {
            plays: 3,
            ..ContentColumns::STANDARD
        };
        assert!(ContentParser::new(clashing, 50).is_err());
        assert!(ContentParser::new(ContentColumns::STANDARD, 0).is_err());
    }

    #[test]
    fn test_custom_mapping() {
        let columns = ListingColumns {
            source_url: 7,
            image_url: 6,
            name: 0,
            price: 1,
            discount: 2,
            promo_tag: 3,
            rating: 4,
            sold_label: 5,
        };
        let parser = ListingParser::new(columns, PriceScalePolicy::disabled()).unwrap();
        let records = parser.parse("header\nWallet,35,41%,Voucher 50%,4.8,3RB+,img,url");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Wallet");
        assert_eq!(records[0].price, 35);
        assert_eq!(records[0].units_sold, 3000.0);
        assert_eq!(records[0].source_url, "url");
    }

    #[test]
    fn test_empty_upload_keeps_current_set() {
        let parser = ListingParser::default();
        let mut sets = RecordSets::default();

        let first = format!("{}\n#,img,s,Tote,120.000,10%,,4.9,800", LISTING_HEADER);
        assert!(sets.ingest_listings(&parser, &first));
        assert_eq!(sets.listings.len(), 1);

        assert!(!sets.ingest_listings(&parser, LISTING_HEADER));
        assert_eq!(sets.listings.len(), 1);

        let second = format!(
            "{}\n#,img,s,Pouch,25,50%,,4.6,10RB+\n#,img,s,Wallet,35,41%,,4.8,3RB+",
            LISTING_HEADER
        );
        assert!(sets.ingest_listings(&parser, &second));
        assert_eq!(sets.listings.len(), 2);
        assert_eq!(sets.listings[0].name, "Pouch");
    }

    #[test]
    fn test_content_upload_replaces_wholesale() {
        let parser = ContentParser::default();
        let mut sets = RecordSets::default();
        let text = format!("{}\n1,a,first,1,2,3,4,x,5,2025-06-01", CONTENT_HEADER);
        assert!(sets.ingest_content(&parser, &text));
        assert!(!sets.ingest_content(&parser, "garbage"));
        assert_eq!(sets.content.len(), 1);
        assert_eq!(sets.content[0].caption, "first");
    }
}
