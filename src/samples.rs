//! Seed data handed to callers that want something on screen before the
//! first upload. Nothing in the crate reads these implicitly.

use crate::ingestion::DEFAULT_CAPTION_PREVIEW_CHARS;
use crate::normalizers::{caption_preview, extract_hashtags, normalize_units_sold};
use crate::schema::{ContentRecord, ListingRecord};

/// Source of the record sets shown before any export is uploaded.
pub trait SeedDataProvider {
    fn listings(&self) -> Vec<ListingRecord>;
    fn content(&self) -> Vec<ContentRecord>;
}

/// Provider with no seed data at all.
pub struct EmptyCatalog;

impl SeedDataProvider for EmptyCatalog {
    fn listings(&self) -> Vec<ListingRecord> {
        Vec::new()
    }

    fn content(&self) -> Vec<ContentRecord> {
        Vec::new()
    }
}

/// The demo bag shop: eight listings and seven videos.
pub struct DemoCatalog;

/// The demo listings as a marketplace export. Parsing it reproduces
/// [`DemoCatalog::listings`] exactly.
pub const SAMPLE_LISTINGS_CSV: &str = "\
product_url,image_url,shop_name,product_name,price,discount,promo,rating,sold
#,https://github.com/user-attachments/assets/71c61563-0056-4c75-9c86-185440618051,tweelyforbag,Tweelyforbag Flessy NEW Mini Backpack,96,36%,Diskon Rp3RB,4.9,6RB+
#,https://github.com/user-attachments/assets/38435136-1506-4444-9080-366551820612,tweelyforbag,Tweelyforbag Gigi Dompet Lipat Wanita,35,41%,Voucher 50%,4.8,3RB+
#,https://github.com/user-attachments/assets/68310006-2c5e-47f9-8d76-189689617260,tweelyforbag,Tweelyforbag Elody Small Size KECIL,85,25%,Cashback XTRA,4.7,1.5RB+
#,https://github.com/user-attachments/assets/19f39088-333e-46d2-bb82-411327142416,tweelyforbag,Tweelyforbag Cecille Totebag Canvas,120.000,10%,Terlaris,4.9,800
#,https://github.com/user-attachments/assets/c6607212-325b-4860-96f8-985226759755,tweelyforbag,Tweelyforbag Pouch Makeup Travel,25,50%,Flash Sale,4.6,10RB+
#,https://github.com/user-attachments/assets/10101150-5100-4354-9915-101112201222,tweelyforbag,Tweelyforbag Shoulder Bag Retro,110.000,15%,Diskon Rp10RB,4.5,500
#,https://github.com/user-attachments/assets/19323382-3580-4565-9830-478631525011,tweelyforbag,Tweelyforbag Sling Phone Case,45,20%,Murah Lebay,4.8,2.2RB+
#,https://github.com/user-attachments/assets/05933615-5205-4085-8833-255011880562,tweelyforbag,Tweelyforbag Laptop Sleeve 14 Inch,75,30%,,4.9,450
";

/// The demo videos as a short-video export. Parsing it reproduces
/// [`DemoCatalog::content`] exactly.
pub const SAMPLE_CONTENT_CSV: &str = "\
id,author,text,diggCount,shareCount,playCount,commentCount,musicName,duration,createTimeISO
7001,tweely_official,Get yours! Cecille Totebag 😍 #tweelyforbag #totebag,830,118,121900,31,original sound,15,2025-05-10
7002,tweely_official,NOT YOUR ORDINARY BACKPACK 😎 Elody Large size is back! #backpack #racuntiktok,12600,1507,940800,174,original sound,22,2025-07-09
7003,tweely_official,Packing orders for 12.12 Sale! 📦 #packing #asmr,5400,200,450000,89,original sound,30,2025-06-15
7004,tweely_official,New color alert! 🚨 Pastel Pink Series #newarrival #pink,3200,450,210000,120,original sound,12,2025-06-20
7005,tweely_official,What fits in my Tweely Bag? 🎒 #whatsinmybag,9800,890,780000,230,original sound,28,2025-07-01
7006,tweely_official,Flash Sale Spoiler 🤫 Don't tell boss #flashsale #spill,15000,3000,1200000,560,original sound,18,2025-07-15
7007,tweely_official,Styling tips for college students 👗 #ootd #campus,4500,320,340000,95,original sound,40,2025-05-25
";

#[allow(clippy::too_many_arguments)]
fn listing(
    id: usize,
    name: &str,
    price: u64,
    discount: &str,
    promo_tag: &str,
    rating: f64,
    sold_label: &str,
    image_url: &str,
) -> ListingRecord {
    ListingRecord {
        id,
        name: name.to_string(),
        price,
        discount: discount.to_string(),
        promo_tag: promo_tag.to_string(),
        rating,
        units_sold: normalize_units_sold(sold_label),
        sold_label: sold_label.to_string(),
        image_url: image_url.to_string(),
        source_url: "#".to_string(),
    }
}

fn video(
    id: usize,
    caption: &str,
    likes: u64,
    shares: u64,
    plays: u64,
    comments: u64,
    published: &str,
) -> ContentRecord {
    ContentRecord {
        id,
        caption_preview: caption_preview(caption, DEFAULT_CAPTION_PREVIEW_CHARS),
        caption: caption.to_string(),
        tags: extract_hashtags(caption),
        likes,
        shares,
        plays,
        comments,
        published: published.to_string(),
    }
}

impl SeedDataProvider for DemoCatalog {
    fn listings(&self) -> Vec<ListingRecord> {
        vec![
            listing(
                1,
                "Tweelyforbag Flessy NEW Mini Backpack",
                96_000,
                "36%",
                "Diskon Rp3RB",
                4.9,
                "6RB+",
                "https://github.com/user-attachments/assets/71c61563-0056-4c75-9c86-185440618051",
            ),
            listing(
                2,
                "Tweelyforbag Gigi Dompet Lipat Wanita",
                35_000,
                "41%",
                "Voucher 50%",
                4.8,
                "3RB+",
                "https://github.com/user-attachments/assets/38435136-1506-4444-9080-366551820612",
            ),
            listing(
                3,
                "Tweelyforbag Elody Small Size KECIL",
                85_000,
                "25%",
                "Cashback XTRA",
                4.7,
                "1.5RB+",
                "https://github.com/user-attachments/assets/68310006-2c5e-47f9-8d76-189689617260",
            ),
            listing(
                4,
                "Tweelyforbag Cecille Totebag Canvas",
                120_000,
                "10%",
                "Terlaris",
                4.9,
                "800",
                "https://github.com/user-attachments/assets/19f39088-333e-46d2-bb82-411327142416",
            ),
            listing(
                5,
                "Tweelyforbag Pouch Makeup Travel",
                25_000,
                "50%",
                "Flash Sale",
                4.6,
                "10RB+",
                "https://github.com/user-attachments/assets/c6607212-325b-4860-96f8-985226759755",
            ),
            listing(
                6,
                "Tweelyforbag Shoulder Bag Retro",
                110_000,
                "15%",
                "Diskon Rp10RB",
                4.5,
                "500",
                "https://github.com/user-attachments/assets/10101150-5100-4354-9915-101112201222",
            ),
            listing(
                7,
                "Tweelyforbag Sling Phone Case",
                45_000,
                "20%",
                "Murah Lebay",
                4.8,
                "2.2RB+",
                "https://github.com/user-attachments/assets/19323382-3580-4565-9830-478631525011",
            ),
            listing(
                8,
                "Tweelyforbag Laptop Sleeve 14 Inch",
                75_000,
                "30%",
                "",
                4.9,
                "450",
                "https://github.com/user-attachments/assets/05933615-5205-4085-8833-255011880562",
            ),
        ]
    }

    fn content(&self) -> Vec<ContentRecord> {
        vec![
            video(
                1,
                "Get yours! Cecille Totebag 😍 #tweelyforbag #totebag",
                830,
                118,
                121_900,
                31,
                "2025-05-10",
            ),
            video(
                2,
                "NOT YOUR ORDINARY BACKPACK 😎 Elody Large size is back! #backpack #racuntiktok",
                12_600,
                1_507,
                940_800,
                174,
                "2025-07-09",
            ),
            video(
                3,
                "Packing orders for 12.12 Sale! 📦 #packing #asmr",
                5_400,
                200,
                450_000,
                89,
                "2025-06-15",
            ),
            video(
                4,
                "New color alert! 🚨 Pastel Pink Series #newarrival #pink",
                3_200,
                450,
                210_000,
                120,
                "2025-06-20",
            ),
            video(
                5,
                "What fits in my Tweely Bag? 🎒 #whatsinmybag",
                9_800,
                890,
                780_000,
                230,
                "2025-07-01",
            ),
            video(
                6,
                "Flash Sale Spoiler 🤫 Don't tell boss #flashsale #spill",
                15_000,
                3_000,
                1_200_000,
                560,
                "2025-07-15",
            ),
            video(
                7,
                "Styling tips for college students 👗 #ootd #campus",
                4_500,
                320,
                340_000,
                95,
                "2025-05-25",
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::{parse_content, parse_listings};

    #[test]
    fn test_sample_listings_csv_roundtrip() {
        let parsed = parse_listings(SAMPLE_LISTINGS_CSV);
        assert_eq!(parsed.len(), 8);
        assert_eq!(parsed, DemoCatalog.listings());
    }

    #[test]
    fn test_sample_content_csv_roundtrip() {
        let parsed = parse_content(SAMPLE_CONTENT_CSV);
        assert_eq!(parsed.len(), 7);
        assert_eq!(parsed, DemoCatalog.content());
    }

    #[test]
    fn test_reparsing_gives_identical_records() {
        assert_eq!(parse_listings(SAMPLE_LISTINGS_CSV), parse_listings(SAMPLE_LISTINGS_CSV));
        assert_eq!(parse_content(SAMPLE_CONTENT_CSV), parse_content(SAMPLE_CONTENT_CSV));

        let messy = "h\n,,s,\"Tote\",96,1%,,x,1.5RB+\nshort\n,,s,Pouch,Rp25,2%,,4.6,TERJUAL 10RB+";
        assert_eq!(parse_listings(messy), parse_listings(messy));
        assert_eq!(parse_listings(messy).len(), 2);
    }

    #[test]
    fn test_demo_tags_come_from_captions() {
        for record in DemoCatalog.content() {
            assert!(!record.tags.is_empty());
            for tag in &record.tags {
                assert!(record.caption.contains(tag.as_str()));
            }
        }
    }

    #[test]
    fn test_empty_catalog() {
        assert!(EmptyCatalog.listings().is_empty());
        assert!(EmptyCatalog.content().is_empty());
    }
}
