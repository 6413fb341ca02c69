use anyhow::{Context, Result};
use commerce_insights_builder::*;

fn main() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => InsightsConfig::from_json_file(&path)
            .with_context(|| format!("loading config from {}", path))?,
        None => InsightsConfig::default(),
    };
    let processor = InsightsProcessor::new(config)?;

    let mut records = RecordSets::from_provider(&DemoCatalog);
    if let Ok(path) = std::env::var("LISTINGS_CSV") {
        let text = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path))?;
        processor.ingest_listings(&mut records, &text);
    }
    if let Ok(path) = std::env::var("CONTENT_CSV") {
        let text = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path))?;
        processor.ingest_content(&mut records, &text);
    }

    let overview = processor.overview(&records);
    println!("{}", overview.to_markdown());

    let executive = processor.executive_now(&records, TrendWindow::Week)?;
    println!("{}", executive.to_markdown());

    println!("=== Executive JSON ===");
    println!("{}", executive.to_json()?);

    Ok(())
}
