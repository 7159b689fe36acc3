use anyhow::Result;
use clap::Parser;
use propertyfinder::common_scraper::{run_scraper_with_options, ScrapingOptions};
use propertyfinder::rightmove_scraper::RightmoveSearch;
use propertyfinder::scrapers::RightmoveScraper;
use propertyfinder::tui::ScraperTUI;
use propertyfinder::{debug, utils};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Rightmove.co.uk Listing Scraper")]
struct Args {
    /// Rightmove location identifier, e.g. REGION^93929
    #[clap(short, long)]
    location: String,

    /// Search radius in miles
    #[clap(short, long, default_value = "0")]
    radius: f64,

    #[clap(long, default_value = "250000")]
    min_price: u64,

    #[clap(long, default_value = "475000")]
    max_price: u64,

    /// Property type filter
    #[clap(long, default_value = "houses")]
    property_type: String,

    /// Leave out listings that are sold subject to contract
    #[clap(long)]
    exclude_sstc: bool,

    /// Path to output CSV file
    #[clap(short, long, default_value = "properties.csv")]
    output: String,

    /// Maximum number of result pages to scrape
    #[clap(short, long)]
    max_pages: Option<usize>,

    /// Enable debug output
    #[clap(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    debug::init(args.debug);

    let existing = utils::load_listings_from_csv(&args.output)?;
    let mut tui = ScraperTUI::new();
    tui.show_summary(existing.len())?;

    let search = RightmoveSearch {
        location_identifier: args.location,
        min_price: args.min_price,
        max_price: args.max_price,
        radius: args.radius,
        property_type: args.property_type,
        include_sstc: !args.exclude_sstc,
    };

    let options = ScrapingOptions {
        max_pages: args.max_pages,
        ..ScrapingOptions::default()
    };

    let scraper = RightmoveScraper::new(search)?;
    let result = run_scraper_with_options(&scraper, &options, Some(&mut tui))?;

    let merged = utils::merge_listings(existing, result.listings);
    tui.show_final_summary(merged.added.len(), merged.listings.len())?;

    utils::save_listings_to_csv(&merged.listings, &args.output)?;

    Ok(())
}
