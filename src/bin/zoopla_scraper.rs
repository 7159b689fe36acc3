use anyhow::Result;
use clap::Parser;
use propertyfinder::common_scraper::{run_scraper_with_options, ScrapingOptions};
use propertyfinder::scrapers::ZooplaScraper;
use propertyfinder::tui::ScraperTUI;
use propertyfinder::zoopla_scraper::ZooplaSearch;
use propertyfinder::{debug, utils};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Zoopla.co.uk Listing Scraper")]
struct Args {
    /// Zoopla location, e.g. ruislip or london/northwood
    #[clap(short, long)]
    location: String,

    /// Search radius in miles
    #[clap(short, long, default_value = "0")]
    radius: f64,

    #[clap(long, default_value = "375000")]
    min_price: u64,

    #[clap(long, default_value = "650000")]
    max_price: u64,

    /// Results per page
    #[clap(long, default_value = "25")]
    page_size: usize,

    /// Property type filter
    #[clap(long, default_value = "houses")]
    property_type: String,

    /// Include sold and under offer listings
    #[clap(long)]
    include_sold: bool,

    /// Path to output CSV file
    #[clap(short, long, default_value = "properties.csv")]
    output: String,

    /// Maximum number of result pages to scrape
    #[clap(short, long)]
    max_pages: Option<usize>,

    /// Pause between page requests in milliseconds
    #[clap(long, default_value = "1000")]
    delay_ms: u64,

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

    let search = ZooplaSearch {
        location: args.location,
        min_price: args.min_price,
        max_price: args.max_price,
        page_size: args.page_size,
        radius: args.radius,
        property_type: args.property_type,
        include_sold: args.include_sold,
    };

    let options = ScrapingOptions {
        max_pages: args.max_pages,
        delay_ms: args.delay_ms,
    };

    let scraper = ZooplaScraper::new(search)?;
    let result = run_scraper_with_options(&scraper, &options, Some(&mut tui))?;

    let merged = utils::merge_listings(existing, result.listings);
    tui.show_final_summary(merged.added.len(), merged.listings.len())?;

    utils::save_listings_to_csv(&merged.listings, &args.output)?;

    Ok(())
}
