use anyhow::Result;
use clap::Parser;
use propertyfinder::common_scraper::{run_scraper_with_options, ScrapingOptions};
use propertyfinder::config::{self, EmailConfig, SearchSpec};
use propertyfinder::notifier::{self, Notifier};
use propertyfinder::scrapers::{RightmoveScraper, ZooplaScraper};
use propertyfinder::tui::ScraperTUI;
use propertyfinder::{debug, debug_println, parser, utils};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Propertyfinder - Rightmove and Zoopla listing watcher")]
struct Args {
    /// Path to output CSV file
    #[clap(short, long, default_value = "properties.csv")]
    output: String,

    /// JSON file with the searches to run (built-in searches if not set)
    #[clap(short, long)]
    searches: Option<String>,

    /// Maximum number of result pages to scrape per search
    #[clap(short, long)]
    max_pages: Option<usize>,

    /// Pause between page requests in milliseconds
    #[clap(long, default_value = "500")]
    delay_ms: u64,

    /// Skip Rightmove searches
    #[clap(long)]
    skip_rightmove: bool,

    /// Skip Zoopla searches
    #[clap(long)]
    skip_zoopla: bool,

    /// Do not send the e-mail summary
    #[clap(long)]
    no_email: bool,

    /// E-mail every newly added listing, not just yesterday's
    #[clap(long)]
    all_new: bool,

    /// SendGrid API key
    #[clap(long, env = "SENDGRID_API_KEY", hide_env_values = true)]
    sendgrid_api_key: Option<String>,

    /// Sender address
    #[clap(long, env = "PROPERTYFINDER_FROM_EMAIL")]
    from_email: Option<String>,

    /// Sender display name
    #[clap(long, env = "PROPERTYFINDER_FROM_NAME", default_value = "Property Finder")]
    from_name: String,

    /// Comma-separated recipient addresses
    #[clap(long, env = "PROPERTYFINDER_TO_EMAILS")]
    to_emails: Option<String>,

    /// Enable debug output
    #[clap(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    debug::init(args.debug);

    println!("Propertyfinder - Rightmove & Zoopla listing watcher");
    println!("===================================================");

    let searches = config::load_searches(args.searches.as_deref())?;
    debug_println!("Running {} searches", searches.len());

    let existing = utils::load_listings_from_csv(&args.output)?;
    let mut tui = ScraperTUI::new();
    tui.show_summary(existing.len())?;

    let options = ScrapingOptions {
        max_pages: args.max_pages,
        delay_ms: args.delay_ms,
    };

    let mut scraped = Vec::new();
    for search in searches {
        match search {
            SearchSpec::Rightmove(search) => {
                if args.skip_rightmove {
                    debug_println!("Skipping rightmove search {}", search.location_identifier);
                    continue;
                }
                let scraper = RightmoveScraper::new(search)?;
                let result = run_scraper_with_options(&scraper, &options, Some(&mut tui))?;
                scraped.extend(result.listings);
            }
            SearchSpec::Zoopla(search) => {
                if args.skip_zoopla {
                    debug_println!("Skipping zoopla search {}", search.location);
                    continue;
                }
                let scraper = ZooplaScraper::new(search)?;
                let result = run_scraper_with_options(&scraper, &options, Some(&mut tui))?;
                scraped.extend(result.listings);
            }
        }
    }

    let merged = utils::merge_listings(existing, scraped);
    tui.show_final_summary(merged.added.len(), merged.listings.len())?;

    if merged.added.is_empty() {
        println!("\nNo new listings to add.");
        return Ok(());
    }

    utils::save_listings_to_csv(&merged.listings, &args.output)?;

    if args.no_email {
        return Ok(());
    }

    let email_config = match EmailConfig::from_parts(
        args.sendgrid_api_key,
        args.from_email,
        args.from_name,
        args.to_emails,
    ) {
        Some(config) => config,
        None => {
            tui.show_email_status("E-mail not configured, skipping notification", false)?;
            return Ok(());
        }
    };

    let to_send = if args.all_new {
        merged.added
    } else {
        notifier::listings_added_yesterday(&merged.added, parser::uk_now().date_naive())
    };

    match Notifier::new(email_config)?.send(&to_send) {
        Ok(true) => tui.show_email_status(&format!("Sent {} listings", to_send.len()), true)?,
        Ok(false) => tui.show_email_status("No listings from yesterday to send", true)?,
        Err(e) => {
            eprintln!("Error whilst trying to send email: {:#}", e);
            tui.show_email_status("E-mail failed, listings were still saved", false)?;
        }
    }

    Ok(())
}
