use crate::models::{Listing, ListingSource, PageColumns};
use crate::tui::ScraperTUI;
use crate::{debug_eprintln, debug_println, parser, utils};
use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use reqwest::blocking::Client;
use scraper::Selector;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ScrapingOptions {
    /// Upper bound on result pages per search; `None` follows the result count.
    pub max_pages: Option<usize>,
    /// Pause between consecutive page requests.
    pub delay_ms: u64,
}

impl Default for ScrapingOptions {
    fn default() -> Self {
        Self {
            max_pages: None,
            delay_ms: 500,
        }
    }
}

pub trait PlatformScraper {
    fn name(&self) -> &str;
    fn source(&self) -> ListingSource;
    /// Human readable search target, used in progress output.
    fn location(&self) -> &str;
    fn page_size(&self) -> usize;
    /// URL of the zero-based result page `page`.
    fn page_url(&self, page: usize) -> String;
    fn fetch_page(&self, url: &str) -> Result<String>;
    fn result_count(&self, body: &str) -> Result<usize>;
    fn parse_page(&self, body: &str) -> Result<PageColumns>;
    fn parse_added_on(&self, text: &str, today: NaiveDate) -> Option<NaiveDate>;
}

pub struct ScrapingResult {
    pub listings: Vec<Listing>,
    pub total_results: usize,
    pub pages_scraped: usize,
}

pub fn http_client() -> Result<Client> {
    Client::builder()
        .cookie_store(true)
        .timeout(Duration::from_secs(30))
        .build()
        .context("Failed to build HTTP client")
}

/// GETs `url` and returns the body. Any non-success status is an error.
pub fn fetch_html(client: &Client, url: &str, headers: &[(&str, &str)], domain: &str) -> Result<String> {
    debug_println!("Making request to {}", url);

    let mut request = client.get(url);
    for (name, value) in headers {
        request = request.header(*name, *value);
    }

    let response = request
        .send()
        .with_context(|| format!("Failed to fetch {}", url))?;

    let status = response.status();
    if !status.is_success() {
        debug_eprintln!("HTTP error {}: {}", status, url);
        return Err(anyhow!(
            "Cannot make request to {}. Returned status: {}",
            domain,
            status
        ));
    }

    response.text().context("Failed to read response body")
}

pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("Failed to parse selector {}: {:?}", css, e))
}

pub fn absolute_url(base: &str, href: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else {
        format!("{}{}", base, href)
    }
}

pub fn number_of_pages(total_results: usize, page_size: usize) -> Result<usize> {
    if page_size == 0 {
        return Err(anyhow!("Page size must be greater than zero"));
    }
    Ok((total_results + page_size - 1) / page_size)
}

/// Walks every result page of one search and returns the normalized listings,
/// newest first.
pub fn run_scraper_with_options<T: PlatformScraper>(
    scraper: &T,
    options: &ScrapingOptions,
    mut tui: Option<&mut ScraperTUI>,
) -> Result<ScrapingResult> {
    let now = parser::uk_now();
    let today = now.date_naive();
    let search_datetime = parser::format_search_datetime(now.naive_local());

    let first_url = scraper.page_url(0);
    let first_body = match scraper.fetch_page(&first_url) {
        Ok(body) => body,
        Err(e) => {
            if let Some(tui) = tui.as_mut() {
                tui.fail_search(scraper.name(), scraper.location(), &e.to_string())?;
            }
            return Err(e);
        }
    };

    let total_results = scraper.result_count(&first_body)?;
    let pages = number_of_pages(total_results, scraper.page_size())?;

    // The first page is parsed even when the count says there is nothing
    let mut pages_to_scrape = pages.max(1);
    if let Some(max) = options.max_pages {
        pages_to_scrape = pages_to_scrape.min(max.max(1));
    }

    debug_println!(
        "Processing {} of {} pages on {} for {}",
        pages_to_scrape,
        pages,
        scraper.name(),
        scraper.location()
    );

    if let Some(tui) = tui.as_mut() {
        tui.start_search(scraper.name(), scraper.location(), pages_to_scrape)?;
    }

    let mut raw_listings = scraper.parse_page(&first_body)?.into_raw_listings();
    if let Some(tui) = tui.as_mut() {
        tui.update_page_progress(1, pages_to_scrape, raw_listings.len())?;
    }

    for page in 1..pages_to_scrape {
        if options.delay_ms > 0 {
            std::thread::sleep(Duration::from_millis(options.delay_ms));
        }

        let url = scraper.page_url(page);
        let body = match scraper.fetch_page(&url) {
            Ok(body) => body,
            Err(e) => {
                if let Some(tui) = tui.as_mut() {
                    tui.fail_search(scraper.name(), scraper.location(), &e.to_string())?;
                }
                return Err(e.context(format!("Failed on page {} of {}", page + 1, pages_to_scrape)));
            }
        };

        let page_listings = scraper.parse_page(&body)?.into_raw_listings();
        debug_println!("Page {}: found {} listings", page + 1, page_listings.len());
        raw_listings.extend(page_listings);

        if let Some(tui) = tui.as_mut() {
            tui.update_page_progress(page + 1, pages_to_scrape, raw_listings.len())?;
        }
    }

    let mut listings: Vec<Listing> = raw_listings
        .into_iter()
        .map(|raw| {
            parser::normalize_listing(raw, scraper.source(), today, &search_datetime, |text, today| {
                scraper.parse_added_on(text, today)
            })
        })
        .collect();
    utils::sort_by_added_on(&mut listings);

    if let Some(tui) = tui.as_mut() {
        tui.finish_search(scraper.name(), scraper.location(), listings.len())?;
    }

    Ok(ScrapingResult {
        listings,
        total_results,
        pages_scraped: pages_to_scrape,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_round_up() {
        assert_eq!(number_of_pages(0, 24).unwrap(), 0);
        assert_eq!(number_of_pages(24, 24).unwrap(), 1);
        assert_eq!(number_of_pages(25, 24).unwrap(), 2);
        assert_eq!(number_of_pages(1234, 25).unwrap(), 50);
        assert!(number_of_pages(10, 0).is_err());
    }

    #[test]
    fn relative_links_get_origin() {
        assert_eq!(
            absolute_url("https://www.zoopla.co.uk", "/for-sale/details/1/"),
            "https://www.zoopla.co.uk/for-sale/details/1/"
        );
        assert_eq!(
            absolute_url("https://www.zoopla.co.uk", "https://elsewhere.example/x"),
            "https://elsewhere.example/x"
        );
    }
}
