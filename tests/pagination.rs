// tests/pagination.rs
use std::cell::RefCell;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use propertyfinder::common_scraper::{run_scraper_with_options, PlatformScraper, ScrapingOptions};
use propertyfinder::models::{ListingSource, PageColumns};
use propertyfinder::{parser, rightmove_scraper};

/// Serves canned Rightmove pages keyed by result offset.
struct FixtureScraper {
    pages: Vec<String>,
    requested: RefCell<Vec<String>>,
}

impl FixtureScraper {
    fn new(pages: Vec<String>) -> Self {
        Self {
            pages,
            requested: RefCell::new(Vec::new()),
        }
    }
}

impl PlatformScraper for FixtureScraper {
    fn name(&self) -> &str {
        "Fixture"
    }

    fn source(&self) -> ListingSource {
        ListingSource::Rightmove
    }

    fn location(&self) -> &str {
        "REGION^0"
    }

    fn page_size(&self) -> usize {
        2
    }

    fn page_url(&self, page: usize) -> String {
        format!("fixture://index={}", page * 2)
    }

    fn fetch_page(&self, url: &str) -> Result<String> {
        self.requested.borrow_mut().push(url.to_string());
        let index: usize = url
            .rsplit('=')
            .next()
            .and_then(|n| n.parse().ok())
            .ok_or_else(|| anyhow!("bad fixture url {}", url))?;
        self.pages
            .get(index / 2)
            .cloned()
            .ok_or_else(|| anyhow!("Cannot make request to fixture. Returned status: 404 Not Found"))
    }

    fn result_count(&self, body: &str) -> Result<usize> {
        rightmove_scraper::parse_result_count(body)
    }

    fn parse_page(&self, body: &str) -> Result<PageColumns> {
        rightmove_scraper::parse_page(body)
    }

    fn parse_added_on(&self, text: &str, today: NaiveDate) -> Option<NaiveDate> {
        parser::parse_slash_date(text, today)
    }
}

fn card(id: u32, price: &str, title: &str, address: &str, added: &str) -> String {
    format!(
        r#"<div class="propertyCard">
             <div class="propertyCard-priceValue">{price}</div>
             <div class="propertyCard-details">
               <a class="propertyCard-link" href="/properties/{id}"><h2 class="propertyCard-title">{title}</h2></a>
               <address class="propertyCard-address"><span>{address}</span></address>
             </div>
             <div class="propertyCard-detailsFooter">
               <span class="propertyCard-branchSummary-addedOrReduced">{added}</span>
             </div>
           </div>"#
    )
}

fn page(count: usize, cards: &[String]) -> String {
    format!(
        r#"<html><body><span class="searchHeader-resultCount">{}</span>{}</body></html>"#,
        count,
        cards.join("\n")
    )
}

fn no_delay() -> ScrapingOptions {
    ScrapingOptions {
        max_pages: None,
        delay_ms: 0,
    }
}

#[test]
fn walks_every_page_and_sorts_newest_first() {
    let pages = vec![
        page(
            5,
            &[
                card(1, "£300,000", "2 bedroom flat", "High Road, EN5", "Added on 01/01/2021"),
                card(2, "£310,000", "3 bedroom house", "Low Road, EN4", "Added on 05/01/2021"),
            ],
        ),
        page(
            5,
            &[
                card(3, "£320,000", "Studio", "Mid Road, HA6", "Added on 03/01/2021"),
                card(4, "POA", "4 bedroom house", "Top Road, HA5", "Featured"),
            ],
        ),
        page(5, &[card(5, "£330,000", "1 bedroom flat", "End Road, HA4", "Added on 10/01/2021")]),
    ];
    let scraper = FixtureScraper::new(pages);

    let result = run_scraper_with_options(&scraper, &no_delay(), None).unwrap();

    assert_eq!(result.total_results, 5);
    assert_eq!(result.pages_scraped, 3);
    assert_eq!(
        *scraper.requested.borrow(),
        vec!["fixture://index=0", "fixture://index=2", "fixture://index=4"]
    );

    let urls: Vec<&str> = result.listings.iter().map(|l| l.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://www.rightmove.co.uk/properties/5",
            "https://www.rightmove.co.uk/properties/2",
            "https://www.rightmove.co.uk/properties/3",
            "https://www.rightmove.co.uk/properties/1",
            "https://www.rightmove.co.uk/properties/4",
        ]
    );

    let studio = &result.listings[2];
    assert_eq!(studio.number_bedrooms, Some(0));
    assert_eq!(studio.postcode.as_deref(), Some("HA6"));
    assert_eq!(studio.price, Some(320_000));

    let undated = &result.listings[4];
    assert_eq!(undated.price, None);
    assert_eq!(undated.added_on, None);
    assert!(result.listings.iter().all(|l| l.source == ListingSource::Rightmove));
}

#[test]
fn max_pages_caps_requests() {
    let pages = vec![
        page(6, &[card(1, "£1", "1 bed", "A Road, EN1", "Added today")]),
        page(6, &[card(2, "£2", "2 bed", "B Road, EN2", "Added today")]),
        page(6, &[card(3, "£3", "3 bed", "C Road, EN3", "Added today")]),
    ];
    let scraper = FixtureScraper::new(pages);
    let options = ScrapingOptions {
        max_pages: Some(2),
        delay_ms: 0,
    };

    let result = run_scraper_with_options(&scraper, &options, None).unwrap();
    assert_eq!(result.pages_scraped, 2);
    assert_eq!(result.listings.len(), 2);
    assert_eq!(scraper.requested.borrow().len(), 2);
}

#[test]
fn empty_search_still_reads_first_page() {
    let scraper = FixtureScraper::new(vec![page(0, &[])]);
    let result = run_scraper_with_options(&scraper, &no_delay(), None).unwrap();
    assert_eq!(result.pages_scraped, 1);
    assert!(result.listings.is_empty());
}

#[test]
fn failed_page_stops_the_run() {
    // Count says three pages but only one exists
    let scraper = FixtureScraper::new(vec![page(
        6,
        &[card(1, "£1", "1 bed", "A Road, EN1", "Added today")],
    )]);
    let err = run_scraper_with_options(&scraper, &no_delay(), None)
        .err()
        .expect("second page should fail");
    assert!(format!("{:#}", err).contains("Returned status: 404"));
}
