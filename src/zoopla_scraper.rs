use crate::common_scraper::{absolute_url, fetch_html, selector};
use crate::{debug_println, parser};
use crate::models::{ListingSource, PageColumns};
use anyhow::Result;
use rand::seq::SliceRandom;
use reqwest::blocking::Client;
use scraper::Html;
use serde::{Deserialize, Serialize};

pub const BASE_URL: &str = "https://www.zoopla.co.uk";
const SEARCH_PATH: &str = "/for-sale";

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.1.1 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:89.0) Gecko/20100101 Firefox/89.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.114 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.114 Safari/537.36 Edg/91.0.864.54",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZooplaSearch {
    /// Zoopla location slug; may be a path such as `london/northwood`.
    pub location: String,
    pub min_price: u64,
    pub max_price: u64,
    pub page_size: usize,
    pub radius: f64,
    pub property_type: String,
    #[serde(alias = "include_sstc")]
    pub include_sold: bool,
}

impl Default for ZooplaSearch {
    fn default() -> Self {
        Self {
            location: String::new(),
            min_price: 375_000,
            max_price: 650_000,
            page_size: 25,
            radius: 0.0,
            property_type: "houses".to_string(),
            include_sold: false,
        }
    }
}

impl ZooplaSearch {
    pub fn new(location: &str, radius: f64) -> Self {
        Self {
            location: location.to_string(),
            radius,
            ..Self::default()
        }
    }
}

pub fn random_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

/// `page_number` is one-based, as Zoopla's `pn` parameter expects.
pub fn search_url(search: &ZooplaSearch, page_number: usize) -> String {
    let location = search
        .location
        .trim_matches('/')
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");

    format!(
        "{}{}/{}/{}/?include_sold={}&is_auction=false&is_shared_ownership=false&view_type=list&page_size={}&price_max={}&price_min={}&radius={}&pn={}",
        BASE_URL,
        SEARCH_PATH,
        urlencoding::encode(&search.property_type),
        location,
        search.include_sold,
        search.page_size,
        search.max_price,
        search.min_price,
        search.radius,
        page_number
    )
}

pub fn fetch_search_page(client: &Client, url: &str, user_agent: &str) -> Result<String> {
    fetch_html(
        client,
        url,
        &[
            ("User-Agent", user_agent),
            ("Accept-Language", "en-gb"),
            ("Referer", "https://www.google.com/"),
        ],
        ListingSource::Zoopla.domain(),
    )
}

/// A missing count element means no results rather than a broken page.
pub fn parse_result_count(body: &str) -> Result<usize> {
    let document = Html::parse_document(body);
    let count_selector =
        selector(r#"main[data-testid="search-content"] p[data-testid="total-results"]"#)?;

    let text = match document.select(&count_selector).next() {
        Some(element) => element.text().collect::<String>(),
        None => {
            debug_println!("No result count on zoopla.co.uk page, assuming 0");
            return Ok(0);
        }
    };

    Ok(parser::extract_first_number(&text).unwrap_or(0))
}

pub fn parse_page(body: &str) -> Result<PageColumns> {
    let document = Html::parse_document(body);

    let title_selector =
        selector(r#"div[data-testid="search-result"] h2[data-testid="listing-title"]"#)?;
    let price_selector =
        selector(r#"div[data-testid="search-result"] div[data-testid="listing-price"] p"#)?;
    let address_selector =
        selector(r#"div[data-testid="search-result"] p[data-testid="listing-description"]"#)?;
    let link_selector =
        selector(r#"div[data-testid="search-result"] a[data-testid="listing-details-link"]"#)?;
    let added_selector =
        selector(r#"div[data-testid="search-result"] span[data-testid="date-published"]"#)?;

    let texts = |sel: &scraper::Selector| -> Vec<String> {
        document
            .select(sel)
            .map(|element| element.text().collect::<String>().trim().to_string())
            .collect()
    };

    let columns = PageColumns {
        prices: texts(&price_selector)
            .into_iter()
            .filter(|text| text.contains('£'))
            .collect(),
        titles: texts(&title_selector),
        addresses: texts(&address_selector),
        links: document
            .select(&link_selector)
            .filter_map(|element| element.value().attr("href"))
            .map(|href| absolute_url(BASE_URL, href))
            .collect(),
        // The published span holds a label followed by the date itself
        added_on: document
            .select(&added_selector)
            .filter_map(|element| {
                element
                    .text()
                    .map(str::trim)
                    .filter(|text| !text.is_empty())
                    .last()
                    .map(str::to_string)
            })
            .collect(),
    };

    debug_println!(
        "Zoopla page: {} prices, {} titles, {} addresses, {} links, {} dates",
        columns.prices.len(),
        columns.titles.len(),
        columns.addresses.len(),
        columns.links.len(),
        columns.added_on.len()
    );

    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <main data-testid="search-content">
            <p data-testid="total-results">1,234 results</p>
            <div data-testid="search-result">
              <div data-testid="listing-price">
                <p>£550,000</p>
                <p>Guide price</p>
              </div>
              <a data-testid="listing-details-link" href="/for-sale/details/5001/">
                <h2 data-testid="listing-title">4 bed detached house for sale</h2>
              </a>
              <p data-testid="listing-description">Bath Road, Harrow, HA1</p>
              <span data-testid="date-published"><span>Listed on</span> 12th Jan 2021</span>
            </div>
            <div data-testid="search-result">
              <div data-testid="listing-price"><p>£625,000</p></div>
              <a data-testid="listing-details-link" href="/for-sale/details/5002/">
                <h2 data-testid="listing-title">3 bed terraced house for sale</h2>
              </a>
              <p data-testid="listing-description">Manor Way, Ruislip HA4</p>
              <span data-testid="date-published">Listed on 3rd Feb 2021</span>
            </div>
          </main>
        </body></html>
    "#;

    #[test]
    fn url_keeps_location_path() {
        let search = ZooplaSearch::new("london/northwood", 1.0);
        assert_eq!(
            search_url(&search, 2),
            "https://www.zoopla.co.uk/for-sale/houses/london/northwood/?include_sold=false&is_auction=false&is_shared_ownership=false&view_type=list&page_size=25&price_max=650000&price_min=375000&radius=1&pn=2"
        );
    }

    #[test]
    fn result_count_reads_first_number() {
        assert_eq!(parse_result_count(PAGE).unwrap(), 1234);
        assert_eq!(parse_result_count("<html><body></body></html>").unwrap(), 0);
    }

    #[test]
    fn page_columns_follow_results() {
        let columns = parse_page(PAGE).unwrap();
        assert_eq!(columns.prices, vec!["£550,000", "£625,000"]);
        assert_eq!(columns.titles.len(), 2);
        assert_eq!(columns.addresses[1], "Manor Way, Ruislip HA4");
        assert_eq!(columns.links[0], "https://www.zoopla.co.uk/for-sale/details/5001/");
        assert_eq!(columns.added_on, vec!["12th Jan 2021", "Listed on 3rd Feb 2021"]);
    }

    #[test]
    fn user_agent_comes_from_pool() {
        assert!(USER_AGENTS.contains(&random_user_agent()));
    }
}
