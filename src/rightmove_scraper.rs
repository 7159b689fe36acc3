use crate::common_scraper::{absolute_url, fetch_html, selector};
use crate::debug_println;
use crate::models::{ListingSource, PageColumns};
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use scraper::Html;
use serde::{Deserialize, Serialize};

pub const BASE_URL: &str = "https://www.rightmove.co.uk";
const SEARCH_PATH: &str = "/property-for-sale/find.html";
/// Rightmove always serves 24 cards per page; `index` is a result offset.
pub const PAGE_SIZE: usize = 24;
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RightmoveSearch {
    /// Rightmove location id, e.g. `REGION^93929`.
    #[serde(rename = "location")]
    pub location_identifier: String,
    pub min_price: u64,
    pub max_price: u64,
    pub radius: f64,
    pub property_type: String,
    pub include_sstc: bool,
}

impl Default for RightmoveSearch {
    fn default() -> Self {
        Self {
            location_identifier: String::new(),
            min_price: 250_000,
            max_price: 475_000,
            radius: 0.0,
            property_type: "houses".to_string(),
            include_sstc: true,
        }
    }
}

impl RightmoveSearch {
    pub fn new(location_identifier: &str, radius: f64) -> Self {
        Self {
            location_identifier: location_identifier.to_string(),
            radius,
            ..Self::default()
        }
    }
}

pub fn search_url(search: &RightmoveSearch, index: usize) -> String {
    format!(
        "{}{}?index={}&locationIdentifier={}&minPrice={}&maxPrice={}&radius={}&primaryDisplayPropertyType={}&includeSSTC={}",
        BASE_URL,
        SEARCH_PATH,
        index,
        urlencoding::encode(&search.location_identifier),
        search.min_price,
        search.max_price,
        search.radius,
        urlencoding::encode(&search.property_type),
        search.include_sstc
    )
}

pub fn fetch_search_page(client: &Client, url: &str) -> Result<String> {
    fetch_html(
        client,
        url,
        &[("User-Agent", USER_AGENT)],
        ListingSource::Rightmove.domain(),
    )
}

pub fn parse_result_count(body: &str) -> Result<usize> {
    let document = Html::parse_document(body);
    let count_selector = selector("span.searchHeader-resultCount")?;

    let text = document
        .select(&count_selector)
        .next()
        .map(|element| element.text().collect::<String>())
        .context("Result count not found on rightmove.co.uk page")?;

    let digits = text.trim().replace(',', "");
    digits
        .parse::<usize>()
        .with_context(|| format!("Failed to parse result count: {}", text.trim()))
}

pub fn parse_page(body: &str) -> Result<PageColumns> {
    let document = Html::parse_document(body);

    let title_selector =
        selector("div.propertyCard-details a.propertyCard-link h2.propertyCard-title")?;
    let price_selector = selector("div.propertyCard-priceValue")?;
    let address_selector = selector("address.propertyCard-address span")?;
    let link_selector = selector("div.propertyCard-details a.propertyCard-link")?;
    let added_selector = selector(
        "div.propertyCard-detailsFooter span.propertyCard-branchSummary-addedOrReduced",
    )?;

    let texts = |sel: &scraper::Selector| -> Vec<String> {
        document
            .select(sel)
            .map(|element| element.text().collect::<String>().trim().to_string())
            .collect()
    };

    let columns = PageColumns {
        prices: texts(&price_selector),
        titles: texts(&title_selector),
        addresses: texts(&address_selector),
        links: document
            .select(&link_selector)
            .filter_map(|element| element.value().attr("href"))
            .map(|href| absolute_url(BASE_URL, href))
            .collect(),
        added_on: texts(&added_selector),
    };

    debug_println!(
        "Rightmove page: {} prices, {} titles, {} addresses, {} links, {} dates",
        columns.prices.len(),
        columns.titles.len(),
        columns.addresses.len(),
        columns.links.len(),
        columns.added_on.len()
    );

    Ok(columns)
}
