use crate::common_scraper::{self, PlatformScraper};
use crate::models::{ListingSource, PageColumns};
use crate::rightmove_scraper::{self, RightmoveSearch};
use crate::zoopla_scraper::{self, ZooplaSearch};
use crate::parser;
use anyhow::Result;
use chrono::NaiveDate;
use reqwest::blocking::Client;

pub struct RightmoveScraper {
    search: RightmoveSearch,
    client: Client,
}

impl RightmoveScraper {
    pub fn new(search: RightmoveSearch) -> Result<Self> {
        Ok(Self {
            search,
            client: common_scraper::http_client()?,
        })
    }
}

impl PlatformScraper for RightmoveScraper {
    fn name(&self) -> &str {
        "Rightmove"
    }

    fn source(&self) -> ListingSource {
        ListingSource::Rightmove
    }

    fn location(&self) -> &str {
        &self.search.location_identifier
    }

    fn page_size(&self) -> usize {
        rightmove_scraper::PAGE_SIZE
    }

    fn page_url(&self, page: usize) -> String {
        rightmove_scraper::search_url(&self.search, page * rightmove_scraper::PAGE_SIZE)
    }

    fn fetch_page(&self, url: &str) -> Result<String> {
        rightmove_scraper::fetch_search_page(&self.client, url)
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

pub struct ZooplaScraper {
    search: ZooplaSearch,
    client: Client,
    user_agent: &'static str,
}

impl ZooplaScraper {
    pub fn new(search: ZooplaSearch) -> Result<Self> {
        Ok(Self {
            search,
            client: common_scraper::http_client()?,
            user_agent: zoopla_scraper::random_user_agent(),
        })
    }
}

impl PlatformScraper for ZooplaScraper {
    fn name(&self) -> &str {
        "Zoopla"
    }

    fn source(&self) -> ListingSource {
        ListingSource::Zoopla
    }

    fn location(&self) -> &str {
        &self.search.location
    }

    fn page_size(&self) -> usize {
        self.search.page_size
    }

    fn page_url(&self, page: usize) -> String {
        zoopla_scraper::search_url(&self.search, page + 1)
    }

    fn fetch_page(&self, url: &str) -> Result<String> {
        zoopla_scraper::fetch_search_page(&self.client, url, self.user_agent)
    }

    fn result_count(&self, body: &str) -> Result<usize> {
        zoopla_scraper::parse_result_count(body)
    }

    fn parse_page(&self, body: &str) -> Result<PageColumns> {
        zoopla_scraper::parse_page(body)
    }

    fn parse_added_on(&self, text: &str, today: NaiveDate) -> Option<NaiveDate> {
        parser::parse_long_date(text, today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rightmove_pages_step_by_offset() {
        let scraper = RightmoveScraper::new(RightmoveSearch::new("REGION^1017", 1.0)).unwrap();
        assert!(scraper.page_url(0).contains("index=0&"));
        assert!(scraper.page_url(2).contains("index=48&"));
    }

    #[test]
    fn zoopla_pages_are_one_based() {
        let scraper = ZooplaScraper::new(ZooplaSearch::new("ruislip", 1.0)).unwrap();
        assert!(scraper.page_url(0).ends_with("&pn=1"));
        assert!(scraper.page_url(3).ends_with("&pn=4"));
    }
}
