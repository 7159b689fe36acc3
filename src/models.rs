use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingSource {
    Rightmove,
    Zoopla,
}

impl ListingSource {
    pub fn domain(&self) -> &'static str {
        match self {
            ListingSource::Rightmove => "rightmove.co.uk",
            ListingSource::Zoopla => "zoopla.co.uk",
        }
    }
}

impl fmt::Display for ListingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListingSource::Rightmove => write!(f, "rightmove"),
            ListingSource::Zoopla => write!(f, "zoopla"),
        }
    }
}

/// One row of the search result page, as text, before normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawListing {
    pub price: Option<String>,
    pub title: Option<String>,
    pub address: String,
    pub url: Option<String>,
    pub added_on: Option<String>,
}

/// The parallel columns extracted from a single search result page.
#[derive(Debug, Clone, Default)]
pub struct PageColumns {
    pub prices: Vec<String>,
    pub titles: Vec<String>,
    pub addresses: Vec<String>,
    pub links: Vec<String>,
    pub added_on: Vec<String>,
}

impl PageColumns {
    pub fn len(&self) -> usize {
        [
            self.prices.len(),
            self.titles.len(),
            self.addresses.len(),
            self.links.len(),
            self.added_on.len(),
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lines the columns up by position. Shorter columns are padded with
    /// missing values and rows without an address are dropped.
    pub fn into_raw_listings(self) -> Vec<RawListing> {
        let rows = self.len();
        let mut prices = self.prices.into_iter();
        let mut titles = self.titles.into_iter();
        let mut addresses = self.addresses.into_iter();
        let mut links = self.links.into_iter();
        let mut added_on = self.added_on.into_iter();

        let mut listings = Vec::with_capacity(rows);
        for _ in 0..rows {
            let price = prices.next();
            let title = titles.next();
            let address = addresses.next();
            let url = links.next();
            let added = added_on.next();

            if let Some(address) = address {
                listings.push(RawListing {
                    price,
                    title,
                    address,
                    url,
                    added_on: added,
                });
            }
        }
        listings
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub source: ListingSource,
    pub price: Option<u64>,
    #[serde(rename = "type")]
    pub property_type: String,
    pub address: String,
    pub url: String,
    #[serde(
        default,
        serialize_with = "serialize_date",
        deserialize_with = "deserialize_date"
    )]
    pub added_on: Option<NaiveDate>,
    pub search_datetime: String,
    pub postcode: Option<String>,
    pub number_bedrooms: Option<u32>,
}

/// The columns that identify a listing. Scrape time and posting date are
/// left out so a re-scraped listing matches its stored copy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListingKey {
    source: ListingSource,
    price: Option<u64>,
    property_type: String,
    address: String,
    url: String,
    postcode: Option<String>,
    number_bedrooms: Option<u32>,
}

impl Listing {
    pub fn key(&self) -> ListingKey {
        ListingKey {
            source: self.source,
            price: self.price,
            property_type: self.property_type.clone(),
            address: self.address.clone(),
            url: self.url.clone(),
            postcode: self.postcode.clone(),
            number_bedrooms: self.number_bedrooms,
        }
    }

    pub fn display_price(&self) -> String {
        match self.price {
            Some(price) => format!("£{}", group_thousands(price)),
            None => "POA".to_string(),
        }
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn serialize_date<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match date {
        Some(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
        None => serializer.serialize_str(""),
    }
}

// Older files were written with day-first dates, so accept those as well
fn deserialize_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let raw = match raw {
        Some(s) if !s.trim().is_empty() => s,
        _ => return Ok(None),
    };

    for format in ["%Y-%m-%d", "%d/%m/%Y", "%d.%m.%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw.trim(), format) {
            return Ok(Some(date));
        }
    }

    Err(serde::de::Error::custom(format!("invalid date: {}", raw)))
}
