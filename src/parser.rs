use crate::models::{Listing, ListingSource, RawListing};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::{Europe::London, Tz};
use regex::Regex;
use std::sync::OnceLock;

const SEARCH_DATETIME_FORMAT: &str = "%I:%M%p on %B %d, %Y";

fn postcode_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b([A-Za-z][A-Za-z]?[0-9][0-9]?[A-Za-z]?)\b").unwrap())
}

fn bedrooms_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(\d\d?)\b").unwrap())
}

fn slash_date_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b([0-9]{1,2}/[0-9]{1,2}/[0-9]{4})\b").unwrap())
}

fn digits_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]+").unwrap())
}

fn ordinal_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d)(st|nd|rd|th)\b").unwrap())
}

fn long_date_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(\d{1,2} [A-Za-z]{3,9} \d{4})\b").unwrap())
}

fn relative_day_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b(today|yesterday)\b").unwrap())
}

/// First run of digits, ignoring thousands separators: "1,234 results" is 1234.
pub fn extract_first_number(text: &str) -> Option<usize> {
    let text = text.replace(',', "");
    digits_regex()
        .find(&text)
        .and_then(|m| m.as_str().parse::<usize>().ok())
}

/// Keeps only the digits of a price such as "£425,000" or "Offers over £1,000,000".
pub fn extract_price(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<u64>().ok()
}

/// First postcode-district looking token of the address, e.g. "EN5" or "HA6".
pub fn extract_postcode(address: &str) -> Option<String> {
    postcode_regex()
        .captures(address)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
}

pub fn extract_bedrooms(title: &str) -> Option<u32> {
    if title.to_lowercase().contains("studio") {
        return Some(0);
    }
    bedrooms_regex()
        .captures(title)
        .and_then(|captures| captures.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
}

pub fn clean_title(title: &str) -> String {
    title.trim().to_string()
}

/// Replaces "today" and "yesterday" with `dd/mm/yyyy` dates relative to `today`.
pub fn resolve_relative_days(text: &str, today: NaiveDate) -> String {
    let yesterday = today - Duration::days(1);
    relative_day_regex()
        .replace_all(text, |captures: &regex::Captures| {
            if captures[1].eq_ignore_ascii_case("today") {
                today.format("%d/%m/%Y").to_string()
            } else {
                yesterday.format("%d/%m/%Y").to_string()
            }
        })
        .into_owned()
}

/// Rightmove style: "Added on 12/01/2021", "Reduced today".
pub fn parse_slash_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let resolved = resolve_relative_days(text, today);
    let captures = slash_date_regex().captures(&resolved)?;
    NaiveDate::parse_from_str(captures.get(1)?.as_str(), "%d/%m/%Y").ok()
}

/// Zoopla style: "Listed on 12th Jan 2021".
pub fn parse_long_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let resolved = resolve_relative_days(text, today);
    if let Some(date) = parse_slash_date(&resolved, today) {
        return Some(date);
    }

    let stripped = ordinal_regex().replace_all(&resolved, "$1");
    let captures = long_date_regex().captures(&stripped)?;
    let candidate = captures.get(1)?.as_str();

    ["%d %b %Y", "%d %B %Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(candidate, format).ok())
}

/// Both sites are UK listings, so dates and scrape times are read in UK time
/// whatever the host's time zone.
pub fn uk_time(instant: DateTime<Utc>) -> DateTime<Tz> {
    instant.with_timezone(&London)
}

pub fn uk_now() -> DateTime<Tz> {
    uk_time(Utc::now())
}

pub fn format_search_datetime(now: chrono::NaiveDateTime) -> String {
    now.format(SEARCH_DATETIME_FORMAT).to_string()
}

/// Turns one raw row into a typed listing. `parse_date` is the site's
/// posted-date reading.
pub fn normalize_listing(
    raw: RawListing,
    source: ListingSource,
    today: NaiveDate,
    search_datetime: &str,
    parse_date: impl Fn(&str, NaiveDate) -> Option<NaiveDate>,
) -> Listing {
    let title = raw.title.as_deref().map(clean_title).unwrap_or_default();
    let address = raw.address.trim().to_string();

    Listing {
        source,
        price: raw.price.as_deref().and_then(extract_price),
        number_bedrooms: extract_bedrooms(&title),
        postcode: extract_postcode(&address),
        property_type: title,
        address,
        url: raw.url.unwrap_or_default(),
        added_on: raw.added_on.as_deref().and_then(|text| parse_date(text, today)),
        search_datetime: search_datetime.to_string(),
    }
}
