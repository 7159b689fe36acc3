use crate::models::ListingSource;
use crate::rightmove_scraper::RightmoveSearch;
use crate::zoopla_scraper::ZooplaSearch;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum SearchSpec {
    Rightmove(RightmoveSearch),
    Zoopla(ZooplaSearch),
}

impl SearchSpec {
    pub fn source(&self) -> ListingSource {
        match self {
            SearchSpec::Rightmove(_) => ListingSource::Rightmove,
            SearchSpec::Zoopla(_) => ListingSource::Zoopla,
        }
    }

    pub fn location(&self) -> &str {
        match self {
            SearchSpec::Rightmove(search) => &search.location_identifier,
            SearchSpec::Zoopla(search) => &search.location,
        }
    }
}

/// Barnet, Northwood, Ruislip and Harrow-on-the-Hill on both sites.
pub fn default_searches() -> Vec<SearchSpec> {
    vec![
        SearchSpec::Rightmove(RightmoveSearch::new("REGION^93929", 0.0)),
        SearchSpec::Rightmove(RightmoveSearch::new("REGION^1017", 1.0)),
        SearchSpec::Rightmove(RightmoveSearch::new("REGION^1154", 1.0)),
        SearchSpec::Rightmove(RightmoveSearch::new("REGION^79781", 0.5)),
        SearchSpec::Zoopla(ZooplaSearch::new("barnet-london-borough", 0.0)),
        SearchSpec::Zoopla(ZooplaSearch::new("london/northwood", 1.0)),
        SearchSpec::Zoopla(ZooplaSearch::new("ruislip", 1.0)),
        SearchSpec::Zoopla(ZooplaSearch::new("harrow-on-the-hill", 1.0)),
    ]
}

pub fn parse_searches(json: &str) -> Result<Vec<SearchSpec>> {
    let searches: Vec<SearchSpec> =
        serde_json::from_str(json).context("Failed to parse searches")?;

    for (i, search) in searches.iter().enumerate() {
        if search.location().trim().is_empty() {
            return Err(anyhow!("Search {} ({}) has no location", i + 1, search.source()));
        }
        if let SearchSpec::Zoopla(zoopla) = search {
            if zoopla.page_size == 0 {
                return Err(anyhow!("Search {} (zoopla) has a page size of 0", i + 1));
            }
        }
    }

    Ok(searches)
}

/// Reads the searches file, or falls back to the built-in list.
pub fn load_searches(path: Option<&str>) -> Result<Vec<SearchSpec>> {
    match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read searches file: {}", path))?;
            parse_searches(&json).with_context(|| format!("Invalid searches file: {}", path))
        }
        None => Ok(default_searches()),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmailConfig {
    pub api_key: String,
    pub from_email: String,
    pub from_name: String,
    pub to_emails: Vec<String>,
}

impl EmailConfig {
    /// Returns `None` unless the key, sender and at least one recipient are set.
    pub fn from_parts(
        api_key: Option<String>,
        from_email: Option<String>,
        from_name: String,
        to_emails: Option<String>,
    ) -> Option<Self> {
        let api_key = api_key.filter(|s| !s.trim().is_empty())?;
        let from_email = from_email.filter(|s| !s.trim().is_empty())?;
        let to_emails: Vec<String> = to_emails?
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if to_emails.is_empty() {
            return None;
        }

        Some(Self {
            api_key,
            from_email: from_email.trim().to_string(),
            from_name,
            to_emails,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn searches_file_fills_in_defaults() {
        let json = r#"[
            { "source": "rightmove", "location": "REGION^1154", "radius": 1 },
            { "source": "zoopla", "location": "london/northwood", "max_price": 700000, "include_sstc": true }
        ]"#;
        let searches = parse_searches(json).unwrap();
        assert_eq!(searches.len(), 2);

        match &searches[0] {
            SearchSpec::Rightmove(search) => {
                assert_eq!(search.location_identifier, "REGION^1154");
                assert_eq!(search.radius, 1.0);
                assert_eq!(search.min_price, 250_000);
                assert!(search.include_sstc);
            }
            other => panic!("unexpected search {:?}", other),
        }
        match &searches[1] {
            SearchSpec::Zoopla(search) => {
                assert_eq!(search.max_price, 700_000);
                assert_eq!(search.page_size, 25);
                assert!(search.include_sold);
            }
            other => panic!("unexpected search {:?}", other),
        }
    }

    #[test]
    fn searches_need_a_location() {
        assert!(parse_searches(r#"[{ "source": "zoopla" }]"#).is_err());
        assert!(parse_searches(r#"[{ "source": "onthemarket", "location": "x" }]"#).is_err());
    }

    #[test]
    fn default_searches_cover_both_sites() {
        let searches = default_searches();
        assert_eq!(searches.len(), 8);
        assert_eq!(
            searches.iter().filter(|s| s.source() == ListingSource::Zoopla).count(),
            4
        );
    }

    #[test]
    fn email_config_needs_recipients() {
        let config = EmailConfig::from_parts(
            Some("key".into()),
            Some("me@example.com".into()),
            "Property Finder".into(),
            Some("a@example.com, b@example.com,".into()),
        )
        .unwrap();
        assert_eq!(config.to_emails, vec!["a@example.com", "b@example.com"]);

        assert!(EmailConfig::from_parts(
            Some("key".into()),
            Some("me@example.com".into()),
            "Property Finder".into(),
            Some(" , ".into()),
        )
        .is_none());
        assert!(EmailConfig::from_parts(None, Some("me@example.com".into()), String::new(), Some("a@b".into())).is_none());
    }
}
