use crate::config::EmailConfig;
use crate::debug_println;
use crate::models::Listing;
use anyhow::{anyhow, Context, Result};
use chrono::{Duration, NaiveDate};
use reqwest::blocking::Client;
use serde_json::json;

pub const SENDGRID_SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";

/// Listings posted the day before `today`.
pub fn listings_added_yesterday(listings: &[Listing], today: NaiveDate) -> Vec<Listing> {
    let yesterday = today - Duration::days(1);
    listings
        .iter()
        .filter(|listing| listing.added_on == Some(yesterday))
        .cloned()
        .collect()
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn email_subject(listings: &[Listing]) -> String {
    match listings.first().and_then(|l| l.added_on) {
        Some(date) => format!("Properties for {}", date.format("%Y-%m-%d")),
        None => "New properties".to_string(),
    }
}

pub fn email_body(listings: &[Listing]) -> String {
    let mut html = String::from(
        "<table><tr><th>Address</th><th>Price</th><th>Bedrooms</th><th>Link</th></tr>",
    );

    for listing in listings {
        let bedrooms = listing
            .number_bedrooms
            .map(|n| n.to_string())
            .unwrap_or_default();
        let url = escape_html(&listing.url);
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td><a href=\"{}\">{}</a></td></tr>",
            escape_html(&listing.address),
            escape_html(&listing.display_price()),
            bedrooms,
            url,
            url
        ));
    }

    html.push_str("</table>");
    html
}

pub struct Notifier {
    config: EmailConfig,
    client: Client,
    endpoint: String,
}

impl Notifier {
    pub fn new(config: EmailConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            config,
            client,
            endpoint: SENDGRID_SEND_URL.to_string(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn message(&self, listings: &[Listing]) -> serde_json::Value {
        let to: Vec<serde_json::Value> = self
            .config
            .to_emails
            .iter()
            .map(|email| json!({ "email": email }))
            .collect();

        json!({
            "personalizations": [{ "to": to }],
            "from": { "email": self.config.from_email, "name": self.config.from_name },
            "subject": email_subject(listings),
            "content": [{ "type": "text/html", "value": email_body(listings) }],
        })
    }

    /// Sends one e-mail listing `listings`. Returns `false` when there was
    /// nothing to send.
    pub fn send(&self, listings: &[Listing]) -> Result<bool> {
        debug_println!("Processing email with {} items", listings.len());

        if listings.is_empty() {
            return Ok(false);
        }
        if self.config.to_emails.is_empty() {
            return Err(anyhow!("No recipients configured"));
        }

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&self.message(listings))
            .send()
            .context("Failed to reach e-mail API")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(anyhow!("E-mail API returned status {}: {}", status, body));
        }

        debug_println!("email.status_code={}", status.as_u16());
        Ok(true)
    }
}
