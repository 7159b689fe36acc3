pub mod common_scraper;
pub mod config;
pub mod debug;
pub mod models;
pub mod notifier;
pub mod parser;
pub mod rightmove_scraper;
pub mod scrapers;
pub mod tui;
pub mod utils;
pub mod zoopla_scraper;
