use crossterm::{
    cursor::MoveToPreviousLine,
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io;

pub struct ScraperTUI {
    searches_completed: usize,
    listings_scraped: usize,
    progress_line_printed: bool,
    total_listings_in_db: usize,
}

impl ScraperTUI {
    pub fn new() -> Self {
        Self {
            searches_completed: 0,
            listings_scraped: 0,
            progress_line_printed: false,
            total_listings_in_db: 0,
        }
    }

    fn label(site: &str, location: &str) -> String {
        format!("{} / {}", site, location)
    }

    /// Show grey summary line with the listings already on disk
    pub fn show_summary(&mut self, total_listings: usize) -> io::Result<()> {
        self.total_listings_in_db = total_listings;
        execute!(
            io::stdout(),
            SetForegroundColor(Color::DarkGrey),
            Print(format!("📁 Loaded {} existing listings\n", total_listings)),
            ResetColor
        )
    }

    pub fn start_search(&mut self, site: &str, location: &str, pages: usize) -> io::Result<()> {
        execute!(
            io::stdout(),
            SetForegroundColor(Color::White),
            Print(format!(
                "⏳ {}: scraping result pages (0/{})...\n",
                Self::label(site, location),
                pages
            )),
            ResetColor
        )?;
        self.progress_line_printed = true;
        Ok(())
    }

    pub fn update_page_progress(&mut self, page: usize, pages: usize, listings_found: usize) -> io::Result<()> {
        if !self.progress_line_printed {
            return Ok(());
        }

        execute!(io::stdout(), MoveToPreviousLine(1), Clear(ClearType::CurrentLine))?;

        let spinner = match page % 4 {
            0 => "⠋",
            1 => "⠙",
            2 => "⠹",
            _ => "⠸",
        };

        let bar_width = 20;
        let filled = (page * bar_width) / pages.max(1);
        execute!(
            io::stdout(),
            SetForegroundColor(Color::White),
            Print(format!(
                "{} [{}{}] page {}/{} - {} listings found\n",
                spinner,
                "█".repeat(filled.min(bar_width)),
                "░".repeat(bar_width - filled.min(bar_width)),
                page,
                pages,
                listings_found
            )),
            ResetColor
        )
    }

    pub fn finish_search(&mut self, site: &str, location: &str, listings: usize) -> io::Result<()> {
        self.clear_progress_line()?;
        execute!(
            io::stdout(),
            SetForegroundColor(Color::Green),
            Print(format!("✓ {}: {} listings\n", Self::label(site, location), listings)),
            ResetColor
        )?;
        self.record_completed(listings);
        Ok(())
    }

    /// A failed search ends the run, so this is only a red line before the error surfaces.
    pub fn fail_search(&mut self, site: &str, location: &str, error: &str) -> io::Result<()> {
        self.clear_progress_line()?;
        execute!(
            io::stdout(),
            SetForegroundColor(Color::Red),
            Print(format!("❌ {}: {}\n", Self::label(site, location), error)),
            ResetColor
        )
    }

    pub fn show_email_status(&self, message: &str, ok: bool) -> io::Result<()> {
        let color = if ok { Color::Green } else { Color::Yellow };
        execute!(
            io::stdout(),
            SetForegroundColor(color),
            Print(format!("✉ {}\n", message)),
            ResetColor
        )
    }

    pub fn show_final_summary(&mut self, new_count: usize, total_count: usize) -> io::Result<()> {
        self.total_listings_in_db = total_count;

        execute!(
            io::stdout(),
            Print("─".repeat(80)),
            Print("\n"),
            SetForegroundColor(Color::Green),
            Print(self.summary_text(new_count)),
            ResetColor,
            SetForegroundColor(Color::DarkGrey),
            Print(format!(" | DB: {} total\n", self.total_listings_in_db)),
            ResetColor
        )
    }

    fn record_completed(&mut self, listings: usize) {
        self.searches_completed += 1;
        self.listings_scraped += listings;
    }

    fn summary_text(&self, new_count: usize) -> String {
        format!(
            "✅ {} searches, {} listings scraped, {} new",
            self.searches_completed, self.listings_scraped, new_count
        )
    }

    fn clear_progress_line(&mut self) -> io::Result<()> {
        if self.progress_line_printed {
            execute!(io::stdout(), MoveToPreviousLine(1), Clear(ClearType::CurrentLine))?;
            self.progress_line_printed = false;
        }
        Ok(())
    }
}

impl Default for ScraperTUI {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_completed_searches() {
        let mut tui = ScraperTUI::new();
        assert_eq!(tui.summary_text(0), "✅ 0 searches, 0 listings scraped, 0 new");

        tui.record_completed(24);
        tui.record_completed(7);
        assert_eq!(tui.summary_text(3), "✅ 2 searches, 31 listings scraped, 3 new");
    }
}
