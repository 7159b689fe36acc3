use crate::debug_println;
use crate::models::{Listing, ListingKey};
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

pub fn load_listings_from_csv(input_path: &str) -> Result<Vec<Listing>> {
    let path = Path::new(input_path);

    if !path.exists() {
        println!("CSV file does not exist yet: {}", input_path);
        return Ok(Vec::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open input file: {}", input_path))?;

    let mut reader = csv::Reader::from_reader(file);
    let mut listings = Vec::new();

    for (line, result) in reader.deserialize::<Listing>().enumerate() {
        match result {
            Ok(listing) => listings.push(listing),
            Err(e) => {
                println!("Warning: Skipping record {} in {}: {}", line + 1, input_path, e);
            }
        }
    }

    debug_println!("Loaded {} listings from {}", listings.len(), input_path);
    Ok(listings)
}

fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}

/// Rewrites the whole file. The previous version is kept next to it as `.bak`.
pub fn save_listings_to_csv(listings: &[Listing], output_path: &str) -> Result<()> {
    let path = Path::new(output_path);
    let tmp_path = sibling_path(path, ".tmp");

    {
        let file = File::create(&tmp_path)
            .with_context(|| format!("Failed to create output file: {}", tmp_path.display()))?;
        let mut writer = csv::Writer::from_writer(file);
        for listing in listings {
            writer.serialize(listing)?;
        }
        writer.flush()?;
    }

    if path.exists() {
        let backup_path = sibling_path(path, ".bak");
        fs::copy(path, &backup_path)
            .with_context(|| format!("Failed to back up {}", output_path))?;
        debug_println!("Backed up previous data to {}", backup_path.display());
    }

    fs::rename(&tmp_path, path)
        .with_context(|| format!("Failed to replace {}", output_path))?;

    println!("Saved {} listings to {}", listings.len(), output_path);
    Ok(())
}

/// Newest posting date first; listings without a date go last. Stable.
pub fn sort_by_added_on(listings: &mut [Listing]) {
    listings.sort_by(|a, b| match (a.added_on, b.added_on) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

pub struct MergeResult {
    pub listings: Vec<Listing>,
    pub added: Vec<Listing>,
}

/// Appends `scraped` to `existing` and drops every row whose identifying
/// columns were already seen, so the stored copy of a listing wins.
pub fn merge_listings(existing: Vec<Listing>, scraped: Vec<Listing>) -> MergeResult {
    let mut seen: HashSet<ListingKey> = HashSet::with_capacity(existing.len() + scraped.len());
    let mut listings = Vec::with_capacity(existing.len() + scraped.len());
    let mut added = Vec::new();

    for listing in existing {
        if seen.insert(listing.key()) {
            listings.push(listing);
        }
    }

    for listing in scraped {
        if seen.insert(listing.key()) {
            added.push(listing.clone());
            listings.push(listing);
        } else {
            debug_println!("Skipping already known listing: {}", listing.url);
        }
    }

    sort_by_added_on(&mut listings);
    sort_by_added_on(&mut added);

    MergeResult { listings, added }
}
