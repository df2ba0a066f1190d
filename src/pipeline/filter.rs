use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::records::RawListing;

pub fn is_popular(listing: &RawListing, threshold: u64) -> bool {
    listing.num_favorers >= threshold
}

/// Lowercase phrases that disqualify a listing.
#[derive(Debug, Clone, Default)]
pub struct BanList {
    phrases: Vec<String>,
}

impl BanList {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let phrases = phrases
            .into_iter()
            .map(|p| p.as_ref().trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        BanList { phrases }
    }

    /// One phrase per line. A missing or unreadable file yields an empty list.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(text) => {
                let list = BanList::new(text.lines());
                info!(path = %path.display(), phrases = list.len(), "Loaded ban list");
                list
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ban list unavailable, filtering nothing");
                BanList::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn matches(&self, listing: &RawListing) -> bool {
        if self.is_empty() {
            return false;
        }
        let text = format!("{}{}", listing.title, listing.description).to_lowercase();
        self.phrases.iter().any(|p| text.contains(p.as_str()))
    }
}

/// Drop every listing whose title+description contains a banned phrase.
pub fn remove_banned(listings: Vec<RawListing>, bans: &BanList) -> Vec<RawListing> {
    let before = listings.len();
    let kept: Vec<RawListing> = listings.into_iter().filter(|l| !bans.matches(l)).collect();
    info!(before, after = kept.len(), "Content filter applied");
    kept
}
