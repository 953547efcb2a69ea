use crate::html::{class_names, element_text, find_divs};
use crate::http::Transport;
use std::sync::Arc;
use tracing::{debug, warn};

/// Track number of `song_url` in an album page's track listing.
///
/// Rows are the `chart_row` divs; the matching row is the first whose markup
/// mentions the song URL, and its text starts with the track number. Tag
/// stripping leaves no separator, so the number is the leading digit run.
pub fn find_track_number(album_html: &str, song_url: &str) -> Option<u32> {
    find_divs(album_html, |tag| class_names(tag).contains(&"chart_row"))
        .into_iter()
        .find(|row| row.contains(song_url))
        .and_then(|row| {
            let digits: String = element_text(row)
                .chars()
                .take_while(char::is_ascii_digit)
                .collect();
            digits.parse::<u32>().ok()
        })
}

/// Secondary scrape of the album track listing.
pub struct AlbumScraper {
    transport: Arc<dyn Transport>,
}

impl AlbumScraper {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Look up the track number; any failure means "unavailable".
    pub async fn track_number(&self, album_url: &str, song_url: &str) -> Option<u32> {
        let html = match self.transport.get_text(album_url, None).await {
            Ok(html) => html,
            Err(e) => {
                warn!("Failed to fetch album page {}: {}", album_url, e);
                return None;
            }
        };

        let number = find_track_number(&html, song_url);
        match number {
            Some(n) => debug!("Track number {} from {}", n, album_url),
            None => warn!("Track number unavailable: {} not listed in {}", song_url, album_url),
        }
        number
    }
}
