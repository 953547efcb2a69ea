//! Page Fetcher & Extractor
//!
//! Fetches candidate song pages in order and keeps the first one that embeds
//! a Song Identifier. Lyrics and genre are scraped from that page on a best
//! effort basis.

use crate::error::{Result, TaggerError};
use crate::html::{class_names, element_text, find_divs, normalize_line_breaks};
use crate::http::Transport;
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::{debug, info, warn};

static SONG_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)"song[ _]?id.?"\s*:\s*\\?"?([0-9]+)"#).unwrap());

static LYRICS_CONTAINER_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\bdata-lyrics-container\s*=\s*"true""#).unwrap());

static PRIMARY_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\\?"primary_?tag\\?"\s*:\s*\{[^{}]*?\\?"name\\?"\s*:\s*\\?"([^"\\]+)"#).unwrap()
});

static GENRE_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\\?"genre\\?"\s*:\s*\\?"([^"\\]+)"#).unwrap());

/// Result of a successful candidate page.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapedPage {
    pub song_id: String,
    /// Page the identifier was found on
    pub url: String,
    pub lyrics: Option<String>,
    pub genre: Option<String>,
}

/// Find the embedded Song Identifier in raw page markup.
pub fn extract_song_id(html: &str) -> Option<String> {
    SONG_ID.captures(html).map(|caps| caps[1].to_string())
}

/// Lyrics text of a page whose `<br>` tags are already newlines.
///
/// Prefers the `data-lyrics-container` blocks of the current layout (joined
/// in page order), then the first `div` with a class starting with "lyrics".
pub fn extract_lyrics(html: &str) -> Option<String> {
    let blocks: Vec<String> = find_divs(html, |tag| LYRICS_CONTAINER_ATTR.is_match(tag))
        .into_iter()
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect();

    if !blocks.is_empty() {
        return Some(blocks.join("\n"));
    }

    find_divs(html, |tag| {
        class_names(tag).iter().any(|class| {
            class
                .get(..6)
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case("lyrics"))
        })
    })
    .first()
    .map(|container| element_text(container))
    .filter(|text| !text.is_empty())
}

/// Genre from the page's embedded primary tag, or a plain `genre` key.
pub fn extract_genre(html: &str) -> Option<String> {
    PRIMARY_TAG
        .captures(html)
        .or_else(|| GENRE_KEY.captures(html))
        .map(|caps| caps[1].trim().to_string())
        .filter(|genre| !genre.is_empty())
}

/// Walks candidate pages until one yields a Song Identifier.
pub struct PageScraper {
    transport: Arc<dyn Transport>,
}

impl PageScraper {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Fetch one candidate page and extract its fields.
    pub async fn fetch_candidate(&self, url: &str) -> Result<ScrapedPage> {
        let html = self.transport.get_text(url, None).await?;

        let song_id = extract_song_id(&html).ok_or_else(|| TaggerError::NoSongId {
            url: url.to_string(),
        })?;
        debug!("Found song ID {} in {}", song_id, url);

        let html = normalize_line_breaks(&html);

        let lyrics = extract_lyrics(&html);
        if lyrics.is_none() {
            warn!("Failed to fetch lyrics from {}", url);
        }

        let genre = extract_genre(&html);
        if genre.is_none() {
            warn!("No genre found on {}", url);
        }

        Ok(ScrapedPage {
            song_id,
            url: url.to_string(),
            lyrics,
            genre,
        })
    }

    /// First candidate yielding any identifier wins; later ones are never
    /// fetched.
    pub async fn find_song(&self, query: &str, candidates: &[String]) -> Result<ScrapedPage> {
        for url in candidates {
            info!("Trying URL {}", url);

            match self.fetch_candidate(url).await {
                Ok(page) => return Ok(page),
                Err(e) => {
                    warn!("Candidate {} rejected: {}", url, e);
                    continue;
                }
            }
        }

        Err(TaggerError::SongNotFound {
            query: query.to_string(),
        })
    }
}
