//! Metadata Assembler
//!
//! Reconciles the Genius API song record with what was scraped from the song
//! page into a [`MusicRecord`], and maps that record onto a [`TagSet`].

use crate::audio::{CoverArt, TagSet};
use crate::error::{Result, TaggerError};
use crate::genius::{AlbumScraper, ApiSong, GeniusApi, ScrapedPage};
use std::sync::Arc;
use tracing::{info, warn};
use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Clone, PartialEq)]
pub struct AlbumInfo {
    pub name: String,
    pub artist: String,
    pub cover_art_url: Option<String>,
    pub url: Option<String>,
}

/// Canonical metadata for one song.
///
/// Without an album the record is a single: [`MusicRecord::album_name`] is
/// synthesised and `track_number` is always `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct MusicRecord {
    pub song_id: String,
    pub title: String,
    /// Featured-artist title after normalisation
    pub display_title: String,
    pub artist: String,
    pub album: Option<AlbumInfo>,
    pub track_number: Option<u32>,
    pub lyrics: Option<String>,
    pub genre: Option<String>,
    pub song_art_url: Option<String>,
    pub url: Option<String>,
}

/// Rewrite "Ft." as "feat." and apply NFKD.
///
/// Decomposition runs first so compatibility forms of "Ft." are rewritten too.
pub fn normalize_title(raw: &str) -> String {
    raw.nfkd().collect::<String>().replace("Ft.", "feat.")
}

impl MusicRecord {
    /// Validate the API record and merge in the scraped fields.
    ///
    /// The track number is left unset; the assembler fills it in for albums.
    pub fn from_api(song: ApiSong, page: ScrapedPage) -> Result<Self> {
        let title = song
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or(TaggerError::MissingField("song.title"))?;
        let artist = song
            .primary_artist
            .map(|a| a.name)
            .filter(|name| !name.trim().is_empty())
            .ok_or(TaggerError::MissingField("song.primary_artist.name"))?;

        let display_title = normalize_title(song.title_with_featured.as_deref().unwrap_or(&title));

        let album = song.album.map(|album| AlbumInfo {
            artist: album
                .artist
                .map(|a| a.name)
                .unwrap_or_else(|| artist.clone()),
            name: album.name,
            cover_art_url: album.cover_art_url,
            url: album.url,
        });

        Ok(Self {
            song_id: page.song_id,
            title,
            display_title,
            artist,
            album,
            track_number: None,
            lyrics: page.lyrics,
            genre: page.genre,
            song_art_url: song.song_art_image_url,
            url: song.url,
        })
    }

    pub fn is_single(&self) -> bool {
        self.album.is_none()
    }

    /// Album name, or "<title> - Single" for singles.
    pub fn album_name(&self) -> String {
        match &self.album {
            Some(album) => album.name.clone(),
            None => format!("{} - Single", self.title),
        }
    }

    /// Album artist, or the primary artist for singles.
    pub fn album_artist(&self) -> &str {
        match &self.album {
            Some(album) => &album.artist,
            None => &self.artist,
        }
    }

    /// Album cover for album tracks, song artwork for singles.
    pub fn cover_art_url(&self) -> Option<&str> {
        match &self.album {
            Some(album) => album.cover_art_url.as_deref(),
            None => self.song_art_url.as_deref(),
        }
    }

    /// "<artist> - <display title>", as shown to the user.
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.artist, self.display_title)
    }

    pub fn tag_set(&self, cover: Option<CoverArt>) -> TagSet {
        TagSet {
            title: self.display_title.clone(),
            artist: self.artist.clone(),
            album: self.album_name(),
            album_artist: self.album_artist().to_string(),
            lyrics: self.lyrics.clone(),
            track_number: self.track_number,
            genre: self.genre.clone(),
            cover,
        }
    }
}

/// Builds music records from a scraped page.
pub struct MetadataAssembler {
    api: Arc<GeniusApi>,
    albums: AlbumScraper,
}

impl MetadataAssembler {
    pub fn new(api: Arc<GeniusApi>, albums: AlbumScraper) -> Self {
        Self { api, albums }
    }

    pub async fn assemble(&self, page: ScrapedPage) -> Result<MusicRecord> {
        let song = self.api.song(&page.song_id).await?;
        let mut record = MusicRecord::from_api(song, page)?;

        if let Some(album) = &record.album {
            info!("Song is on album '{}'", album.name);
            record.track_number = match (album.url.as_deref(), record.url.as_deref()) {
                (Some(album_url), Some(song_url)) => {
                    self.albums.track_number(album_url, song_url).await
                }
                _ => {
                    warn!("Track number unavailable: album or song URL missing");
                    None
                }
            };
        } else {
            info!("No album, tagging '{}' as a single", record.title);
        }

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genius::{ApiAlbum, ApiArtist};

    fn page() -> ScrapedPage {
        ScrapedPage {
            song_id: "12345".to_string(),
            url: "https://genius.com/Queen-bohemian-rhapsody-lyrics".to_string(),
            lyrics: Some("Is this the real life?".to_string()),
            genre: None,
        }
    }

    fn single() -> ApiSong {
        ApiSong {
            id: Some(12345),
            title: Some("Bohemian Rhapsody".to_string()),
            title_with_featured: Some("Bohemian Rhapsody".to_string()),
            primary_artist: Some(ApiArtist { name: "Queen".to_string() }),
            album: None,
            song_art_image_url: Some("https://images.test/song.jpg".to_string()),
            url: Some("https://genius.com/Queen-bohemian-rhapsody-lyrics".to_string()),
        }
    }

    #[test]
    fn test_normalize_title() {
        assert_eq!(
            normalize_title("Empire State of Mind (Ft. Alicia Keys)"),
            "Empire State of Mind (feat. Alicia Keys)"
        );
        assert_eq!(normalize_title("Ｆｔ．"), "feat.");
        assert_eq!(normalize_title("Beyonce\u{301}"), "Beyonce\u{301}");
        assert_eq!(normalize_title("Caf\u{e9}"), "Cafe\u{301}");
        assert!(!normalize_title("A Ft. B Ft. C").contains("Ft."));
    }

    #[test]
    fn test_single_record() {
        let record = MusicRecord::from_api(single(), page()).unwrap();

        assert!(record.is_single());
        assert_eq!(record.album_name(), "Bohemian Rhapsody - Single");
        assert_eq!(record.album_artist(), "Queen");
        assert_eq!(record.track_number, None);
        assert_eq!(record.cover_art_url(), Some("https://images.test/song.jpg"));
        assert_eq!(record.display_name(), "Queen - Bohemian Rhapsody");
        assert_eq!(record.lyrics.as_deref(), Some("Is this the real life?"));
    }

    #[test]
    fn test_album_record() {
        let mut song = single();
        song.title_with_featured = Some("Under Pressure (Ft. David Bowie)".to_string());
        song.album = Some(ApiAlbum {
            id: Some(1),
            name: "Hot Space".to_string(),
            artist: None,
            cover_art_url: Some("https://images.test/hot-space.jpg".to_string()),
            url: Some("https://genius.com/albums/Queen/Hot-space".to_string()),
        });

        let record = MusicRecord::from_api(song, page()).unwrap();
        assert!(!record.is_single());
        assert_eq!(record.album_name(), "Hot Space");
        assert_eq!(record.album_artist(), "Queen");
        assert_eq!(record.cover_art_url(), Some("https://images.test/hot-space.jpg"));

        let tags = record.tag_set(None);
        assert_eq!(tags.title, "Under Pressure (feat. David Bowie)");
        assert_eq!(tags.album, "Hot Space");
    }

    #[test]
    fn test_missing_artist_is_rejected() {
        let mut song = single();
        song.primary_artist = None;
        assert!(matches!(
            MusicRecord::from_api(song, page()),
            Err(TaggerError::MissingField(_))
        ));
    }

    #[test]
    fn test_featured_title_falls_back_to_title() {
        let mut song = single();
        song.title_with_featured = None;
        let record = MusicRecord::from_api(song, page()).unwrap();
        assert_eq!(record.display_title, "Bohemian Rhapsody");
    }
}
