use crate::error::{Result, TaggerError};
use crate::http::Transport;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, instrument};

#[derive(Debug, Deserialize)]
struct SongEnvelope {
    response: SongPayload,
}

#[derive(Debug, Deserialize)]
struct SongPayload {
    song: Option<ApiSong>,
}

/// Song record as returned by `GET /songs/{id}`.
///
/// Only the fields the tagger consumes are modelled; all of them are optional
/// at this layer and validated when the music record is built.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSong {
    pub id: Option<u64>,
    pub title: Option<String>,
    pub title_with_featured: Option<String>,
    pub primary_artist: Option<ApiArtist>,
    pub album: Option<ApiAlbum>,
    pub song_art_image_url: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiArtist {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiAlbum {
    pub id: Option<u64>,
    pub name: String,
    pub artist: Option<ApiArtist>,
    pub cover_art_url: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    response: SearchPayload,
}

#[derive(Debug, Deserialize)]
struct SearchPayload {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "type")]
    hit_type: Option<String>,
    result: SearchHitResult,
}

#[derive(Debug, Deserialize)]
struct SearchHitResult {
    url: Option<String>,
}

/// Bearer-authenticated client for the Genius JSON API.
pub struct GeniusApi {
    transport: Arc<dyn Transport>,
    base: String,
    token: String,
}

impl GeniusApi {
    pub fn new(
        transport: Arc<dyn Transport>,
        base: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            base: base.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// Fetch the song record for a Song Identifier.
    #[instrument(skip(self), fields(service = "genius"))]
    pub async fn song(&self, song_id: &str) -> Result<ApiSong> {
        info!("Fetching song metadata for ID {}", song_id);
        let url = format!("{}/songs/{}", self.base, song_id);

        let body = self.transport.get_text(&url, Some(&self.token)).await?;
        let envelope: SongEnvelope = serde_json::from_str(&body)?;

        envelope.response.song.ok_or(TaggerError::MissingField("response.song"))
    }

    /// Song page URLs for a free-text query, in API relevance order.
    #[instrument(skip(self), fields(service = "genius"))]
    pub async fn search(&self, query: &str) -> Result<Vec<String>> {
        let url = format!("{}/search?q={}", self.base, urlencoding::encode(query));

        let body = self.transport.get_text(&url, Some(&self.token)).await?;
        let envelope: SearchEnvelope = serde_json::from_str(&body)?;

        let urls: Vec<String> = envelope
            .response
            .hits
            .into_iter()
            .filter(|hit| {
                hit.hit_type
                    .as_deref()
                    .is_none_or(|kind| kind.eq_ignore_ascii_case("song"))
            })
            .filter_map(|hit| hit.result.url)
            .collect();

        debug!("Genius API search returned {} song URLs", urls.len());
        Ok(urls)
    }
}
