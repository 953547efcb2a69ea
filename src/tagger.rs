//! Per-file tagging pipeline
//!
//! resolve candidates -> find song page -> assemble metadata -> fetch cover
//! -> write tags -> rename. Failures never escape [`Tagger::tag_file`]; they
//! come back as [`TagOutcome::Failed`] so the caller can move on to the next
//! file.

use crate::audio::{self, CoverArt};
use crate::config::{SearchBackend, TaggerConfig};
use crate::genius::{
    AlbumScraper, ApiSearch, CandidateResolver, CandidateSearch, GeniusApi, PageScraper, WebSearch,
};
use crate::http::{HttpClient, Transport};
use crate::metadata::{MetadataAssembler, MusicRecord};
use crate::rename::rename_song_file;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Result of tagging one file.
#[derive(Debug, Clone, PartialEq)]
pub enum TagOutcome {
    Tagged {
        source: PathBuf,
        new_path: PathBuf,
        /// "<artist> - <title>"
        display: String,
    },
    Failed {
        source: PathBuf,
        reason: String,
    },
}

impl TagOutcome {
    pub fn is_tagged(&self) -> bool {
        matches!(self, TagOutcome::Tagged { .. })
    }
}

pub struct Tagger {
    transport: Arc<dyn Transport>,
    resolver: CandidateResolver,
    scraper: PageScraper,
    assembler: MetadataAssembler,
}

impl Tagger {
    /// Tagger backed by a real HTTP client.
    pub fn new(config: &TaggerConfig) -> Result<Self> {
        let client = HttpClient::new(&config.user_agent).context("Failed to build HTTP client")?;
        Self::with_transport(config, Arc::new(client))
    }

    /// Tagger over any transport.
    pub fn with_transport(config: &TaggerConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let api = Arc::new(GeniusApi::new(
            transport.clone(),
            config.api_base.clone(),
            config.token.clone(),
        ));

        let search: Box<dyn CandidateSearch> = match config.search {
            SearchBackend::Web => Box::new(
                WebSearch::new(
                    transport.clone(),
                    config.search_endpoint.clone(),
                    config.site.clone(),
                    config.max_candidates,
                )
                .context("Invalid search site")?,
            ),
            SearchBackend::Api => Box::new(ApiSearch::new(api.clone(), config.max_candidates)),
        };

        Ok(Self {
            resolver: CandidateResolver::new(search),
            scraper: PageScraper::new(transport.clone()),
            assembler: MetadataAssembler::new(api, AlbumScraper::new(transport.clone())),
            transport,
        })
    }

    /// Tag and rename one file. Never fails; see [`TagOutcome`].
    pub async fn tag_file(
        &self,
        path: &Path,
        query: &str,
        explicit_url: Option<&str>,
    ) -> TagOutcome {
        match self.try_tag_file(path, query, explicit_url).await {
            Ok((shown, new_path)) => {
                info!("Tagged {} as '{}'", path.display(), shown);
                TagOutcome::Tagged {
                    source: path.to_path_buf(),
                    new_path,
                    display: shown,
                }
            }
            Err(e) => {
                error!("Failed to tag {}: {:#}", path.display(), e);
                TagOutcome::Failed {
                    source: path.to_path_buf(),
                    reason: format!("{:#}", e),
                }
            }
        }
    }

    /// Resolve and assemble the metadata for a query without touching files.
    pub async fn lookup(&self, query: &str, explicit_url: Option<&str>) -> Result<MusicRecord> {
        let candidates = self
            .resolver
            .candidates(query, explicit_url)
            .await
            .context("Candidate search failed")?;

        let page = self.scraper.find_song(query, &candidates).await?;
        let record = self
            .assembler
            .assemble(page)
            .await
            .context("Failed to assemble song metadata")?;

        Ok(record)
    }

    async fn try_tag_file(
        &self,
        path: &Path,
        query: &str,
        explicit_url: Option<&str>,
    ) -> Result<(String, PathBuf)> {
        let record = self.lookup(query, explicit_url).await?;

        let cover = self.fetch_cover(&record).await;
        let tags = record.tag_set(cover);
        audio::write_tags(path, &tags)
            .with_context(|| format!("Failed to write tags to {}", path.display()))?;

        let new_path = rename_song_file(path, &record.artist, &record.display_title)?;
        Ok((record.display_name(), new_path))
    }

    /// Best effort; a missing URL or failed download means no artwork.
    async fn fetch_cover(&self, record: &MusicRecord) -> Option<CoverArt> {
        let Some(url) = record.cover_art_url() else {
            warn!("No cover art URL for '{}'", record.display_title);
            return None;
        };

        match self.transport.get_bytes(url).await {
            Ok(data) if !data.is_empty() => Some(CoverArt::from_bytes(data)),
            Ok(_) => {
                warn!("Failed to embed artwork for title: {} (empty image)", record.display_title);
                None
            }
            Err(e) => {
                warn!("Failed to embed artwork for title: {} ({})", record.display_title, e);
                None
            }
        }
    }
}
