use anyhow::{Context, Result};
use clap::ValueEnum;
use std::fmt;
use std::path::{Path, PathBuf};

pub const GENIUS_API_BASE: &str = "https://api.genius.com";
pub const GENIUS_SITE: &str = "genius.com";
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://www.google.com/search";
pub const DEFAULT_MAX_CANDIDATES: usize = 5;

/// How candidate pages are discovered when no URL is given explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SearchBackend {
    /// Site-restricted web search, results in engine order
    #[default]
    Web,
    /// Genius API `/search`, hits in API order
    Api,
}

/// Settings shared by every file of a run.
///
/// Built once by the CLI and handed to the tagger; nothing in the pipeline
/// reads global state.
#[derive(Clone)]
pub struct TaggerConfig {
    /// Genius API bearer token
    pub token: String,
    pub api_base: String,
    pub search: SearchBackend,
    pub search_endpoint: String,
    /// Domain the web search is restricted to
    pub site: String,
    pub max_candidates: usize,
    pub user_agent: String,
}

impl TaggerConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_base: GENIUS_API_BASE.to_string(),
            search: SearchBackend::default(),
            search_endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            site: GENIUS_SITE.to_string(),
            max_candidates: DEFAULT_MAX_CANDIDATES,
            user_agent: format!("genius-tagger/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn with_search(mut self, search: SearchBackend) -> Self {
        self.search = search;
        self
    }
}

impl fmt::Debug for TaggerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaggerConfig")
            .field("token", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("search", &self.search)
            .field("search_endpoint", &self.search_endpoint)
            .field("site", &self.site)
            .field("max_candidates", &self.max_candidates)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Per-OS location of the stored API token.
///
/// `$HOME/.gtagger/token` on Unix-like systems, `%LOCALAPPDATA%\gTagger\token`
/// on Windows.
pub fn default_token_path() -> Option<PathBuf> {
    if cfg!(windows) {
        dirs::data_local_dir().map(|dir| dir.join("gTagger").join("token"))
    } else {
        dirs::home_dir().map(|dir| dir.join(".gtagger").join("token"))
    }
}

/// Read the token from `path`, asking `prompt` for it once if the file is
/// missing and persisting the answer for later runs.
pub fn load_or_prompt_token<F>(path: &Path, prompt: F) -> Result<String>
where
    F: FnOnce() -> Result<String>,
{
    if path.exists() {
        let token = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read token file {}", path.display()))?;
        tracing::debug!("Loaded API token from {}", path.display());
        return Ok(token.trim().to_string());
    }

    let token = prompt()?.trim().to_string();
    if token.is_empty() {
        anyhow::bail!("No Genius API token provided");
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, &token)
        .with_context(|| format!("Failed to write token file {}", path.display()))?;
    tracing::info!("Saved API token to {}", path.display());

    Ok(token)
}
