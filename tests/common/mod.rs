use async_trait::async_trait;
use genius_tagger::error::{Result, TaggerError};
use genius_tagger::http::Transport;
use genius_tagger::{SearchBackend, TaggerConfig};
use std::collections::HashMap;
use std::sync::Mutex;

pub const SEARCH_ENDPOINT: &str = "https://search.test/search";
pub const API_BASE: &str = "https://api.test";

#[derive(Clone)]
enum Reply {
    Text(String),
    Bytes(Vec<u8>),
    Status(u16),
}

/// In-memory transport: exact URL routes, then prefix routes, else 404.
/// Every requested URL is recorded in order.
#[derive(Default)]
pub struct MockTransport {
    exact: HashMap<String, Reply>,
    prefixes: Vec<(String, Reply)>,
    requests: Mutex<Vec<String>>,
    bearers: Mutex<Vec<Option<String>>>,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, body: &str) -> Self {
        self.exact.insert(url.to_string(), Reply::Text(body.to_string()));
        self
    }

    pub fn bytes(mut self, url: &str, body: &[u8]) -> Self {
        self.exact.insert(url.to_string(), Reply::Bytes(body.to_vec()));
        self
    }

    pub fn status(mut self, url: &str, status: u16) -> Self {
        self.exact.insert(url.to_string(), Reply::Status(status));
        self
    }

    pub fn prefix(mut self, prefix: &str, body: &str) -> Self {
        self.prefixes.push((prefix.to_string(), Reply::Text(body.to_string())));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn bearers(&self) -> Vec<Option<String>> {
        self.bearers.lock().unwrap().clone()
    }

    pub fn was_requested(&self, url: &str) -> bool {
        self.requests().iter().any(|u| u == url)
    }

    fn reply(&self, url: &str, bearer: Option<&str>) -> Reply {
        self.requests.lock().unwrap().push(url.to_string());
        self.bearers.lock().unwrap().push(bearer.map(str::to_string));

        self.exact
            .get(url)
            .or_else(|| {
                self.prefixes
                    .iter()
                    .find(|(prefix, _)| url.starts_with(prefix.as_str()))
                    .map(|(_, reply)| reply)
            })
            .cloned()
            .unwrap_or(Reply::Status(404))
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get_text(&self, url: &str, bearer: Option<&str>) -> Result<String> {
        match self.reply(url, bearer) {
            Reply::Text(body) => Ok(body),
            Reply::Bytes(body) => Ok(String::from_utf8_lossy(&body).into_owned()),
            Reply::Status(status) => Err(TaggerError::Http { url: url.to_string(), status }),
        }
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        match self.reply(url, None) {
            Reply::Text(body) => Ok(body.into_bytes()),
            Reply::Bytes(body) => Ok(body),
            Reply::Status(status) => Err(TaggerError::Http { url: url.to_string(), status }),
        }
    }
}

#[allow(dead_code)]
pub fn config(search: SearchBackend) -> TaggerConfig {
    let mut config = TaggerConfig::new("test-token").with_search(search);
    config.api_base = API_BASE.to_string();
    config.search_endpoint = SEARCH_ENDPOINT.to_string();
    config
}

/// A search result page linking the given URLs, Google-style.
#[allow(dead_code)]
pub fn search_page(urls: &[&str]) -> String {
    urls.iter()
        .map(|url| format!(r#"<div class="g"><a href="/url?q={}&amp;sa=U">result</a></div>"#, url))
        .collect()
}

/// A song page embedding a song ID and a lyrics container.
#[allow(dead_code)]
pub fn song_page(song_id: u64, lyrics: &str) -> String {
    format!(
        r#"<html><head><script>window.__PRELOADED_STATE__ = {{"songPage":{{"songId":{},"primaryTag":{{"name":"Rock"}}}}}};</script></head>
<body><div data-lyrics-container="true" class="Lyrics__Container-sc-1ynbvzw-1">{}</div></body></html>"#,
        song_id, lyrics
    )
}

#[allow(dead_code)]
pub fn song_json(song_id: u64, title: &str, artist: &str, album: Option<(&str, &str)>) -> String {
    let album = match album {
        Some((name, url)) => format!(
            r#"{{"id":1,"name":"{}","artist":{{"name":"{}"}},"cover_art_url":"https://images.test/album.jpg","url":"{}"}}"#,
            name, artist, url
        ),
        None => "null".to_string(),
    };

    format!(
        r#"{{"meta":{{"status":200}},"response":{{"song":{{
            "id":{id},
            "title":"{title}",
            "title_with_featured":"{title}",
            "primary_artist":{{"name":"{artist}"}},
            "album":{album},
            "song_art_image_url":"https://images.test/song-{id}.jpg",
            "url":"https://genius.com/song-{id}-lyrics"
        }}}}}}"#,
        id = song_id,
        title = title,
        artist = artist,
        album = album
    )
}
