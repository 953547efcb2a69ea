//! Genius lookups: candidate search, page scraping, the JSON API and the
//! album track listing.

pub mod album;
pub mod api;
pub mod page;
pub mod search;

pub use album::AlbumScraper;
pub use api::{ApiAlbum, ApiArtist, ApiSong, GeniusApi};
pub use page::{PageScraper, ScrapedPage};
pub use search::{ApiSearch, CandidateResolver, CandidateSearch, WebSearch};
