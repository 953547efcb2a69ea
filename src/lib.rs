//! Genius Tagger - tag and rename audio files with metadata from Genius
//!
//! This library resolves a song from an imprecise query (usually a file
//! name), scrapes lyrics and the song identifier from its Genius page,
//! completes the record through the Genius API and writes the result into
//! the file's tag container before renaming it `<artist> - <title>`.

pub mod audio;
pub mod config;
pub mod error;
pub mod genius;
pub mod html;
pub mod http;
pub mod library;
pub mod metadata;
pub mod rename;
pub mod tagger;

pub use config::{SearchBackend, TaggerConfig};
pub use error::TaggerError;
pub use tagger::{TagOutcome, Tagger};
