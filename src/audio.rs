use crate::error::TaggerError;
use anyhow::{Context, Result};
use std::path::Path;

/// Extensions picked up when expanding directories.
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "aac", "wav", "wma", "ogg", "m3u", "flac", "m4a"];

/// ID3 language code written with unsynchronised lyrics
pub const LYRICS_LANGUAGE: &str = "XXX";

/// Embedded cover image
#[derive(Debug, Clone, PartialEq)]
pub struct CoverArt {
    pub data: Vec<u8>,
    pub mime_type: &'static str,
}

impl CoverArt {
    /// Wrap downloaded bytes, sniffing PNG and defaulting to JPEG.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        let mime_type = if data.starts_with(b"\x89PNG\r\n\x1a\n") {
            "image/png"
        } else {
            "image/jpeg"
        };
        Self { data, mime_type }
    }
}

/// Field values written to one audio file.
///
/// Built fresh for each file and applied once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagSet {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub album_artist: String,
    pub lyrics: Option<String>,
    pub track_number: Option<u32>,
    pub genre: Option<String>,
    pub cover: Option<CoverArt>,
}

/// Trait representing a writable tag container
pub trait AudioFile: Send + Sync {
    /// Get the file format name (e.g., "flac", "mp3")
    fn format_name(&self) -> &'static str;

    /// Write every field of `tags` and save once.
    fn write_tags(&self, path: &Path, tags: &TagSet) -> Result<()>;
}

fn ensure_writable(path: &Path) -> Result<()> {
    let metadata = std::fs::metadata(path).context("Failed to read file metadata")?;
    if metadata.permissions().readonly() {
        anyhow::bail!("File is read-only: {}", path.display());
    }
    Ok(())
}

fn apply_id3(tag: &mut id3::Tag, tags: &TagSet) {
    use id3::TagLike;
    use id3::frame::{Lyrics, Picture, PictureType};

    tag.set_title(&tags.title);
    tag.set_artist(&tags.artist);
    tag.set_album(&tags.album);
    tag.set_album_artist(&tags.album_artist);

    match &tags.genre {
        Some(genre) => tag.set_genre(genre),
        None => tag.remove_genre(),
    }

    match tags.track_number {
        Some(track) => tag.set_track(track),
        None => tag.remove_track(),
    }

    tag.remove("USLT");
    if let Some(text) = &tags.lyrics {
        tag.add_frame(Lyrics {
            lang: LYRICS_LANGUAGE.to_string(),
            description: String::new(),
            text: text.clone(),
        });
    }

    if let Some(cover) = &tags.cover {
        tag.remove_picture_by_type(PictureType::CoverFront);
        tag.add_frame(Picture {
            mime_type: cover.mime_type.to_string(),
            picture_type: PictureType::CoverFront,
            description: String::new(),
            data: cover.data.clone(),
        });
    }
}

/// MP3 (and raw AAC) with a leading ID3v2 tag
pub struct Mp3File;

impl AudioFile for Mp3File {
    fn format_name(&self) -> &'static str {
        "mp3"
    }

    fn write_tags(&self, path: &Path, tags: &TagSet) -> Result<()> {
        tracing::debug!("Reading MP3 tags from: {}", path.display());

        let mut tag = id3::Tag::read_from_path(path).or_else(|e| {
            tracing::debug!("No readable ID3 tag ({}), creating new tag", e);
            Ok::<_, anyhow::Error>(id3::Tag::new())
        })?;

        apply_id3(&mut tag, tags);

        ensure_writable(path)?;
        tag.write_to_path(path, id3::Version::Id3v24)
            .context("Failed to save MP3 tags")?;
        Ok(())
    }
}

/// WAV with an ID3v2 tag in its RIFF `id3 ` chunk
pub struct WavFile;

impl AudioFile for WavFile {
    fn format_name(&self) -> &'static str {
        "wav"
    }

    fn write_tags(&self, path: &Path, tags: &TagSet) -> Result<()> {
        let mut tag = id3::Tag::read_from_path(path).or_else(|e| {
            tracing::debug!("No readable WAV ID3 chunk ({}), creating new tag", e);
            Ok::<_, anyhow::Error>(id3::Tag::new())
        })?;

        apply_id3(&mut tag, tags);

        ensure_writable(path)?;
        // Detects the RIFF container and writes the `id3 ` chunk
        tag.write_to_path(path, id3::Version::Id3v24)
            .context("Failed to save WAV tags")?;
        Ok(())
    }
}

/// FLAC audio file implementation
pub struct FlacFile;

impl AudioFile for FlacFile {
    fn format_name(&self) -> &'static str {
        "flac"
    }

    fn write_tags(&self, path: &Path, tags: &TagSet) -> Result<()> {
        let mut tag = metaflac::Tag::read_from_path(path).context("Failed to read FLAC tags")?;

        tag.set_vorbis("TITLE", vec![tags.title.clone()]);
        tag.set_vorbis("ARTIST", vec![tags.artist.clone()]);
        tag.set_vorbis("ALBUM", vec![tags.album.clone()]);
        tag.set_vorbis("ALBUMARTIST", vec![tags.album_artist.clone()]);

        match &tags.genre {
            Some(genre) => tag.set_vorbis("GENRE", vec![genre.clone()]),
            None => tag.remove_vorbis("GENRE"),
        }
        match tags.track_number {
            Some(track) => tag.set_vorbis("TRACKNUMBER", vec![track.to_string()]),
            None => tag.remove_vorbis("TRACKNUMBER"),
        }
        match &tags.lyrics {
            Some(lyrics) => tag.set_vorbis("LYRICS", vec![lyrics.clone()]),
            None => tag.remove_vorbis("LYRICS"),
        }

        if let Some(cover) = &tags.cover {
            tag.remove_picture_type(metaflac::block::PictureType::CoverFront);
            tag.add_picture(
                cover.mime_type,
                metaflac::block::PictureType::CoverFront,
                cover.data.clone(),
            );
        }

        ensure_writable(path)?;
        tag.save().context("Failed to save FLAC tags")?;
        Ok(())
    }
}

/// M4A (AAC in MP4) audio file implementation
pub struct M4aFile;

impl AudioFile for M4aFile {
    fn format_name(&self) -> &'static str {
        "m4a"
    }

    fn write_tags(&self, path: &Path, tags: &TagSet) -> Result<()> {
        use mp4ameta::{Img, Tag};

        let mut tag =
            Tag::read_from_path(path).or_else(|_| Ok::<_, anyhow::Error>(Tag::default()))?;

        tag.set_title(&tags.title);
        tag.set_artist(&tags.artist);
        tag.set_album(&tags.album);
        tag.set_album_artist(&tags.album_artist);

        match &tags.genre {
            Some(genre) => tag.set_genre(genre),
            None => tag.remove_genres(),
        }
        match tags.track_number.and_then(|n| u16::try_from(n).ok()) {
            Some(num) => tag.set_track_number(num),
            None => tag.remove_track_number(),
        }
        match &tags.lyrics {
            Some(lyrics) => tag.set_lyrics(lyrics),
            None => tag.remove_lyrics(),
        }

        if let Some(cover) = &tags.cover {
            let img = match cover.mime_type {
                "image/png" => Img::png(cover.data.clone()),
                _ => Img::jpeg(cover.data.clone()),
            };
            tag.set_artwork(img);
        }

        ensure_writable(path)?;
        tag.write_to_path(path).context("Failed to save M4A tags")?;
        Ok(())
    }
}

/// Ogg (Vorbis, Opus, Speex) with Vorbis comments, written through lofty
pub struct OggFile;

impl AudioFile for OggFile {
    fn format_name(&self) -> &'static str {
        "ogg"
    }

    fn write_tags(&self, path: &Path, tags: &TagSet) -> Result<()> {
        use lofty::config::WriteOptions;
        use lofty::file::{AudioFile as _, TaggedFileExt};
        use lofty::picture::{MimeType, Picture, PictureType};
        use lofty::prelude::Accessor;
        use lofty::tag::{ItemKey, Tag};

        let mut tagged_file = lofty::read_from_path(path).context("Failed to read Ogg stream")?;
        let tag_type = tagged_file.primary_tag_type();
        if tagged_file.tag(tag_type).is_none() {
            tagged_file.insert_tag(Tag::new(tag_type));
        }
        let tag = tagged_file
            .tag_mut(tag_type)
            .with_context(|| format!("No writable {:?} tag in {}", tag_type, path.display()))?;

        tag.set_title(tags.title.clone());
        tag.set_artist(tags.artist.clone());
        tag.set_album(tags.album.clone());
        tag.insert_text(ItemKey::AlbumArtist, tags.album_artist.clone());

        match &tags.genre {
            Some(genre) => tag.set_genre(genre.clone()),
            None => tag.remove_genre(),
        }
        match tags.track_number {
            Some(track) => tag.set_track(track),
            None => tag.remove_track(),
        }
        match &tags.lyrics {
            Some(lyrics) => {
                tag.insert_text(ItemKey::Lyrics, lyrics.clone());
            }
            None => {
                tag.remove_key(ItemKey::Lyrics);
            }
        }

        if let Some(cover) = &tags.cover {
            let mime_type = match cover.mime_type {
                "image/png" => MimeType::Png,
                _ => MimeType::Jpeg,
            };
            let picture = Picture::unchecked(cover.data.clone())
                .pic_type(PictureType::CoverFront)
                .mime_type(mime_type)
                .build();
            tag.remove_picture_type(PictureType::CoverFront);
            tag.push_picture(picture);
        }

        ensure_writable(path)?;
        tagged_file
            .save_to_path(path, WriteOptions::default())
            .context("Failed to save Ogg tags")?;
        Ok(())
    }
}

/// True when `extension` (without dot, any case) is an audio extension.
pub fn is_audio_extension(extension: &str) -> bool {
    let extension = extension.to_lowercase();
    AUDIO_EXTENSIONS.contains(&extension.as_str())
}

/// Factory function to create the appropriate AudioFile implementation based on file extension
pub fn get_audio_file_handler(extension: &str) -> Option<Box<dyn AudioFile>> {
    match extension.to_lowercase().as_str() {
        "mp3" | "aac" => Some(Box::new(Mp3File)),
        "wav" => Some(Box::new(WavFile)),
        "flac" => Some(Box::new(FlacFile)),
        "m4a" => Some(Box::new(M4aFile)),
        "ogg" => Some(Box::new(OggFile)),
        _ => None,
    }
}

/// Write `tags` to `path`, picking the container handler by extension.
pub fn write_tags(path: &Path, tags: &TagSet) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();

    let handler = get_audio_file_handler(extension)
        .ok_or_else(|| TaggerError::UnsupportedFormat(extension.to_string()))?;

    tracing::debug!("Writing {} tags to {}", handler.format_name(), path.display());
    handler.write_tags(path, tags)
}
