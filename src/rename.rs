//! Renamer: `<artist> - <title><ext>` with a filesystem-safe name.

use anyhow::{Context, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

const MAX_NAME_BYTES: usize = 255;

/// Longer dotted tails are cut like the rest of the name
const MAX_EXTENSION_BYTES: usize = 16;

const ILLEGAL_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Make `name` legal as a file name on common filesystems.
///
/// Illegal characters and non-whitespace control characters are dropped and
/// whitespace runs become one space. Leading whitespace and trailing spaces
/// or dots are trimmed, Windows device names get a `_` suffix, and the result
/// fits in 255 bytes with its extension intact. Sanitising a sanitised name
/// is a no-op.
pub fn sanitize_file_name(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|c| !ILLEGAL_CHARS.contains(c) && (c.is_whitespace() || !c.is_control()))
        .collect();

    let collapsed = WHITESPACE.replace_all(&kept, " ");
    let trimmed = collapsed.trim_start().trim_end_matches([' ', '.']);

    let (stem, rest) = match trimmed.find('.') {
        Some(i) => trimmed.split_at(i),
        None => (trimmed, ""),
    };
    let unreserved = if RESERVED_NAMES.iter().any(|r| r.eq_ignore_ascii_case(stem)) {
        format!("{}_{}", stem, rest)
    } else {
        trimmed.to_string()
    };

    truncate_keeping_extension(&unreserved, MAX_NAME_BYTES)
        .trim_end_matches([' ', '.'])
        .to_string()
}

fn truncate_keeping_extension(name: &str, max_bytes: usize) -> String {
    if name.len() <= max_bytes {
        return name.to_string();
    }

    let ext_len = name
        .rfind('.')
        .map(|i| name.len() - i)
        .filter(|len| *len <= MAX_EXTENSION_BYTES && *len < max_bytes)
        .unwrap_or(0);

    let mut cut = max_bytes - ext_len;
    while !name.is_char_boundary(cut) {
        cut -= 1;
    }

    format!("{}{}", &name[..cut], &name[name.len() - ext_len..])
}

/// File name for a tagged song: "<artist> - <title><ext>", sanitised.
pub fn target_file_name(artist: &str, title: &str, extension: &str) -> String {
    sanitize_file_name(&format!("{} - {}{}", artist, title, extension))
}

/// Rename `path` within its directory after the song and return the new path.
///
/// An existing file with the target name is handled however the filesystem
/// handles `rename`.
pub fn rename_song_file(path: &Path, artist: &str, title: &str) -> Result<PathBuf> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default();

    let new_name = target_file_name(artist, title, &extension);
    let new_path = match path.parent() {
        Some(dir) => dir.join(&new_name),
        None => PathBuf::from(&new_name),
    };

    if new_path == path {
        tracing::debug!("{} already has its final name", path.display());
        return Ok(new_path);
    }

    std::fs::rename(path, &new_path).with_context(|| {
        format!("Failed to rename {} to {}", path.display(), new_path.display())
    })?;

    Ok(new_path)
}
