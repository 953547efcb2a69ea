use crate::audio::is_audio_extension;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

fn has_audio_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(is_audio_extension)
}

/// Expand CLI sources into the audio files to tag.
///
/// Directories contribute their immediate audio children (sorted by name),
/// files are kept when their extension is an audio one. Anything else is
/// skipped; missing sources are logged.
pub async fn collect_audio_files(sources: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for source in sources {
        let metadata = match tokio::fs::metadata(source).await {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::warn!("Skipping {}: {}", source.display(), e);
                continue;
            }
        };

        if !metadata.is_dir() {
            if has_audio_extension(source) {
                files.push(source.clone());
            }
            continue;
        }

        tracing::info!("Scanning directory: {}", source.display());
        let mut children = Vec::new();
        let mut entries = tokio::fs::read_dir(source)
            .await
            .with_context(|| format!("Failed to read directory {}", source.display()))?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.is_file() && has_audio_extension(&path) {
                children.push(path);
            }
        }

        children.sort();
        files.extend(children);
    }

    Ok(files)
}

/// Search query for a file: its stem, prefixed by the user's extra terms.
pub fn query_for(path: &Path, extra: Option<&str>) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    match extra.map(str::trim).filter(|e| !e.is_empty()) {
        Some(extra) => format!("{} {}", extra, stem),
        None => stem,
    }
}
