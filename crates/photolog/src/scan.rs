//! Folder ingestion
//!
//! Lists candidate images in a single folder (non-recursive) and resolves
//! their metadata. Directory order is undefined, so the loaded records are
//! sorted case-insensitively by file name before being returned.

use crate::order::sort_by_name;
use crate::types::{PhotoRecord, PhotologError, Result};
use std::path::{Path, PathBuf};

/// Extensions picked up from a photo folder (lowercase, without the dot)
pub const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "heic", "heif"];

/// Whether a path has one of the accepted photo extensions
pub fn is_photo(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| PHOTO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// List the photo files directly inside `folder`, in directory order.
///
/// Symlinks to photo files count as photos.
pub async fn discover_photos(folder: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let folder = folder.as_ref();
    if !tokio::fs::metadata(folder)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
    {
        return Err(PhotologError::FolderNotFound(folder.to_owned()));
    }

    let mut entries = tokio::fs::read_dir(folder).await?;
    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !is_photo(&path) {
            continue;
        }
        // Follows symlinks; dangling links are skipped
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => paths.push(path),
            Ok(_) => {}
            Err(e) => log::warn!("Skipping {}: {}", path.display(), e),
        }
    }
    Ok(paths)
}

/// Discover and resolve every photo in `folder`, sorted by file name.
pub async fn load_photos(folder: impl AsRef<Path>) -> Result<Vec<PhotoRecord>> {
    let paths = discover_photos(folder).await?;
    if paths.is_empty() {
        return Err(PhotologError::NoPhotos);
    }

    // EXIF parsing is CPU-bound, spawn blocking
    let mut records =
        tokio::task::spawn_blocking(move || resolve_all(&paths)).await??;
    sort_by_name(&mut records);
    log::info!("Loaded {} photos", records.len());
    Ok(records)
}

fn resolve_all(paths: &[PathBuf]) -> Result<Vec<PhotoRecord>> {
    paths.iter().map(PhotoRecord::from_path).collect()
}
