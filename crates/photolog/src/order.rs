//! Photo ordering and the optional rename-to-disk step
//!
//! Ordering operations work on an owned sequence of records and never touch
//! the filesystem. Renaming is a separate, explicit step that returns the
//! records with their new paths; planning and emission run on whichever
//! sequence the caller hands them.

use crate::types::{PhotoRecord, PhotologError, Result, file_name_of};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Sort case-insensitively by file name (the default order)
pub fn sort_by_name(records: &mut [PhotoRecord]) {
    records.sort_by_cached_key(|record| record.file_name().to_lowercase());
}

/// Sort by capture time, oldest first. Ties keep their current order.
pub fn sort_by_timestamp(records: &mut [PhotoRecord]) {
    records.sort_by_key(|record| record.captured_at);
}

/// Move the record at `from` so that it ends up at index `to`.
///
/// Out-of-range indices are clamped to the end of the sequence.
pub fn move_photo(records: &mut Vec<PhotoRecord>, from: usize, to: usize) {
    if records.is_empty() || from >= records.len() {
        return;
    }
    let to = to.min(records.len() - 1);
    if from != to {
        let record = records.remove(from);
        records.insert(to, record);
    }
}

/// Drop the record with the given path. Returns whether anything was removed.
pub fn remove_photo(records: &mut Vec<PhotoRecord>, path: &Path) -> bool {
    let before = records.len();
    records.retain(|record| record.path != path);
    records.len() != before
}

/// Reorder by an explicit list of file names.
///
/// Records whose names are not listed are dropped; a listed name that
/// matches no record is an error.
pub fn apply_order<S: AsRef<str>>(
    records: Vec<PhotoRecord>,
    names: &[S],
) -> Result<Vec<PhotoRecord>> {
    let mut remaining = records;
    let mut ordered = Vec::with_capacity(names.len());
    for name in names {
        let name = name.as_ref();
        let position = remaining
            .iter()
            .position(|record| record.file_name() == name)
            .ok_or_else(|| PhotologError::UnknownPhoto(name.to_string()))?;
        ordered.push(remaining.remove(position));
    }
    Ok(ordered)
}

/// One file move of the rename step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameStep {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Name each photo `Photo {n}.{ext}` after its final position, keeping the
/// original extension and directory.
pub fn plan_renames(records: &[PhotoRecord]) -> Vec<RenameStep> {
    records
        .iter()
        .enumerate()
        .map(|(idx, record)| RenameStep {
            from: record.path.clone(),
            to: record.path.with_file_name(positional_name(idx + 1, record)),
        })
        .collect()
}

fn positional_name(number: usize, record: &PhotoRecord) -> String {
    match record.path.extension() {
        Some(ext) => format!("Photo {}.{}", number, ext.to_string_lossy()),
        None => format!("Photo {}", number),
    }
}

fn temp_path(idx: usize, from: &Path) -> PathBuf {
    from.with_file_name(format!("temp_{}_{}", idx, file_name_of(from)))
}

/// Rename photos on disk to their positional names.
///
/// Files are first moved to temporary names so that swapping two
/// `Photo N` files cannot overwrite one with the other. A destination that
/// already exists and is not one of the photos being renamed fails with
/// [`PhotologError::RenameConflict`] before any file is moved. Returns the
/// records with updated paths.
pub async fn apply_renames(records: Vec<PhotoRecord>) -> Result<Vec<PhotoRecord>> {
    let steps = plan_renames(&records);
    let staged: Vec<PathBuf> = steps
        .iter()
        .enumerate()
        .map(|(idx, step)| temp_path(idx, &step.from))
        .collect();

    // Nothing moves unless every destination is free or is one of our own files
    let sources: HashSet<&Path> = steps.iter().map(|step| step.from.as_path()).collect();
    for target in steps.iter().map(|step| &step.to).chain(&staged) {
        if !sources.contains(target.as_path()) && tokio::fs::try_exists(target).await? {
            return Err(PhotologError::RenameConflict(target.clone()));
        }
    }

    for (temp, step) in staged.iter().zip(&steps) {
        tokio::fs::rename(&step.from, temp).await?;
    }

    for (temp, step) in staged.iter().zip(&steps) {
        tokio::fs::rename(temp, &step.to).await?;
        log::debug!("Renamed {} -> {}", step.from.display(), step.to.display());
    }

    Ok(records
        .into_iter()
        .zip(steps)
        .map(|(record, step)| PhotoRecord {
            path: step.to,
            ..record
        })
        .collect())
}
