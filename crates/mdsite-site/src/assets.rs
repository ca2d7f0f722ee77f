//! Static asset mirroring.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::SiteError;

/// Copy every file under `from` to the same relative path under `to`.
///
/// Files already present at the destination are left untouched. A missing
/// `from` directory copies nothing. Returns the number of files copied.
///
/// # Errors
///
/// Returns [`SiteError::Io`] if a directory cannot be read or created, or a
/// file cannot be copied.
pub fn copy_assets(from: &Path, to: &Path) -> Result<usize, SiteError> {
    if !from.is_dir() {
        tracing::warn!(dir = %from.display(), "Resources directory not found, no assets copied");
        return Ok(0);
    }
    let mut copied = 0;
    walk_dir(from, to, &mut copied)?;
    Ok(copied)
}

fn walk_dir(from: &Path, to: &Path, copied: &mut usize) -> Result<(), SiteError> {
    let entries = fs::read_dir(from).map_err(|e| SiteError::io(from, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| SiteError::io(from, e))?;
        let source = entry.path();
        let target = to.join(entry.file_name());
        if source.is_dir() {
            walk_dir(&source, &target, copied)?;
        } else if copy_if_absent(&source, &target).map_err(|e| SiteError::io(&target, e))? {
            *copied += 1;
        }
    }
    Ok(())
}

fn copy_if_absent(source: &Path, target: &Path) -> io::Result<bool> {
    if target.exists() {
        tracing::debug!(path = %target.display(), "Asset exists, skipping");
        return Ok(false);
    }
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(source, target)?;
    tracing::debug!(path = %target.display(), "Copied asset");
    Ok(true)
}
