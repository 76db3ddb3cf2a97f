use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::archive::{sanitize_path, ArchiveSummary};
use crate::error::ArchiveError;
use crate::model::Tree;
use crate::serialize::{empty_dir_paths, ArchiveEntry};

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> ArchiveError + '_ {
    move |source| ArchiveError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn target(dest: &Path, archive_path: &str) -> Result<PathBuf, ArchiveError> {
    let clean = sanitize_path(archive_path)?;
    let mut out = dest.to_path_buf();
    out.extend(clean.split('/'));
    Ok(out)
}

/// Writes the tree under `dest` instead of packing it: every entry becomes a
/// file, every empty directory a directory. Existing files are overwritten.
pub fn materialize(
    tree: &Tree,
    entries: &[ArchiveEntry],
    dest: &Path,
) -> Result<ArchiveSummary, ArchiveError> {
    std::fs::create_dir_all(dest).map_err(io_err(dest))?;
    let mut summary = ArchiveSummary::default();

    for entry in entries {
        let path = target(dest, &entry.path)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err(parent))?;
        }
        std::fs::write(&path, entry.content.as_bytes()).map_err(io_err(&path))?;
        debug!(path = %path.display(), "wrote file");
        summary.files += 1;
        summary.bytes += entry.content.len() as u64;
    }

    for dir in empty_dir_paths(tree) {
        let path = target(dest, &dir)?;
        std::fs::create_dir_all(&path).map_err(io_err(&path))?;
        summary.dirs += 1;
    }

    info!(dest = %dest.display(), files = summary.files, dirs = summary.dirs, "materialized tree");
    Ok(summary)
}
