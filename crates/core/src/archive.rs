use std::collections::HashSet;
use std::io::{Seek, Write};

use chrono::{Datelike, Local, Timelike};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::error::ArchiveError;
use crate::model::Tree;
use crate::serialize::{empty_dir_paths, ArchiveEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    #[default]
    Deflated,
    Stored,
}

impl From<Compression> for CompressionMethod {
    fn from(c: Compression) -> Self {
        match c {
            Compression::Deflated => CompressionMethod::Deflated,
            Compression::Stored => CompressionMethod::Stored,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveOptions {
    /// Write explicit `dir/` entries for directories without children.
    pub empty_dirs: bool,
    pub compression: Compression,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            empty_dirs: true,
            compression: Compression::Deflated,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub files: usize,
    pub dirs: usize,
    /// Uncompressed content bytes.
    pub bytes: u64,
}

/// `<root>.zip`, or `archive.zip` when the root name is not usable.
pub fn archive_file_name(tree: &Tree) -> String {
    let name = tree.name().trim();
    let usable = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(&['/', '\\'][..]);
    if usable {
        format!("{name}.zip")
    } else {
        "archive.zip".to_string()
    }
}

/// Normalizes an archive path. Leading empty and `.` components are dropped,
/// so absolute paths and a `.` root become relative. Any later empty, `.` or
/// `..` component is rejected, since it would merge the entry into another
/// one, as is a path left with no components.
pub fn sanitize_path(path: &str) -> Result<String, ArchiveError> {
    let unsafe_path = || ArchiveError::UnsafePath(path.to_string());
    let mut parts = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." if parts.is_empty() => continue,
            "" | "." | ".." => return Err(unsafe_path()),
            p if p.contains('\\') => return Err(unsafe_path()),
            p => parts.push(p),
        }
    }
    if parts.is_empty() {
        return Err(unsafe_path());
    }
    Ok(parts.join("/"))
}

fn timestamp() -> DateTime {
    let now = Local::now();
    DateTime::from_date_and_time(
        now.year().clamp(1980, 2107) as u16,
        now.month() as u8,
        now.day() as u8,
        now.hour() as u8,
        now.minute() as u8,
        now.second() as u8,
    )
    .unwrap_or_default()
}

/// Packs `entries` (and the empty directories of `tree`) into a zip written
/// to `writer`.
pub fn write_zip<W: Write + Seek>(
    tree: &Tree,
    entries: &[ArchiveEntry],
    options: &ArchiveOptions,
    writer: W,
) -> Result<ArchiveSummary, ArchiveError> {
    let file_options = SimpleFileOptions::default()
        .compression_method(options.compression.into())
        .last_modified_time(timestamp());

    let mut zip = ZipWriter::new(writer);
    let mut summary = ArchiveSummary::default();
    let mut seen = HashSet::new();

    for entry in entries {
        let path = sanitize_path(&entry.path)?;
        if !seen.insert(path.clone()) {
            warn!(%path, "duplicate archive path; keeping the first entry");
            continue;
        }
        zip.start_file(path, file_options)?;
        zip.write_all(entry.content.as_bytes())
            .map_err(zip::result::ZipError::from)?;
        summary.files += 1;
        summary.bytes += entry.content.len() as u64;
    }

    if options.empty_dirs {
        for dir in empty_dir_paths(tree) {
            let path = sanitize_path(&dir)?;
            if seen.insert(path.clone()) {
                zip.add_directory(format!("{path}/"), file_options)?;
                summary.dirs += 1;
            }
        }
    }

    zip.finish()?;
    debug!(
        files = summary.files,
        dirs = summary.dirs,
        bytes = summary.bytes,
        "wrote zip archive"
    );
    Ok(summary)
}

/// In-memory variant of [`write_zip`].
pub fn zip_bytes(
    tree: &Tree,
    entries: &[ArchiveEntry],
    options: &ArchiveOptions,
) -> Result<Vec<u8>, ArchiveError> {
    let mut cursor = std::io::Cursor::new(Vec::new());
    write_zip(tree, entries, options, &mut cursor)?;
    Ok(cursor.into_inner())
}
