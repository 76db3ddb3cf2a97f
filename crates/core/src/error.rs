use std::path::PathBuf;

use thiserror::Error;

/// Why a diagram line was rejected in strict mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatIssue {
    /// Nothing but glyphs and whitespace on the line.
    EmptyName,
    /// More depth markers than there are open directories.
    TooDeep { depth: usize, open: usize },
}

impl std::fmt::Display for FormatIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatIssue::EmptyName => write!(f, "entry has an empty name"),
            FormatIssue::TooDeep { depth, open } => write!(
                f,
                "entry is nested {depth} levels deep but only {open} directories are open"
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Invalid input format. Please check your tree diagram. (input is empty)")]
    EmptyInput,
    #[error("Invalid input format. Please check your tree diagram. (line {line}: {reason})")]
    InvalidFormat { line: usize, reason: FormatIssue },
}

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Failed to generate zip file: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Failed to generate zip file: cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to generate zip file: unsafe path {0:?}")]
    UnsafePath(String),
}

#[derive(Debug, Error)]
pub enum ContentMapError {
    #[error("Failed to read content map {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Content map is not a JSON object of strings: {0}")]
    Json(#[from] serde_json::Error),
}
