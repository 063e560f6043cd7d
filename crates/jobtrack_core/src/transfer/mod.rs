//! Import/export transforms between the item collection and files.
//!
//! # Responsibility
//! - Pick the import format from the file name.
//! - Turn file content into new items, or report one user-facing error.
//!
//! # Invariants
//! - A failed or empty import produces no items; the caller's collection is
//!   never touched on error.
//! - CSV and arrow-notes rows always get fresh ids; JSON entries are kept
//!   verbatim.

use crate::model::item::Item;
use chrono::TimeZone;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub mod csv;
pub mod json;
pub mod notes;

pub type ImportResult<T> = Result<T, ImportError>;

/// Import failure, carrying the message shown to the user.
#[derive(Debug)]
pub enum ImportError {
    /// File could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Content is not valid JSON.
    MalformedJson(serde_json::Error),
    /// JSON parsed, but the top-level value is not an array.
    NotAnArray,
    /// Parsing succeeded but produced zero entries.
    NoEntries,
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(
                f,
                "Error importing file. Could not read {}: {source}",
                path.display()
            ),
            Self::MalformedJson(err) => {
                write!(f, "Error importing file. Please check the format. ({err})")
            }
            Self::NotAnArray => write!(
                f,
                "Error importing file. Expected a JSON array of applications."
            ),
            Self::NoEntries => write!(f, "No valid entries found in the file."),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::MalformedJson(err) => Some(err),
            Self::NotAnArray | Self::NoEntries => None,
        }
    }
}

impl From<serde_json::Error> for ImportError {
    fn from(value: serde_json::Error) -> Self {
        Self::MalformedJson(value)
    }
}

/// Import file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Csv,
    Json,
    ArrowNotes,
}

impl ImportFormat {
    /// `.csv` is CSV, `.txt`/`.md` are arrow notes, everything else is JSON.
    pub fn from_file_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.ends_with(".csv") {
            Self::Csv
        } else if lower.ends_with(".txt") || lower.ends_with(".md") {
            Self::ArrowNotes
        } else {
            Self::Json
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::ArrowNotes => "arrow_notes",
        }
    }
}

/// Parses import content into new items.
///
/// `existing_ids` seeds id generation for CSV/notes rows so fresh ids never
/// collide with the current collection. `tz` interprets CSV dates;
/// `now_ms` is the fallback creation time.
///
/// # Errors
/// - JSON content is malformed or not an array.
/// - The content yields zero entries.
pub fn parse_import<Tz: TimeZone>(
    format: ImportFormat,
    content: &str,
    existing_ids: impl IntoIterator<Item = String>,
    tz: &Tz,
    now_ms: i64,
) -> ImportResult<Vec<Item>> {
    let mut taken = existing_ids.into_iter().collect();
    let items = match format {
        ImportFormat::Csv => csv::parse_csv(content, &mut taken, tz, now_ms),
        ImportFormat::Json => json::parse_json_items(content)?,
        ImportFormat::ArrowNotes => notes::parse_arrow_notes(content, &mut taken, now_ms),
    };

    if items.is_empty() {
        return Err(ImportError::NoEntries);
    }
    Ok(items)
}

/// Reads an import file as UTF-8 text.
pub fn read_import_file(path: &Path) -> ImportResult<String> {
    std::fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
