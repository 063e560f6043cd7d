//! JSON pass-through import and export.
//!
//! Entries are trusted as-is: ids are not regenerated and fields are not
//! validated. Only the top-level shape (an array) is checked.

use super::{ImportError, ImportResult};
use crate::model::item::{decode_entries, Item};
use log::warn;
use serde_json::Value;

/// Default download name for JSON exports.
pub const JSON_FILE_NAME: &str = "job-tracker.json";

/// Parses a JSON array of items.
///
/// Entries that are not item-shaped are skipped and counted in the log;
/// the caller decides what an empty result means.
///
/// # Errors
/// - `MalformedJson` when the text is not JSON.
/// - `NotAnArray` when the top-level value is anything but an array.
pub fn parse_json_items(text: &str) -> ImportResult<Vec<Item>> {
    let Value::Array(entries) = serde_json::from_str::<Value>(text)? else {
        return Err(ImportError::NotAnArray);
    };

    let (items, skipped) = decode_entries(entries);
    if skipped > 0 {
        warn!(
            "event=import_json module=transfer status=partial count={} skipped={}",
            items.len(),
            skipped
        );
    }
    Ok(items)
}

/// Renders the collection as a pretty-printed JSON array.
pub fn export_json(items: &[Item]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(items)
}
