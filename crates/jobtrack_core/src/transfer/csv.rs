//! CSV export and quote-aware CSV import.
//!
//! # Invariants
//! - Export column order is fixed by `CSV_HEADERS`.
//! - Every exported data field is quoted with inner quotes doubled.
//! - Import maps headers through `HEADER_FIELDS` after lower-casing and
//!   stripping whitespace; unknown headers are ignored.
//! - `CreatedAt` is exported as a display string, so creation time only
//!   survives a round-trip to the second.

use crate::datetime::{coerce_created_at, format_created_at};
use crate::model::id::generate_unique_id;
use crate::model::item::{Item, ItemId, Priority, Status};
use chrono::TimeZone;
use std::collections::HashSet;
use std::fmt::Display;

/// Default download name for CSV exports.
pub const CSV_FILE_NAME: &str = "job-tracker.csv";

/// Export header row, in column order.
pub const CSV_HEADERS: [&str; 10] = [
    "Company",
    "Position",
    "Contact",
    "Channel",
    "Status",
    "NextStep",
    "FollowUp",
    "Priority",
    "Notes",
    "CreatedAt",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CsvField {
    Company,
    Position,
    Contact,
    Channel,
    Status,
    NextStep,
    FollowUp,
    Priority,
    Notes,
    CreatedAt,
}

/// Normalized header name to item field.
const HEADER_FIELDS: &[(&str, CsvField)] = &[
    ("company", CsvField::Company),
    ("position", CsvField::Position),
    ("contact", CsvField::Contact),
    ("channel", CsvField::Channel),
    ("status", CsvField::Status),
    ("nextstep", CsvField::NextStep),
    ("followup", CsvField::FollowUp),
    ("priority", CsvField::Priority),
    ("notes", CsvField::Notes),
    ("createdat", CsvField::CreatedAt),
];

fn field_for_header(header: &str) -> Option<CsvField> {
    let key: String = header
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    HEADER_FIELDS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, field)| *field)
}

impl CsvField {
    fn assign<Tz: TimeZone>(self, item: &mut Item, value: &str, tz: &Tz, now_ms: i64) {
        match self {
            Self::Company => item.company = value.to_string(),
            Self::Position => item.position = value.to_string(),
            Self::Contact => item.contact = value.to_string(),
            Self::Channel => item.channel = value.to_string(),
            Self::Status => item.status = Status::from_label(value),
            Self::NextStep => item.next_step = value.to_string(),
            Self::FollowUp => item.follow_up = value.to_string(),
            Self::Priority => item.priority = Priority::from_label(value),
            Self::Notes => item.notes = value.to_string(),
            Self::CreatedAt => item.created_at = coerce_created_at(value, tz, now_ms),
        }
    }
}

/// Renders the collection as CSV, header row first, rows joined by `\n`.
pub fn export_csv<Tz>(items: &[Item], tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut lines = Vec::with_capacity(items.len() + 1);
    lines.push(CSV_HEADERS.join(","));

    for item in items {
        let notes = item.notes.replace('\n', " ");
        let created_at = format_created_at(item.created_at, tz);
        let row = [
            item.company.as_str(),
            item.position.as_str(),
            item.contact.as_str(),
            item.channel.as_str(),
            item.status.as_str(),
            item.next_step.as_str(),
            item.follow_up.as_str(),
            item.priority.as_str(),
            notes.as_str(),
            created_at.as_str(),
        ];
        lines.push(row.iter().map(|field| quote(field)).collect::<Vec<_>>().join(","));
    }

    lines.join("\n")
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Splits one CSV line into fields.
///
/// Commas inside quotes are literal; `""` inside quotes is one quote.
/// Quotes are not kept in the output.
pub fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    fields.push(current);
    fields
}

/// Parses CSV text into new items, one per data row.
///
/// Blank lines are skipped; fewer than two remaining lines yields nothing.
/// Each row starts with a fresh id from `taken` and `created_at = now_ms`.
pub fn parse_csv<Tz: TimeZone>(
    text: &str,
    taken: &mut HashSet<ItemId>,
    tz: &Tz,
    now_ms: i64,
) -> Vec<Item> {
    let lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
        .collect();
    if lines.len() < 2 {
        return Vec::new();
    }

    let columns: Vec<Option<CsvField>> = parse_csv_line(lines[0])
        .iter()
        .map(|header| field_for_header(header))
        .collect();

    lines[1..]
        .iter()
        .map(|line| {
            let cells = parse_csv_line(line);
            let mut item = Item::blank(generate_unique_id(taken), now_ms);
            for (index, field) in columns.iter().enumerate() {
                if let Some(field) = field {
                    let value = cells.get(index).map(String::as_str).unwrap_or("");
                    field.assign(&mut item, value, tz, now_ms);
                }
            }
            item
        })
        .collect()
}
