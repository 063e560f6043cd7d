//! Job application item model.
//!
//! # Responsibility
//! - Define the canonical record persisted in the storage slot.
//! - Provide form input (`ItemDraft`) with add-form defaults and validation.
//! - Provide lifecycle helpers for edit-save and mark-done.
//!
//! # Invariants
//! - `id` is opaque and never reused for another item.
//! - `company` and `position` are non-blank for items created or edited
//!   through a draft. Imported items may relax this.
//! - `follow_up` is either empty or a local datetime string; unparseable
//!   values count as "no follow-up" in views.
//! - Decoding never rejects an item for shape problems: missing fields fall
//!   back to defaults and unknown keys are preserved in `extra`.

use crate::datetime::parse_datetime_in;
use crate::model::lenient;
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Opaque item identifier (`id_` followed by base-36 characters).
pub type ItemId = String;

/// Application pipeline status.
///
/// Labels that are not one of the known values (typically from imports) are
/// kept verbatim in `Unrecognized`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Status {
    #[default]
    Applied,
    PhoneScreen,
    Interview,
    OnHold,
    Rejected,
    Offer,
    Unrecognized(String),
}

impl Status {
    /// Known statuses in form order.
    pub fn known() -> [Status; 6] {
        [
            Self::Applied,
            Self::PhoneScreen,
            Self::Interview,
            Self::OnHold,
            Self::Rejected,
            Self::Offer,
        ]
    }

    /// Value used when a decoded item carries no status at all.
    pub fn unset() -> Self {
        Self::Unrecognized(String::new())
    }

    /// Maps a label to a known status, keeping anything else verbatim.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Applied" => Self::Applied,
            "Phone Screen" => Self::PhoneScreen,
            "Interview" => Self::Interview,
            "On Hold" => Self::OnHold,
            "Rejected" => Self::Rejected,
            "Offer" => Self::Offer,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// Stable display/wire label.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Applied => "Applied",
            Self::PhoneScreen => "Phone Screen",
            Self::Interview => "Interview",
            Self::OnHold => "On Hold",
            Self::Rejected => "Rejected",
            Self::Offer => "Offer",
            Self::Unrecognized(label) => label.as_str(),
        }
    }

    /// Badge slug, e.g. `phone-screen`.
    pub fn slug(&self) -> String {
        slugify(self.as_str())
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from_label(&lenient::text(deserializer)?))
    }
}

/// Board priority. Each known value is one Kanban column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
    Unrecognized(String),
}

impl Priority {
    /// Board columns in display order.
    pub fn known() -> [Priority; 3] {
        [Self::High, Self::Medium, Self::Low]
    }

    /// Value used when a decoded item carries no priority at all.
    pub fn unset() -> Self {
        Self::Unrecognized(String::new())
    }

    pub fn from_label(label: &str) -> Self {
        match label {
            "High" => Self::High,
            "Medium" => Self::Medium,
            "Low" => Self::Low,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::Unrecognized(label) => label.as_str(),
        }
    }

    /// Badge slug, e.g. `high`.
    pub fn slug(&self) -> String {
        slugify(self.as_str())
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from_label(&lenient::text(deserializer)?))
    }
}

/// Canonical persisted record for one job application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: ItemId,
    /// Unix epoch milliseconds. `0` when absent.
    #[serde(default, deserialize_with = "lenient::millis")]
    pub created_at: i64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub company: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub position: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub contact: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub channel: String,
    #[serde(default = "Status::unset")]
    pub status: Status,
    #[serde(default, deserialize_with = "lenient::text")]
    pub next_step: String,
    /// `YYYY-MM-DDTHH:mm` local datetime, or empty.
    #[serde(default, deserialize_with = "lenient::text")]
    pub follow_up: String,
    #[serde(default = "Priority::unset")]
    pub priority: Priority,
    #[serde(default, deserialize_with = "lenient::text")]
    pub notes: String,
    /// Keys this version does not know, written back unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    /// Builds an item from form input with caller-provided identity.
    ///
    /// Does not validate the draft; callers on the form path run
    /// `ItemDraft::validate()` first.
    pub fn from_draft(id: impl Into<ItemId>, created_at: i64, draft: ItemDraft) -> Self {
        let mut item = Self::blank(id, created_at);
        item.apply_draft(draft);
        item
    }

    /// Item with identity only: empty text, unset status and priority.
    ///
    /// This is the starting point for row-by-row imports, where absent
    /// columns must stay absent rather than pick up form defaults.
    pub fn blank(id: impl Into<ItemId>, created_at: i64) -> Self {
        Self {
            id: id.into(),
            created_at,
            company: String::new(),
            position: String::new(),
            contact: String::new(),
            channel: String::new(),
            status: Status::unset(),
            next_step: String::new(),
            follow_up: String::new(),
            priority: Priority::unset(),
            notes: String::new(),
            extra: Map::new(),
        }
    }

    /// Edit-save: replaces every form field; `id`, `created_at` and `extra`
    /// are kept.
    pub fn apply_draft(&mut self, draft: ItemDraft) {
        self.company = draft.company;
        self.position = draft.position;
        self.contact = draft.contact;
        self.channel = draft.channel;
        self.status = draft.status;
        self.next_step = draft.next_step;
        self.follow_up = draft.follow_up;
        self.priority = draft.priority;
        self.notes = draft.notes;
    }

    /// Marks the scheduled follow-up as completed.
    ///
    /// Clears `follow_up`; an `Interview` status drops to `On Hold`.
    pub fn mark_done(&mut self) {
        self.follow_up.clear();
        if self.status == Status::Interview {
            self.status = Status::OnHold;
        }
    }

    /// Parsed follow-up instant in `tz`, or `None` when empty/unparseable.
    pub fn follow_up_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        parse_datetime_in(&self.follow_up, tz)
    }

    /// Case-insensitive match of an already lower-cased needle against
    /// company, position, contact and notes.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        [&self.company, &self.position, &self.contact, &self.notes]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Decodes array entries one by one.
///
/// Entries that are not item-shaped (`null`, numbers, nested arrays) are
/// dropped; returns the decoded items and how many were dropped.
pub fn decode_entries(entries: Vec<Value>) -> (Vec<Item>, usize) {
    let total = entries.len();
    let items: Vec<Item> = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect();
    let skipped = total - items.len();
    (items, skipped)
}

/// Form input for add and edit-save. Defaults match the add form: `Applied`,
/// `Medium`, everything else empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemDraft {
    pub company: String,
    pub position: String,
    pub contact: String,
    pub channel: String,
    pub status: Status,
    pub next_step: String,
    pub follow_up: String,
    pub priority: Priority,
    pub notes: String,
}

impl ItemDraft {
    /// Draft with the two required fields set and form defaults elsewhere.
    pub fn new(company: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            position: position.into(),
            ..Self::default()
        }
    }

    /// Edit form pre-filled from an existing item.
    pub fn from_item(item: &Item) -> Self {
        Self {
            company: item.company.clone(),
            position: item.position.clone(),
            contact: item.contact.clone(),
            channel: item.channel.clone(),
            status: item.status.clone(),
            next_step: item.next_step.clone(),
            follow_up: item.follow_up.clone(),
            priority: item.priority.clone(),
            notes: item.notes.clone(),
        }
    }

    /// Checks the form-path required fields.
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        if self.company.trim().is_empty() {
            return Err(ItemValidationError::MissingCompany);
        }
        if self.position.trim().is_empty() {
            return Err(ItemValidationError::MissingPosition);
        }
        Ok(())
    }
}

/// Required-field violations on the form path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemValidationError {
    MissingCompany,
    MissingPosition,
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCompany => write!(f, "company must not be empty"),
            Self::MissingPosition => write!(f, "position must not be empty"),
        }
    }
}

impl Error for ItemValidationError {}

fn slugify(label: &str) -> String {
    label
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::{slugify, Priority, Status};

    #[test]
    fn slugify_joins_words_with_dashes() {
        assert_eq!(slugify("Phone Screen"), "phone-screen");
        assert_eq!(slugify("  On   Hold "), "on-hold");
        assert_eq!(slugify("High"), "high");
    }

    #[test]
    fn unknown_labels_round_trip_verbatim() {
        let status = Status::from_label("Ghosted");
        assert_eq!(status, Status::Unrecognized("Ghosted".to_string()));
        assert_eq!(status.as_str(), "Ghosted");
        assert_eq!(Priority::from_label("urgent").as_str(), "urgent");
    }

    #[test]
    fn known_labels_parse_back() {
        for status in Status::known() {
            assert_eq!(Status::from_label(status.as_str()), status);
        }
        for priority in Priority::known() {
            assert_eq!(Priority::from_label(priority.as_str()), priority);
        }
    }
}
