//! Import from arrow-separated plain-text notes.
//!
//! One application per line:
//! `- Company --> Position --> Contact --> Channel --> Notes --> Status info`.
//! Status, priority, next step and (for interviews) the follow-up time are
//! inferred from the free text.

use crate::model::id::{generate_unique_id, random_unit};
use crate::model::item::{Item, ItemDraft, ItemId, Priority, Status};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

const CREATED_AT_SPREAD_MS: f64 = 7.0 * 24.0 * 60.0 * 60.0 * 1000.0;

static LEADING_BULLET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-\s*").expect("valid bullet regex"));
static ARROW_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*-->\s*").expect("valid separator regex"));
static INTERVIEW_TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\s+(\d{1,2}),\s+(\d{4})[^,]*,\s+from\s+(\d{1,2}):(\d{2})\s+(am|pm)",
    )
    .expect("valid interview time regex")
});

/// Parses one notes line into form input.
///
/// Returns `None` for lines with fewer than two non-empty parts.
pub fn parse_arrow_line(line: &str) -> Option<ItemDraft> {
    let trimmed = LEADING_BULLET_RE.replace(line.trim(), "");
    let parts: Vec<&str> = ARROW_SEPARATOR_RE
        .split(&trimmed)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();
    if parts.len() < 2 {
        return None;
    }

    let part = |index: usize| parts.get(index).copied().unwrap_or("").to_string();
    let company = part(0);
    let position = part(1).replace("**", "").trim().to_string();
    let contact = part(2);
    let mut channel = part(3);
    let notes = part(4);
    let status_info = part(5);

    let status_text = format!("{notes} {status_info}").to_lowercase();
    let channel_text = channel.to_lowercase();

    let mut follow_up = String::new();
    let status = if status_text.contains("rejected") {
        Status::Rejected
    } else if status_text.contains("interview") || channel_text.contains("video interview") {
        follow_up = interview_follow_up(&format!("{notes} {channel}")).unwrap_or_default();
        if channel_text.contains("video interview") {
            channel = "LinkedIn / Email".to_string();
        }
        Status::Interview
    } else if status_text.contains("hold") || channel_text.contains("on hold") {
        Status::OnHold
    } else if status_text.contains("phone") || status_text.contains("call") {
        Status::PhoneScreen
    } else {
        Status::Applied
    };

    let priority = match status {
        Status::Interview | Status::PhoneScreen => Priority::High,
        Status::OnHold => Priority::Low,
        _ => Priority::Medium,
    };
    let next_step = match status {
        Status::Interview => "Prepare for interview",
        Status::PhoneScreen => "Follow up on call",
        Status::Applied => "Wait for response",
        _ => "",
    }
    .to_string();

    let notes = if !status_info.is_empty() && status_info != notes {
        if notes.is_empty() {
            status_info
        } else {
            format!("{notes}. {status_info}")
        }
    } else {
        notes
    };

    Some(ItemDraft {
        company,
        position,
        contact,
        channel,
        status,
        next_step,
        follow_up,
        priority,
        notes,
    })
}

/// Extracts `Nov 6, 2025, from 5:30 PM` as a `YYYY-MM-DDTHH:mm` value.
fn interview_follow_up(text: &str) -> Option<String> {
    let captures = INTERVIEW_TIME_RE.captures(text)?;
    let month = month_number(&captures[1])?;
    let day: u32 = captures[2].parse().ok()?;
    let year: i32 = captures[3].parse().ok()?;
    let hour: u32 = captures[4].parse().ok()?;
    let minute: u32 = captures[5].parse().ok()?;
    let is_pm = captures[6].eq_ignore_ascii_case("pm");

    let hour24 = match (hour, is_pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, true) => h + 12,
        (h, false) => h,
    };

    NaiveDate::from_ymd_opt(year, month, day)?
        .and_hms_opt(hour24, minute, 0)
        .map(|at| at.format(crate::datetime::FOLLOW_UP_FORMAT).to_string())
}

fn month_number(name: &str) -> Option<u32> {
    let month = match name.to_ascii_lowercase().as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// Parses a whole notes document into new items.
///
/// Blank lines and `#` comments are skipped. Creation times are spread
/// randomly over the seven days before `now_ms`.
pub fn parse_arrow_notes(text: &str, taken: &mut HashSet<ItemId>, now_ms: i64) -> Vec<Item> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(parse_arrow_line)
        .map(|draft| {
            let created_at = now_ms - (random_unit() * CREATED_AT_SPREAD_MS) as i64;
            Item::from_draft(generate_unique_id(taken), created_at, draft)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{interview_follow_up, month_number};

    #[test]
    fn interview_time_converts_to_24_hour_clock() {
        assert_eq!(
            interview_follow_up("Video interview Nov 6, 2025, from 5:30 PM to 6:00 PM IST")
                .as_deref(),
            Some("2025-11-06T17:30")
        );
        assert_eq!(
            interview_follow_up("call on December 1, 2025, from 12:05 AM").as_deref(),
            Some("2025-12-01T00:05")
        );
        assert_eq!(interview_follow_up("no date here"), None);
    }

    #[test]
    fn month_names_are_case_insensitive() {
        assert_eq!(month_number("NOV"), Some(11));
        assert_eq!(month_number("foo"), None);
    }
}
