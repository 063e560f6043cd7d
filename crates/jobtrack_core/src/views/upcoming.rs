//! Follow-ups scheduled for the current week.
//!
//! # Invariants
//! - The week runs from Sunday 00:00:00.000 through the following Sunday
//!   23:59:59.999 in the caller's time zone, both ends inclusive.
//! - A DST gap at a boundary never empties the view; the boundary moves to
//!   the nearest existing instant inside the week.
//! - Items with an empty or unparseable `follow_up` never appear.

use crate::model::item::Item;
use chrono::{DateTime, Datelike, Days, NaiveDateTime, NaiveTime, TimeDelta, TimeZone};
use std::fmt::Display;

/// One upcoming follow-up with display fields attached.
#[derive(Debug, Clone)]
pub struct UpcomingItem<'a, Tz: TimeZone> {
    pub item: &'a Item,
    pub follow_up_at: DateTime<Tz>,
    /// Weekday short name, e.g. `Mon`.
    pub day_name: String,
    /// Month and day, e.g. `Nov 14`.
    pub date_str: String,
    /// Two-digit 12-hour time, e.g. `09:30 AM`.
    pub time_str: String,
    pub is_today: bool,
    pub is_tomorrow: bool,
}

/// Longest wall-clock gap a boundary is moved across.
const MAX_GAP_MINUTES: i64 = 24 * 60;

/// Inclusive bounds of the week containing `now`.
///
/// A boundary that falls into a skipped wall-clock interval (a DST jump at
/// midnight) moves to the first instant after the gap for the start, and the
/// last instant before it for the end.
pub fn week_bounds<Tz: TimeZone>(now: &DateTime<Tz>) -> Option<(DateTime<Tz>, DateTime<Tz>)> {
    let tz = now.timezone();
    let days_since_sunday = u64::from(now.weekday().num_days_from_sunday());
    let start_date = now.date_naive().checked_sub_days(Days::new(days_since_sunday))?;
    let end_date = start_date.checked_add_days(Days::new(7))?;

    let start = first_valid_at_or_after(&tz, start_date.and_time(NaiveTime::MIN))?;
    let end = last_valid_at_or_before(&tz, end_date.and_hms_milli_opt(23, 59, 59, 999)?)?;
    Some((start, end))
}

fn first_valid_at_or_after<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> Option<DateTime<Tz>> {
    (0..=MAX_GAP_MINUTES).find_map(|minutes| {
        let shifted = local.checked_add_signed(TimeDelta::minutes(minutes))?;
        tz.from_local_datetime(&shifted).earliest()
    })
}

fn last_valid_at_or_before<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> Option<DateTime<Tz>> {
    (0..=MAX_GAP_MINUTES).find_map(|minutes| {
        let shifted = local.checked_sub_signed(TimeDelta::minutes(minutes))?;
        tz.from_local_datetime(&shifted).latest()
    })
}

/// Follow-ups inside the current week, soonest first.
///
/// Considers every item; the search filter does not apply here.
pub fn upcoming_this_week<'a, Tz>(items: &'a [Item], now: &DateTime<Tz>) -> Vec<UpcomingItem<'a, Tz>>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let Some((start, end)) = week_bounds(now) else {
        return Vec::new();
    };
    let tz = now.timezone();
    let today = now.date_naive();
    let tomorrow = now
        .clone()
        .checked_add_signed(TimeDelta::days(1))
        .map(|at| at.date_naive());

    let mut upcoming: Vec<UpcomingItem<'a, Tz>> = items
        .iter()
        .filter_map(|item| {
            let at = item.follow_up_in(&tz)?;
            (at >= start && at <= end).then(|| {
                let date = at.date_naive();
                UpcomingItem {
                    item,
                    day_name: at.format("%a").to_string(),
                    date_str: at.format("%b %-d").to_string(),
                    time_str: at.format("%I:%M %p").to_string(),
                    is_today: date == today,
                    is_tomorrow: Some(date) == tomorrow,
                    follow_up_at: at,
                }
            })
        })
        .collect();

    upcoming.sort_by(|a, b| a.follow_up_at.cmp(&b.follow_up_at));
    upcoming
}
