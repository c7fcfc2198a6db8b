//! Calendar layout computations: slot ladders, month grids, slugs.
//!
//! # Responsibility
//! - Produce the pure data behind day/multi-day/month displays.
//! - Parse and format the date/time slugs used to address days and slots.
//!
//! # Invariants
//! - Time slots are half-open `[start, end)` windows.
//! - Month grid rows are always exactly seven cells wide.
//! - Slug formats are stable: date `%Y-%m-%d`, time `%H-%M`.

use crate::model::entry::Entry;
use chrono::{Datelike, NaiveDate, NaiveTime, TimeDelta, Weekday};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Date slug format used in navigation addresses.
pub const DATE_SLUG_FORMAT: &str = "%Y-%m-%d";
/// Display format for slot time labels.
pub const TIME_FORMAT: &str = "%H:%M";
/// Time slug format used in slot addresses.
pub const TIME_SLUG_FORMAT: &str = "%H-%M";

/// Layout knobs for the calendar displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarSettings {
    /// First day of the displayed week.
    pub first_weekday: Weekday,
    /// Number of consecutive days shown by the multi-day view.
    pub multi_day_count: u32,
    /// Start of the slot ladder.
    pub day_start: NaiveTime,
    /// Last slot start of the ladder (inclusive).
    pub day_finish: NaiveTime,
    /// Width of one slot.
    pub slot_increment: TimeDelta,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            first_weekday: Weekday::Mon,
            multi_day_count: 4,
            day_start: NaiveTime::from_hms_opt(6, 0, 0).expect("valid ladder start"),
            day_finish: NaiveTime::from_hms_opt(20, 0, 0).expect("valid ladder finish"),
            slot_increment: TimeDelta::minutes(30),
        }
    }
}

/// One row of the day/multi-day slot ladder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSlot {
    /// Display label, e.g. `06:30`.
    pub label: String,
    /// Slug fragment, e.g. `06-30`.
    pub slug: String,
    /// Slot start (inclusive).
    pub start: NaiveTime,
    /// Slot end (exclusive).
    pub end: NaiveTime,
}

/// Builds the ladder of display slots between `day_start` and `day_finish`.
///
/// One slot begins at every increment from start to finish inclusive, so the
/// default 06:00..20:00 ladder with 30-minute steps yields 29 slots.
pub fn time_slots(settings: &CalendarSettings) -> Vec<TimeSlot> {
    // Anchor on a fixed date so slot arithmetic cannot wrap a bare time.
    let anchor = NaiveDate::from_ymd_opt(2000, 1, 1).expect("valid anchor date");
    let mut at = anchor.and_time(settings.day_start);
    let finish = anchor.and_time(settings.day_finish);

    let mut slots = Vec::new();
    while at <= finish {
        let start = at.time();
        at += settings.slot_increment;
        slots.push(TimeSlot {
            label: start.format(TIME_FORMAT).to_string(),
            slug: start.format(TIME_SLUG_FORMAT).to_string(),
            start,
            end: at.time(),
        });
    }
    slots
}

/// Projects a day's entries onto the slot ladder.
///
/// Each cell holds the first entry whose start time falls inside the slot's
/// `[start, end)` window; `entries` is expected sorted by start time, as
/// returned by the repository day query.
pub fn assign_to_slots(slots: &[TimeSlot], entries: &[Entry]) -> Vec<Option<Entry>> {
    slots
        .iter()
        .map(|slot| {
            entries
                .iter()
                .find(|entry| entry.start_time >= slot.start && entry.start_time < slot.end)
                .cloned()
        })
        .collect()
}

/// The month view's week matrix: rows of seven cells, `None` for cells that
/// belong to the neighbouring months.
pub fn month_grid(year: i32, month: u32, first_weekday: Weekday) -> Vec<Vec<Option<NaiveDate>>> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };

    let leading = days_from(first_weekday, first.weekday()) as usize;
    let mut cells: Vec<Option<NaiveDate>> = vec![None; leading];
    let mut day = first;
    loop {
        cells.push(Some(day));
        match day.succ_opt() {
            Some(next) if next.month() == month => day = next,
            _ => break,
        }
    }
    while cells.len() % 7 != 0 {
        cells.push(None);
    }

    cells.chunks(7).map(|week| week.to_vec()).collect()
}

/// Consecutive dates starting at `start`, for the multi-day layout.
pub fn multi_day_dates(start: NaiveDate, count: u32) -> Vec<NaiveDate> {
    (0..i64::from(count))
        .filter_map(|offset| start.checked_add_signed(TimeDelta::days(offset)))
        .collect()
}

/// The reminder feed window: today and tomorrow.
pub fn reminder_window(today: NaiveDate) -> [NaiveDate; 2] {
    let tomorrow = today.succ_opt().unwrap_or(today);
    [today, tomorrow]
}

/// Formats a date navigation slug (`2026-03-14`).
pub fn date_slug(date: NaiveDate) -> String {
    date.format(DATE_SLUG_FORMAT).to_string()
}

/// Formats a combined date+time slot address (`2026-03-14_06-30`).
pub fn datetime_slug(date: NaiveDate, time: NaiveTime) -> String {
    format!(
        "{}_{}",
        date.format(DATE_SLUG_FORMAT),
        time.format(TIME_SLUG_FORMAT)
    )
}

/// A slug failed to parse as a date or date+time address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugError {
    slug: String,
}

impl Display for SlugError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unrecognized calendar slug `{}`", self.slug)
    }
}

impl Error for SlugError {}

/// Parses a date slug produced by `date_slug`.
///
/// # Errors
/// `SlugError` when the text is not a `%Y-%m-%d` date.
pub fn parse_date_slug(slug: &str) -> Result<NaiveDate, SlugError> {
    NaiveDate::parse_from_str(slug, DATE_SLUG_FORMAT).map_err(|_| SlugError {
        slug: slug.to_string(),
    })
}

/// Parses a combined slug produced by `datetime_slug`.
///
/// # Errors
/// `SlugError` when either half fails to parse.
pub fn parse_datetime_slug(slug: &str) -> Result<(NaiveDate, NaiveTime), SlugError> {
    let error = || SlugError {
        slug: slug.to_string(),
    };
    let (date_part, time_part) = slug.split_once('_').ok_or_else(error)?;
    let date = NaiveDate::parse_from_str(date_part, DATE_SLUG_FORMAT).map_err(|_| error())?;
    let time = NaiveTime::parse_from_str(time_part, TIME_SLUG_FORMAT).map_err(|_| error())?;
    Ok((date, time))
}

fn days_from(first: Weekday, weekday: Weekday) -> u32 {
    (7 + weekday.num_days_from_monday() - first.num_days_from_monday()) % 7
}
