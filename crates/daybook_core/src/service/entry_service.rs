//! Diary use-case service.
//!
//! # Responsibility
//! - Provide save/get/delete entry points plus the calendar view payloads
//!   (day, multi-day, month, reminders).
//! - Fill a blank snippet from the entry body before saving.
//!
//! # Invariants
//! - Service APIs never bypass repository validation or clash enforcement.
//! - View payloads are plain data; rendering stays outside the core.

use crate::calendar::{
    assign_to_slots, date_slug, month_grid, multi_day_dates, time_slots, CalendarSettings,
    TimeSlot,
};
use crate::model::entry::{Entry, EntryId};
use crate::repo::entry_repo::EntryRepository;
use crate::repo::RepoError;
use crate::schedule::ClashError;
use crate::service::summary::derive_text_summary;
use chrono::{Datelike, NaiveDate};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for diary use-cases.
#[derive(Debug)]
pub enum DiaryServiceError {
    /// Target entry does not exist.
    EntryNotFound(EntryId),
    /// The entry's window collides with a persisted same-date entry.
    Clash(ClashError),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for DiaryServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EntryNotFound(id) => write!(f, "entry not found: {id}"),
            Self::Clash(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent diary state: {details}"),
        }
    }
}

impl Error for DiaryServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Clash(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for DiaryServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::EntryNotFound(id),
            RepoError::Clash(err) => Self::Clash(err),
            other => Self::Repo(other),
        }
    }
}

/// One ladder row of a day view: the slot plus its first entry, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySlot {
    /// Slot metadata (label, slug, window).
    pub slot: TimeSlot,
    /// Address of the slot on its date, e.g. `2026-03-14_06-30`.
    pub slug: String,
    /// First entry starting inside the slot window.
    pub entry: Option<Entry>,
}

/// Day view payload: the date's slot ladder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayView {
    pub date: NaiveDate,
    pub nav_slug: String,
    pub slots: Vec<DaySlot>,
}

/// One column header of the multi-day view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateSlot {
    pub date: NaiveDate,
    /// Column header, e.g. `Sat 14`.
    pub header: String,
    pub slug: String,
}

/// One ladder row of the multi-day view: a slot across all displayed days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiDayRow {
    pub slot: TimeSlot,
    /// One cell per displayed day, aligned with `MultiDayView::days`.
    pub cells: Vec<Option<Entry>>,
}

/// Multi-day view payload: consecutive days sharing one slot ladder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiDayView {
    pub days: Vec<DateSlot>,
    pub rows: Vec<MultiDayRow>,
}

/// One cell of the month grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthDay {
    pub date: NaiveDate,
    pub day: u32,
    pub slug: String,
    /// Whether any creator has entries on this date.
    pub has_entries: bool,
    pub is_today: bool,
}

/// Month view payload: a seven-wide week matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<Vec<Option<MonthDay>>>,
}

/// Use-case service for the diary/calendar.
pub struct DiaryService<R: EntryRepository> {
    repo: R,
    settings: CalendarSettings,
}

impl<R: EntryRepository> DiaryService<R> {
    /// Creates a service with default calendar settings.
    pub fn new(repo: R) -> Self {
        Self::with_settings(repo, CalendarSettings::default())
    }

    /// Creates a service with explicit calendar settings.
    pub fn with_settings(repo: R, settings: CalendarSettings) -> Self {
        Self { repo, settings }
    }

    /// Saves an entry (create or update) and returns the persisted state.
    ///
    /// A blank snippet is filled from the body before the write, so list
    /// displays always have a one-liner to show.
    ///
    /// # Errors
    /// - `Clash` when the entry overlaps a persisted same-date entry.
    /// - Validation and persistence errors from the repository unchanged.
    pub fn save_entry(&mut self, mut entry: Entry) -> Result<Entry, DiaryServiceError> {
        if entry.snippet.trim().is_empty() {
            entry.snippet = derive_text_summary(&entry.body).unwrap_or_default();
        }

        let id = self.repo.save_entry(&entry)?;
        self.repo
            .get_entry(id)?
            .ok_or(DiaryServiceError::InconsistentState(
                "saved entry not found in read-back",
            ))
    }

    /// Gets one entry by stable ID.
    pub fn entry(&self, id: EntryId) -> Result<Entry, DiaryServiceError> {
        self.repo
            .get_entry(id)?
            .ok_or(DiaryServiceError::EntryNotFound(id))
    }

    /// Removes one entry outright.
    pub fn delete_entry(&mut self, id: EntryId) -> Result<(), DiaryServiceError> {
        self.repo.delete_entry(id)?;
        Ok(())
    }

    /// Builds the day view: the date's slot ladder with entries placed.
    pub fn day_view(&self, creator: &str, date: NaiveDate) -> Result<DayView, DiaryServiceError> {
        let entries = self.repo.list_day(creator, date)?;
        let slots = time_slots(&self.settings);
        let cells = assign_to_slots(&slots, &entries);

        let slots = slots
            .into_iter()
            .zip(cells)
            .map(|(slot, entry)| DaySlot {
                slug: format!("{}_{}", date_slug(date), slot.slug),
                slot,
                entry,
            })
            .collect();

        Ok(DayView {
            date,
            nav_slug: date_slug(date),
            slots,
        })
    }

    /// Builds the multi-day view starting at `start`.
    pub fn multi_day_view(
        &self,
        creator: &str,
        start: NaiveDate,
    ) -> Result<MultiDayView, DiaryServiceError> {
        let dates = multi_day_dates(start, self.settings.multi_day_count);
        let days = dates
            .iter()
            .map(|&date| DateSlot {
                date,
                header: date.format("%a %d").to_string(),
                slug: date_slug(date),
            })
            .collect();

        let per_day: Vec<Vec<Option<Entry>>> = dates
            .iter()
            .map(|&date| {
                let entries = self.repo.list_day(creator, date)?;
                Ok(assign_to_slots(&time_slots(&self.settings), &entries))
            })
            .collect::<Result<_, DiaryServiceError>>()?;

        let rows = time_slots(&self.settings)
            .into_iter()
            .enumerate()
            .map(|(slot_index, slot)| MultiDayRow {
                slot,
                cells: per_day
                    .iter()
                    .map(|day_cells| day_cells[slot_index].clone())
                    .collect(),
            })
            .collect();

        Ok(MultiDayView { days, rows })
    }

    /// Builds the month view with entry-day markers across all creators.
    pub fn month_view(
        &self,
        year: i32,
        month: u32,
        today: NaiveDate,
    ) -> Result<MonthView, DiaryServiceError> {
        let entry_dates = self.repo.month_dates(year, month)?;

        let weeks = month_grid(year, month, self.settings.first_weekday)
            .into_iter()
            .map(|week| {
                week.into_iter()
                    .map(|cell| {
                        cell.map(|date| MonthDay {
                            date,
                            day: date.day(),
                            slug: date_slug(date),
                            has_entries: entry_dates.contains(&date),
                            is_today: date == today,
                        })
                    })
                    .collect()
            })
            .collect();

        Ok(MonthView { year, month, weeks })
    }

    /// Lists the creator's reminder-flagged entries for today and tomorrow.
    pub fn reminders(
        &self,
        creator: &str,
        today: NaiveDate,
    ) -> Result<Vec<Entry>, DiaryServiceError> {
        let entries = self.repo.list_reminders(creator, today)?;
        Ok(entries)
    }
}
