//! Diary entry domain model.
//!
//! # Responsibility
//! - Define the calendar entry record: a dated, timed window of the owner's
//!   day plus free-form text and a reminder flag.
//! - Compute the entry's end time from start time and duration.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another entry.
//! - `duration` is a genuine elapsed-time value, positive and whole-second.
//! - `start_time + duration` stays inside the entry's own calendar date;
//!   windows that reach midnight of the next day fail validation.

use crate::model::ValidationError;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a diary entry.
pub type EntryId = Uuid;

/// Display cap applied to `title` in `short_label`.
const SHORT_TITLE_MAX_CHARS: usize = 40;
/// Display cap applied to `snippet` in `short_label`.
const SHORT_SNIPPET_MAX_CHARS: usize = 150;

/// Default entry start time: noon.
pub fn default_start_time() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).expect("noon is a valid time of day")
}

/// Default entry duration: one hour.
pub fn default_duration() -> TimeDelta {
    TimeDelta::hours(1)
}

/// A single diary entry occupying a time window on one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Stable global ID used for linking and self-identity in clash checks.
    pub uuid: EntryId,
    /// Owner of the entry; clash checking is scoped per creator per date.
    pub creator: String,
    /// Short headline, may be empty.
    pub title: String,
    /// One-line summary, may be empty; services fill it from `body`.
    pub snippet: String,
    /// Free-form body text.
    pub body: String,
    /// Calendar date the entry occupies.
    pub date: NaiveDate,
    /// Time of day the entry begins.
    pub start_time: NaiveTime,
    /// Elapsed length of the entry, serialized as whole seconds.
    #[serde(with = "duration_seconds")]
    pub duration: TimeDelta,
    /// Whether the entry appears in the reminder feed.
    pub remind: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Entry {
    /// Creates an entry on `date` with a generated ID and the stock defaults:
    /// start at noon, one hour long, no reminder.
    pub fn new(creator: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            creator: creator.into(),
            title: String::new(),
            snippet: String::new(),
            body: String::new(),
            date,
            start_time: default_start_time(),
            duration: default_duration(),
            remind: false,
            created_at: Utc::now(),
        }
    }

    /// Creates an entry with a caller-provided stable ID.
    ///
    /// Used by import paths where identity already exists externally.
    ///
    /// # Errors
    /// Rejects the nil uuid; all other fields follow `new` defaults.
    pub fn with_id(
        uuid: EntryId,
        creator: impl Into<String>,
        date: NaiveDate,
    ) -> Result<Self, ValidationError> {
        if uuid.is_nil() {
            return Err(ValidationError::NilUuid);
        }
        let mut entry = Self::new(creator, date);
        entry.uuid = uuid;
        Ok(entry)
    }

    /// Time of day the entry ends.
    ///
    /// Computed through combined date+time arithmetic and reduced back to the
    /// time-of-day component. Pure and idempotent; `validate` guarantees the
    /// result lies on the entry's own date for persisted entries.
    pub fn end_time(&self) -> NaiveTime {
        (self.date.and_time(self.start_time) + self.duration).time()
    }

    /// Checks the entry's own field invariants.
    ///
    /// Cross-entry invariants (time clashes) live in `schedule` and are
    /// enforced by the repository save path, not here.
    ///
    /// # Errors
    /// - `NilUuid` / `BlankField` for broken identity or missing creator.
    /// - `NonPositiveDuration` / `SubSecondDuration` for unusable durations.
    /// - `CrossesMidnight` when the window reaches the next calendar date.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.uuid.is_nil() {
            return Err(ValidationError::NilUuid);
        }
        if self.creator.trim().is_empty() {
            return Err(ValidationError::BlankField {
                model: "entry",
                field: "creator",
            });
        }
        if self.duration <= TimeDelta::zero() {
            return Err(ValidationError::NonPositiveDuration {
                seconds: self.duration.num_seconds(),
            });
        }
        if self.duration.subsec_nanos() != 0 {
            return Err(ValidationError::SubSecondDuration);
        }

        let end = self.date.and_time(self.start_time) + self.duration;
        if end.date() != self.date {
            return Err(ValidationError::CrossesMidnight {
                start: self.start_time,
                minutes: self.duration.num_minutes(),
            });
        }

        Ok(())
    }

    /// One-line display projection: `title - snippet`, falling back to
    /// whichever part is non-empty.
    pub fn short_label(&self) -> String {
        let title: String = self.title.chars().take(SHORT_TITLE_MAX_CHARS).collect();
        let snippet: String = self
            .snippet
            .chars()
            .take(SHORT_SNIPPET_MAX_CHARS)
            .collect();
        match (title.is_empty(), snippet.is_empty()) {
            (false, false) => format!("{title} - {snippet}"),
            (false, true) => title,
            (true, _) => snippet,
        }
    }
}

mod duration_seconds {
    use chrono::TimeDelta;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(value.num_seconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TimeDelta, D::Error> {
        let seconds = i64::deserialize(deserializer)?;
        TimeDelta::try_seconds(seconds)
            .ok_or_else(|| D::Error::custom(format!("duration out of range: {seconds}s")))
    }
}

#[cfg(test)]
mod tests {
    use super::{default_duration, default_start_time, Entry};
    use crate::model::ValidationError;
    use chrono::{NaiveDate, NaiveTime, TimeDelta};
    use uuid::Uuid;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    #[test]
    fn new_applies_noon_and_one_hour_defaults() {
        let entry = Entry::new("ana", day());

        assert!(!entry.uuid.is_nil());
        assert_eq!(entry.start_time, default_start_time());
        assert_eq!(entry.duration, default_duration());
        assert!(!entry.remind);
        assert!(entry.validate().is_ok());
    }

    #[test]
    fn with_id_rejects_nil_uuid() {
        let err = Entry::with_id(Uuid::nil(), "ana", day()).unwrap_err();
        assert_eq!(err, ValidationError::NilUuid);
    }

    #[test]
    fn validate_rejects_blank_creator_and_bad_durations() {
        let mut entry = Entry::new("  ", day());
        assert_eq!(
            entry.validate().unwrap_err(),
            ValidationError::BlankField {
                model: "entry",
                field: "creator",
            }
        );

        entry.creator = "ana".to_string();
        entry.duration = TimeDelta::zero();
        assert_eq!(
            entry.validate().unwrap_err(),
            ValidationError::NonPositiveDuration { seconds: 0 }
        );

        entry.duration = TimeDelta::milliseconds(1500);
        assert_eq!(entry.validate().unwrap_err(), ValidationError::SubSecondDuration);
    }

    #[test]
    fn validate_rejects_window_reaching_midnight() {
        let mut entry = Entry::new("ana", day());
        entry.start_time = NaiveTime::from_hms_opt(23, 0, 0).unwrap();
        entry.duration = TimeDelta::hours(1);

        let err = entry.validate().unwrap_err();
        assert!(matches!(err, ValidationError::CrossesMidnight { minutes: 60, .. }));

        entry.duration = TimeDelta::minutes(59);
        assert!(entry.validate().is_ok());
    }

    #[test]
    fn short_label_falls_back_between_title_and_snippet() {
        let mut entry = Entry::new("ana", day());
        entry.title = "dentist".to_string();
        assert_eq!(entry.short_label(), "dentist");

        entry.snippet = "bring paperwork".to_string();
        assert_eq!(entry.short_label(), "dentist - bring paperwork");

        entry.title.clear();
        assert_eq!(entry.short_label(), "bring paperwork");
    }

    #[test]
    fn serialization_keeps_duration_as_whole_seconds() {
        let mut entry = Entry::new("ana", day());
        entry.duration = TimeDelta::minutes(90);

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["duration"], 5400);
        assert_eq!(json["date"], "2026-03-14");

        let decoded: Entry = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, entry);
    }
}
