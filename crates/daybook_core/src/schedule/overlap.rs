//! Overlap predicate and pre-save clash check.
//!
//! # Responsibility
//! - Implement the interval relation between two entries sharing a date.
//! - Surface a user-facing clash error naming the conflicting entry.
//!
//! # Invariants
//! - Entries on different calendar dates never overlap.
//! - An entry never clashes with its own persisted row (same uuid).

use crate::model::entry::{Entry, EntryId};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fixed user-facing clash message, surfaced verbatim as a form error.
pub const CLASH_MESSAGE: &str =
    "Time clash not allowed. Please change the date/time/duration.";

/// A candidate entry's time window overlaps a persisted entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClashError {
    /// Identity of the persisted entry the candidate collides with.
    pub conflicting: EntryId,
    /// Display label of the conflicting entry.
    pub conflicting_label: String,
}

impl Display for ClashError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{CLASH_MESSAGE} (clashes with `{}`)", self.conflicting_label)
    }
}

impl Error for ClashError {}

/// Whether two entries occupy overlapping time on the same date.
///
/// The relation treats interval ends as non-inclusive, so an entry ending
/// exactly when another begins does not overlap it. Containment and
/// coincident starts do overlap. Symmetric and reflexive, but not
/// transitive: three entries can pairwise overlap with no instant common to
/// all three, so this must never back an `Eq` impl or key a map.
pub fn overlaps(a: &Entry, b: &Entry) -> bool {
    if a.date != b.date {
        return false;
    }
    // a ends at or before b begins
    if a.start_time < b.start_time && a.end_time() <= b.start_time {
        return false;
    }
    // a begins at or after b ends
    if a.start_time > b.start_time && a.start_time >= b.end_time() {
        return false;
    }
    true
}

/// Checks `candidate` against the persisted entries sharing its date.
///
/// The caller supplies `existing` (normally one repository query for the
/// candidate's creator and date); rows whose uuid equals the candidate's are
/// its own prior state and are skipped, so re-saving an unmodified entry
/// never fails.
///
/// # Errors
/// `ClashError` naming the first conflicting entry.
pub fn check_no_clash(candidate: &Entry, existing: &[Entry]) -> Result<(), ClashError> {
    for other in existing {
        if other.uuid == candidate.uuid {
            continue;
        }
        if overlaps(candidate, other) {
            return Err(ClashError {
                conflicting: other.uuid,
                conflicting_label: other.short_label(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{check_no_clash, overlaps, CLASH_MESSAGE};
    use crate::model::entry::Entry;
    use chrono::{NaiveDate, NaiveTime, TimeDelta};

    fn entry(day: u32, hour: u32, duration_hours: i64) -> Entry {
        let mut entry = Entry::new(
            "ana",
            NaiveDate::from_ymd_opt(2026, 5, day).unwrap(),
        );
        entry.start_time = NaiveTime::from_hms_opt(hour, 0, 0).unwrap();
        entry.duration = TimeDelta::hours(duration_hours);
        entry
    }

    #[test]
    fn same_window_overlaps_and_is_reflexive() {
        let a = entry(4, 12, 1);
        let b = entry(4, 12, 1);
        assert!(overlaps(&a, &b));
        assert!(overlaps(&a, &a));
    }

    #[test]
    fn different_days_never_overlap() {
        let a = entry(4, 12, 1);
        let b = entry(5, 12, 1);
        assert!(!overlaps(&a, &b));
        assert!(!overlaps(&b, &a));
    }

    #[test]
    fn strictly_before_does_not_overlap() {
        let a = entry(4, 12, 1);
        let b = entry(4, 14, 1);
        assert!(!overlaps(&a, &b));
        assert!(!overlaps(&b, &a));
    }

    #[test]
    fn back_to_back_entries_do_not_overlap() {
        let a = entry(4, 12, 1);
        let mut b = entry(4, 13, 1);
        b.start_time = a.end_time();
        assert!(!overlaps(&a, &b));
        assert!(!overlaps(&b, &a));
    }

    #[test]
    fn envelope_overlaps_both_ways() {
        let outer = entry(4, 12, 3);
        let inner = entry(4, 13, 1);
        assert!(overlaps(&outer, &inner));
        assert!(overlaps(&inner, &outer));
    }

    #[test]
    fn partial_overlap_and_coincident_start_overlap() {
        let a = entry(4, 12, 2);
        let b = entry(4, 13, 2);
        assert!(overlaps(&a, &b));
        assert!(overlaps(&b, &a));

        let c = entry(4, 12, 3);
        assert!(overlaps(&a, &c));
        assert!(overlaps(&c, &a));
    }

    #[test]
    fn relation_is_not_transitive() {
        // a-b overlap and b-c overlap, but a-c are disjoint.
        let a = entry(4, 12, 2);
        let b = entry(4, 13, 2);
        let c = entry(4, 14, 2);
        assert!(overlaps(&a, &b));
        assert!(overlaps(&b, &c));
        assert!(!overlaps(&a, &c));
    }

    #[test]
    fn check_no_clash_skips_own_persisted_row() {
        let saved = entry(4, 12, 1);
        let resaved = saved.clone();
        assert!(check_no_clash(&resaved, std::slice::from_ref(&saved)).is_ok());
    }

    #[test]
    fn check_no_clash_names_the_conflicting_entry() {
        let mut saved = entry(4, 12, 1);
        saved.title = "standup".to_string();
        let candidate = entry(4, 12, 1);

        let err = check_no_clash(&candidate, std::slice::from_ref(&saved)).unwrap_err();
        assert_eq!(err.conflicting, saved.uuid);
        assert!(err.to_string().contains(CLASH_MESSAGE));
        assert!(err.to_string().contains("standup"));
    }

    #[test]
    fn check_no_clash_passes_on_free_window() {
        let saved = entry(4, 12, 1);
        let candidate = entry(4, 14, 1);
        assert!(check_no_clash(&candidate, std::slice::from_ref(&saved)).is_ok());
    }
}
