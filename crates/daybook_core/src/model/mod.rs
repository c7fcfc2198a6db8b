//! Domain model for diary entries and blog content.
//!
//! # Responsibility
//! - Define the canonical records persisted by the repository layer.
//! - Own per-record validation invoked before every write.
//!
//! # Invariants
//! - Every record is identified by a stable, non-nil `Uuid`.
//! - A diary entry's scheduled window never reaches past midnight.
//! - Deletion is a hard delete; there is no tombstone state.

use chrono::NaiveTime;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod entry;
pub mod post;

/// Validation error shared by all domain records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Record carries the nil uuid.
    NilUuid,
    /// A required text field is empty or whitespace-only.
    BlankField {
        model: &'static str,
        field: &'static str,
    },
    /// Entry duration is zero or negative.
    NonPositiveDuration { seconds: i64 },
    /// Entry duration has a sub-second remainder that storage cannot keep.
    SubSecondDuration,
    /// Entry window reaches or passes midnight of the following day.
    CrossesMidnight { start: NaiveTime, minutes: i64 },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilUuid => write!(f, "record uuid must not be nil"),
            Self::BlankField { model, field } => {
                write!(f, "{model}.{field} must not be blank")
            }
            Self::NonPositiveDuration { seconds } => {
                write!(f, "entry duration must be positive, got {seconds}s")
            }
            Self::SubSecondDuration => {
                write!(f, "entry duration must be a whole number of seconds")
            }
            Self::CrossesMidnight { start, minutes } => write!(
                f,
                "entry starting at {start} with duration {minutes}min would cross midnight"
            ),
        }
    }
}

impl Error for ValidationError {}
