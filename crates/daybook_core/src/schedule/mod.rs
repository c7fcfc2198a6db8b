//! Time-clash rules for diary entries.
//!
//! # Responsibility
//! - Decide whether two entries on the same date overlap in time.
//! - Check a candidate entry against already-persisted same-date entries
//!   before it is written.
//!
//! # Invariants
//! - `overlaps` is reflexive and symmetric, never transitive; it is a named
//!   predicate, not an equality.
//! - Interval ends are non-inclusive: back-to-back entries do not clash.
//! - The checks here are pure; the repository save path owns when they run.

mod overlap;

pub use overlap::{check_no_clash, overlaps, ClashError, CLASH_MESSAGE};
