//! Diary entry repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD plus calendar-shaped queries over `entries` storage.
//! - Enforce the no-clash invariant on every save.
//!
//! # Invariants
//! - `save_entry` validates the entry, then reads the same creator+date rows,
//!   runs the clash check, and writes — all inside one immediate transaction,
//!   so concurrent saves cannot both pass the check.
//! - Day queries return entries ordered by start time.
//! - Deletes are hard deletes.

use crate::model::entry::{Entry, EntryId};
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use crate::schedule::check_no_clash;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use log::info;
use rusqlite::{params, Connection, Row, TransactionBehavior};
use std::collections::BTreeSet;
use uuid::Uuid;

const DATE_COLUMN_FORMAT: &str = "%Y-%m-%d";
const TIME_COLUMN_FORMAT: &str = "%H:%M:%S";

const ENTRY_SELECT_SQL: &str = "SELECT
    uuid,
    creator,
    title,
    snippet,
    body,
    date,
    start_time,
    duration_seconds,
    remind,
    created_at
FROM entries";

/// Repository interface for diary entry persistence.
pub trait EntryRepository {
    /// Creates or updates one entry, enforcing the no-clash invariant.
    fn save_entry(&mut self, entry: &Entry) -> RepoResult<EntryId>;
    /// Gets one entry by stable ID.
    fn get_entry(&self, id: EntryId) -> RepoResult<Option<Entry>>;
    /// Lists one creator's entries on one date, ordered by start time.
    fn list_day(&self, creator: &str, date: NaiveDate) -> RepoResult<Vec<Entry>>;
    /// Returns the dates inside one month that have any entries at all.
    fn month_dates(&self, year: i32, month: u32) -> RepoResult<BTreeSet<NaiveDate>>;
    /// Lists one creator's reminder-flagged entries for today and tomorrow,
    /// ordered by date then start time.
    fn list_reminders(&self, creator: &str, today: NaiveDate) -> RepoResult<Vec<Entry>>;
    /// Removes one entry outright.
    fn delete_entry(&mut self, id: EntryId) -> RepoResult<()>;
}

/// SQLite-backed entry repository.
pub struct SqliteEntryRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteEntryRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    ///
    /// # Errors
    /// Rejects connections without applied migrations or the `entries` table.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["entries"])?;
        Ok(Self { conn })
    }
}

impl EntryRepository for SqliteEntryRepository<'_> {
    fn save_entry(&mut self, entry: &Entry) -> RepoResult<EntryId> {
        entry.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let same_day = query_day(&tx, &entry.creator, entry.date)?;
        check_no_clash(entry, &same_day)?;

        let changed = tx.execute(
            "UPDATE entries
             SET
                creator = ?2,
                title = ?3,
                snippet = ?4,
                body = ?5,
                date = ?6,
                start_time = ?7,
                duration_seconds = ?8,
                remind = ?9,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![
                entry.uuid.to_string(),
                entry.creator.as_str(),
                entry.title.as_str(),
                entry.snippet.as_str(),
                entry.body.as_str(),
                entry.date.format(DATE_COLUMN_FORMAT).to_string(),
                entry.start_time.format(TIME_COLUMN_FORMAT).to_string(),
                entry.duration.num_seconds(),
                i64::from(entry.remind),
            ],
        )?;

        if changed == 0 {
            tx.execute(
                "INSERT INTO entries (
                    uuid,
                    creator,
                    title,
                    snippet,
                    body,
                    date,
                    start_time,
                    duration_seconds,
                    remind,
                    created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
                params![
                    entry.uuid.to_string(),
                    entry.creator.as_str(),
                    entry.title.as_str(),
                    entry.snippet.as_str(),
                    entry.body.as_str(),
                    entry.date.format(DATE_COLUMN_FORMAT).to_string(),
                    entry.start_time.format(TIME_COLUMN_FORMAT).to_string(),
                    entry.duration.num_seconds(),
                    i64::from(entry.remind),
                    entry.created_at.timestamp_millis(),
                ],
            )?;
        }

        tx.commit()?;
        info!(
            "event=entry_save module=repo status=ok uuid={} date={}",
            entry.uuid,
            entry.date.format(DATE_COLUMN_FORMAT)
        );
        Ok(entry.uuid)
    }

    fn get_entry(&self, id: EntryId) -> RepoResult<Option<Entry>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ENTRY_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_entry_row(row)?));
        }

        Ok(None)
    }

    fn list_day(&self, creator: &str, date: NaiveDate) -> RepoResult<Vec<Entry>> {
        query_day(self.conn, creator, date)
    }

    fn month_dates(&self, year: i32, month: u32) -> RepoResult<BTreeSet<NaiveDate>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT date
             FROM entries
             WHERE date LIKE ?1;",
        )?;

        let prefix = format!("{year:04}-{month:02}-%");
        let mut rows = stmt.query([prefix])?;
        let mut dates = BTreeSet::new();
        while let Some(row) = rows.next()? {
            let text: String = row.get(0)?;
            dates.insert(parse_date_column(&text)?);
        }

        Ok(dates)
    }

    fn list_reminders(&self, creator: &str, today: NaiveDate) -> RepoResult<Vec<Entry>> {
        let window = crate::calendar::reminder_window(today);
        let mut stmt = self.conn.prepare(&format!(
            "{ENTRY_SELECT_SQL}
             WHERE creator = ?1
               AND date IN (?2, ?3)
               AND remind = 1
             ORDER BY date ASC, start_time ASC, uuid ASC;"
        ))?;

        let mut rows = stmt.query(params![
            creator,
            window[0].format(DATE_COLUMN_FORMAT).to_string(),
            window[1].format(DATE_COLUMN_FORMAT).to_string(),
        ])?;

        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }

        Ok(entries)
    }

    fn delete_entry(&mut self, id: EntryId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM entries WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        info!("event=entry_delete module=repo status=ok uuid={id}");
        Ok(())
    }
}

fn query_day(conn: &Connection, creator: &str, date: NaiveDate) -> RepoResult<Vec<Entry>> {
    let mut stmt = conn.prepare(&format!(
        "{ENTRY_SELECT_SQL}
         WHERE creator = ?1
           AND date = ?2
         ORDER BY start_time ASC, uuid ASC;"
    ))?;

    let mut rows = stmt.query(params![
        creator,
        date.format(DATE_COLUMN_FORMAT).to_string()
    ])?;

    let mut entries = Vec::new();
    while let Some(row) = rows.next()? {
        entries.push(parse_entry_row(row)?);
    }

    Ok(entries)
}

fn parse_entry_row(row: &Row<'_>) -> RepoResult<Entry> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in entries.uuid"))
    })?;

    let date_text: String = row.get("date")?;
    let date = parse_date_column(&date_text)?;

    let time_text: String = row.get("start_time")?;
    let start_time = NaiveTime::parse_from_str(&time_text, TIME_COLUMN_FORMAT).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid time value `{time_text}` in entries.start_time"
        ))
    })?;

    let duration_seconds: i64 = row.get("duration_seconds")?;
    let duration = TimeDelta::try_seconds(duration_seconds).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid duration value `{duration_seconds}` in entries.duration_seconds"
        ))
    })?;

    let remind = match row.get::<_, i64>("remind")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid remind value `{other}` in entries.remind"
            )));
        }
    };

    let created_ms: i64 = row.get("created_at")?;
    let created_at = parse_timestamp_column(created_ms, "entries.created_at")?;

    let entry = Entry {
        uuid,
        creator: row.get("creator")?,
        title: row.get("title")?,
        snippet: row.get("snippet")?,
        body: row.get("body")?,
        date,
        start_time,
        duration,
        remind,
        created_at,
    };
    entry.validate()?;
    Ok(entry)
}

fn parse_date_column(text: &str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_COLUMN_FORMAT).map_err(|_| {
        RepoError::InvalidData(format!("invalid date value `{text}` in entries.date"))
    })
}

pub(crate) fn parse_timestamp_column(ms: i64, column: &str) -> RepoResult<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(ms).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid timestamp value `{ms}` in {column}"))
    })
}
