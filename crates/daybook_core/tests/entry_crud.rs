use chrono::{NaiveDate, NaiveTime, TimeDelta};
use daybook_core::db::open_db_in_memory;
use daybook_core::{
    Entry, EntryRepository, RepoError, SqliteEntryRepository, ValidationError,
};
use rusqlite::Connection;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
}

#[test]
fn create_and_get_roundtrip_with_defaults() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteEntryRepository::try_new(&mut conn).unwrap();

    let mut entry = Entry::new("ana", day());
    entry.title = "lunch".to_string();
    entry.body = "at the corner place".to_string();
    repo.save_entry(&entry).unwrap();

    let loaded = repo.get_entry(entry.uuid).unwrap().unwrap();
    assert_eq!(loaded.uuid, entry.uuid);
    assert_eq!(loaded.creator, "ana");
    assert_eq!(loaded.title, "lunch");
    assert_eq!(loaded.date, day());
    assert_eq!(loaded.start_time, NaiveTime::from_hms_opt(12, 0, 0).unwrap());
    assert_eq!(loaded.duration, TimeDelta::hours(1));
    assert!(!loaded.remind);
    // storage keeps millisecond precision
    assert_eq!(
        loaded.created_at.timestamp_millis(),
        entry.created_at.timestamp_millis()
    );
}

#[test]
fn update_moves_an_entry_between_dates() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteEntryRepository::try_new(&mut conn).unwrap();

    let mut entry = Entry::new("ana", day());
    repo.save_entry(&entry).unwrap();

    entry.date = day().succ_opt().unwrap();
    entry.start_time = NaiveTime::from_hms_opt(9, 30, 0).unwrap();
    entry.remind = true;
    repo.save_entry(&entry).unwrap();

    assert!(repo.list_day("ana", day()).unwrap().is_empty());
    let loaded = repo.get_entry(entry.uuid).unwrap().unwrap();
    assert_eq!(loaded.date, entry.date);
    assert_eq!(loaded.start_time, entry.start_time);
    assert!(loaded.remind);
}

#[test]
fn list_day_orders_by_start_time() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteEntryRepository::try_new(&mut conn).unwrap();

    let mut afternoon = Entry::new("ana", day());
    afternoon.start_time = NaiveTime::from_hms_opt(15, 0, 0).unwrap();
    let mut morning = Entry::new("ana", day());
    morning.start_time = NaiveTime::from_hms_opt(8, 0, 0).unwrap();

    repo.save_entry(&afternoon).unwrap();
    repo.save_entry(&morning).unwrap();

    let entries = repo.list_day("ana", day()).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].uuid, morning.uuid);
    assert_eq!(entries[1].uuid, afternoon.uuid);
}

#[test]
fn delete_removes_the_row_outright() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteEntryRepository::try_new(&mut conn).unwrap();

    let entry = Entry::new("ana", day());
    repo.save_entry(&entry).unwrap();

    repo.delete_entry(entry.uuid).unwrap();
    assert!(repo.get_entry(entry.uuid).unwrap().is_none());

    let err = repo.delete_entry(entry.uuid).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == entry.uuid));
}

#[test]
fn reminders_cover_today_and_tomorrow_for_one_creator() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteEntryRepository::try_new(&mut conn).unwrap();

    let today = day();
    let tomorrow = today.succ_opt().unwrap();
    let later = tomorrow.succ_opt().unwrap();

    let mut todays = Entry::new("ana", today);
    todays.remind = true;
    let mut tomorrows = Entry::new("ana", tomorrow);
    tomorrows.remind = true;
    tomorrows.start_time = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
    let mut silent = Entry::new("ana", today);
    silent.start_time = NaiveTime::from_hms_opt(18, 0, 0).unwrap();
    let mut far = Entry::new("ana", later);
    far.remind = true;
    let mut other_creator = Entry::new("bob", today);
    other_creator.remind = true;

    for entry in [&todays, &tomorrows, &silent, &far, &other_creator] {
        repo.save_entry(entry).unwrap();
    }

    let reminders = repo.list_reminders("ana", today).unwrap();
    assert_eq!(reminders.len(), 2);
    // ordered by date then start time
    assert_eq!(reminders[0].uuid, todays.uuid);
    assert_eq!(reminders[1].uuid, tomorrows.uuid);
}

#[test]
fn month_dates_collects_entry_days_across_creators() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteEntryRepository::try_new(&mut conn).unwrap();

    repo.save_entry(&Entry::new("ana", day())).unwrap();
    repo.save_entry(&Entry::new("bob", NaiveDate::from_ymd_opt(2026, 3, 20).unwrap()))
        .unwrap();
    repo.save_entry(&Entry::new("ana", NaiveDate::from_ymd_opt(2026, 4, 1).unwrap()))
        .unwrap();

    let dates = repo.month_dates(2026, 3).unwrap();
    assert_eq!(dates.len(), 2);
    assert!(dates.contains(&day()));
    assert!(dates.contains(&NaiveDate::from_ymd_opt(2026, 3, 20).unwrap()));
}

#[test]
fn validation_failure_blocks_the_write() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteEntryRepository::try_new(&mut conn).unwrap();

    let blank_creator = Entry::new("   ", day());
    let err = repo.save_entry(&blank_creator).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::BlankField {
            model: "entry",
            field: "creator",
        })
    ));

    let mut zero_length = Entry::new("ana", day());
    zero_length.duration = TimeDelta::zero();
    assert!(matches!(
        repo.save_entry(&zero_length).unwrap_err(),
        RepoError::Validation(ValidationError::NonPositiveDuration { .. })
    ));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let mut conn = Connection::open_in_memory().unwrap();

    let result = SqliteEntryRepository::try_new(&mut conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}
