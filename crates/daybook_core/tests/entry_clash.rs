use chrono::{NaiveDate, NaiveTime, TimeDelta};
use daybook_core::db::open_db_in_memory;
use daybook_core::{
    overlaps, Entry, EntryRepository, RepoError, SqliteEntryRepository, ValidationError,
    CLASH_MESSAGE,
};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 5, 4).unwrap()
}

fn entry_at(creator: &str, date: NaiveDate, hour: u32, duration_hours: i64) -> Entry {
    let mut entry = Entry::new(creator, date);
    entry.title = format!("{hour}h block");
    entry.start_time = NaiveTime::from_hms_opt(hour, 0, 0).unwrap();
    entry.duration = TimeDelta::hours(duration_hours);
    entry
}

#[test]
fn end_time_adds_duration_to_start() {
    let entry = entry_at("ana", day(), 12, 1);

    assert_eq!(entry.end_time(), NaiveTime::from_hms_opt(13, 0, 0).unwrap());
    // idempotent on an unmodified entry
    assert_eq!(entry.end_time(), entry.end_time());
}

#[test]
fn saving_same_window_twice_is_rejected_as_clash() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteEntryRepository::try_new(&mut conn).unwrap();

    let first = entry_at("ana", day(), 12, 1);
    repo.save_entry(&first).unwrap();

    let duplicate = entry_at("ana", day(), 12, 1);
    assert!(overlaps(&first, &duplicate));

    let err = repo.save_entry(&duplicate).unwrap_err();
    match err {
        RepoError::Clash(clash) => {
            assert_eq!(clash.conflicting, first.uuid);
            assert!(clash.to_string().contains(CLASH_MESSAGE));
        }
        other => panic!("unexpected error: {other}"),
    }

    // nothing was written for the rejected candidate
    assert!(repo.get_entry(duplicate.uuid).unwrap().is_none());
}

#[test]
fn saving_disjoint_window_on_same_date_succeeds() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteEntryRepository::try_new(&mut conn).unwrap();

    let first = entry_at("ana", day(), 12, 1);
    repo.save_entry(&first).unwrap();

    let later = entry_at("ana", day(), 14, 1);
    assert!(!overlaps(&first, &later));
    repo.save_entry(&later).unwrap();

    assert_eq!(repo.list_day("ana", day()).unwrap().len(), 2);
}

#[test]
fn back_to_back_entries_are_allowed() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteEntryRepository::try_new(&mut conn).unwrap();

    let first = entry_at("ana", day(), 12, 1);
    repo.save_entry(&first).unwrap();

    let mut consecutive = entry_at("ana", day(), 13, 1);
    consecutive.start_time = first.end_time();
    repo.save_entry(&consecutive).unwrap();

    let entries = repo.list_day("ana", day()).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].uuid, first.uuid);
    assert_eq!(entries[1].uuid, consecutive.uuid);
}

#[test]
fn enveloping_window_is_rejected() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteEntryRepository::try_new(&mut conn).unwrap();

    let outer = entry_at("ana", day(), 12, 3);
    repo.save_entry(&outer).unwrap();

    let inner = entry_at("ana", day(), 13, 1);
    let err = repo.save_entry(&inner).unwrap_err();
    assert!(matches!(err, RepoError::Clash(_)));
}

#[test]
fn same_window_on_another_date_is_allowed() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteEntryRepository::try_new(&mut conn).unwrap();

    repo.save_entry(&entry_at("ana", day(), 12, 1)).unwrap();
    repo.save_entry(&entry_at("ana", day().succ_opt().unwrap(), 12, 1))
        .unwrap();

    assert_eq!(repo.list_day("ana", day()).unwrap().len(), 1);
}

#[test]
fn clash_scope_is_per_creator() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteEntryRepository::try_new(&mut conn).unwrap();

    repo.save_entry(&entry_at("ana", day(), 12, 1)).unwrap();
    // another creator may occupy the same window
    repo.save_entry(&entry_at("bob", day(), 12, 1)).unwrap();

    assert_eq!(repo.list_day("ana", day()).unwrap().len(), 1);
    assert_eq!(repo.list_day("bob", day()).unwrap().len(), 1);
}

#[test]
fn resaving_an_entry_does_not_clash_with_itself() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteEntryRepository::try_new(&mut conn).unwrap();

    let mut entry = entry_at("ana", day(), 12, 1);
    repo.save_entry(&entry).unwrap();

    // unmodified re-save
    repo.save_entry(&entry).unwrap();

    // edit inside the same window
    entry.title = "renamed".to_string();
    repo.save_entry(&entry).unwrap();

    let loaded = repo.get_entry(entry.uuid).unwrap().unwrap();
    assert_eq!(loaded.title, "renamed");
    assert_eq!(repo.list_day("ana", day()).unwrap().len(), 1);
}

#[test]
fn freed_window_can_be_reused_after_delete() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteEntryRepository::try_new(&mut conn).unwrap();

    let first = entry_at("ana", day(), 12, 1);
    repo.save_entry(&first).unwrap();

    let replacement = entry_at("ana", day(), 12, 1);
    assert!(matches!(
        repo.save_entry(&replacement).unwrap_err(),
        RepoError::Clash(_)
    ));

    repo.delete_entry(first.uuid).unwrap();
    repo.save_entry(&replacement).unwrap();
}

#[test]
fn midnight_crossing_window_is_rejected_before_storage() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteEntryRepository::try_new(&mut conn).unwrap();

    let mut entry = entry_at("ana", day(), 23, 2);
    let err = repo.save_entry(&entry).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::CrossesMidnight { .. })
    ));

    entry.duration = TimeDelta::minutes(59);
    repo.save_entry(&entry).unwrap();
}
