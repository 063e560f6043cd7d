use jobtrack_core::config::DB_FILE_NAME;
use jobtrack_core::{
    open_store, BackendPreference, FileItemStore, Item, ItemDraft, ItemStore, JobTracker,
    SqliteSlotStore, StoreBackend, TrackerConfig, STORAGE_KEY,
};
use rusqlite::Connection;

fn sample_items() -> Vec<Item> {
    vec![
        Item::from_draft("id_aaaaaaa", 2, ItemDraft::new("Acme", "Engineer")),
        Item::from_draft("id_bbbbbbb", 1, ItemDraft::new("Globex", "Analyst")),
    ]
}

#[test]
fn sqlite_slot_store_round_trips_collection() {
    let store = SqliteSlotStore::open_in_memory().unwrap();
    assert!(store.load().is_empty());

    store.save(&sample_items()).unwrap();
    assert_eq!(store.load(), sample_items());

    store.save(&sample_items()[..1]).unwrap();
    assert_eq!(store.load().len(), 1);
    assert_eq!(store.backend(), StoreBackend::HostSlot);
}

#[test]
fn sqlite_slot_store_persists_across_reopen_under_fixed_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(DB_FILE_NAME);

    SqliteSlotStore::open(&path)
        .unwrap()
        .save(&sample_items())
        .unwrap();
    assert_eq!(SqliteSlotStore::open(&path).unwrap().load(), sample_items());

    let conn = Connection::open(&path).unwrap();
    let raw: String = conn
        .query_row(
            "SELECT value FROM kv_slots WHERE key = ?1;",
            [STORAGE_KEY],
            |row| row.get(0),
        )
        .unwrap();
    assert!(raw.starts_with('['));
}

#[test]
fn corrupt_sqlite_slot_loads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(DB_FILE_NAME);
    let store = SqliteSlotStore::open(&path).unwrap();

    let conn = Connection::open(&path).unwrap();
    conn.execute(
        "INSERT INTO kv_slots (key, value) VALUES (?1, 'not json');",
        [STORAGE_KEY],
    )
    .unwrap();

    assert!(store.load().is_empty());
}

#[test]
fn file_store_round_trips_and_tolerates_missing_or_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileItemStore::in_dir(dir.path());
    assert_eq!(
        store.path().file_name().and_then(|name| name.to_str()),
        Some("job_tracker_items_v1.json")
    );

    assert!(store.load().is_empty());

    store.save(&sample_items()).unwrap();
    assert_eq!(store.load(), sample_items());

    std::fs::write(store.path(), "{broken").unwrap();
    assert!(store.load().is_empty());
    assert_eq!(store.backend(), StoreBackend::LocalFile);
}

#[test]
fn file_store_save_reports_io_errors() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileItemStore::at_path(dir.path().join("missing").join("items.json"));

    assert!(store.save(&sample_items()).is_err());
}

#[test]
fn auto_probe_prefers_host_slot() {
    let dir = tempfile::tempdir().unwrap();
    let config = TrackerConfig::new(dir.path().join("data"));

    let store = open_store(&config).unwrap();
    assert_eq!(store.backend(), StoreBackend::HostSlot);
    assert!(config.db_path().exists());
}

#[test]
fn auto_probe_falls_back_to_file_when_slot_cannot_open() {
    let dir = tempfile::tempdir().unwrap();
    let config = TrackerConfig::new(dir.path());
    std::fs::create_dir_all(config.db_path()).unwrap();

    let store = open_store(&config).unwrap();
    assert_eq!(store.backend(), StoreBackend::LocalFile);

    let forced = config.with_backend(BackendPreference::HostSlot);
    assert!(open_store(&forced).is_err());
}

#[test]
fn forced_file_backend_skips_the_probe() {
    let dir = tempfile::tempdir().unwrap();
    let config = TrackerConfig::new(dir.path()).with_backend(BackendPreference::LocalFile);

    let store = open_store(&config).unwrap();
    assert_eq!(store.backend(), StoreBackend::LocalFile);
    assert!(!config.db_path().exists());
}

const SLOT_WITH_STRAY_ENTRY: &str = r#"[
    {"id":"id_a","company":"Keep1","position":"Engineer","createdAt":2},
    {"id":"id_b","company":"Keep2","position":"Analyst","createdAt":1},
    null
]"#;

#[test]
fn stray_slot_entry_does_not_discard_file_collection() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileItemStore::in_dir(dir.path());
    std::fs::write(store.path(), SLOT_WITH_STRAY_ENTRY).unwrap();

    let loaded = store.load();
    let companies: Vec<&str> = loaded.iter().map(|item| item.company.as_str()).collect();
    assert_eq!(companies, ["Keep1", "Keep2"]);

    let mut tracker = JobTracker::open(store);
    tracker.add(ItemDraft::new("New", "Role")).unwrap();

    let stored = FileItemStore::in_dir(dir.path()).load();
    assert_eq!(stored.len(), 3);
    assert_eq!(stored[0].company, "New");
    assert!(stored.iter().any(|item| item.id == "id_a"));
    assert!(stored.iter().any(|item| item.id == "id_b"));
}

#[test]
fn stray_slot_entry_does_not_discard_sqlite_collection() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(DB_FILE_NAME);
    let store = SqliteSlotStore::open(&path).unwrap();
    Connection::open(&path)
        .unwrap()
        .execute(
            "INSERT INTO kv_slots (key, value) VALUES (?1, ?2);",
            [STORAGE_KEY, SLOT_WITH_STRAY_ENTRY],
        )
        .unwrap();

    assert_eq!(store.load().len(), 2);
}
