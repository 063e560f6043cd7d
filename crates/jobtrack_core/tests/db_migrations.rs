use jobtrack_core::db::{latest_version, open_db, open_db_in_memory, schema_version, DbError};
use rusqlite::Connection;

fn slot_columns(conn: &Connection) -> Vec<String> {
    let mut stmt = conn.prepare("PRAGMA table_info(kv_slots);").unwrap();
    stmt.query_map([], |row| row.get::<_, String>(1))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap()
}

#[test]
fn fresh_memory_db_is_at_latest_version() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    assert_eq!(slot_columns(&conn), ["key", "value", "updated_at"]);
}

#[test]
fn reopening_a_file_keeps_version_and_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("slots.sqlite3");

    let conn = open_db(&path).unwrap();
    conn.execute(
        "INSERT INTO kv_slots (key, value) VALUES ('probe', '[]');",
        [],
    )
    .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    let value: String = conn
        .query_row("SELECT value FROM kv_slots WHERE key = 'probe';", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(value, "[]");
}

#[test]
fn updated_at_defaults_to_epoch_millis() {
    let conn = open_db_in_memory().unwrap();
    conn.execute("INSERT INTO kv_slots (key, value) VALUES ('k', 'v');", [])
        .unwrap();

    let updated_at: i64 = conn
        .query_row("SELECT updated_at FROM kv_slots WHERE key = 'k';", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert!(updated_at > 1_600_000_000_000);
    assert_eq!(updated_at % 1000, 0);
}

#[test]
fn newer_schema_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");
    Connection::open(&path)
        .unwrap()
        .pragma_update(None, "user_version", 42)
        .unwrap();

    let err = open_db(&path).unwrap_err();
    assert!(matches!(
        err,
        DbError::SchemaTooNew { found: 42, supported } if supported == latest_version()
    ));
    assert!(err.to_string().contains("schema version 42"));
}
