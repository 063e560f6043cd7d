//! Connection bootstrap: open, configure, migrate.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Where a slot database lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbMode {
    File,
    Memory,
}

impl Display for DbMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File => f.write_str("file"),
            Self::Memory => f.write_str("memory"),
        }
    }
}

/// Opens (or creates) the slot database at `path` with a current schema.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    bootstrap(DbMode::File, || Connection::open(path))
}

/// Opens a private in-memory slot database with a current schema.
pub fn open_db_in_memory() -> DbResult<Connection> {
    bootstrap(DbMode::Memory, Connection::open_in_memory)
}

fn bootstrap<F>(mode: DbMode, connect: F) -> DbResult<Connection>
where
    F: FnOnce() -> rusqlite::Result<Connection>,
{
    let started_at = Instant::now();

    let result: DbResult<Connection> = connect().map_err(DbError::from).and_then(|mut conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        apply_migrations(&mut conn)?;
        Ok(conn)
    });

    let elapsed_ms = started_at.elapsed().as_millis();
    match &result {
        Ok(_) => info!("event=db_open module=db status=ok mode={mode} duration_ms={elapsed_ms}"),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={elapsed_ms} error={err}"
        ),
    }
    result
}
