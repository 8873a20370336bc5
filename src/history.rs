use crate::config::Config;
use crate::storage::HistoryRecord;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("failed to create database directory: {0}")]
    CreateDir(#[from] std::io::Error),
}

/// Connection state of the history store. `Unavailable` is terminal:
/// once entered there is no edge back for the rest of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connected,
    Unavailable,
}

/// Narrow interface to the relational backend, so the store can be
/// exercised against a mock in tests and swapped without touching callers.
pub trait HistoryBackend {
    fn insert(&mut self, command: &str, at: DateTime<Utc>) -> Result<(), PersistenceError>;
    fn select_recent(&mut self, limit: usize) -> Result<Vec<HistoryRecord>, PersistenceError>;
}

/// SQLite-backed history table: one parameterized INSERT per record, one
/// SELECT ordered by timestamp descending with a row limit.
pub struct SqliteBackend {
    conn: Connection,
}

impl SqliteBackend {
    pub fn open(path: &Path) -> Result<Self, PersistenceError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let backend = Self { conn };
        backend.init_schema()?;
        Ok(backend)
    }

    #[cfg(test)]
    pub fn in_memory() -> Result<Self, PersistenceError> {
        let conn = Connection::open_in_memory()?;
        let backend = Self { conn };
        backend.init_schema()?;
        Ok(backend)
    }

    fn init_schema(&self) -> Result<(), PersistenceError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS command_history (
                id        INTEGER PRIMARY KEY AUTOINCREMENT,
                command   TEXT NOT NULL,
                timestamp TEXT NOT NULL
            );",
        )?;
        Ok(())
    }
}

impl HistoryBackend for SqliteBackend {
    fn insert(&mut self, command: &str, at: DateTime<Utc>) -> Result<(), PersistenceError> {
        self.conn.execute(
            "INSERT INTO command_history (command, timestamp) VALUES (?1, ?2)",
            params![command, at],
        )?;
        Ok(())
    }

    fn select_recent(&mut self, limit: usize) -> Result<Vec<HistoryRecord>, PersistenceError> {
        let mut stmt = self.conn.prepare(
            "SELECT command, timestamp FROM command_history
             ORDER BY timestamp DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(HistoryRecord {
                command: row.get(0)?,
                timestamp: row.get(1)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }
}

/// Best-effort command history log.
///
/// Unavailability must never block or fail the execution path: every
/// operation on a store without a live backend returns immediately and
/// does no I/O. Write failures after a successful connect are logged and
/// swallowed; the store then stays disabled for the process lifetime.
pub struct HistoryStore {
    backend: Option<Box<dyn HistoryBackend>>,
}

impl HistoryStore {
    /// Open the store from configuration. Any failure to connect or to
    /// create the schema is caught here and degrades to a disabled store;
    /// nothing propagates past this boundary.
    pub fn open(config: &Config) -> Self {
        if !config.history_enabled() {
            info!("command history disabled by configuration");
            return Self::disabled();
        }

        let path = config.history_db_path();
        match SqliteBackend::open(&path) {
            Ok(backend) => Self {
                backend: Some(Box::new(backend)),
            },
            Err(err) => {
                warn!(
                    error = %err,
                    path = %path.display(),
                    "history database unavailable, running without history"
                );
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        Self { backend: None }
    }

    pub fn with_backend(backend: Box<dyn HistoryBackend>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    pub fn state(&self) -> ConnectionState {
        if self.backend.is_some() {
            ConnectionState::Connected
        } else {
            ConnectionState::Unavailable
        }
    }

    /// Log one executed command. A write failure is not surfaced to the
    /// caller; it is logged and permanently disables the store.
    pub fn record(&mut self, command: &str, at: DateTime<Utc>) {
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        if let Err(err) = backend.insert(command, at) {
            warn!(error = %err, "history write failed, disabling history store");
            self.backend = None;
        }
    }

    /// The most recent `limit` records, newest first. An unavailable store
    /// yields an empty list; a read failure while connected is surfaced to
    /// the caller once and permanently disables the store.
    pub fn list_recent(&mut self, limit: usize) -> Result<Vec<HistoryRecord>, PersistenceError> {
        let Some(backend) = self.backend.as_mut() else {
            return Ok(Vec::new());
        };
        match backend.select_recent(limit) {
            Ok(records) => Ok(records),
            Err(err) => {
                warn!(error = %err, "history read failed, disabling history store");
                self.backend = None;
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::CommandRunner;
    use crate::storage::CommandInvocation;
    use chrono::TimeZone;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Counters {
        inserts: Rc<Cell<usize>>,
        selects: Rc<Cell<usize>>,
    }

    struct MockBackend {
        counters: Counters,
        fail_insert: bool,
        fail_select: bool,
    }

    impl MockBackend {
        fn new(counters: Counters) -> Self {
            Self {
                counters,
                fail_insert: false,
                fail_select: false,
            }
        }

        fn failure() -> PersistenceError {
            PersistenceError::Database(rusqlite::Error::InvalidQuery)
        }
    }

    impl HistoryBackend for MockBackend {
        fn insert(&mut self, _command: &str, _at: DateTime<Utc>) -> Result<(), PersistenceError> {
            self.counters.inserts.set(self.counters.inserts.get() + 1);
            if self.fail_insert {
                return Err(Self::failure());
            }
            Ok(())
        }

        fn select_recent(&mut self, _limit: usize) -> Result<Vec<HistoryRecord>, PersistenceError> {
            self.counters.selects.set(self.counters.selects.get() + 1);
            if self.fail_select {
                return Err(Self::failure());
            }
            Ok(Vec::new())
        }
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn disabled_store_is_unavailable_and_does_no_io() {
        let counters = Counters::default();
        let mut store = HistoryStore::disabled();
        assert_eq!(store.state(), ConnectionState::Unavailable);

        store.record("git status", at(1));
        let records = store.list_recent(10).unwrap();
        assert!(records.is_empty());
        assert_eq!(counters.inserts.get(), 0);
        assert_eq!(counters.selects.get(), 0);
    }

    #[test]
    fn write_failure_is_swallowed_and_terminal() {
        let counters = Counters::default();
        let mut backend = MockBackend::new(counters.clone());
        backend.fail_insert = true;
        let mut store = HistoryStore::with_backend(Box::new(backend));

        // First write fails silently and flips the store to Unavailable
        store.record("git status", at(1));
        assert_eq!(store.state(), ConnectionState::Unavailable);
        assert_eq!(counters.inserts.get(), 1);

        // Later operations return immediately without touching the backend
        store.record("git diff", at(2));
        assert!(store.list_recent(10).unwrap().is_empty());
        assert_eq!(counters.inserts.get(), 1);
        assert_eq!(counters.selects.get(), 0);
    }

    #[test]
    fn read_failure_surfaces_once_then_store_is_unavailable() {
        let counters = Counters::default();
        let mut backend = MockBackend::new(counters.clone());
        backend.fail_select = true;
        let mut store = HistoryStore::with_backend(Box::new(backend));

        assert!(store.list_recent(10).is_err());
        assert_eq!(store.state(), ConnectionState::Unavailable);

        assert!(store.list_recent(10).unwrap().is_empty());
        assert_eq!(counters.selects.get(), 1);
    }

    #[test]
    fn spawn_failures_are_not_recorded() {
        let counters = Counters::default();
        let backend = MockBackend::new(counters.clone());
        let mut store = HistoryStore::with_backend(Box::new(backend));

        let invocation =
            CommandInvocation::new(vec!["gt-definitely-not-a-binary".to_string()]);
        let result = CommandRunner::execute_and_record(&invocation, &mut store);
        assert!(!result.spawned);
        assert_eq!(counters.inserts.get(), 0);
    }

    #[test]
    fn completed_commands_are_recorded_regardless_of_exit_code() {
        let counters = Counters::default();
        let backend = MockBackend::new(counters.clone());
        let mut store = HistoryStore::with_backend(Box::new(backend));

        let ok = CommandInvocation::new(vec!["true".to_string()]);
        let failing = CommandInvocation::new(vec!["false".to_string()]);
        CommandRunner::execute_and_record(&ok, &mut store);
        CommandRunner::execute_and_record(&failing, &mut store);
        assert_eq!(counters.inserts.get(), 2);
    }

    #[test]
    fn list_recent_limits_rows_and_orders_newest_first() {
        let mut backend = SqliteBackend::in_memory().unwrap();
        for i in 0..15 {
            backend.insert(&format!("git log -{}", i), at(1_700_000_000 + i)).unwrap();
        }
        let mut store = HistoryStore::with_backend(Box::new(backend));

        let records = store.list_recent(10).unwrap();
        assert_eq!(records.len(), 10);
        for pair in records.windows(2) {
            assert!(pair[0].timestamp >= pair[1].timestamp);
        }
        assert_eq!(records[0].command, "git log -14");
    }

    #[test]
    fn sqlite_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.db");

        let mut backend = SqliteBackend::open(&path).unwrap();
        backend.insert("git status", at(42)).unwrap();
        drop(backend);

        // Reopen: schema creation is idempotent and data survives
        let mut backend = SqliteBackend::open(&path).unwrap();
        let records = backend.select_recent(10).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].command, "git status");
        assert_eq!(records[0].timestamp, at(42));
    }

    #[test]
    fn empty_table_lists_nothing() {
        let backend = SqliteBackend::in_memory().unwrap();
        let mut store = HistoryStore::with_backend(Box::new(backend));
        assert_eq!(store.state(), ConnectionState::Connected);
        assert!(store.list_recent(10).unwrap().is_empty());
    }
}
