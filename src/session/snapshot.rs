use std::collections::BTreeMap;

use super::history::Log;
use crate::data::model::Table;
use crate::error::{DoraError, Result};

/// A point-in-time capture of the live table and its log.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub table: Table,
    pub log: Log,
}

/// Named snapshots. Everything going in or coming out is a deep copy, so
/// a stored snapshot never shares state with the live session.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    snapshots: BTreeMap<String, Snapshot>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store copies of `table` and `log` under `name`, replacing any
    /// previous snapshot with that name.
    pub fn capture(&mut self, name: &str, table: &Table, log: &Log) {
        self.snapshots.insert(
            name.to_string(),
            Snapshot {
                table: table.clone(),
                log: log.clone(),
            },
        );
    }

    /// Copies of the snapshot stored under `name`.
    pub fn restore(&self, name: &str) -> Result<Snapshot> {
        self.get(name).cloned()
    }

    /// Borrow a stored snapshot for inspection.
    pub fn get(&self, name: &str) -> Result<&Snapshot> {
        self.snapshots
            .get(name)
            .ok_or_else(|| DoraError::UnknownSnapshot(name.to_string()))
    }

    pub fn remove(&mut self, name: &str) -> Result<Snapshot> {
        self.snapshots
            .remove(name)
            .ok_or_else(|| DoraError::UnknownSnapshot(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.snapshots.contains_key(name)
    }

    /// Snapshot names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.snapshots.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Column, Value};
    use crate::session::history::LogEntry;

    fn table(v: i64) -> Table {
        Table::new(vec![Column::new("a", vec![Value::Integer(v)])]).unwrap()
    }

    #[test]
    fn test_restore_returns_independent_copy() {
        let mut store = SnapshotStore::new();
        let mut log = Log::new();
        store.capture("s", &table(1), &log);

        let mut restored = store.restore("s").unwrap();
        restored.log.append(LogEntry::ScaleInputValues);
        restored.table = table(2);
        log.append(LogEntry::ImputeMissingValues);

        let stored = store.get("s").unwrap();
        assert_eq!(stored.table, table(1));
        assert!(stored.log.is_empty());
    }

    #[test]
    fn test_capture_overwrites() {
        let mut store = SnapshotStore::new();
        store.capture("s", &table(1), &Log::new());
        store.capture("s", &table(2), &Log::new());
        assert_eq!(store.len(), 1);
        assert_eq!(store.restore("s").unwrap().table, table(2));
    }

    #[test]
    fn test_unknown_snapshot() {
        let mut store = SnapshotStore::new();
        assert!(matches!(store.restore("nope"), Err(DoraError::UnknownSnapshot(n)) if n == "nope"));
        assert!(store.remove("nope").is_err());
    }

    #[test]
    fn test_names_sorted() {
        let mut store = SnapshotStore::new();
        store.capture("b", &table(1), &Log::new());
        store.capture("a", &table(1), &Log::new());
        assert_eq!(store.names(), vec!["a", "b"]);
        assert!(store.contains("a"));
    }
}
