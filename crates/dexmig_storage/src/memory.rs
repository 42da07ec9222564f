//! In-memory repository with JSON snapshot persistence.

use crate::error::{StorageError, StorageResult};
use crate::repository::{RecordStream, Repository};
use dexmig_codec::{FieldMap, RecordId, Value, ID_FIELD};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

/// An in-memory repository.
///
/// This repository keeps every table in memory and is suitable for:
/// - Unit and integration tests
/// - Running the CLI against JSON snapshot files
///
/// It enforces primary keys and optional single-field unique constraints,
/// and models an auto-increment sequence per table the way a SQL store does:
/// explicit-id inserts do not advance it, so it must be resynchronized after
/// a bulk load.
///
/// # Example
///
/// ```rust
/// use dexmig_codec::{FieldMap, Value};
/// use dexmig_storage::{InMemoryRepository, Repository};
///
/// let mut repo = InMemoryRepository::new();
/// let mut row = FieldMap::new();
/// row.insert("discord_id".into(), Value::Integer(42));
/// let id = repo.create("player", row).unwrap();
/// assert_eq!(id, 1);
/// assert!(repo.exists("player", 1).unwrap());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    tables: RwLock<BTreeMap<String, TableState>>,
}

#[derive(Debug, Default, Clone)]
struct TableState {
    rows: BTreeMap<RecordId, FieldMap>,
    sequence: RecordId,
    unique: Vec<String>,
}

/// On-disk form of a repository.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    tables: BTreeMap<String, TableSnapshot>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TableSnapshot {
    #[serde(default)]
    sequence: RecordId,
    #[serde(default)]
    unique: Vec<String>,
    #[serde(default)]
    rows: Vec<FieldMap>,
}

impl InMemoryRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a unique constraint on `table.field`.
    #[must_use]
    pub fn with_unique(self, table: &str, field: &str) -> Self {
        {
            let mut tables = self.tables.write();
            let state = tables.entry(table.to_string()).or_default();
            if !state.unique.iter().any(|f| f == field) {
                state.unique.push(field.to_string());
            }
        }
        self
    }

    /// Loads a repository from a JSON snapshot file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a row
    /// lacks an integer `id`.
    pub fn load_json(path: &Path) -> StorageResult<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    /// Parses a repository from JSON snapshot text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text cannot be parsed, or if a row lacks an
    /// integer `id`.
    pub fn from_json(data: &str) -> StorageResult<Self> {
        let snapshot: Snapshot = serde_json::from_str(data)?;
        let mut tables = BTreeMap::new();

        for (name, table) in snapshot.tables {
            let mut rows = BTreeMap::new();
            for row in table.rows {
                let id = row_id(&row).ok_or_else(|| {
                    StorageError::Corrupted(format!("row in {name} has no integer id"))
                })?;
                rows.insert(id, row);
            }
            tables.insert(
                name,
                TableState {
                    rows,
                    sequence: table.sequence,
                    unique: table.unique,
                },
            );
        }

        Ok(Self {
            tables: RwLock::new(tables),
        })
    }

    /// Serializes the repository as pretty-printed JSON snapshot text.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> StorageResult<String> {
        let tables = self.tables.read();
        let snapshot = Snapshot {
            tables: tables
                .iter()
                .map(|(name, state)| {
                    (
                        name.clone(),
                        TableSnapshot {
                            sequence: state.sequence,
                            unique: state.unique.clone(),
                            rows: state.rows.values().cloned().collect(),
                        },
                    )
                })
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }

    /// Writes the repository to a JSON snapshot file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save_json(&self, path: &Path) -> StorageResult<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Returns a copy of one row.
    #[must_use]
    pub fn get(&self, table: &str, id: RecordId) -> Option<FieldMap> {
        self.tables
            .read()
            .get(table)
            .and_then(|state| state.rows.get(&id).cloned())
    }

    /// Names of every table known to the repository.
    #[must_use]
    pub fn table_names(&self) -> Vec<String> {
        self.tables.read().keys().cloned().collect()
    }

    /// Largest primary key in `table`, or 0.
    #[must_use]
    pub fn max_id(&self, table: &str) -> RecordId {
        self.tables
            .read()
            .get(table)
            .and_then(|state| state.rows.keys().next_back().copied())
            .unwrap_or(0)
    }
}

impl TableState {
    fn check_unique(&self, table: &str, row: &FieldMap) -> StorageResult<()> {
        for field in &self.unique {
            let Some(value) = row.get(field).filter(|v| !v.is_null()) else {
                continue;
            };
            if self.rows.values().any(|other| other.get(field) == Some(value)) {
                return Err(StorageError::unique_violation(table, field, value.to_string()));
            }
        }
        Ok(())
    }

    /// Keys already held for each unique field.
    fn unique_keys(&self) -> Vec<(&str, HashSet<String>)> {
        self.unique
            .iter()
            .map(|field| {
                let keys = self
                    .rows
                    .values()
                    .filter_map(|row| unique_key(row, field))
                    .collect();
                (field.as_str(), keys)
            })
            .collect()
    }
}

/// Hashable form of a non-null field value. The variant is part of the key,
/// matching `Value` equality.
fn unique_key(row: &FieldMap, field: &str) -> Option<String> {
    row.get(field)
        .filter(|v| !v.is_null())
        .map(|value| format!("{value:?}"))
}

fn row_id(row: &FieldMap) -> Option<RecordId> {
    row.get(ID_FIELD).and_then(Value::as_integer)
}

impl Repository for InMemoryRepository {
    fn query_all(&self, table: &str) -> StorageResult<RecordStream<'_>> {
        let rows: Vec<FieldMap> = self
            .tables
            .read()
            .get(table)
            .map(|state| state.rows.values().cloned().collect())
            .unwrap_or_default();
        Ok(Box::new(rows.into_iter().map(Ok)))
    }

    fn exists(&self, table: &str, id: RecordId) -> StorageResult<bool> {
        Ok(self
            .tables
            .read()
            .get(table)
            .is_some_and(|state| state.rows.contains_key(&id)))
    }

    fn find_id_by(&self, table: &str, field: &str, value: &Value) -> StorageResult<Option<RecordId>> {
        Ok(self.tables.read().get(table).and_then(|state| {
            state
                .rows
                .iter()
                .find(|(_, row)| row.get(field) == Some(value))
                .map(|(id, _)| *id)
        }))
    }

    fn create(&mut self, table: &str, mut fields: FieldMap) -> StorageResult<RecordId> {
        let mut tables = self.tables.write();
        let state = tables.entry(table.to_string()).or_default();

        let id = state.sequence + 1;
        if state.rows.contains_key(&id) {
            return Err(StorageError::duplicate_key(table, id));
        }
        fields.insert(ID_FIELD.to_string(), Value::Integer(id));
        state.check_unique(table, &fields)?;

        state.sequence = id;
        state.rows.insert(id, fields);
        Ok(id)
    }

    fn bulk_insert(&mut self, table: &str, rows: Vec<FieldMap>) -> StorageResult<Vec<RecordId>> {
        let mut tables = self.tables.write();
        let state = tables.entry(table.to_string()).or_default();

        let mut ids = Vec::with_capacity(rows.len());
        let mut batch_ids = HashSet::with_capacity(rows.len());
        let mut taken = state.unique_keys();
        for row in &rows {
            let id = row_id(row).ok_or_else(|| StorageError::MissingId {
                table: table.to_string(),
            })?;
            if state.rows.contains_key(&id) || !batch_ids.insert(id) {
                return Err(StorageError::duplicate_key(table, id));
            }
            for (field, keys) in &mut taken {
                let field: &str = field;
                let Some(key) = unique_key(row, field) else {
                    continue;
                };
                if !keys.insert(key) {
                    let value = row.get(field).map(ToString::to_string).unwrap_or_default();
                    return Err(StorageError::unique_violation(table, field, value));
                }
            }
            ids.push(id);
        }

        for (id, row) in ids.iter().zip(rows) {
            state.rows.insert(*id, row);
        }
        Ok(ids)
    }

    fn count(&self, table: &str) -> StorageResult<u64> {
        Ok(self
            .tables
            .read()
            .get(table)
            .map_or(0, |state| state.rows.len() as u64))
    }

    fn delete_all(&mut self, table: &str) -> StorageResult<()> {
        if let Some(state) = self.tables.write().get_mut(table) {
            state.rows.clear();
        }
        Ok(())
    }

    fn resync_sequence(&mut self, table: &str) -> StorageResult<()> {
        let mut tables = self.tables.write();
        let state = tables.entry(table.to_string()).or_default();
        state.sequence = state.rows.keys().next_back().copied().unwrap_or(0);
        Ok(())
    }

    fn next_id(&self, table: &str) -> StorageResult<RecordId> {
        Ok(self
            .tables
            .read()
            .get(table)
            .map_or(1, |state| state.sequence + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, Value)]) -> FieldMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    fn player(id: i64, discord_id: i64) -> FieldMap {
        row(&[
            ("id", Value::Integer(id)),
            ("discord_id", Value::Integer(discord_id)),
        ])
    }

    #[test]
    fn query_all_is_ordered_by_id() {
        let mut repo = InMemoryRepository::new();
        repo.bulk_insert("player", vec![player(5, 50), player(2, 20), player(9, 90)])
            .unwrap();
        let ids: Vec<i64> = repo
            .query_all("player")
            .unwrap()
            .map(|r| r.unwrap()["id"].as_integer().unwrap())
            .collect();
        assert_eq!(ids, vec![2, 5, 9]);
    }

    #[test]
    fn unknown_table_reads_as_empty() {
        let repo = InMemoryRepository::new();
        assert_eq!(repo.query_all("nothing").unwrap().count(), 0);
        assert_eq!(repo.count("nothing").unwrap(), 0);
        assert!(!repo.exists("nothing", 1).unwrap());
        assert_eq!(repo.next_id("nothing").unwrap(), 1);
    }

    #[test]
    fn bulk_insert_is_all_or_nothing() {
        let mut repo = InMemoryRepository::new();
        repo.bulk_insert("player", vec![player(1, 10)]).unwrap();

        let err = repo
            .bulk_insert("player", vec![player(2, 20), player(1, 11)])
            .unwrap_err();
        assert!(matches!(err, StorageError::DuplicateKey { id: 1, .. }));
        assert_eq!(repo.count("player").unwrap(), 1);
        assert!(!repo.exists("player", 2).unwrap());
    }

    #[test]
    fn bulk_insert_rejects_duplicates_within_batch() {
        let mut repo = InMemoryRepository::new();
        let err = repo
            .bulk_insert("player", vec![player(3, 30), player(3, 31)])
            .unwrap_err();
        assert!(matches!(err, StorageError::DuplicateKey { id: 3, .. }));
        assert_eq!(repo.count("player").unwrap(), 0);
    }

    #[test]
    fn bulk_insert_requires_ids() {
        let mut repo = InMemoryRepository::new();
        let err = repo
            .bulk_insert("player", vec![row(&[("discord_id", Value::Integer(1))])])
            .unwrap_err();
        assert!(matches!(err, StorageError::MissingId { .. }));
    }

    #[test]
    fn unique_constraint_is_enforced() {
        let mut repo = InMemoryRepository::new().with_unique("player", "discord_id");
        repo.bulk_insert("player", vec![player(1, 10)]).unwrap();
        let err = repo.bulk_insert("player", vec![player(2, 10)]).unwrap_err();
        assert!(matches!(err, StorageError::UniqueViolation { .. }));

        let err = repo
            .bulk_insert("player", vec![player(3, 30), player(4, 30)])
            .unwrap_err();
        assert!(matches!(err, StorageError::UniqueViolation { .. }));
    }

    #[test]
    fn bulk_insert_does_not_advance_sequence() {
        let mut repo = InMemoryRepository::new();
        repo.bulk_insert("player", vec![player(1, 10), player(2, 20)])
            .unwrap();
        assert_eq!(repo.next_id("player").unwrap(), 1);

        let err = repo
            .create("player", row(&[("discord_id", Value::Integer(99))]))
            .unwrap_err();
        assert!(matches!(err, StorageError::DuplicateKey { id: 1, .. }));

        repo.resync_sequence("player").unwrap();
        assert_eq!(repo.next_id("player").unwrap(), 3);
        let id = repo
            .create("player", row(&[("discord_id", Value::Integer(99))]))
            .unwrap();
        assert_eq!(id, 3);
    }

    #[test]
    fn large_batch_checks_uniqueness_against_rows_and_batch() {
        let mut repo = InMemoryRepository::new().with_unique("player", "discord_id");
        repo.bulk_insert("player", vec![player(1, 1_000_000)]).unwrap();

        let batch: Vec<FieldMap> = (2..=60_000).map(|id| player(id, id * 10)).collect();
        let ids = repo.bulk_insert("player", batch).unwrap();
        assert_eq!(ids.len(), 59_999);

        let mut clash: Vec<FieldMap> = (60_001..=70_000).map(|id| player(id, id * 10)).collect();
        clash.push(player(70_001, 1_000_000));
        let err = repo.bulk_insert("player", clash).unwrap_err();
        assert!(matches!(err, StorageError::UniqueViolation { .. }));
        assert_eq!(repo.count("player").unwrap(), 60_000);
    }

    #[test]
    fn unique_keys_compare_by_value_kind() {
        let mut repo = InMemoryRepository::new().with_unique("player", "discord_id");
        let text = row(&[
            ("id", Value::Integer(2)),
            ("discord_id", Value::Text("10".into())),
        ]);
        repo.bulk_insert("player", vec![player(1, 10), text]).unwrap();
        assert_eq!(repo.count("player").unwrap(), 2);
    }

    #[test]
    fn tables_without_unique_fields_accept_large_batches() {
        let mut repo = InMemoryRepository::new();
        let rows: Vec<FieldMap> = (1..=100_000)
            .map(|id| row(&[("id", Value::Integer(id)), ("player_id", Value::Integer(1))]))
            .collect();
        repo.bulk_insert("ball_instance", rows).unwrap();
        assert_eq!(repo.count("ball_instance").unwrap(), 100_000);
    }

    #[test]
    fn find_id_by_secondary_key() {
        let mut repo = InMemoryRepository::new();
        repo.bulk_insert("player", vec![player(4, -10_000_000_007)])
            .unwrap();
        assert_eq!(
            repo.find_id_by("player", "discord_id", &Value::Integer(-10_000_000_007))
                .unwrap(),
            Some(4)
        );
        assert_eq!(
            repo.find_id_by("player", "discord_id", &Value::Integer(1))
                .unwrap(),
            None
        );
    }

    #[test]
    fn delete_all_keeps_sequence_until_resync() {
        let mut repo = InMemoryRepository::new();
        repo.create("player", row(&[])).unwrap();
        repo.create("player", row(&[])).unwrap();
        repo.delete_all("player").unwrap();
        assert_eq!(repo.count("player").unwrap(), 0);
        assert_eq!(repo.next_id("player").unwrap(), 3);
        repo.resync_sequence("player").unwrap();
        assert_eq!(repo.next_id("player").unwrap(), 1);
    }

    #[test]
    fn json_snapshot_roundtrip() {
        let mut repo = InMemoryRepository::new().with_unique("player", "discord_id");
        repo.bulk_insert("player", vec![player(1, 10), player(7, 70)])
            .unwrap();
        repo.resync_sequence("player").unwrap();

        let restored = InMemoryRepository::from_json(&repo.to_json().unwrap()).unwrap();
        assert_eq!(restored.count("player").unwrap(), 2);
        assert_eq!(restored.next_id("player").unwrap(), 8);
        assert_eq!(restored.get("player", 7), repo.get("player", 7));
        assert_eq!(restored.max_id("player"), 7);
    }

    #[test]
    fn snapshot_rows_need_ids() {
        let json = r#"{"tables":{"player":{"rows":[{"discord_id":{"integer":1}}]}}}"#;
        let err = InMemoryRepository::from_json(json).unwrap_err();
        assert!(matches!(err, StorageError::Corrupted(_)));
    }
}
