//! Repository trait definition.

use crate::error::StorageResult;
use dexmig_codec::{FieldMap, RecordId, Value};

/// A stream of records, each possibly failing.
pub type RecordStream<'a> = Box<dyn Iterator<Item = StorageResult<FieldMap>> + 'a>;

/// A generic entity store keyed by table name and integer primary key.
///
/// The migration pipeline treats both the source and the target store as
/// repositories. It never issues DDL: every table is assumed to exist.
///
/// # Invariants
///
/// - `query_all` yields rows ordered by `id` ascending
/// - `bulk_insert` is all-or-nothing: on error no row of the batch is stored
/// - `bulk_insert` keeps the ids it is given and does not touch the sequence
/// - `create` assigns the next sequence value as the new row's id
/// - after `resync_sequence`, `next_id` is greater than every stored id
pub trait Repository {
    /// Streams every row of `table`, ordered by primary key ascending.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn query_all(&self, table: &str) -> StorageResult<RecordStream<'_>>;

    /// Returns whether a row with primary key `id` exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn exists(&self, table: &str, id: RecordId) -> StorageResult<bool>;

    /// Finds the primary key of the first row whose `field` equals `value`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn find_id_by(&self, table: &str, field: &str, value: &Value) -> StorageResult<Option<RecordId>>;

    /// Inserts one row, assigning its primary key from the table sequence.
    ///
    /// Any `id` in `fields` is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if a constraint is violated.
    fn create(&mut self, table: &str, fields: FieldMap) -> StorageResult<RecordId>;

    /// Inserts a batch of rows with explicit primary keys.
    ///
    /// Returns the committed ids in batch order.
    ///
    /// # Errors
    ///
    /// Returns an error, and stores nothing, if any row violates a constraint.
    fn bulk_insert(&mut self, table: &str, rows: Vec<FieldMap>) -> StorageResult<Vec<RecordId>>;

    /// Counts the rows of `table`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn count(&self, table: &str) -> StorageResult<u64>;

    /// Deletes every row of `table`. The sequence is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the deletion.
    fn delete_all(&mut self, table: &str) -> StorageResult<()>;

    /// Sets the table sequence to the current maximum primary key (0 when
    /// the table is empty).
    ///
    /// # Errors
    ///
    /// Returns an error if the sequence cannot be updated.
    fn resync_sequence(&mut self, table: &str) -> StorageResult<()>;

    /// The id the next `create` on `table` would assign.
    ///
    /// # Errors
    ///
    /// Returns an error if the sequence cannot be read.
    fn next_id(&self, table: &str) -> StorageResult<RecordId>;
}
