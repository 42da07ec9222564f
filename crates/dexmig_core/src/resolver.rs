//! Integrity resolver.
//!
//! Turns the decoded records of one target table into commit candidates.
//! Each record passes, in order:
//!
//! 1. identity: a null `id` is rejected
//! 2. dedup: an `id` already held by an accepted record is rejected; a
//!    record rejected by a later step does not claim its `id`
//! 3. foreign keys: every non-null reference must exist, either in the
//!    [`InsertedIds`] index or in the store; a dangling reference to a table
//!    with a [`PlaceholderPolicy`] is rewritten to a placeholder row.
//!    Placeholder keys come from the target sequence, so a reference that
//!    equals one of this run's placeholder keys is still dangling
//! 4. backfill: null required fields take their backfill value
//! 5. validation: kinds, unknown fields and structural checks, with at most
//!    one repair per field
//!
//! Rejected records are counted and written to the audit trail; only store
//! and audit I/O failures abort the table.

use crate::audit::AuditTrail;
use crate::catalog::{Catalog, FieldSpec, PlaceholderPolicy, TableSpec};
use crate::config::Config;
use crate::error::{MigrateError, MigrateResult};
use crate::progress::{ProgressSink, ProgressStatus};
use crate::stats::TableCounters;
use crate::status::{group_thousands, StatusBoard};
use dexmig_codec::{FieldKind, FieldMap, FieldSchema, Literal, RecordId, Value, ID_FIELD};
use dexmig_storage::Repository;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::io::Write;

/// Why a record was left out of the commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// `id` was null.
    NullId,
    /// `id` is already held by an accepted record of this batch.
    Duplicate,
    /// A reference points to a row that does not exist.
    ForeignKey {
        /// Referencing field.
        field: String,
        /// Dangling id.
        value: RecordId,
        /// Label of the referenced table.
        target: &'static str,
    },
    /// Required fields are null and have no backfill.
    Unsatisfiable {
        /// The null fields.
        fields: Vec<String>,
    },
    /// A field failed instance validation.
    Validation {
        /// What failed.
        message: String,
    },
    /// The store rejected the row in row-by-row fallback.
    Commit {
        /// Store error.
        message: String,
    },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NullId => f.write_str("Null ID"),
            Self::Duplicate => f.write_str("Duplicate ID"),
            Self::ForeignKey {
                field,
                value,
                target,
            } => write!(
                f,
                "Invalid FK {field}={value} (references non-existent {target})"
            ),
            Self::Unsatisfiable { fields } => write!(
                f,
                "Null required fields without defaults: {}",
                fields.join(", ")
            ),
            Self::Validation { message } => write!(f, "Validation error: {message}"),
            Self::Commit { message } => write!(f, "Commit error: {message}"),
        }
    }
}

/// Primary keys known to exist in the target during a run.
#[derive(Debug, Default, Clone)]
pub struct InsertedIds {
    tables: HashMap<&'static str, HashSet<RecordId>>,
}

impl InsertedIds {
    /// Returns whether `id` is known in `table`.
    #[must_use]
    pub fn contains(&self, table: &str, id: RecordId) -> bool {
        self.tables.get(table).is_some_and(|ids| ids.contains(&id))
    }

    /// Records committed ids.
    pub fn extend(&mut self, table: &'static str, ids: &[RecordId]) {
        self.tables.entry(table).or_default().extend(ids.iter().copied());
    }

    /// Number of ids known in `table`.
    #[must_use]
    pub fn len(&self, table: &str) -> usize {
        self.tables.get(table).map_or(0, HashSet::len)
    }
}

/// Commit candidates of one table and what it took to get them.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    /// Records ready for bulk insertion, in input order.
    pub candidates: Vec<FieldMap>,
    /// Integrity counters.
    pub counters: TableCounters,
}

/// Run-scoped resolver state.
#[derive(Debug)]
pub struct Resolver<'c> {
    catalog: &'c Catalog,
    config: &'c Config,
    inserted: InsertedIds,
    placeholders: HashMap<(&'static str, RecordId), RecordId>,
    placeholder_ids: HashSet<(&'static str, RecordId)>,
    placeholders_created: u64,
}

impl<'c> Resolver<'c> {
    /// Creates a resolver with an empty index.
    #[must_use]
    pub fn new(catalog: &'c Catalog, config: &'c Config) -> Self {
        Self {
            catalog,
            config,
            inserted: InsertedIds::default(),
            placeholders: HashMap::new(),
            placeholder_ids: HashSet::new(),
            placeholders_created: 0,
        }
    }

    /// The inserted-id index.
    #[must_use]
    pub fn inserted(&self) -> &InsertedIds {
        &self.inserted
    }

    /// Placeholder rows created by this run (reused ones excluded).
    #[must_use]
    pub const fn placeholders_created(&self) -> u64 {
        self.placeholders_created
    }

    /// Returns whether `id` is a placeholder row created by this run.
    #[must_use]
    pub fn is_placeholder(&self, table: &str, id: RecordId) -> bool {
        self.placeholder_ids
            .iter()
            .any(|(name, placeholder)| *name == table && *placeholder == id)
    }

    /// Extends the index with ids committed to `table`.
    pub fn record_committed(&mut self, table: &'static str, ids: &[RecordId]) {
        self.inserted.extend(table, ids);
    }

    /// Resolves every record of one table.
    ///
    /// # Errors
    ///
    /// Returns an error if the store or an audit log fails. Integrity
    /// problems are never errors.
    pub fn resolve_table<R, W>(
        &mut self,
        repo: &mut R,
        table: &'static TableSpec,
        records: Vec<FieldMap>,
        audit: &mut AuditTrail<W>,
        board: &mut StatusBoard,
        progress: &mut dyn ProgressSink,
    ) -> MigrateResult<Resolved>
    where
        R: Repository + ?Sized,
        W: Write,
    {
        let total = records.len();
        board.push(format!(
            "Processing {}... ({} records to validate)",
            table.label,
            group_thousands(total as u64)
        ));
        board.publish(progress, ProgressStatus::Running);

        let mut seen = HashSet::with_capacity(total);
        let mut counters = TableCounters::default();
        let mut candidates = Vec::with_capacity(total);
        let interval = self.config.resolve_progress_interval.max(1);

        for (idx, mut record) in records.into_iter().enumerate() {
            if idx > 0 && idx % interval == 0 {
                board.replace_last(format!(
                    "Processing {}... (validated {}/{})",
                    table.label,
                    group_thousands(idx as u64),
                    group_thousands(total as u64)
                ));
                board.publish(progress, ProgressStatus::Running);
            }

            let verdict =
                self.resolve_record(repo, table, &mut record, &mut seen, &mut counters, audit)?;
            match verdict {
                Ok(()) => candidates.push(record),
                Err(rejection) => {
                    reject(table, record_id(&record), &rejection, &mut counters, audit)?;
                }
            }
        }

        tracing::info!(
            table = table.name,
            candidates = candidates.len(),
            skipped = counters.skipped(),
            "table resolved"
        );
        Ok(Resolved {
            candidates,
            counters,
        })
    }

    fn resolve_record<R, W>(
        &mut self,
        repo: &mut R,
        table: &'static TableSpec,
        record: &mut FieldMap,
        seen: &mut HashSet<RecordId>,
        counters: &mut TableCounters,
        audit: &mut AuditTrail<W>,
    ) -> MigrateResult<Result<(), Rejection>>
    where
        R: Repository + ?Sized,
        W: Write,
    {
        let Some(id) = record_id(record) else {
            return Ok(Err(Rejection::NullId));
        };
        if seen.contains(&id) {
            return Ok(Err(Rejection::Duplicate));
        }

        for (field, target_name) in table.foreign_keys() {
            let Some(value) = record.get(field.name).and_then(Value::as_integer) else {
                continue;
            };
            let known = !self.placeholder_ids.contains(&(target_name, value))
                && (self.inserted.contains(target_name, value)
                    || repo.exists(target_name, value)?);
            if known {
                continue;
            }

            let target = self.catalog.table(target_name).ok_or_else(|| {
                MigrateError::invalid_catalog(format!("unknown table {target_name}"))
            })?;
            let dangling = Rejection::ForeignKey {
                field: field.name.to_string(),
                value,
                target: target.label,
            };
            let Some(policy) = target.placeholder else {
                return Ok(Err(dangling));
            };
            let Some(placeholder) = self.placeholder_for(repo, target, &policy, value, audit)?
            else {
                return Ok(Err(dangling));
            };

            record.insert(field.name.to_string(), Value::Integer(placeholder));
            counters.placeholder_substitutions += 1;
            audit.reassigned(table, id, field.name, target, value, placeholder)?;
            tracing::debug!(
                table = table.name,
                id,
                field = field.name,
                missing = value,
                placeholder,
                "reference reassigned to placeholder"
            );
        }

        if let Err(rejection) = backfill(table, id, record, counters, audit)? {
            return Ok(Err(rejection));
        }

        let verdict = validate_instance(table, id, record, counters, audit)?;
        if verdict.is_ok() {
            seen.insert(id);
        }
        Ok(verdict)
    }

    /// Returns the placeholder standing in for `missing`, creating it on
    /// first use. Placeholders left by an earlier run are found by their
    /// sentinel key and reused.
    fn placeholder_for<R, W>(
        &mut self,
        repo: &mut R,
        target: &'static TableSpec,
        policy: &PlaceholderPolicy,
        missing: RecordId,
        audit: &mut AuditTrail<W>,
    ) -> MigrateResult<Option<RecordId>>
    where
        R: Repository + ?Sized,
        W: Write,
    {
        if let Some(id) = self.placeholders.get(&(target.name, missing)) {
            return Ok(Some(*id));
        }
        let Some(sentinel) = policy.sentinel(missing) else {
            tracing::warn!(table = target.name, missing, "sentinel out of range");
            return Ok(None);
        };

        let key = Value::Integer(sentinel);
        let id = match repo.find_id_by(target.name, policy.key_field, &key)? {
            Some(existing) => existing,
            None => {
                let mut fields = target.template();
                fields.remove(ID_FIELD);
                fields.insert(policy.key_field.to_string(), key);
                for (name, literal) in policy.fixed {
                    fields.insert((*name).to_string(), literal.to_value());
                }
                let id = repo.create(target.name, fields)?;
                self.placeholder_ids.insert((target.name, id));
                self.placeholders_created += 1;
                audit.placeholder_created(target, policy, sentinel, id, missing)?;
                tracing::info!(table = target.name, missing, sentinel, id, "placeholder created");
                id
            }
        };

        self.placeholders.insert((target.name, missing), id);
        Ok(Some(id))
    }
}

/// Counts, traces and logs a rejected record.
pub(crate) fn reject<W: Write>(
    table: &TableSpec,
    id: Option<RecordId>,
    rejection: &Rejection,
    counters: &mut TableCounters,
    audit: &mut AuditTrail<W>,
) -> MigrateResult<()> {
    tracing::warn!(table = table.name, id = ?id, reason = %rejection, "record skipped");
    counters.reject(rejection);
    audit.skipped_record(table, id, rejection)?;
    Ok(())
}

pub(crate) fn record_id(record: &FieldMap) -> Option<RecordId> {
    record.get(ID_FIELD).and_then(Value::as_integer)
}

fn backfill<W: Write>(
    table: &TableSpec,
    id: RecordId,
    record: &mut FieldMap,
    counters: &mut TableCounters,
    audit: &mut AuditTrail<W>,
) -> MigrateResult<Result<(), Rejection>> {
    let mut assigned = Vec::new();
    let mut unsatisfied = Vec::new();

    for field in table.fields.iter().filter(|f| !f.nullable) {
        if record.get(field.name).is_some_and(|v| !v.is_null()) {
            continue;
        }
        match field.backfill {
            Some(literal) => {
                record.insert(field.name.to_string(), literal.to_value());
                assigned.push(format!("{}={}", field.name, render_literal(literal)));
            }
            None => unsatisfied.push(field.name.to_string()),
        }
    }

    if !assigned.is_empty() {
        counters.defaults_backfilled += assigned.len() as u64;
        audit.defaults_set(table, id, &assigned)?;
    }
    if unsatisfied.is_empty() {
        Ok(Ok(()))
    } else {
        Ok(Err(Rejection::Unsatisfiable {
            fields: unsatisfied,
        }))
    }
}

/// Validates a record against its table, applying repairs in place.
///
/// Used by the resolver and again by the row-by-row commit fallback.
///
/// # Errors
///
/// Returns an error only if the audit log cannot be written.
pub fn validate_instance<W: Write>(
    table: &TableSpec,
    id: RecordId,
    record: &mut FieldMap,
    counters: &mut TableCounters,
    audit: &mut AuditTrail<W>,
) -> MigrateResult<Result<(), Rejection>> {
    if let Some(unknown) = record.keys().find(|name| table.field(name).is_none()) {
        return Ok(Err(Rejection::Validation {
            message: format!("unknown field '{unknown}'"),
        }));
    }

    for field in table.fields {
        let value = record.get(field.name).cloned().unwrap_or(Value::Null);
        match check_field(field, &value) {
            Ok(Some(normalized)) => {
                record.insert(field.name.to_string(), normalized);
            }
            Ok(None) => {}
            Err(problem) => {
                let Some(repair) = field.repair else {
                    return Ok(Err(Rejection::Validation {
                        message: format!("{} {problem}", field.name),
                    }));
                };
                let repaired = repair.to_value();
                if let Err(still) = check_field(field, &repaired) {
                    return Ok(Err(Rejection::Validation {
                        message: format!("{} repair value {still}", field.name),
                    }));
                }
                audit.repaired(table, id, field.name, &value.to_string(), &problem)?;
                tracing::debug!(table = table.name, id, field = field.name, %problem, "field repaired");
                counters.repairs += 1;
                record.insert(field.name.to_string(), repaired);
            }
        }
    }
    Ok(Ok(()))
}

/// Checks one value. Returns a replacement when the value is acceptable
/// but must be normalized to the declared kind.
#[allow(clippy::cast_precision_loss)]
fn check_field(field: &FieldSpec, value: &Value) -> Result<Option<Value>, String> {
    if value.is_null() {
        return if field.nullable {
            Ok(None)
        } else {
            Err("may not be null".to_string())
        };
    }
    if !value.conforms_to(field.kind) {
        return Err(format!(
            "is {}, expected {}",
            value.type_name(),
            field.kind.name()
        ));
    }
    if let Some(check) = field.check {
        check.check(value)?;
    }
    match (field.kind, value) {
        (FieldKind::Float, Value::Integer(n)) => Ok(Some(Value::Float(*n as f64))),
        _ => Ok(None),
    }
}

fn render_literal(literal: Literal) -> String {
    match literal {
        Literal::Null => "None".to_string(),
        Literal::Bool(true) => "True".to_string(),
        Literal::Bool(false) => "False".to_string(),
        Literal::Int(n) => n.to_string(),
        Literal::Float(x) => x.to_string(),
        Literal::Text(s) => format!("'{s}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CATALOG, EMOJI_ID_REPAIR};
    use crate::progress::NullProgress;
    use dexmig_storage::InMemoryRepository;

    struct Harness {
        repo: InMemoryRepository,
        audit: AuditTrail<Vec<u8>>,
        board: StatusBoard,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                repo: InMemoryRepository::new().with_unique("player", "discord_id"),
                audit: AuditTrail::new(Vec::new(), Vec::new()).unwrap(),
                board: StatusBoard::new(),
            }
        }

        fn resolve(
            &mut self,
            resolver: &mut Resolver<'_>,
            table: &str,
            records: Vec<FieldMap>,
        ) -> Resolved {
            let table = CATALOG.table(table).unwrap();
            resolver
                .resolve_table(
                    &mut self.repo,
                    table,
                    records,
                    &mut self.audit,
                    &mut self.board,
                    &mut NullProgress,
                )
                .unwrap()
        }

        fn logs(self) -> (String, String) {
            let (skipped, placeholders) = self.audit.finish(&[]).unwrap();
            (
                String::from_utf8(skipped).unwrap(),
                String::from_utf8(placeholders).unwrap(),
            )
        }
    }

    fn record(table: &str, pairs: &[(&str, Value)]) -> FieldMap {
        let mut map = CATALOG.table(table).unwrap().template();
        for (name, value) in pairs {
            map.insert((*name).to_string(), value.clone());
        }
        map
    }

    fn trade(id: i64, player1: i64, player2: i64) -> FieldMap {
        record(
            "trade",
            &[
                ("id", Value::Integer(id)),
                ("player1_id", Value::Integer(player1)),
                ("player2_id", Value::Integer(player2)),
                ("date", Value::Timestamp(chrono::NaiveDateTime::default())),
            ],
        )
    }

    fn regime(id: Option<i64>, name: &str) -> FieldMap {
        record(
            "regime",
            &[
                ("id", id.into()),
                ("name", Value::Text(name.into())),
                ("background", Value::Text("bg.png".into())),
            ],
        )
    }

    #[test]
    fn first_occurrence_wins_on_duplicate_ids() {
        let mut h = Harness::new();
        let config = Config::default();
        let mut resolver = Resolver::new(&CATALOG, &config);
        let resolved = h.resolve(
            &mut resolver,
            "regime",
            vec![regime(Some(1), "first"), regime(Some(1), "second"), regime(None, "x")],
        );

        assert_eq!(resolved.candidates.len(), 1);
        assert_eq!(resolved.candidates[0]["name"], Value::Text("first".into()));
        assert_eq!(resolved.counters.skipped_duplicate, 1);
        assert_eq!(resolved.counters.skipped_null_id, 1);

        let (skipped, _) = h.logs();
        assert!(skipped.contains("Regime - ID: 1 - SKIPPED: Duplicate ID"));
        assert!(skipped.contains("Regime - ID: None - SKIPPED: Null ID"));
    }

    #[test]
    fn dangling_reference_without_policy_is_skipped() {
        let mut h = Harness::new();
        let config = Config::default();
        let mut resolver = Resolver::new(&CATALOG, &config);
        let line_item = record(
            "trade_object",
            &[
                ("id", Value::Integer(1)),
                ("trade_id", Value::Integer(99)),
                ("ballinstance_id", Value::Integer(5)),
                ("player_id", Value::Integer(1)),
            ],
        );
        let resolved = h.resolve(&mut resolver, "trade_object", vec![line_item]);

        assert!(resolved.candidates.is_empty());
        assert_eq!(resolved.counters.skipped_fk_violation, 1);
        let (skipped, _) = h.logs();
        assert!(skipped
            .contains("TradeObject - ID: 1 - SKIPPED: Invalid FK trade_id=99 (references non-existent Trade)"));
    }

    #[test]
    fn shared_missing_player_gets_one_placeholder() {
        let mut h = Harness::new();
        let config = Config::default();
        let mut resolver = Resolver::new(&CATALOG, &config);
        let resolved = h.resolve(
            &mut resolver,
            "trade",
            vec![trade(1, 42, 42), trade(2, 42, 43)],
        );

        assert_eq!(resolved.candidates.len(), 2);
        assert_eq!(resolved.counters.placeholder_substitutions, 4);
        assert_eq!(resolver.placeholders_created(), 2);
        assert_eq!(h.repo.count("player").unwrap(), 2);

        let p42 = resolved.candidates[0]["player1_id"].clone();
        assert_eq!(resolved.candidates[0]["player2_id"], p42);
        assert_eq!(resolved.candidates[1]["player1_id"], p42);

        let id = p42.as_integer().unwrap();
        let row = h.repo.get("player", id).unwrap();
        assert_eq!(row["discord_id"], Value::Integer(-10_000_000_042));
        assert_eq!(row["donation_policy"], Value::Integer(0));
        assert!(resolver.is_placeholder("player", id));
        assert!(!resolver.is_placeholder("player", id + 100));

        let (_, placeholders) = h.logs();
        assert_eq!(placeholders.matches("Created placeholder Player").count(), 2);
        assert_eq!(placeholders.matches("Reassigned").count(), 4);
    }

    #[test]
    fn placeholder_from_earlier_run_is_reused() {
        let mut h = Harness::new();
        let mut existing = FieldMap::new();
        existing.insert("discord_id".into(), Value::Integer(-10_000_000_042));
        let placeholder = h.repo.create("player", existing).unwrap();

        let config = Config::default();
        let mut resolver = Resolver::new(&CATALOG, &config);
        let resolved = h.resolve(&mut resolver, "trade", vec![trade(1, 42, 42)]);

        assert_eq!(resolver.placeholders_created(), 0);
        assert_eq!(h.repo.count("player").unwrap(), 1);
        assert_eq!(
            resolved.candidates[0]["player1_id"],
            Value::Integer(placeholder)
        );
    }

    #[test]
    fn existing_rows_satisfy_references() {
        let mut h = Harness::new();
        let players = vec![
            record("player", &[("id", Value::Integer(42)), ("discord_id", Value::Integer(1))]),
            record("player", &[("id", Value::Integer(43)), ("discord_id", Value::Integer(2))]),
        ];
        h.repo.bulk_insert("player", players).unwrap();

        let config = Config::default();
        let mut resolver = Resolver::new(&CATALOG, &config);
        let resolved = h.resolve(&mut resolver, "trade", vec![trade(1, 42, 43)]);
        assert_eq!(resolved.counters.placeholder_substitutions, 0);
        assert_eq!(resolved.candidates[0]["player1_id"], Value::Integer(42));
    }

    fn ball(id: i64, emoji_id: Value, country: Value) -> FieldMap {
        record(
            "ball",
            &[
                ("id", Value::Integer(id)),
                ("country", country),
                ("short_name", Value::Null),
                ("health", Value::Integer(100)),
                ("attack", Value::Integer(50)),
                ("rarity", Value::Integer(2)),
                ("emoji_id", emoji_id),
                ("regime_id", Value::Integer(1)),
                ("collection_card", Value::Text("card.png".into())),
                ("credits", Value::Text("someone".into())),
                ("capacity_name", Value::Text("Boost".into())),
                ("capacity_description", Value::Text("Goes fast".into())),
            ],
        )
    }

    fn with_regime(h: &mut Harness, resolver: &mut Resolver<'_>) {
        let resolved = h.resolve(resolver, "regime", vec![regime(Some(1), "Sedan")]);
        h.repo
            .bulk_insert("regime", resolved.candidates)
            .unwrap();
        resolver.record_committed("regime", &[1]);
    }

    #[test]
    fn backfill_and_repair_are_logged() {
        let mut h = Harness::new();
        let config = Config::default();
        let mut resolver = Resolver::new(&CATALOG, &config);
        with_regime(&mut h, &mut resolver);

        let resolved = h.resolve(
            &mut resolver,
            "ball",
            vec![ball(1, Value::Integer(12345), Value::Null)],
        );
        assert_eq!(resolved.candidates.len(), 1);
        let row = &resolved.candidates[0];
        assert_eq!(row["country"], Value::Text("Unknown".into()));
        assert_eq!(row["short_name"], Value::Text("Unknown".into()));
        assert_eq!(row["emoji_id"], Value::Integer(EMOJI_ID_REPAIR));
        assert_eq!(row["rarity"], Value::Float(2.0));
        assert_eq!(resolved.counters.defaults_backfilled, 2);
        assert_eq!(resolved.counters.repairs, 1);

        let (_, placeholders) = h.logs();
        assert!(placeholders.contains("Ball ID 1: Set defaults: country='Unknown', short_name='Unknown'"));
        assert!(placeholders.contains("Ball ID 1: Fixed invalid emoji_id (was 12345, has 5 digits, expected 17 to 19)"));
    }

    #[test]
    fn required_field_without_backfill_is_skipped() {
        let mut h = Harness::new();
        let config = Config::default();
        let mut resolver = Resolver::new(&CATALOG, &config);
        with_regime(&mut h, &mut resolver);

        let mut row = ball(2, Value::Integer(123_456_789_012_345_678), Value::Text("FR".into()));
        row.insert("health".into(), Value::Null);
        let resolved = h.resolve(&mut resolver, "ball", vec![row]);
        assert!(resolved.candidates.is_empty());
        assert_eq!(resolved.counters.skipped_unsatisfiable_default, 1);

        let (skipped, _) = h.logs();
        assert!(skipped.contains("SKIPPED: Null required fields without defaults: health"));
    }

    #[test]
    fn over_long_text_without_repair_fails_validation() {
        let mut h = Harness::new();
        let config = Config::default();
        let mut resolver = Resolver::new(&CATALOG, &config);
        let long = "x".repeat(65);
        let resolved = h.resolve(&mut resolver, "regime", vec![regime(Some(3), &long)]);
        assert!(resolved.candidates.is_empty());
        assert_eq!(resolved.counters.skipped_validation, 1);
    }

    #[test]
    fn unknown_field_fails_validation() {
        let table = CATALOG.table("regime").unwrap();
        let mut row = regime(Some(1), "ok");
        row.insert("colour".into(), Value::Text("red".into()));
        let mut counters = TableCounters::default();
        let mut audit = AuditTrail::new(Vec::<u8>::new(), Vec::new()).unwrap();
        let verdict = validate_instance(table, 1, &mut row, &mut counters, &mut audit).unwrap();
        assert_eq!(
            verdict,
            Err(Rejection::Validation {
                message: "unknown field 'colour'".into()
            })
        );
    }

    #[test]
    fn progress_line_is_rewritten_while_resolving() {
        let mut h = Harness::new();
        let config = Config::default().resolve_progress_interval(100);
        let mut resolver = Resolver::new(&CATALOG, &config);
        let rows = (1..=250).map(|i| regime(Some(i), "r")).collect();
        h.resolve(&mut resolver, "regime", rows);
        assert_eq!(h.board.last(), Some("Processing Regime... (validated 200/250)"));
    }

    fn special(id: i64, name: &str) -> FieldMap {
        record(
            "special",
            &[
                ("id", Value::Integer(id)),
                ("name", Value::Text(name.into())),
                ("rarity", Value::Float(0.5)),
            ],
        )
    }

    #[test]
    fn rejected_record_does_not_claim_its_id() {
        let mut h = Harness::new();
        let config = Config::default();
        let mut resolver = Resolver::new(&CATALOG, &config);
        let resolved = h.resolve(
            &mut resolver,
            "special",
            vec![
                special(1, &"x".repeat(70)),
                special(1, "Halloween"),
                special(1, "Christmas"),
            ],
        );

        assert_eq!(resolved.candidates.len(), 1);
        assert_eq!(resolved.candidates[0]["name"], Value::Text("Halloween".into()));
        assert_eq!(resolved.counters.skipped_validation, 1);
        assert_eq!(resolved.counters.skipped_duplicate, 1);
    }

    #[test]
    fn reference_matching_a_placeholder_key_gets_its_own_placeholder() {
        let mut h = Harness::new();
        let players = (1..=5)
            .map(|id| {
                record(
                    "player",
                    &[("id", Value::Integer(id)), ("discord_id", Value::Integer(100 + id))],
                )
            })
            .collect();
        h.repo.bulk_insert("player", players).unwrap();
        h.repo.resync_sequence("player").unwrap();

        let config = Config::default();
        let mut resolver = Resolver::new(&CATALOG, &config);
        resolver.record_committed("player", &[1, 2, 3, 4, 5]);
        let resolved = h.resolve(&mut resolver, "trade", vec![trade(1, 1, 9), trade(2, 1, 6)]);

        assert_eq!(resolver.placeholders_created(), 2);
        assert_eq!(resolved.candidates[0]["player2_id"], Value::Integer(6));
        assert_eq!(resolved.candidates[1]["player2_id"], Value::Integer(7));
        assert_eq!(
            h.repo.get("player", 6).unwrap()["discord_id"],
            Value::Integer(-10_000_000_009)
        );
        assert_eq!(
            h.repo.get("player", 7).unwrap()["discord_id"],
            Value::Integer(-10_000_000_006)
        );

        let (_, placeholders) = h.logs();
        assert_eq!(placeholders.matches("Created placeholder Player").count(), 2);
    }
}
