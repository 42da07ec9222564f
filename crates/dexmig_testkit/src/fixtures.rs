//! Test fixtures.
//!
//! A small legacy-schema dataset that exercises every section, plus the
//! target store the importer expects.

use chrono::{NaiveDate, NaiveDateTime};
use dexmig_codec::{FieldMap, Value};
use dexmig_storage::{InMemoryRepository, Repository};

/// Valid 18-digit custom emoji id.
pub const EMOJI_ID: i64 = 123_456_789_012_345_678;

/// Player id referenced by the fixture but never exported.
pub const MISSING_PLAYER: i64 = 7;

/// Builds a row from `(field, value)` pairs.
pub fn row(pairs: &[(&str, Value)]) -> FieldMap {
    pairs
        .iter()
        .map(|(name, value)| ((*name).to_string(), value.clone()))
        .collect()
}

/// A fixed timestamp on day `day` of January 2024.
pub fn timestamp(day: u32) -> Value {
    Value::Timestamp(jan_2024(day))
}

fn jan_2024(day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, day)
        .and_then(|d| d.and_hms_opt(12, 30, 0))
        .expect("valid fixture date")
}

fn int(n: i64) -> Value {
    Value::Integer(n)
}

fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}

fn insert(repo: &mut InMemoryRepository, table: &str, rows: Vec<FieldMap>) {
    repo.bulk_insert(table, rows)
        .unwrap_or_else(|e| panic!("fixture rows for {table} rejected: {e}"));
}

/// A legacy car, fully populated.
pub fn car(id: i64, cartype: i64, name: &str, emoji: i64) -> FieldMap {
    row(&[
        ("id", int(id)),
        ("cartype_id", int(cartype)),
        ("country_id", Value::Null),
        ("fullName", text(name)),
        ("weight", int(1_200)),
        ("horsepower", int(90)),
        ("rarity", Value::Float(1.5)),
        ("emoji", int(emoji)),
        ("collectionPicture", text("/static/uploads/collection.png")),
        ("carCredits", text("Factory photo")),
        ("capacityName", text("Cruise")),
        ("capacityDescription", text("Keeps a steady pace")),
        ("createdAt", timestamp(1)),
    ])
}

/// A legacy car instance.
pub fn car_instance(id: i64, car: i64, player: i64) -> FieldMap {
    row(&[
        ("id", int(id)),
        ("car_id", int(car)),
        ("player_id", int(player)),
        ("catchDate", timestamp(2)),
        ("spawnedTime", timestamp(2)),
        ("server", int(555)),
        ("favorite", Value::Bool(false)),
        ("tradeable", Value::Bool(true)),
        ("weightBonus", int(0)),
        ("horsepowerBonus", int(5)),
    ])
}

/// A legacy player.
pub fn player(id: i64, discord_id: i64) -> FieldMap {
    row(&[
        ("id", int(id)),
        ("discord_id", int(discord_id)),
        ("donationPolicy", int(1)),
        ("privacyPolicy", int(1)),
    ])
}

/// Legacy dataset covering every section.
///
/// Integrity problems it contains on purpose:
/// - car 2 has a malformed emoji id (repaired on import)
/// - car 3 references a missing car type (skipped)
/// - car instance 4 references car 3 (skipped)
/// - car instance 3 and trade 1 reference [`MISSING_PLAYER`]
///   (placeholder shared by both)
pub fn legacy_source() -> InMemoryRepository {
    let mut repo = InMemoryRepository::new();

    insert(
        &mut repo,
        "cartype",
        vec![
            row(&[("id", int(1)), ("name", text("Sedan")), ("image", text("/static/uploads/sedan.png"))]),
            row(&[("id", int(2)), ("name", text("SUV")), ("image", text("suv.png"))]),
        ],
    );
    insert(
        &mut repo,
        "country",
        vec![row(&[("id", int(1)), ("name", text("France")), ("image", text("fr.png"))])],
    );
    insert(
        &mut repo,
        "event",
        vec![row(&[
            ("id", int(1)),
            ("name", text("Halloween")),
            ("rarity", Value::Float(0.5)),
            ("card", text("/static/uploads/halloween.png")),
        ])],
    );
    insert(
        &mut repo,
        "exclusive",
        vec![row(&[
            ("id", int(2)),
            ("name", text("Gold")),
            ("image", text("gold.png")),
            ("rarity", Value::Float(0.1)),
        ])],
    );
    insert(
        &mut repo,
        "car",
        vec![
            car(1, 1, "Model T", EMOJI_ID),
            car(2, 2, "Beetle", 42),
            car(3, 9, "Ghost", EMOJI_ID),
        ],
    );
    insert(
        &mut repo,
        "player",
        vec![player(1, 100_000_000_000_000_001), player(2, 100_000_000_000_000_002)],
    );
    insert(
        &mut repo,
        "carinstance",
        vec![
            car_instance(1, 1, 1),
            car_instance(2, 2, 2),
            car_instance(3, 1, MISSING_PLAYER),
            car_instance(4, 3, 1),
        ],
    );
    insert(
        &mut repo,
        "guildconfig",
        vec![row(&[("id", int(1)), ("guild_id", int(555)), ("spawnChannel", Value::Null), ("enabled", Value::Bool(true))])],
    );
    insert(
        &mut repo,
        "friendship",
        vec![row(&[("id", int(1)), ("friender_id", int(1)), ("friended_id", int(2)), ("since", timestamp(3))])],
    );
    insert(
        &mut repo,
        "blacklisteduser",
        vec![row(&[("id", int(1)), ("discord_id", int(999))])],
    );
    insert(
        &mut repo,
        "blacklistedguild",
        vec![row(&[("id", int(1)), ("discord_id", int(888))])],
    );
    insert(
        &mut repo,
        "trade",
        vec![row(&[
            ("id", int(1)),
            ("player1_id", int(1)),
            ("player2_id", int(MISSING_PLAYER)),
            ("date", timestamp(4)),
        ])],
    );
    insert(
        &mut repo,
        "tradeobject",
        vec![row(&[("id", int(1)), ("trade_id", int(1)), ("carinstance_id", int(1)), ("player_id", int(1))])],
    );

    repo
}

/// An empty target store with the new schema's unique constraints.
pub fn empty_target() -> InMemoryRepository {
    InMemoryRepository::new().with_unique("player", "discord_id")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_source_covers_every_exported_table() {
        let repo = legacy_source();
        for export in dexmig_core::CATALOG.exports {
            assert!(
                repo.count(export.source_table).unwrap() > 0,
                "{} is empty",
                export.source_table
            );
        }
    }

    #[test]
    fn timestamps_are_distinct_per_day() {
        assert_ne!(timestamp(1), timestamp(2));
    }
}
