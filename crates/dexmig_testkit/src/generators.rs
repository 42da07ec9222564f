//! Property-based test generators using proptest.
//!
//! Strategies produce legacy-schema rows that survive the interchange
//! format: free text never contains a reserved glyph, a carriage return or
//! the legacy null token.

use crate::fixtures::{row, timestamp};
use dexmig_codec::{glyph, FieldMap, Value};
use proptest::prelude::*;

/// Strategy for free text of 1 to `max` characters, newlines included.
pub fn free_text(max: usize) -> impl Strategy<Value = String> {
    prop::string::string_regex(&format!("[A-Za-z0-9 éü'.,!?\n-]{{1,{max}}}"))
        .expect("Invalid regex")
        .prop_filter("must not be the legacy null token", |s| {
            s != glyph::LEGACY_NULL
        })
}

/// Strategy for legacy car types with ids `1..=n`.
pub fn car_types(max_rows: usize) -> impl Strategy<Value = Vec<FieldMap>> {
    prop::collection::vec((free_text(64), free_text(120)), 1..=max_rows).prop_map(|pairs| {
        pairs
            .into_iter()
            .zip(1_i64..)
            .map(|((name, image), id)| {
                row(&[
                    ("id", Value::Integer(id)),
                    ("name", Value::Text(name)),
                    ("image", Value::Text(image)),
                ])
            })
            .collect()
    })
}

/// Strategy for legacy players with ids `1..=n` and distinct discord ids.
pub fn players(max_rows: usize) -> impl Strategy<Value = Vec<FieldMap>> {
    prop::collection::btree_set(1_i64..1_000_000_000_000, 1..=max_rows).prop_map(|ids| {
        ids.into_iter()
            .zip(1_i64..)
            .map(|(discord_id, id)| crate::fixtures::player(id, discord_id))
            .collect()
    })
}

/// Strategy for legacy trades whose players are drawn from `1..=max_player`.
pub fn trades(max_rows: usize, max_player: i64) -> impl Strategy<Value = Vec<FieldMap>> {
    prop::collection::vec((1..=max_player, 1..=max_player, 1_u32..28), 1..=max_rows).prop_map(
        |pairs| {
            pairs
                .into_iter()
                .zip(1_i64..)
                .map(|((p1, p2, day), id)| {
                    row(&[
                        ("id", Value::Integer(id)),
                        ("player1_id", Value::Integer(p1)),
                        ("player2_id", Value::Integer(p2)),
                        ("date", timestamp(day)),
                    ])
                })
                .collect()
        },
    )
}
