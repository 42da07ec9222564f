//! Transfer properties over generated datasets.

use dexmig_storage::{Compression, InMemoryRepository, Repository};
use dexmig_testkit::prelude::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn car_types_survive_the_round_trip(rows in car_types(12)) {
        let mut source = InMemoryRepository::new();
        source.bulk_insert("cartype", rows.clone()).unwrap();
        let mut harness = TransferHarness::new(source);
        let report = harness.transfer(Compression::Gzip).unwrap();

        prop_assert_eq!(report.table("regime").unwrap().added, rows.len() as u64);
        for row in &rows {
            let id = row["id"].as_integer().unwrap();
            let stored = harness.target.get("regime", id).unwrap();
            prop_assert_eq!(&stored["name"], &row["name"]);
            prop_assert_eq!(&stored["background"], &row["image"]);
        }
    }

    #[test]
    fn every_trade_points_at_an_existing_player(
        players in players(6),
        trades in trades(10, 12),
    ) {
        let mut source = InMemoryRepository::new();
        source.bulk_insert("player", players.clone()).unwrap();
        source.bulk_insert("trade", trades.clone()).unwrap();
        let mut harness = TransferHarness::new(source);
        let report = harness.transfer(Compression::None).unwrap();

        prop_assert_eq!(report.table("trade").unwrap().added, trades.len() as u64);
        let known = players.len() as i64;
        let dangling: std::collections::BTreeSet<i64> = trades
            .iter()
            .flat_map(|t| [t["player1_id"].as_integer(), t["player2_id"].as_integer()])
            .flatten()
            .filter(|id| *id > known)
            .collect();
        prop_assert_eq!(report.placeholders_created, dangling.len() as u64);
        for missing in &dangling {
            let sentinel = dexmig_codec::Value::Integer(-10_000_000_000 - missing);
            prop_assert!(harness
                .target
                .find_id_by("player", "discord_id", &sentinel)
                .unwrap()
                .is_some());
        }

        for trade in harness.target.query_all("trade").unwrap() {
            let trade = trade.unwrap();
            for field in ["player1_id", "player2_id"] {
                let id = trade[field].as_integer().unwrap();
                prop_assert!(harness.target.exists("player", id).unwrap());
            }
        }
        for table in dexmig_core::CATALOG.tables {
            prop_assert!(
                harness.target.next_id(table.name).unwrap() > harness.target.max_id(table.name)
            );
        }
    }

    #[test]
    fn exported_line_count_matches_written_records(rows in car_types(12)) {
        let mut source = InMemoryRepository::new();
        source.bulk_insert("cartype", rows.clone()).unwrap();
        let harness = TransferHarness::new(source);
        let report = harness
            .export(Compression::None, &mut dexmig_core::NullProgress)
            .unwrap();

        let text = harness.file_text(Compression::None);
        let data_lines = text
            .lines()
            .filter(|l| !l.is_empty() && !l.starts_with("//") && !l.starts_with(':'))
            .count() as u64;
        prop_assert_eq!(data_lines, report.total_written());
    }
}
