//! Leaderboard invariants over arbitrary archive sequences

use std::sync::Arc;

use proptest::prelude::*;

use beast_blitz::store::{KeyValueStore, MemoryStore, ResultRecord, ResultStore};
use beast_blitz::types::{DifficultyTier, LEADERBOARD_CAPACITY};

fn record(tier: DifficultyTier, points: u32, name: &str) -> ResultRecord {
    ResultRecord::new(tier, points, name.to_string(), points / 10, 0)
}

proptest! {
    #[test]
    fn prop_leaderboard_is_bounded_and_sorted(
        entries in prop::collection::vec((any::<bool>(), 0u32..500), 0..40)
    ) {
        let results = ResultStore::new(Arc::new(MemoryStore::new()));
        for (advanced, points) in &entries {
            let tier = if *advanced { DifficultyTier::Veteran } else { DifficultyTier::Novice };
            results.archive(record(tier, *points, "p")).unwrap();
        }

        for tier in DifficultyTier::ALL {
            let board = results.results_for(tier);
            let mut expected: Vec<u32> = entries
                .iter()
                .filter(|(advanced, _)| *advanced == tier.is_advanced())
                .map(|(_, p)| *p)
                .collect();
            expected.sort_by(|a, b| b.cmp(a));
            expected.truncate(LEADERBOARD_CAPACITY);

            let points: Vec<u32> = board.iter().map(|r| r.points).collect();
            prop_assert_eq!(&points, &expected);
            prop_assert!(board.iter().all(|r| r.tier() == tier));
            prop_assert_eq!(results.best_score_for(tier), expected.first().copied().unwrap_or(0));
        }
    }

    #[test]
    fn prop_archive_rank_matches_position(scores in prop::collection::vec(0u32..100, 1..25)) {
        let results = ResultStore::new(Arc::new(MemoryStore::new()));
        for (i, points) in scores.iter().enumerate() {
            let name = format!("player-{}", i);
            let rank = results.archive(record(DifficultyTier::Novice, *points, &name)).unwrap();
            let board = results.results_for(DifficultyTier::Novice);
            match rank {
                Some(r) => prop_assert_eq!(&board[r - 1].player_name, &name),
                None => prop_assert!(board.iter().all(|rec| rec.player_name != name)),
            }
        }
    }
}

#[test]
fn test_equal_scores_keep_arrival_order() {
    let results = ResultStore::new(Arc::new(MemoryStore::new()));
    results.archive(record(DifficultyTier::Novice, 50, "first")).unwrap();
    results.archive(record(DifficultyTier::Novice, 50, "second")).unwrap();
    results.archive(record(DifficultyTier::Novice, 70, "third")).unwrap();

    let names: Vec<String> = results
        .results_for(DifficultyTier::Novice)
        .into_iter()
        .map(|r| r.player_name)
        .collect();
    assert_eq!(names, vec!["third", "first", "second"]);
}

#[test]
fn test_eleventh_low_score_is_dropped() {
    let results = ResultStore::new(Arc::new(MemoryStore::new()));
    for i in 0..10 {
        results
            .archive(record(DifficultyTier::Veteran, 100 + i, "p"))
            .unwrap();
    }
    assert_eq!(
        results.archive(record(DifficultyTier::Veteran, 5, "late")).unwrap(),
        None
    );
    assert_eq!(
        results.archive(record(DifficultyTier::Veteran, 500, "top")).unwrap(),
        Some(1)
    );

    let board = results.results_for(DifficultyTier::Veteran);
    assert_eq!(board.len(), 10);
    assert_eq!(board.last().unwrap().points, 101);
}

#[test]
fn test_corrupt_blob_reads_as_empty() {
    let kv = Arc::new(MemoryStore::new());
    kv.set("results.novice", "not json".to_string()).unwrap();

    let results = ResultStore::new(kv);
    assert!(results.results_for(DifficultyTier::Novice).is_empty());
    assert_eq!(results.best_score_for(DifficultyTier::Novice), 0);

    // Archiving replaces the corrupt blob.
    results.archive(record(DifficultyTier::Novice, 30, "p")).unwrap();
    assert_eq!(results.results_for(DifficultyTier::Novice).len(), 1);
}

#[test]
fn test_clear_all() {
    let results = ResultStore::new(Arc::new(MemoryStore::new()));
    results.archive(record(DifficultyTier::Novice, 10, "a")).unwrap();
    results.archive(record(DifficultyTier::Veteran, 20, "b")).unwrap();
    results.clear_all().unwrap();

    for tier in DifficultyTier::ALL {
        assert!(results.results_for(tier).is_empty());
    }
}
