//! Per-tier leaderboards.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::kv::KeyValueStore;
use crate::types::{DifficultyTier, LEADERBOARD_CAPACITY};
use crate::Result;

const NOVICE_RESULTS_KEY: &str = "results.novice";
const VETERAN_RESULTS_KEY: &str = "results.veteran";

/// A finished session, as stored on the leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub points: u32,
    pub recorded_at: DateTime<Utc>,
    pub player_name: String,
    /// Played on the veteran tier
    pub advanced: bool,
    pub rounds_completed: u32,
    pub max_combo_streak: u32,
}

impl ResultRecord {
    /// Build a record stamped with the current time.
    pub fn new(
        tier: DifficultyTier,
        points: u32,
        player_name: impl Into<String>,
        rounds_completed: u32,
        max_combo_streak: u32,
    ) -> Self {
        Self {
            points,
            recorded_at: Utc::now(),
            player_name: player_name.into(),
            advanced: tier.is_advanced(),
            rounds_completed,
            max_combo_streak,
        }
    }

    pub fn tier(&self) -> DifficultyTier {
        if self.advanced {
            DifficultyTier::Veteran
        } else {
            DifficultyTier::Novice
        }
    }
}

/// Ranked result history, one top-10 list per tier.
#[derive(Debug)]
pub struct ResultStore<K: KeyValueStore> {
    kv: Arc<K>,
}

impl<K: KeyValueStore> Clone for ResultStore<K> {
    fn clone(&self) -> Self {
        Self {
            kv: Arc::clone(&self.kv),
        }
    }
}

fn storage_key(tier: DifficultyTier) -> &'static str {
    match tier {
        DifficultyTier::Novice => NOVICE_RESULTS_KEY,
        DifficultyTier::Veteran => VETERAN_RESULTS_KEY,
    }
}

/// Stable sort, best first. Equal scores keep their insertion order.
fn rank(records: &mut Vec<ResultRecord>) {
    records.sort_by(|a, b| b.points.cmp(&a.points));
    records.truncate(LEADERBOARD_CAPACITY);
}

impl<K: KeyValueStore> ResultStore<K> {
    pub fn new(kv: Arc<K>) -> Self {
        Self { kv }
    }

    /// Add a record to its tier's leaderboard, keeping only the best ten.
    ///
    /// Returns the record's 1-based rank, or `None` if it did not make the cut.
    pub fn archive(&self, record: ResultRecord) -> Result<Option<usize>> {
        let tier = record.tier();
        let mut records = self.results_for(tier);
        records.push(record.clone());
        rank(&mut records);

        let position = records.iter().rposition(|r| *r == record).map(|i| i + 1);

        let blob = serde_json::to_string(&records)?;
        self.kv.set(storage_key(tier), blob)?;

        debug!(tier = tier.as_str(), points = record.points, ?position, "archived result");
        Ok(position)
    }

    /// Leaderboard for `tier`, best first. Unreadable data yields an empty list.
    pub fn results_for(&self, tier: DifficultyTier) -> Vec<ResultRecord> {
        let key = storage_key(tier);
        let blob = match self.kv.get(key) {
            Ok(Some(blob)) => blob,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(key, error = %e, "leaderboard read failed");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<ResultRecord>>(&blob) {
            Ok(mut records) => {
                rank(&mut records);
                records
            }
            Err(e) => {
                warn!(key, error = %e, "leaderboard blob is corrupt");
                Vec::new()
            }
        }
    }

    pub fn best_score_for(&self, tier: DifficultyTier) -> u32 {
        self.results_for(tier)
            .first()
            .map(|r| r.points)
            .unwrap_or(0)
    }

    /// Erase both tiers' leaderboards.
    pub fn clear_all(&self) -> Result<()> {
        for tier in DifficultyTier::ALL {
            self.kv.remove(storage_key(tier))?;
        }
        Ok(())
    }
}
