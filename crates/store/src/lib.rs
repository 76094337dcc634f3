//! Persistence module - key-value storage, preferences and leaderboards
//!
//! Everything the game remembers between sessions goes through the
//! [`KeyValueStore`] contract: a flat map from string keys to opaque string blobs.
//! Two implementations ship with the crate:
//!
//! - [`MemoryStore`]: process-local, used by tests and headless hosts
//! - [`JsonFileStore`]: one JSON object on disk, rewritten atomically on every change
//!
//! On top of the store sit two services that share it:
//!
//! - [`Preferences`]: player display name and the sound/haptics switches
//! - [`ResultStore`]: per-tier top-10 leaderboards of [`ResultRecord`]s
//!
//! Persistence is best-effort. Unreadable or corrupt data reads as "nothing stored";
//! write failures are reported as [`StoreError`] so the caller can log them and carry on.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use beast_blitz_store::{MemoryStore, Preferences, ResultRecord, ResultStore};
//! use beast_blitz_types::DifficultyTier;
//!
//! let kv = Arc::new(MemoryStore::new());
//! let prefs = Preferences::new(Arc::clone(&kv));
//! let results = ResultStore::new(kv);
//!
//! assert_eq!(prefs.player_name(), "Player");
//! assert_eq!(results.best_score_for(DifficultyTier::Novice), 0);
//!
//! let record = ResultRecord::new(DifficultyTier::Novice, 40, prefs.player_name(), 4, 4);
//! results.archive(record).unwrap();
//! assert_eq!(results.best_score_for(DifficultyTier::Novice), 40);
//! ```

pub mod kv;
pub mod preferences;
pub mod results;

pub use beast_blitz_types as types;

pub use kv::{JsonFileStore, KeyValueStore, MemoryStore};
pub use preferences::Preferences;
pub use results::{ResultRecord, ResultStore};

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while reading or writing persisted state
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored value could not be (de)serialized: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("store lock poisoned")]
    Poisoned,
}
