//! Adapter module - async host for a game session
//!
//! A [`Session`](beast_blitz_core::Session) is a plain state machine driven by
//! `tick` calls. This crate owns one on a single tokio task so that a front end
//! can talk to it through channels:
//!
//! 1. **Commands**: start, submit cells or specimens, terminate, snapshot
//! 2. **Clock**: a fixed-rate `tokio::time::interval` feeds `Session::tick`
//! 3. **Events**: every session event is forwarded, in order, to the handle
//!
//! Commands and ticks are processed one at a time by the same task, so a round
//! that times out can never also be resolved by a submission (and vice versa).
//!
//! # Wire format
//!
//! [`protocol`] turns events and snapshots into line-delimited JSON for hosts
//! that pipe the game to another process:
//!
//! ```text
//! {"type":"riddle","question":"Find animals with spots","answers":3,"complexity":"elementary"}
//! {"type":"time","remaining_ms":14900}
//! {"type":"round","successful":true,"cells":[2,7,11],"specimens":["Cow","Giraffe","Cow"]}
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use beast_blitz_adapter::{spawn_session, DriverConfig};
//! use beast_blitz_core::{Session, SessionEvent};
//! use beast_blitz_store::MemoryStore;
//! use beast_blitz_types::DifficultyTier;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> anyhow::Result<()> {
//! let session = Session::new(7, Arc::new(MemoryStore::new()));
//! let mut handle = spawn_session(session, DriverConfig::default());
//!
//! handle.start(DifficultyTier::Novice).await?;
//! let first = handle.next_event().await;
//! assert!(matches!(first, Some(SessionEvent::GridRefreshed { .. })));
//!
//! let session = handle.shutdown().await?;
//! assert!(session.is_active());
//! # Ok(())
//! # }
//! ```

pub mod protocol;
pub mod runtime;

pub use beast_blitz_core as core;
pub use beast_blitz_store as store;
pub use beast_blitz_types as types;

pub use protocol::{encode_event, encode_snapshot, EventLine, SnapshotLine};
pub use runtime::{spawn_session, DriverConfig, SessionCommand, SessionHandle};
