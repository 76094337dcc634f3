//! Core game logic - deterministic, tick-driven and testable
//!
//! This crate holds the game rules and the session state machine. It does no
//! I/O of its own: persistence goes through the injected
//! [`KeyValueStore`](store::KeyValueStore) and time only advances when the host
//! calls [`Session::tick`](session::Session::tick).
//!
//! # Module Structure
//!
//! - [`catalogue`]: the fixed roster of animals and grid population
//! - [`riddle`]: riddle templates and riddle generation for a grid
//! - [`scoring`]: round points and combo multipliers
//! - [`session`]: the game session state machine
//! - [`event`]: notifications emitted by a session
//! - [`snapshot`]: read-only view of a session for front ends
//!
//! # Game Rules
//!
//! - Each round deals a fresh grid of random animals (duplicates allowed)
//! - A riddle names a proper, non-empty subset of the grid
//! - The player must select exactly that subset before the countdown expires
//! - A correct answer scores points and grows the streak; from the third
//!   consecutive success a combo multiplier applies
//! - A wrong answer or a timeout ends the game and archives the result
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use beast_blitz_core::{RoundOutcome, Session};
//! use beast_blitz_core::store::MemoryStore;
//! use beast_blitz_core::types::DifficultyTier;
//!
//! let mut session = Session::new(12345, Arc::new(MemoryStore::new()));
//! session.start(DifficultyTier::Novice);
//!
//! let answer = session.riddle().unwrap().cells().to_vec();
//! let outcome = session.submit_cells(&answer);
//! assert!(matches!(outcome, Some(RoundOutcome::Solved(_))));
//! assert_eq!(session.score(), 10);
//! ```
//!
//! # Timing
//!
//! - **Tick Rate**: 100ms
//! - **Countdown**: 15s (Beginner) or 20s (Advanced) per round
//! - **Round Pause**: 1s between a solved round and the next grid
//!
//! Call [`Session::tick`](session::Session::tick) with the elapsed time.

pub mod catalogue;
pub mod event;
pub mod riddle;
pub mod scoring;
pub mod session;
pub mod snapshot;

pub use beast_blitz_store as store;
pub use beast_blitz_types as types;

pub use catalogue::{Catalogue, Grid, STANDARD_SPECIMENS};
pub use event::SessionEvent;
pub use riddle::{generate_riddle, Riddle, RiddleTemplate, TemplatePool};
pub use scoring::{calculate_round_score, combo_multiplier, RoundScore};
pub use session::{RoundOutcome, Session, SessionPhase};
pub use snapshot::SessionSnapshot;
