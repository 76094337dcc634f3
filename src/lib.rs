//! Beast Blitz (workspace facade crate).
//!
//! Re-exports the member crates under `crates/` as
//! `beast_blitz::{adapter,core,store,types}` and holds the binary's configuration.

pub mod config;

pub use beast_blitz_adapter as adapter;
pub use beast_blitz_core as core;
pub use beast_blitz_store as store;
pub use beast_blitz_types as types;
