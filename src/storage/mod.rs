//! Storage layer for jornada.
//!
//! SQLite-backed persistence for the plan configuration and the timer engine
//! state, plus an in-memory store with the same interface.

mod database;
mod migrations;
mod store;

pub use database::Database;
pub use store::{KeyValueStore, MemoryStore, SqliteStore};

/// Key holding the plan configuration.
pub const CONFIG_KEY: &str = "config";
/// Key holding the engine state.
pub const STATE_KEY: &str = "state";
