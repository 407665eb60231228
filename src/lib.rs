//! Goal tracking core: goals measured by a set percentage or by time elapsed
//! in a date range, kept in SQLite, with a selection cursor that survives restarts.

pub mod cli;
pub mod collection;
pub mod db;
pub mod error;
pub mod models;
pub mod output;
pub mod prefs;
pub mod progress;
pub mod store;

pub use collection::{adjust_cursor, EditSession, GoalCollection, Phase};
pub use error::{ErrorCode, GoalsError};
pub use models::{Goal, GoalDraft, GoalId, GoalKind, GoalType};
pub use prefs::{JsonSettings, MemorySettings, SelectionStore};
pub use progress::{compute_progress, compute_progress_at, DotGrid};
pub use store::{GoalStore, SqliteGoalStore};
