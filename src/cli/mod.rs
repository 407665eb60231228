pub mod commands;
pub mod goal;
pub mod view;

pub use commands::*;

use std::path::Path;

use crate::collection::GoalCollection;
use crate::db::DataDir;
use crate::error::GoalsError;
use crate::output;
use crate::prefs::JsonSettings;
use crate::store::SqliteGoalStore;

pub type Collection = GoalCollection<SqliteGoalStore, JsonSettings>;

/// Open and load the collection for `data_dir`. Storage problems surface as a
/// degraded collection, not an error.
pub fn open_collection(data_dir: Option<&Path>) -> Collection {
    let dir = DataDir::resolve(data_dir);
    let mut collection = GoalCollection::new(
        SqliteGoalStore::open(dir.db_path()),
        JsonSettings::new(dir.settings_path()),
    );
    collection.initialize();
    collection
}

pub(crate) fn finish(result: Result<i32, GoalsError>, json_output: bool) -> i32 {
    match result {
        Ok(code) => code,
        Err(e) => {
            if json_output {
                output::json::print(&output::json::error(&e));
            } else {
                eprintln!("Error: {}", e.message);
            }
            1
        }
    }
}
