//! Durable CRUD for goals.

use std::path::PathBuf;

use rusqlite::Connection;
use tracing::{debug, error, info, warn};

use crate::db::{connection, goal_repo, migrations};
use crate::error::GoalsError;
use crate::models::{Goal, GoalId};

pub type Result<T> = std::result::Result<T, GoalsError>;

/// Storage backend for the goal collection.
///
/// Errors carry the storage codes: `StorageInitError` from `initialize`,
/// `StorageReadError` from `get_all`, `StorageWriteError` from `save`/`delete`.
pub trait GoalStore {
    /// Open the backing store and create the schema if absent. Safe to call repeatedly.
    fn initialize(&mut self) -> Result<()>;

    /// Every stored goal in insertion order.
    fn get_all(&self) -> Result<Vec<Goal>>;

    /// Update when `goal.id` is set, insert otherwise. The returned goal always carries an id.
    fn save(&mut self, goal: &Goal) -> Result<Goal>;

    /// Remove the goal with `id`. Unknown ids are not an error.
    fn delete(&mut self, id: GoalId) -> Result<()>;

    /// Release the backing handle. Data operations fail until `initialize` is called again.
    fn close(&mut self) {}
}

#[derive(Debug, Clone)]
enum Location {
    File(PathBuf),
    Memory,
}

/// SQLite-backed store holding one connection for its lifetime.
pub struct SqliteGoalStore {
    location: Location,
    conn: Option<Connection>,
}

impl SqliteGoalStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            location: Location::File(path.into()),
            conn: None,
        }
    }

    pub fn in_memory() -> Self {
        Self {
            location: Location::Memory,
            conn: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    fn conn(&self) -> Option<&Connection> {
        self.conn.as_ref()
    }

    fn connect(&self) -> Result<Connection> {
        let conn = match &self.location {
            Location::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent).map_err(GoalsError::storage_init)?;
                }
                connection::open_db(path)
            }
            Location::Memory => connection::open_in_memory(),
        }
        .map_err(GoalsError::storage_init)?;
        migrations::run_migrations(&conn).map_err(GoalsError::storage_init)?;
        Ok(conn)
    }
}

impl GoalStore for SqliteGoalStore {
    fn initialize(&mut self) -> Result<()> {
        if let Some(conn) = &self.conn {
            return migrations::run_migrations(conn).map_err(GoalsError::storage_init);
        }
        let conn = self.connect().inspect_err(|e| error!(error = %e, "goal storage init failed"))?;
        self.conn = Some(conn);
        info!(location = ?self.location, "goal storage initialized");
        Ok(())
    }

    fn get_all(&self) -> Result<Vec<Goal>> {
        let conn = self
            .conn()
            .ok_or_else(|| GoalsError::storage_read("storage is not open"))?;
        let goals = goal_repo::list_goals(conn).map_err(GoalsError::storage_read)?;
        debug!(count = goals.len(), "loaded goals");
        Ok(goals)
    }

    fn save(&mut self, goal: &Goal) -> Result<Goal> {
        let conn = self
            .conn()
            .ok_or_else(|| GoalsError::storage_write("storage is not open"))?;
        match goal.id {
            Some(id) => {
                let changed = goal_repo::update_goal(conn, id, goal).map_err(GoalsError::storage_write)?;
                if changed == 0 {
                    warn!(id, "updated goal has no stored row");
                }
                debug!(id, "updated goal");
                Ok(goal.clone())
            }
            None => {
                let id = goal_repo::insert_goal(conn, goal).map_err(GoalsError::storage_write)?;
                debug!(id, "inserted goal");
                Ok(goal.clone().with_id(id))
            }
        }
    }

    fn delete(&mut self, id: GoalId) -> Result<()> {
        let conn = self
            .conn()
            .ok_or_else(|| GoalsError::storage_write("storage is not open"))?;
        let removed = goal_repo::delete_goal(conn, id).map_err(GoalsError::storage_write)?;
        debug!(id, removed, "deleted goal");
        Ok(())
    }

    fn close(&mut self) {
        if self.conn.take().is_some() {
            debug!("goal storage closed");
        }
    }
}
