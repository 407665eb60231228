use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::Connection;

pub const DATA_DIR_ENV: &str = "GOALDOTS_DIR";
const DB_FILE: &str = "goals.db";
const SETTINGS_FILE: &str = "settings.json";

/// Directory holding the goal database and the settings file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Explicit path → `GOALDOTS_DIR` → platform data directory → `./.goaldots`.
    pub fn resolve(explicit: Option<&Path>) -> Self {
        if let Some(path) = explicit {
            return Self::new(path);
        }
        if let Some(path) = env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            return Self::new(path);
        }
        match dirs::data_dir() {
            Some(dir) => Self::new(dir.join("goaldots")),
            None => Self::new(".goaldots"),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn db_path(&self) -> PathBuf {
        self.root.join(DB_FILE)
    }

    pub fn settings_path(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE)
    }

    pub fn ensure_exists(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.root)
    }
}

/// Open (creating if needed) the database file and apply connection pragmas.
pub fn open_db(path: &Path) -> rusqlite::Result<Connection> {
    let conn = Connection::open(path)?;
    configure_connection(&conn)?;
    Ok(conn)
}

pub fn open_in_memory() -> rusqlite::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure_connection(&conn)?;
    Ok(conn)
}

fn configure_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA busy_timeout=5000;",
    )
}
