use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS goals (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            type TEXT NOT NULL
                CHECK (type IN ('percentage', 'timeframe')),
            progress INTEGER,
            startDate TEXT,
            endDate TEXT
        );
        ",
    )?;
    add_missing_column(conn, "goals", "startDate", "TEXT")
}

/// Tables created by early builds lack columns added since.
fn add_missing_column(conn: &Connection, table: &str, column: &str, decl: &str) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;
    if !columns.iter().any(|c| c == column) {
        conn.execute_batch(&format!("ALTER TABLE {table} ADD COLUMN {column} {decl};"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn.execute("INSERT INTO goals (name, type, progress) VALUES ('a', 'percentage', 3)", [])
            .unwrap();
        run_migrations(&conn).unwrap();

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM goals", [], |row| row.get(0)).unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_adds_start_date_to_legacy_table() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE goals (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                type TEXT NOT NULL,
                progress INTEGER,
                endDate TEXT
            );",
        )
        .unwrap();
        run_migrations(&conn).unwrap();

        conn.execute(
            "INSERT INTO goals (name, type, startDate) VALUES ('a', 'timeframe', '2024-01-01T00:00:00.000Z')",
            [],
        )
        .unwrap();
    }

    #[test]
    fn test_type_check_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let result = conn.execute("INSERT INTO goals (name, type) VALUES ('a', 'weekly')", []);
        assert!(result.is_err());
    }
}
