use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection};
use tracing::warn;

use crate::models::{Goal, GoalId, GoalKind, GoalType};

/// Flat column values for the `goals` table. The inactive variant's columns are NULL.
struct GoalColumns<'a> {
    name: &'a str,
    goal_type: &'static str,
    progress: Option<i64>,
    start_date: Option<String>,
    end_date: Option<String>,
}

impl<'a> GoalColumns<'a> {
    fn from_goal(goal: &'a Goal) -> Self {
        let (progress, start_date, end_date) = match &goal.kind {
            GoalKind::Percentage { progress } => (Some(*progress), None, None),
            GoalKind::Timeframe { start_date, end_date } => {
                (None, start_date.map(format_date), end_date.map(format_date))
            }
        };
        Self {
            name: &goal.name,
            goal_type: goal.goal_type().as_str(),
            progress,
            start_date,
            end_date,
        }
    }
}

/// ISO-8601 in UTC with millisecond precision, e.g. `2024-01-01T00:00:00.000Z`.
pub fn format_date(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .ok()
}

pub fn list_goals(conn: &Connection) -> rusqlite::Result<Vec<Goal>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, type, progress, startDate, endDate FROM goals ORDER BY id ASC",
    )?;
    let goals = stmt
        .query_map([], row_to_goal)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(goals)
}

pub fn get_goal(conn: &Connection, id: GoalId) -> rusqlite::Result<Option<Goal>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, type, progress, startDate, endDate FROM goals WHERE id = ?1",
    )?;
    let mut rows = stmt.query(params![id])?;
    match rows.next()? {
        Some(row) => Ok(Some(row_to_goal(row)?)),
        None => Ok(None),
    }
}

pub fn insert_goal(conn: &Connection, goal: &Goal) -> rusqlite::Result<GoalId> {
    let cols = GoalColumns::from_goal(goal);
    conn.execute(
        "INSERT INTO goals (name, type, progress, startDate, endDate) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![cols.name, cols.goal_type, cols.progress, cols.start_date, cols.end_date],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Replace every mutable column of the row keyed by `id`. Returns rows changed.
pub fn update_goal(conn: &Connection, id: GoalId, goal: &Goal) -> rusqlite::Result<usize> {
    let cols = GoalColumns::from_goal(goal);
    conn.execute(
        "UPDATE goals SET name = ?1, type = ?2, progress = ?3, startDate = ?4, endDate = ?5
         WHERE id = ?6",
        params![cols.name, cols.goal_type, cols.progress, cols.start_date, cols.end_date, id],
    )
}

/// Returns rows removed; zero for an unknown id.
pub fn delete_goal(conn: &Connection, id: GoalId) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM goals WHERE id = ?1", params![id])
}

fn row_to_goal(row: &rusqlite::Row) -> rusqlite::Result<Goal> {
    let id: GoalId = row.get(0)?;
    let raw_type: String = row.get(2)?;
    let goal_type = GoalType::from_str(&raw_type).unwrap_or_else(|| {
        warn!(id, goal_type = %raw_type, "unknown goal type, reading as percentage");
        GoalType::Percentage
    });

    let kind = match goal_type {
        GoalType::Percentage => GoalKind::Percentage {
            progress: row.get::<_, Option<i64>>(3)?.unwrap_or(0),
        },
        GoalType::Timeframe => GoalKind::Timeframe {
            start_date: date_column(row, 4, id)?,
            end_date: date_column(row, 5, id)?,
        },
    };

    Ok(Goal {
        id: Some(id),
        name: row.get(1)?,
        kind,
    })
}

fn date_column(row: &rusqlite::Row, idx: usize, id: GoalId) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(idx)?;
    Ok(raw.and_then(|s| {
        let parsed = parse_date(&s);
        if parsed.is_none() {
            warn!(id, value = %s, "unparseable goal date, treating as unset");
        }
        parsed
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use chrono::TimeZone;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn percentage(name: &str, progress: i64) -> Goal {
        Goal { id: None, name: name.into(), kind: GoalKind::Percentage { progress } }
    }

    #[test]
    fn test_date_format() {
        let d = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 6).unwrap();
        assert_eq!(format_date(d), "2024-03-09T14:05:06.000Z");
        assert_eq!(parse_date("2024-03-09T14:05:06.000Z"), Some(d));
        assert_eq!(parse_date("2024-03-09T16:05:06+02:00"), Some(d));
        assert_eq!(parse_date("March 9th"), None);
    }

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let conn = conn();
        let a = insert_goal(&conn, &percentage("a", 1)).unwrap();
        let b = insert_goal(&conn, &percentage("b", 2)).unwrap();
        assert!(b > a);

        let names: Vec<_> = list_goals(&conn).unwrap().into_iter().map(|g| g.name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_timeframe_writes_null_progress() {
        let conn = conn();
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let goal = Goal {
            id: None,
            name: "t".into(),
            kind: GoalKind::Timeframe { start_date: Some(start), end_date: None },
        };
        let id = insert_goal(&conn, &goal).unwrap();

        let (progress, start_raw, end_raw): (Option<i64>, Option<String>, Option<String>) = conn
            .query_row(
                "SELECT progress, startDate, endDate FROM goals WHERE id = ?1",
                params![id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();
        assert_eq!(progress, None);
        assert_eq!(start_raw.as_deref(), Some("2024-01-01T00:00:00.000Z"));
        assert_eq!(end_raw, None);
    }

    #[test]
    fn test_reads_ignore_stale_columns() {
        let conn = conn();
        conn.execute(
            "INSERT INTO goals (name, type, progress, startDate, endDate)
             VALUES ('p', 'percentage', NULL, '2024-01-01T00:00:00.000Z', 'garbage')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO goals (name, type, progress, startDate, endDate)
             VALUES ('t', 'timeframe', 70, '2024-01-01T00:00:00.000Z', 'garbage')",
            [],
        )
        .unwrap();

        let goals = list_goals(&conn).unwrap();
        assert_eq!(goals[0].kind, GoalKind::Percentage { progress: 0 });
        assert_eq!(
            goals[1].kind,
            GoalKind::Timeframe {
                start_date: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
                end_date: None,
            }
        );
    }

    #[test]
    fn test_update_and_delete_report_rows() {
        let conn = conn();
        let id = insert_goal(&conn, &percentage("a", 1)).unwrap();
        assert_eq!(update_goal(&conn, id, &percentage("b", 9)).unwrap(), 1);
        assert_eq!(get_goal(&conn, id).unwrap().unwrap().name, "b");

        assert_eq!(update_goal(&conn, id + 100, &percentage("c", 9)).unwrap(), 0);
        assert_eq!(delete_goal(&conn, id + 100).unwrap(), 0);
        assert_eq!(delete_goal(&conn, id).unwrap(), 1);
        assert!(get_goal(&conn, id).unwrap().is_none());
    }
}
