use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::Connection;
use std::path::Path;

use crate::models::Draw;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    official_draw_id  TEXT,
    day               TEXT,
    date              TEXT NOT NULL UNIQUE,
    number_1          INTEGER NOT NULL,
    number_2          INTEGER NOT NULL,
    number_3          INTEGER NOT NULL,
    number_4          INTEGER NOT NULL,
    number_5          INTEGER NOT NULL,
    lucky             INTEGER NOT NULL
);
";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("loto.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Impossible d'ouvrir la base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Échec de la migration")?;
    Ok(())
}

pub fn insert_draw(conn: &Connection, draw: &Draw) -> Result<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO draws (official_draw_id, day, date, number_1, number_2, number_3, number_4, number_5, lucky)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        rusqlite::params![
            draw.official_draw_id,
            draw.day,
            draw.date.format("%Y-%m-%d").to_string(),
            draw.numbers[0],
            draw.numbers[1],
            draw.numbers[2],
            draw.numbers[3],
            draw.numbers[4],
            draw.lucky,
        ],
    ).context("Échec de l'insertion")?;
    Ok(changed > 0)
}

fn row_to_draw(row: &rusqlite::Row<'_>) -> rusqlite::Result<Draw> {
    let date_str: String = row.get(3)?;
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Draw {
        id: row.get(0)?,
        official_draw_id: row.get(1)?,
        day: row.get(2)?,
        date,
        numbers: [
            row.get::<_, u8>(4)?,
            row.get::<_, u8>(5)?,
            row.get::<_, u8>(6)?,
            row.get::<_, u8>(7)?,
            row.get::<_, u8>(8)?,
        ],
        lucky: row.get(9)?,
    })
}

const SELECT_COLUMNS: &str =
    "id, official_draw_id, day, date, number_1, number_2, number_3, number_4, number_5, lucky";

/// Instantané complet de l'historique, ordonné par date croissante.
pub fn fetch_all_draws(conn: &Connection) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SELECT_COLUMNS} FROM draws ORDER BY date ASC, id ASC"
    ))?;
    let draws = stmt
        .query_map([], row_to_draw)?
        .collect::<Result<Vec<_>, _>>()
        .context("Échec de la lecture de l'historique")?;
    Ok(draws)
}

pub fn fetch_last_draws(conn: &Connection, limit: u32) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SELECT_COLUMNS} FROM draws ORDER BY date DESC, id DESC LIMIT ?1"
    ))?;
    let draws = stmt
        .query_map([limit], row_to_draw)?
        .collect::<Result<Vec<_>, _>>()
        .context("Échec de la lecture des derniers tirages")?;
    Ok(draws)
}

pub fn count_draws(conn: &Connection) -> Result<u32> {
    let count: u32 = conn.query_row("SELECT COUNT(*) FROM draws", [], |row| row.get(0))?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_draw(official_id: &str, date: &str) -> Draw {
        Draw {
            id: 0,
            official_draw_id: Some(official_id.to_string()),
            day: Some("SAMEDI".to_string()),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            numbers: [1, 2, 3, 4, 5],
            lucky: 7,
        }
    }

    #[test]
    fn test_insert_and_count() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert_eq!(count_draws(&conn).unwrap(), 0);

        insert_draw(&conn, &test_draw("2024001", "2024-01-01")).unwrap();
        assert_eq!(count_draws(&conn).unwrap(), 1);
    }

    #[test]
    fn test_duplicate_date_ignored() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        let inserted = insert_draw(&conn, &test_draw("2024001", "2024-01-01")).unwrap();
        assert!(inserted);
        let inserted = insert_draw(&conn, &test_draw("2024001", "2024-01-01")).unwrap();
        assert!(!inserted);
        assert_eq!(count_draws(&conn).unwrap(), 1);
    }

    #[test]
    fn test_fetch_all_ascending() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        insert_draw(&conn, &test_draw("2024002", "2024-01-05")).unwrap();
        insert_draw(&conn, &test_draw("2024001", "2024-01-01")).unwrap();
        insert_draw(&conn, &test_draw("2024003", "2024-01-03")).unwrap();

        let draws = fetch_all_draws(&conn).unwrap();
        assert_eq!(draws.len(), 3);
        assert_eq!(draws[0].date.to_string(), "2024-01-01");
        assert_eq!(draws[1].date.to_string(), "2024-01-03");
        assert_eq!(draws[2].date.to_string(), "2024-01-05");
    }

    #[test]
    fn test_fetch_last_descending() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        insert_draw(&conn, &test_draw("2024001", "2024-01-01")).unwrap();
        insert_draw(&conn, &test_draw("2024002", "2024-01-05")).unwrap();

        let draws = fetch_last_draws(&conn, 1).unwrap();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].date.to_string(), "2024-01-05");
    }

    #[test]
    fn test_roundtrip_fields() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        let draw = Draw {
            id: 0,
            official_draw_id: None,
            day: None,
            date: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
            numbers: [7, 13, 22, 38, 49],
            lucky: 10,
        };
        insert_draw(&conn, &draw).unwrap();

        let draws = fetch_all_draws(&conn).unwrap();
        assert_eq!(draws[0].official_draw_id, None);
        assert_eq!(draws[0].day, None);
        assert_eq!(draws[0].numbers, [7, 13, 22, 38, 49]);
        assert_eq!(draws[0].lucky, 10);
    }
}
