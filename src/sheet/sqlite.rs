//! SQLite sheet
//!
//! Stores each worksheet as rows of `sheet_rows`, one JSON array of cells per
//! row. `position` is the 1-based sheet row and is kept contiguous.

use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::{ResourceError, ResourceResult, SheetResource};
use crate::db::Database;

/// A named worksheet inside the registry database
#[derive(Clone)]
pub struct SqliteSheet {
    database: Database,
    sheet: String,
}

impl SqliteSheet {
    pub fn new(database: Database, sheet: impl Into<String>) -> Self {
        Self {
            database,
            sheet: sheet.into(),
        }
    }

    /// Number of rows currently in the sheet (header included)
    pub fn row_count(&self) -> ResourceResult<usize> {
        let count = self.database.with_conn(|conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM sheet_rows WHERE sheet = ?1",
                [&self.sheet],
                |row| row.get(0),
            )?;
            Ok(count)
        })?;
        Ok(count as usize)
    }
}

impl SheetResource for SqliteSheet {
    fn name(&self) -> &str {
        &self.sheet
    }

    fn read_all_rows(&self) -> ResourceResult<Vec<Vec<String>>> {
        let encoded = self.database.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT cells FROM sheet_rows WHERE sheet = ?1 ORDER BY position",
            )?;
            let rows = stmt
                .query_map([&self.sheet], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })?;

        let rows = encoded
            .iter()
            .map(|cells| serde_json::from_str::<Vec<String>>(cells))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(sheet = %self.sheet, rows = rows.len(), "read sheet");
        Ok(rows)
    }

    fn append_row(&self, values: &[String]) -> ResourceResult<()> {
        let cells = serde_json::to_string(values)?;
        self.database.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO sheet_rows (sheet, position, cells)
                VALUES (
                    ?1,
                    (SELECT COALESCE(MAX(position), 0) + 1 FROM sheet_rows WHERE sheet = ?1),
                    ?2
                )
                "#,
                params![self.sheet, cells],
            )?;
            Ok(())
        })?;

        debug!(sheet = %self.sheet, cells = values.len(), "appended row");
        Ok(())
    }

    fn delete_row(&self, row_index: usize) -> ResourceResult<()> {
        let position = row_index as i64;

        // None when deleted, Some(row count) when the index was out of range
        let out_of_range = self.database.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let rows: i64 = tx.query_row(
                "SELECT COUNT(*) FROM sheet_rows WHERE sheet = ?1",
                [&self.sheet],
                |row| row.get(0),
            )?;
            if position < 1 || position > rows {
                return Ok(Some(rows as usize));
            }

            tx.execute(
                "DELETE FROM sheet_rows WHERE sheet = ?1 AND position = ?2",
                params![self.sheet, position],
            )?;
            tx.execute(
                r#"
                UPDATE sheet_rows
                SET position = position - 1, updated_at = datetime('now')
                WHERE sheet = ?1 AND position > ?2
                "#,
                params![self.sheet, position],
            )?;
            tx.commit()?;
            Ok(None)
        })?;

        match out_of_range {
            Some(rows) => Err(ResourceError::RowOutOfRange {
                row: row_index,
                rows,
            }),
            None => {
                debug!(sheet = %self.sheet, row = row_index, "deleted row");
                Ok(())
            }
        }
    }

    fn find_first_cell_matching(&self, value: &str) -> ResourceResult<Option<usize>> {
        let position = self.database.with_conn(|conn| {
            let position: Option<i64> = conn
                .query_row(
                    r#"
                    SELECT r.position
                    FROM sheet_rows r, json_each(r.cells) c
                    WHERE r.sheet = ?1 AND c.value = ?2
                    ORDER BY r.position, c.key
                    LIMIT 1
                    "#,
                    params![self.sheet, value],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(position)
        })?;

        Ok(position.map(|p| p as usize))
    }

    fn update_header_row(&self, values: &[String]) -> ResourceResult<()> {
        let cells = serde_json::to_string(values)?;
        self.database.with_conn(|conn| {
            let updated = conn.execute(
                r#"
                UPDATE sheet_rows SET cells = ?2, updated_at = datetime('now')
                WHERE sheet = ?1 AND position = 1
                "#,
                params![self.sheet, cells],
            )?;
            if updated == 0 {
                conn.execute(
                    "INSERT INTO sheet_rows (sheet, position, cells) VALUES (?1, 1, ?2)",
                    params![self.sheet, cells],
                )?;
            }
            Ok(())
        })?;

        debug!(sheet = %self.sheet, cells = values.len(), "updated header row");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn database() -> Database {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| run_migrations(conn)).unwrap();
        db
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_append_and_read_in_order() {
        let sheet = SqliteSheet::new(database(), "patients");
        assert!(sheet.read_all_rows().unwrap().is_empty());

        sheet.append_row(&row(&["Dosya Numarası", "Boy"])).unwrap();
        sheet.append_row(&row(&["123", "170"])).unwrap();
        sheet.append_row(&row(&["456"])).unwrap();

        assert_eq!(
            sheet.read_all_rows().unwrap(),
            vec![row(&["Dosya Numarası", "Boy"]), row(&["123", "170"]), row(&["456"])]
        );
        assert_eq!(sheet.row_count().unwrap(), 3);
    }

    #[test]
    fn test_delete_shifts_later_rows() {
        let sheet = SqliteSheet::new(database(), "patients");
        for cell in ["K", "a", "b", "c"] {
            sheet.append_row(&row(&[cell])).unwrap();
        }

        sheet.delete_row(2).unwrap();
        assert_eq!(
            sheet.read_all_rows().unwrap(),
            vec![row(&["K"]), row(&["b"]), row(&["c"])]
        );

        // Positions stay contiguous, so the next append lands at the end
        sheet.append_row(&row(&["d"])).unwrap();
        assert_eq!(sheet.find_first_cell_matching("d").unwrap(), Some(4));

        assert!(matches!(
            sheet.delete_row(9),
            Err(ResourceError::RowOutOfRange { row: 9, rows: 4 })
        ));
    }

    #[test]
    fn test_find_first_cell_matching() {
        let sheet = SqliteSheet::new(database(), "patients");
        sheet.append_row(&row(&["A", "B"])).unwrap();
        sheet.append_row(&row(&["x", "123"])).unwrap();
        sheet.append_row(&row(&["123", "y"])).unwrap();

        assert_eq!(sheet.find_first_cell_matching("123").unwrap(), Some(2));
        assert_eq!(sheet.find_first_cell_matching("B").unwrap(), Some(1));
        assert_eq!(sheet.find_first_cell_matching("12").unwrap(), None);
    }

    #[test]
    fn test_update_header_row() {
        let sheet = SqliteSheet::new(database(), "patients");
        sheet.update_header_row(&row(&["A"])).unwrap();
        sheet.append_row(&row(&["1"])).unwrap();
        sheet.update_header_row(&row(&["A", "B"])).unwrap();

        assert_eq!(
            sheet.read_all_rows().unwrap(),
            vec![row(&["A", "B"]), row(&["1"])]
        );
    }

    #[test]
    fn test_sheets_are_isolated() {
        let db = database();
        let patients = SqliteSheet::new(db.clone(), "patients");
        let notes = SqliteSheet::new(db, "notes");

        patients.append_row(&row(&["P"])).unwrap();
        notes.append_row(&row(&["N"])).unwrap();
        notes.append_row(&row(&["n1"])).unwrap();

        patients.delete_row(1).unwrap();
        assert!(patients.read_all_rows().unwrap().is_empty());
        assert_eq!(notes.read_all_rows().unwrap().len(), 2);
        assert_eq!(notes.find_first_cell_matching("P").unwrap(), None);
    }
}
