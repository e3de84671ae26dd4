//! SQL query helper (test harness)
//!
//! Scoped acquisition over a rusqlite connection: opened on construction,
//! released when the helper is dropped. Query results come back as ordered
//! value lists or column-name-keyed maps; the single-row accessors take the
//! first row and ignore the rest.

use std::collections::HashMap;
use std::path::Path;

use rusqlite::types::Value;
use rusqlite::Connection;
use thiserror::Error;
use tracing::debug;

/// Database helper errors
#[derive(Error, Debug)]
pub enum DbError {
    #[error("database error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("query returned no rows")]
    Empty,

    #[error("column {0} not present in result row")]
    ColumnMissing(usize),
}

/// A scoped database connection.
pub struct DbConnection {
    conn: Connection,
}

impl DbConnection {
    /// Open a connection to the database file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        debug!("Opened database connection to {}", path.display());
        Ok(Self { conn })
    }

    /// Open a throwaway in-memory database.
    pub fn open_in_memory() -> Result<Self, DbError> {
        Ok(Self { conn: Connection::open_in_memory()? })
    }

    /// Execute a statement, returning the number of affected rows.
    pub fn execute(&self, sql: &str) -> Result<usize, DbError> {
        Ok(self.conn.execute(sql, [])?)
    }

    /// All result rows, each row an ordered list of column values.
    pub fn query_rows(&self, sql: &str) -> Result<Vec<Vec<Value>>, DbError> {
        let mut stmt = self.conn.prepare(sql)?;
        let column_count = stmt.column_count();

        let rows = stmt.query_map([], |row| {
            (0..column_count).map(|i| row.get::<_, Value>(i)).collect()
        })?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// All result rows, each row a map keyed by column name.
    pub fn query_maps(&self, sql: &str) -> Result<Vec<HashMap<String, Value>>, DbError> {
        let mut stmt = self.conn.prepare(sql)?;
        let names: Vec<String> = stmt.column_names().iter().map(|n| n.to_string()).collect();

        let rows = stmt.query_map([], |row| {
            let mut map = HashMap::with_capacity(names.len());
            for (i, name) in names.iter().enumerate() {
                map.insert(name.clone(), row.get::<_, Value>(i)?);
            }
            Ok(map)
        })?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// First result row as an ordered value list; further rows are ignored.
    pub fn row_list(&self, sql: &str) -> Result<Vec<Value>, DbError> {
        self.query_rows(sql)?.into_iter().next().ok_or(DbError::Empty)
    }

    /// First result row keyed by column name; further rows are ignored.
    pub fn row_map(&self, sql: &str) -> Result<HashMap<String, Value>, DbError> {
        self.query_maps(sql)?.into_iter().next().ok_or(DbError::Empty)
    }

    /// One cell from the first result row; everything else is ignored.
    pub fn cell_value(&self, sql: &str, column: usize) -> Result<Value, DbError> {
        let row = self.row_list(sql)?;
        row.get(column).cloned().ok_or(DbError::ColumnMissing(column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> DbConnection {
        let db = DbConnection::open_in_memory().unwrap();
        db.execute("CREATE TABLE books (id INTEGER PRIMARY KEY, name TEXT)").unwrap();
        db.execute("INSERT INTO books (id, name) VALUES (1, 'Harry Potter')").unwrap();
        db.execute("INSERT INTO books (id, name) VALUES (2, 'Lord of the Rings')").unwrap();
        db
    }

    #[test]
    fn query_rows_preserves_column_order() {
        let db = seeded();
        let rows = db.query_rows("SELECT id, name FROM books ORDER BY id").unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], Value::Integer(1));
        assert_eq!(rows[0][1], Value::Text("Harry Potter".to_string()));
    }

    #[test]
    fn query_maps_keys_by_column_name() {
        let db = seeded();
        let maps = db.query_maps("SELECT id, name FROM books ORDER BY id").unwrap();

        assert_eq!(maps[1]["id"], Value::Integer(2));
        assert_eq!(maps[1]["name"], Value::Text("Lord of the Rings".to_string()));
    }

    #[test]
    fn single_row_accessors_take_the_first_row_only() {
        let db = seeded();

        let row = db.row_list("SELECT id, name FROM books ORDER BY id DESC").unwrap();
        assert_eq!(row[0], Value::Integer(2));

        let map = db.row_map("SELECT id, name FROM books ORDER BY id").unwrap();
        assert_eq!(map["id"], Value::Integer(1));

        let cell = db.cell_value("SELECT name FROM books ORDER BY id", 0).unwrap();
        assert_eq!(cell, Value::Text("Harry Potter".to_string()));
    }

    #[test]
    fn empty_result_and_bad_column_are_typed_errors() {
        let db = seeded();

        assert!(matches!(
            db.row_list("SELECT * FROM books WHERE id = 99"),
            Err(DbError::Empty)
        ));
        assert!(matches!(
            db.cell_value("SELECT id FROM books", 5),
            Err(DbError::ColumnMissing(5))
        ));
    }

    #[test]
    fn bad_sql_surfaces_the_underlying_error() {
        let db = seeded();
        assert!(matches!(
            db.query_rows("SELECT * FROM missing_table"),
            Err(DbError::Sql(_))
        ));
    }
}
