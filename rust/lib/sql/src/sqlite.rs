use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use crate::error::SQLError;
use crate::traits::{Row, SQLStore, SQLTx, Value};

/// SqliteStore is a SQLStore implementation backed by rusqlite (bundled SQLite).
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a SQLite database at the given path.
    pub fn open(path: &Path) -> Result<Self, SQLError> {
        let conn = Connection::open(path)
            .map_err(|e| SQLError::Connection(e.to_string()))?;

        // Enable WAL mode for better concurrent read performance.
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(|e| SQLError::Connection(e.to_string()))?;

        tracing::debug!("opened sqlite database at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite database (useful for tests).
    pub fn open_in_memory() -> Result<Self, SQLError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| SQLError::Connection(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

/// Convert our Value enum to rusqlite's ToSql.
fn bind_params(params: &[Value]) -> Vec<Box<dyn rusqlite::types::ToSql + '_>> {
    params
        .iter()
        .map(|v| -> Box<dyn rusqlite::types::ToSql + '_> {
            match v {
                Value::Null => Box::new(rusqlite::types::Null),
                Value::Integer(i) => Box::new(*i),
                Value::Real(f) => Box::new(*f),
                Value::Text(s) => Box::new(s.as_str()),
                Value::Blob(b) => Box::new(b.as_slice()),
            }
        })
        .collect()
}

fn run_query(conn: &Connection, sql: &str, params: &[Value]) -> Result<Vec<Row>, SQLError> {
    let bound = bind_params(params);
    let param_refs: Vec<&dyn rusqlite::types::ToSql> =
        bound.iter().map(|b| b.as_ref()).collect();

    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| SQLError::Query(e.to_string()))?;

    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let rows = stmt
        .query_map(param_refs.as_slice(), |row| {
            let mut columns = Vec::new();
            for (i, name) in column_names.iter().enumerate() {
                let val = row_value_at(row, i);
                columns.push((name.clone(), val));
            }
            Ok(Row { columns })
        })
        .map_err(|e| SQLError::Query(e.to_string()))?;

    let mut result = Vec::new();
    for row in rows {
        result.push(row.map_err(|e| SQLError::Query(e.to_string()))?);
    }
    Ok(result)
}

fn run_exec(conn: &Connection, sql: &str, params: &[Value]) -> Result<u64, SQLError> {
    let bound = bind_params(params);
    let param_refs: Vec<&dyn rusqlite::types::ToSql> =
        bound.iter().map(|b| b.as_ref()).collect();

    let affected = conn
        .execute(sql, param_refs.as_slice())
        .map_err(|e| SQLError::Execution(e.to_string()))?;

    Ok(affected as u64)
}

impl SQLStore for SqliteStore {
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, SQLError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| SQLError::Query(e.to_string()))?;
        run_query(&conn, sql, params)
    }

    fn exec(&self, sql: &str, params: &[Value]) -> Result<u64, SQLError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| SQLError::Execution(e.to_string()))?;
        run_exec(&conn, sql, params)
    }

    fn with_tx(
        &self,
        f: &mut dyn FnMut(&mut dyn SQLTx) -> Result<(), SQLError>,
    ) -> Result<(), SQLError> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| SQLError::Transaction(e.to_string()))?;
        let tx = conn
            .transaction()
            .map_err(|e| SQLError::Transaction(e.to_string()))?;

        {
            let mut handle = TxHandle { tx: &tx };
            // Dropping the transaction without commit rolls it back.
            f(&mut handle)?;
        }

        tx.commit()
            .map_err(|e| SQLError::Transaction(e.to_string()))
    }
}

/// SQLTx handle over an open rusqlite transaction.
struct TxHandle<'a> {
    tx: &'a rusqlite::Transaction<'a>,
}

impl SQLTx for TxHandle<'_> {
    fn query(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Row>, SQLError> {
        run_query(self.tx, sql, params)
    }

    fn exec(&mut self, sql: &str, params: &[Value]) -> Result<u64, SQLError> {
        run_exec(self.tx, sql, params)
    }
}

/// Extract a Value from a rusqlite row at a given column index.
fn row_value_at(row: &rusqlite::Row, idx: usize) -> Value {
    // Try integer first, then real, then text, then blob, then null.
    if let Ok(i) = row.get::<_, i64>(idx) {
        return Value::Integer(i);
    }
    if let Ok(f) = row.get::<_, f64>(idx) {
        return Value::Real(f);
    }
    if let Ok(s) = row.get::<_, String>(idx) {
        return Value::Text(s);
    }
    if let Ok(b) = row.get::<_, Vec<u8>>(idx) {
        return Value::Blob(b);
    }
    Value::Null
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .exec(
                "CREATE TABLE items (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL, qty INTEGER NOT NULL)",
                &[],
            )
            .unwrap();
        store
    }

    #[test]
    fn test_exec_and_query() {
        let store = test_store();
        let affected = store
            .exec(
                "INSERT INTO items (name, qty) VALUES (?1, ?2)",
                &[Value::Text("widget".into()), Value::Integer(3)],
            )
            .unwrap();
        assert_eq!(affected, 1);

        let rows = store.query("SELECT id, name, qty FROM items", &[]).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get_str("name"), Some("widget"));
        assert_eq!(rows[0].get_i64("qty"), Some(3));
        assert_eq!(rows[0].get_i64("id"), Some(1));
    }

    #[test]
    fn test_insert_returning() {
        let store = test_store();
        let rows = store
            .query(
                "INSERT INTO items (name, qty) VALUES (?1, ?2) RETURNING id",
                &[Value::Text("bolt".into()), Value::Integer(1)],
            )
            .unwrap();
        assert_eq!(rows[0].get_i64("id"), Some(1));
    }

    #[test]
    fn test_with_tx_commits() {
        let store = test_store();
        store
            .with_tx(&mut |tx| {
                tx.exec(
                    "INSERT INTO items (name, qty) VALUES (?1, ?2)",
                    &[Value::Text("a".into()), Value::Integer(1)],
                )?;
                tx.exec(
                    "INSERT INTO items (name, qty) VALUES (?1, ?2)",
                    &[Value::Text("b".into()), Value::Integer(2)],
                )?;
                Ok(())
            })
            .unwrap();

        let rows = store.query("SELECT COUNT(*) AS cnt FROM items", &[]).unwrap();
        assert_eq!(rows[0].get_i64("cnt"), Some(2));
    }

    #[test]
    fn test_with_tx_rolls_back_on_error() {
        let store = test_store();
        let result = store.with_tx(&mut |tx| {
            tx.exec(
                "INSERT INTO items (name, qty) VALUES (?1, ?2)",
                &[Value::Text("a".into()), Value::Integer(1)],
            )?;
            Err(SQLError::Execution("boom".into()))
        });
        assert!(result.is_err());

        let rows = store.query("SELECT COUNT(*) AS cnt FROM items", &[]).unwrap();
        assert_eq!(rows[0].get_i64("cnt"), Some(0));
    }

    #[test]
    fn test_open_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.sqlite");
        let store = SqliteStore::open(&path).unwrap();
        store
            .exec("CREATE TABLE t (id INTEGER PRIMARY KEY)", &[])
            .unwrap();
        store.exec("INSERT INTO t (id) VALUES (7)", &[]).unwrap();
        drop(store);

        let reopened = SqliteStore::open(&path).unwrap();
        let rows = reopened.query("SELECT id FROM t", &[]).unwrap();
        assert_eq!(rows[0].get_i64("id"), Some(7));
    }

    #[test]
    fn test_real_round_trip() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .exec("CREATE TABLE p (price REAL NOT NULL)", &[])
            .unwrap();
        store
            .exec("INSERT INTO p (price) VALUES (?1)", &[Value::Real(9.99)])
            .unwrap();
        let rows = store.query("SELECT price FROM p", &[]).unwrap();
        assert_eq!(rows[0].get_f64("price"), Some(9.99));
    }
}
