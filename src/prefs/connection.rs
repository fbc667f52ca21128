use rusqlite::Connection;
use std::cell::RefCell;
use std::fs;

use crate::errors::ServerError;

// Thread-local connection slot.
thread_local! {
    static PREFS_CONN: RefCell<Option<Connection>> = const { RefCell::new(None) };
}

/// Handle to the local preferences SQLite file. Cheap to clone (path
/// only); each server thread opens its own connection on first use.
#[derive(Clone)]
pub struct PrefsDb {
    path: String,
}

impl PrefsDb {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Provides a connection to the closure.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, ServerError>
    where
        F: FnOnce(&Connection) -> Result<T, ServerError>,
    {
        let inner_result = PREFS_CONN
            .try_with(|cell| {
                let mut slot = cell.borrow_mut();
                if slot.is_none() {
                    let conn = Connection::open(&self.path)
                        .map_err(|e| ServerError::PrefsError(format!("Open DB failed: {e}")))?;
                    *slot = Some(conn);
                }
                let conn = slot.as_ref().unwrap();
                f(conn)
            })
            .map_err(|_| ServerError::InternalError)?;
        inner_result
    }
}

/// Initialize the preferences database from a SQL schema file.
pub fn init_db(db: &PrefsDb, schema_path: &str) -> Result<(), ServerError> {
    let schema_sql = fs::read_to_string(schema_path)
        .map_err(|e| ServerError::PrefsError(format!("Failed to read schema file: {e}")))?;

    db.with_conn(|conn| {
        conn.execute_batch(&schema_sql)
            .map_err(|e| ServerError::PrefsError(format!("Failed to apply schema: {e}")))?;
        Ok(())
    })?;

    println!("✅ Preferences database initialized from {}", schema_path);
    Ok(())
}
