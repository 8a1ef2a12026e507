//! Open/close lifecycle for one database connection.

use std::ffi::{CStr, CString};
use std::fmt;
use std::os::raw::c_int;
use std::ptr;

use libsqlite3_sys as ffi;

use crate::error::SqliteBridgeError;
use crate::finalize::FinalizeBridge;
use crate::handle::DbHandle;
use crate::statement::Statement;

/// How long the engine retries lock contention before reporting `Busy`.
const BUSY_TIMEOUT_MS: c_int = 100;

/// One open database.
///
/// Explicit [`close`](Connection::close) is the expected path; dropping the
/// connection performs the same close with failures logged rather than
/// surfaced, since nothing can observe them at that point.
pub struct Connection {
    db: DbHandle,
    bridge: FinalizeBridge,
}

impl Connection {
    /// Open or create the database file at `path` (`":memory:"` for an
    /// ephemeral database).
    ///
    /// # Errors
    ///
    /// Returns [`SqliteBridgeError::Open`] with the engine's error text if the
    /// database cannot be opened.
    pub fn open(path: &str) -> Result<Self, SqliteBridgeError> {
        let cpath = CString::new(path)
            .map_err(|_| SqliteBridgeError::Open("path contains an interior NUL byte".into()))?;
        let mut db = ptr::null_mut();
        let rc = unsafe { ffi::sqlite3_open(cpath.as_ptr(), &mut db) };
        if rc != ffi::SQLITE_OK {
            // The engine hands back a half-open handle carrying the error
            // text; release it before returning.
            let message = DbHandle::new(db).error_message();
            if !db.is_null() {
                unsafe { ffi::sqlite3_close(db) };
            }
            return Err(SqliteBridgeError::Open(message));
        }
        unsafe { ffi::sqlite3_busy_timeout(db, BUSY_TIMEOUT_MS) };
        Ok(Self {
            db: DbHandle::new(db),
            bridge: FinalizeBridge::default(),
        })
    }

    /// Compile `sql` into a [`Statement`].
    ///
    /// # Errors
    ///
    /// Returns [`SqliteBridgeError::Syntax`] carrying the offending SQL text
    /// if the engine rejects it.
    pub fn prepare(&self, sql: &str) -> Result<Statement, SqliteBridgeError> {
        Statement::prepare(self.db, &self.bridge, sql)
    }

    /// Release the connection, force-finalizing any statements still prepared
    /// on it.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteBridgeError::Close`] if the engine refuses to close;
    /// with the sweep above being exhaustive this indicates an invariant
    /// violation rather than an expected failure.
    pub fn close(mut self) -> Result<(), SqliteBridgeError> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<(), SqliteBridgeError> {
        let db = self.db;
        if db.is_null() {
            return Ok(());
        }
        // Slots must go inert before the database pointer is released, so no
        // outstanding statement proxy can touch a closed database.
        let mut leaked = 0usize;
        loop {
            let stmt = unsafe { ffi::sqlite3_next_stmt(db.as_ptr(), ptr::null_mut()) };
            if stmt.is_null() {
                break;
            }
            self.bridge.disarm(stmt as usize);
            unsafe { ffi::sqlite3_finalize(stmt) };
            leaked += 1;
        }
        if leaked > 0 {
            tracing::warn!(count = leaked, "closing database with statements still open");
        }
        let rc = unsafe { ffi::sqlite3_close(db.as_ptr()) };
        if rc != ffi::SQLITE_OK {
            return Err(SqliteBridgeError::Close(db.error_message()));
        }
        self.db = DbHandle::null();
        Ok(())
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if let Err(err) = self.shutdown() {
            tracing::debug!(error = %err, "close during drop reported an error");
        }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection").field("db", &self.db).finish()
    }
}

/// The embedded engine's version string.
#[must_use]
pub fn version() -> String {
    unsafe { CStr::from_ptr(ffi::sqlite3_libversion()) }
        .to_string_lossy()
        .into_owned()
}
