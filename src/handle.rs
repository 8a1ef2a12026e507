//! Opaque tokens for engine-owned resources.
//!
//! Raw engine pointers are materialized here and nowhere else; the rest of the
//! crate passes these address-sized tokens around and never dereferences them
//! in host code.

use std::ffi::CStr;
use std::fmt;

use libsqlite3_sys as ffi;

/// Token for an open database.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) struct DbHandle(*mut ffi::sqlite3);

impl DbHandle {
    pub(crate) fn new(db: *mut ffi::sqlite3) -> Self {
        Self(db)
    }

    pub(crate) fn null() -> Self {
        Self(std::ptr::null_mut())
    }

    pub(crate) fn as_ptr(self) -> *mut ffi::sqlite3 {
        self.0
    }

    pub(crate) fn is_null(self) -> bool {
        self.0.is_null()
    }

    /// Engine error text for the most recent failed call on this database.
    pub(crate) fn error_message(self) -> String {
        if self.0.is_null() {
            return "out of memory".to_owned();
        }
        unsafe { CStr::from_ptr(ffi::sqlite3_errmsg(self.0)) }
            .to_string_lossy()
            .into_owned()
    }

    /// Rows changed by the most recent row-mutating statement on this database.
    pub(crate) fn changes(self) -> i64 {
        i64::from(unsafe { ffi::sqlite3_changes(self.0) })
    }
}

impl fmt::Debug for DbHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DbHandle({:#x})", self.0 as usize)
    }
}

/// Token for a prepared statement.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) struct StmtHandle(*mut ffi::sqlite3_stmt);

impl StmtHandle {
    pub(crate) fn new(stmt: *mut ffi::sqlite3_stmt) -> Self {
        Self(stmt)
    }

    pub(crate) fn as_ptr(self) -> *mut ffi::sqlite3_stmt {
        self.0
    }

    /// Stable address used to key the finalization registry.
    pub(crate) fn addr(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for StmtHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StmtHandle({:#x})", self.0 as usize)
    }
}
