//! Conversions between [`Value`] and native typed parameters and columns.
//!
//! Everything crossing the boundary is copied: parameters are bound with
//! `SQLITE_TRANSIENT` so the engine takes its own copy, and column text/blob
//! contents are copied out into owned buffers before the next step can
//! invalidate them.

use std::ffi::CStr;
use std::os::raw::c_int;

use libsqlite3_sys as ffi;

use crate::error::SqliteBridgeError;
use crate::handle::{DbHandle, StmtHandle};
use crate::types::Value;

/// Bind one value into a 1-based parameter slot.
pub(crate) fn bind_value(
    db: DbHandle,
    stmt: StmtHandle,
    slot: usize,
    value: &Value,
) -> Result<(), SqliteBridgeError> {
    let idx = slot as c_int;
    let rc = match value {
        Value::Integer(v) => unsafe { ffi::sqlite3_bind_int64(stmt.as_ptr(), idx, *v) },
        Value::Float(v) => unsafe { ffi::sqlite3_bind_double(stmt.as_ptr(), idx, *v) },
        Value::Null => unsafe { ffi::sqlite3_bind_null(stmt.as_ptr(), idx) },
        Value::Text(s) => {
            let len = declared_len(slot, s.len())?;
            unsafe {
                ffi::sqlite3_bind_text(
                    stmt.as_ptr(),
                    idx,
                    s.as_ptr().cast(),
                    len,
                    ffi::SQLITE_TRANSIENT(),
                )
            }
        }
        Value::Blob(b) if b.is_empty() => {
            // Zero-length binding: a null pointer would bind NULL instead of
            // an empty blob.
            unsafe { ffi::sqlite3_bind_zeroblob(stmt.as_ptr(), idx, 0) }
        }
        Value::Blob(b) => {
            let len = declared_len(slot, b.len())?;
            unsafe {
                ffi::sqlite3_bind_blob(
                    stmt.as_ptr(),
                    idx,
                    b.as_ptr().cast(),
                    len,
                    ffi::SQLITE_TRANSIENT(),
                )
            }
        }
        other => {
            return Err(SqliteBridgeError::InvalidParameterType {
                slot,
                kind: other.kind(),
            });
        }
    };
    if rc == ffi::SQLITE_OK {
        Ok(())
    } else {
        Err(SqliteBridgeError::Sql(db.error_message()))
    }
}

/// Decode one column of the current result row.
pub(crate) fn read_column(stmt: StmtHandle, column: usize) -> Result<Value, SqliteBridgeError> {
    let idx = column as c_int;
    match unsafe { ffi::sqlite3_column_type(stmt.as_ptr(), idx) } {
        ffi::SQLITE_INTEGER => Ok(Value::Integer(unsafe {
            ffi::sqlite3_column_int64(stmt.as_ptr(), idx)
        })),
        ffi::SQLITE_FLOAT => Ok(Value::Float(unsafe {
            ffi::sqlite3_column_double(stmt.as_ptr(), idx)
        })),
        ffi::SQLITE_TEXT => {
            // Fetch the pointer before the byte count; the engine may convert
            // in between otherwise.
            let ptr = unsafe { ffi::sqlite3_column_text(stmt.as_ptr(), idx) };
            let len = unsafe { ffi::sqlite3_column_bytes(stmt.as_ptr(), idx) } as usize;
            let bytes = if ptr.is_null() {
                &[][..]
            } else {
                unsafe { std::slice::from_raw_parts(ptr, len) }
            };
            Ok(Value::Text(String::from_utf8_lossy(bytes).into_owned()))
        }
        ffi::SQLITE_BLOB => {
            let ptr = unsafe { ffi::sqlite3_column_blob(stmt.as_ptr(), idx) };
            let len = unsafe { ffi::sqlite3_column_bytes(stmt.as_ptr(), idx) } as usize;
            let bytes = if ptr.is_null() {
                Vec::new()
            } else {
                unsafe { std::slice::from_raw_parts(ptr.cast::<u8>(), len) }.to_vec()
            };
            Ok(Value::Blob(bytes))
        }
        ffi::SQLITE_NULL => Ok(Value::Null),
        code => Err(SqliteBridgeError::UnknownColumnType { column, code }),
    }
}

/// Decode every column of the current row, in declared column order.
pub(crate) fn read_row(stmt: StmtHandle) -> Result<Vec<Value>, SqliteBridgeError> {
    let count = unsafe { ffi::sqlite3_column_count(stmt.as_ptr()) } as usize;
    (0..count).map(|column| read_column(stmt, column)).collect()
}

/// Ordered column names for the statement's result shape.
pub(crate) fn column_names(stmt: StmtHandle) -> Vec<String> {
    let count = unsafe { ffi::sqlite3_column_count(stmt.as_ptr()) } as usize;
    (0..count)
        .map(|i| {
            let ptr = unsafe { ffi::sqlite3_column_name(stmt.as_ptr(), i as c_int) };
            if ptr.is_null() {
                String::new()
            } else {
                unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
            }
        })
        .collect()
}

fn declared_len(slot: usize, len: usize) -> Result<c_int, SqliteBridgeError> {
    c_int::try_from(len).map_err(|_| SqliteBridgeError::BufferLengthMismatch { slot, len })
}
