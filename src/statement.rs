//! Prepare/bind/step/reset/finalize lifecycle for one statement.

use std::fmt;
use std::os::raw::c_int;
use std::ptr;
use std::sync::Arc;

use libsqlite3_sys as ffi;

use crate::codec;
use crate::error::SqliteBridgeError;
use crate::finalize::{self, FinalizeBridge, ReleaseSlot};
use crate::handle::{DbHandle, StmtHandle};
use crate::types::{StepResult, Value};

/// One prepared statement.
///
/// [`finalize`](Statement::finalize) consumes the proxy, so post-finalize use
/// is unrepresentable. A statement orphaned by its connection's close degrades
/// to an error on every operation instead.
pub struct Statement {
    slot: Arc<ReleaseSlot>,
    /// Registry key, kept past release so deregistration stays possible.
    addr: usize,
    /// Owning database, used for error text and change counts only.
    db: DbHandle,
    bridge: FinalizeBridge,
}

impl Statement {
    pub(crate) fn prepare(
        db: DbHandle,
        bridge: &FinalizeBridge,
        sql: &str,
    ) -> Result<Self, SqliteBridgeError> {
        let len = c_int::try_from(sql.len())
            .map_err(|_| SqliteBridgeError::Sql("SQL text exceeds the engine length limit".into()))?;
        let mut raw = ptr::null_mut();
        let rc = unsafe {
            ffi::sqlite3_prepare_v2(db.as_ptr(), sql.as_ptr().cast(), len, &mut raw, ptr::null_mut())
        };
        if rc != ffi::SQLITE_OK {
            return Err(SqliteBridgeError::Syntax {
                message: db.error_message(),
                sql: sql.to_owned(),
            });
        }
        if raw.is_null() {
            // Whitespace or comment-only input compiles to no program.
            return Err(SqliteBridgeError::Syntax {
                message: "no SQL statement found".into(),
                sql: sql.to_owned(),
            });
        }
        let stmt = StmtHandle::new(raw);
        let slot = ReleaseSlot::new(stmt);
        // Registered before the proxy is returned; there is no window where
        // the native resource exists untracked.
        bridge.register(stmt.addr(), &slot);
        Ok(Self {
            slot,
            addr: stmt.addr(),
            db,
            bridge: bridge.clone(),
        })
    }

    /// Bind `values` to the statement's parameters, in order, 1-based.
    ///
    /// Binding replaces any previous bindings for those slots; it does not
    /// reset execution state. An error mid-sequence leaves earlier slots
    /// bound.
    ///
    /// # Errors
    ///
    /// [`SqliteBridgeError::ParameterCountMismatch`] if the length of `values`
    /// differs from the statement's declared parameter count;
    /// [`SqliteBridgeError::InvalidParameterType`] or
    /// [`SqliteBridgeError::BufferLengthMismatch`] from the codec; generic
    /// [`SqliteBridgeError::Sql`] for engine-reported bind failures.
    pub fn bind(&self, values: &[Value]) -> Result<(), SqliteBridgeError> {
        let stmt = self.armed("bind")?;
        let expected = unsafe { ffi::sqlite3_bind_parameter_count(stmt.as_ptr()) } as usize;
        if expected != values.len() {
            return Err(SqliteBridgeError::ParameterCountMismatch {
                expected,
                provided: values.len(),
            });
        }
        for (i, value) in values.iter().enumerate() {
            codec::bind_value(self.db, stmt, i + 1, value)?;
        }
        Ok(())
    }

    /// Clear all bindings and rewind to the pre-execution position, allowing
    /// rebinding and re-stepping without re-preparing. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteBridgeError::Sql`] if the engine reports a failure.
    pub fn reset(&self) -> Result<(), SqliteBridgeError> {
        let stmt = self.armed("reset")?;
        self.check(unsafe { ffi::sqlite3_clear_bindings(stmt.as_ptr()) })?;
        self.check(unsafe { ffi::sqlite3_reset(stmt.as_ptr()) })
    }

    /// Advance execution by one unit: a decoded [`StepResult::Row`] while rows
    /// remain, then [`StepResult::Done`] with the connection's change count.
    ///
    /// Transient lock contention (`Busy`/`Locked`) is retried here without
    /// surfacing; the connection's busy-timeout bounds each wait, but this
    /// layer imposes no cap of its own, so a never-clearing lock blocks
    /// indefinitely.
    ///
    /// # Errors
    ///
    /// [`SqliteBridgeError::Execution`] for any other engine status.
    pub fn step(&self) -> Result<StepResult, SqliteBridgeError> {
        let stmt = self.armed("step")?;
        loop {
            let status = unsafe { ffi::sqlite3_step(stmt.as_ptr()) };
            match status {
                ffi::SQLITE_BUSY | ffi::SQLITE_LOCKED => continue,
                ffi::SQLITE_ROW => return codec::read_row(stmt).map(StepResult::Row),
                ffi::SQLITE_DONE => return Ok(StepResult::Done(self.db.changes())),
                ffi::SQLITE_OK => {
                    return Err(SqliteBridgeError::UnreachableEngineState { code: status });
                }
                _ => return Err(SqliteBridgeError::Execution(self.db.error_message())),
            }
        }
    }

    /// Ordered column names of the statement's result shape; valid any time
    /// after prepare.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteBridgeError::Sql`] if the statement was already
    /// released by its connection's close.
    pub fn column_info(&self) -> Result<Vec<String>, SqliteBridgeError> {
        let stmt = self.armed("column_info")?;
        Ok(codec::column_names(stmt))
    }

    /// Explicit terminal release.
    ///
    /// Deregisters the finalization entry in the same operation, so the drop
    /// path can never double-release. Releasing a statement the connection
    /// close already swept is a silent no-op.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteBridgeError::Finalize`] if the engine reports an error,
    /// which typically reflects a prior unchecked execution failure.
    pub fn finalize(self) -> Result<(), SqliteBridgeError> {
        let Some(stmt) = self.slot.take() else {
            return Ok(());
        };
        self.bridge.deregister(self.addr);
        let rc = unsafe { ffi::sqlite3_finalize(stmt.as_ptr()) };
        if rc != ffi::SQLITE_OK {
            return Err(SqliteBridgeError::Finalize(self.db.error_message()));
        }
        Ok(())
    }

    fn armed(&self, op: &str) -> Result<StmtHandle, SqliteBridgeError> {
        let ptr = self.slot.get();
        if ptr.is_null() {
            Err(SqliteBridgeError::Sql(format!(
                "statement was already finalized ({op})"
            )))
        } else {
            Ok(StmtHandle::new(ptr))
        }
    }

    fn check(&self, rc: c_int) -> Result<(), SqliteBridgeError> {
        if rc == ffi::SQLITE_OK {
            Ok(())
        } else {
            Err(SqliteBridgeError::Sql(self.db.error_message()))
        }
    }
}

impl Drop for Statement {
    fn drop(&mut self) {
        // Release path of last resort; failures here have no observer and are
        // only logged.
        if let Some(stmt) = self.slot.take() {
            self.bridge.deregister(self.addr);
            let rc = unsafe { ffi::sqlite3_finalize(stmt.as_ptr()) };
            if rc != ffi::SQLITE_OK {
                tracing::debug!(code = rc, "finalize during drop reported an error");
            }
            finalize::warn_statement_leak();
        }
    }
}

impl fmt::Debug for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Statement")
            .field("stmt", &format_args!("{:#x}", self.addr))
            .field("db", &self.db)
            .field("released", &self.slot.get().is_null())
            .finish()
    }
}
