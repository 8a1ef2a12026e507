//! Exactly-once release of engine-owned statements.
//!
//! A statement's native resource can be released by three triggers: explicit
//! `finalize`, the proxy being dropped, or the close-time sweep of its
//! connection. Whichever runs first takes the pointer out of the statement's
//! [`ReleaseSlot`]; the other triggers then see an empty slot and do nothing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use libsqlite3_sys as ffi;

use crate::handle::StmtHandle;

/// Holds a statement's raw pointer until the first release trigger claims it.
pub(crate) struct ReleaseSlot {
    stmt: Mutex<*mut ffi::sqlite3_stmt>,
}

// The pointer is only ever handed to a single claimant; the mutex is what
// enforces that, so sharing the slot through `Arc` is sound.
unsafe impl Send for ReleaseSlot {}
unsafe impl Sync for ReleaseSlot {}

impl ReleaseSlot {
    pub(crate) fn new(stmt: StmtHandle) -> Arc<Self> {
        Arc::new(Self {
            stmt: Mutex::new(stmt.as_ptr()),
        })
    }

    /// Current pointer; null once released.
    pub(crate) fn get(&self) -> *mut ffi::sqlite3_stmt {
        *self.stmt.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claim the pointer, making every later release trigger a no-op.
    pub(crate) fn take(&self) -> Option<StmtHandle> {
        let mut guard = self.stmt.lock().unwrap_or_else(PoisonError::into_inner);
        if guard.is_null() {
            None
        } else {
            Some(StmtHandle::new(std::mem::replace(&mut *guard, std::ptr::null_mut())))
        }
    }
}

/// Non-owning registry of the release slots of one connection's statements.
///
/// `Weak` entries keep the bridge from extending any proxy's lifetime; a slot
/// whose proxy is gone was already released by the proxy's drop.
#[derive(Clone, Default)]
pub(crate) struct FinalizeBridge {
    slots: Arc<Mutex<HashMap<usize, Weak<ReleaseSlot>>>>,
}

impl FinalizeBridge {
    pub(crate) fn register(&self, addr: usize, slot: &Arc<ReleaseSlot>) {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(addr, Arc::downgrade(slot));
    }

    pub(crate) fn deregister(&self, addr: usize) {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&addr);
    }

    /// Mark the slot for `addr` as released without finalizing it. The
    /// close-time sweep finalizes through the engine's own statement
    /// enumeration, so here we only need outstanding proxies to go inert.
    pub(crate) fn disarm(&self, addr: usize) {
        let entry = self
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&addr);
        if let Some(slot) = entry.and_then(|weak| weak.upgrade()) {
            slot.take();
        }
    }
}

static DROP_WARNED: AtomicBool = AtomicBool::new(false);

/// Emitted the first time a statement is released by its drop rather than an
/// explicit `finalize`. Once per process; this signals caller mismanagement,
/// not a bridge failure.
pub(crate) fn warn_statement_leak() {
    if !DROP_WARNED.swap(true, Ordering::Relaxed) {
        tracing::warn!("prepared statement dropped before being finalized; releasing it now");
    }
}
