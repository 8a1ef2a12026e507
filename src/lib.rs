//! Minimal lifecycle-and-marshalling bridge over the raw SQLite C interface.
//!
//! SQL parsing, execution, and storage belong to the embedded engine; this
//! crate owns only the boundary layer: opaque native handles, the
//! prepare/bind/step/reset/finalize state machine, copying value conversions,
//! and a finalization bridge that releases every native resource exactly once
//! whether the caller finalizes explicitly or just drops the proxy.
//!
//! ```rust
//! use sqlite_bridge::{Connection, SqliteBridgeError, StepResult, Value};
//!
//! fn main() -> Result<(), SqliteBridgeError> {
//!     let conn = Connection::open(":memory:")?;
//!     let stmt = conn.prepare("SELECT ?1 + 1")?;
//!     stmt.bind(&[Value::Integer(41)])?;
//!     assert_eq!(stmt.step()?, StepResult::Row(vec![Value::Integer(42)]));
//!     stmt.finalize()?;
//!     conn.close()
//! }
//! ```

mod codec;
mod connection;
mod error;
mod finalize;
mod handle;
mod statement;
mod types;

pub use connection::{Connection, version};
pub use error::SqliteBridgeError;
pub use statement::Statement;
pub use types::{StepResult, Value};
