use thiserror::Error;

/// Errors surfaced by the bridge.
///
/// Engine failures carry the engine's human-readable error text; callers never
/// see raw native status codes. `UnknownColumnType` and `UnreachableEngineState`
/// indicate a bug in the binding layer (or an engine version mismatch), not
/// caller misuse, and should never occur for well-formed input.
#[derive(Debug, Error)]
pub enum SqliteBridgeError {
    #[error("unable to open database: {0}")]
    Open(String),

    #[error("unable to close database: {0}")]
    Close(String),

    #[error("SQL syntax error: {message} in {sql:?}")]
    Syntax { message: String, sql: String },

    #[error("SQL error: {0}")]
    Sql(String),

    #[error("statement declares {expected} parameters but {provided} were supplied")]
    ParameterCountMismatch { expected: usize, provided: usize },

    #[error("parameter {slot} has no SQLite representation ({kind})")]
    InvalidParameterType { slot: usize, kind: &'static str },

    #[error("parameter {slot} is {len} bytes, which cannot be bound at its declared length")]
    BufferLengthMismatch { slot: usize, len: usize },

    #[error("statement execution failed: {0}")]
    Execution(String),

    #[error("unable to finalize statement: {0}")]
    Finalize(String),

    #[error("column {column} reports unknown storage class {code}")]
    UnknownColumnType { column: usize, code: i32 },

    #[error("statement step returned undocumented status {code}")]
    UnreachableEngineState { code: i32 },
}

impl SqliteBridgeError {
    /// True for the internal-invariant class reserved for binding bugs.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::UnknownColumnType { .. } | Self::UnreachableEngineState { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteBridgeError;

    #[test]
    fn syntax_display_includes_sql_text() {
        let err = SqliteBridgeError::Syntax {
            message: "near \"SELEC\": syntax error".into(),
            sql: "SELEC 1".into(),
        };
        assert!(err.to_string().contains("SELEC 1"));
    }

    #[test]
    fn internal_class_is_distinct() {
        assert!(SqliteBridgeError::UnknownColumnType { column: 0, code: 9 }.is_internal());
        assert!(SqliteBridgeError::UnreachableEngineState { code: 0 }.is_internal());
        assert!(!SqliteBridgeError::Sql("locked".into()).is_internal());
    }
}
