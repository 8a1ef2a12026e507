//! Dynamic values crossing the host/engine boundary.

/// A value bound into, or decoded out of, a statement.
///
/// Reuse the same enum for parameters and columns so callers never branch on
/// driver types:
/// ```rust
/// use sqlite_bridge::Value;
///
/// let params = vec![Value::Integer(1), Value::Text("alice".into()), Value::Null];
/// # let _ = params;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Integer value (64-bit signed)
    Integer(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text value (UTF-8)
    Text(String),
    /// Binary data, copied across the boundary in both directions
    Blob(Vec<u8>),
    /// Boolean value. SQLite has no boolean storage class, so binding one
    /// fails with `InvalidParameterType`; decoding never produces it.
    Bool(bool),
    /// NULL value
    Null,
}

impl Value {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        if let Value::Integer(v) = self { Some(*v) } else { None }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        if let Value::Float(v) = self { Some(*v) } else { None }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let Value::Text(v) = self { Some(v) } else { None }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let Value::Blob(v) = self { Some(v) } else { None }
    }

    /// Booleans, plus the 0/1 integer encoding SQLite conventionally stores.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            Value::Integer(0) => Some(false),
            Value::Integer(1) => Some(true),
            _ => None,
        }
    }

    /// Short name of the value's kind, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Blob(_) => "blob",
            Value::Bool(_) => "bool",
            Value::Null => "null",
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

/// Outcome of advancing a statement by one step.
#[derive(Debug, Clone, PartialEq)]
pub enum StepResult {
    /// A decoded result row, in declared column order.
    Row(Vec<Value>),
    /// Execution completed. The integer is the connection's change count,
    /// which reflects the last row-mutating statement executed on the
    /// connection and may be non-zero even for a read-only statement.
    Done(i64),
}

impl StepResult {
    #[must_use]
    pub fn as_row(&self) -> Option<&[Value]> {
        if let StepResult::Row(values) = self { Some(values) } else { None }
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        matches!(self, StepResult::Done(_))
    }
}
