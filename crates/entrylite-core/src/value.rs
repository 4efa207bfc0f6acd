//! Statement parameters and result values.

use crate::error::{Error, Result};
use std::fmt;

/// A value bound to a statement placeholder.
///
/// Position in the parameter list is significant: the first element binds
/// to the first placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    /// SQL NULL
    Null,
    /// Text
    Text(String),
    /// 64-bit signed integer
    Integer(i64),
    /// Double-precision float
    Float(f64),
    /// Boolean
    Boolean(bool),
}

impl Param {
    /// Name of the variant, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Param::Null => "null",
            Param::Text(_) => "text",
            Param::Integer(_) => "integer",
            Param::Float(_) => "float",
            Param::Boolean(_) => "boolean",
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Null => f.write_str("NULL"),
            Param::Text(s) => write!(f, "{:?}", s),
            Param::Integer(i) => write!(f, "{}", i),
            Param::Float(v) => write!(f, "{}", v),
            Param::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// Renders a parameter list as `[a, b, c]` for log lines.
pub fn display_params(params: &[Param]) -> String {
    let rendered: Vec<String> = params.iter().map(|p| p.to_string()).collect();
    format!("[{}]", rendered.join(", "))
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Param::Text(value.to_string())
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Param::Text(value)
    }
}

impl From<&String> for Param {
    fn from(value: &String) -> Self {
        Param::Text(value.clone())
    }
}

impl From<i64> for Param {
    fn from(value: i64) -> Self {
        Param::Integer(value)
    }
}

impl From<i32> for Param {
    fn from(value: i32) -> Self {
        Param::Integer(i64::from(value))
    }
}

impl From<f64> for Param {
    fn from(value: f64) -> Self {
        Param::Float(value)
    }
}

impl From<bool> for Param {
    fn from(value: bool) -> Self {
        Param::Boolean(value)
    }
}

impl<T: Into<Param>> From<Option<T>> for Param {
    fn from(value: Option<T>) -> Self {
        value.map_or(Param::Null, Into::into)
    }
}

/// Builds a `Vec<Param>` from heterogeneous values.
///
/// ```
/// use entrylite_core::{params, Param};
///
/// let p = params!["Ana", 30, 1250.5, true, None::<i64>];
/// assert_eq!(p[1], Param::Integer(30));
/// assert_eq!(p[4], Param::Null);
/// ```
#[macro_export]
macro_rules! params {
    () => {
        ::std::vec::Vec::<$crate::Param>::new()
    };
    ($($value:expr),+ $(,)?) => {
        vec![$($crate::Param::from($value)),+]
    };
}

/// A dynamically typed value read from a result row.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL
    Null,
    /// 64-bit signed integer
    Integer(i64),
    /// Double-precision float
    Float(f64),
    /// Text
    Text(String),
    /// Boolean, for stores with a native boolean type
    Boolean(bool),
    /// Raw bytes
    Blob(Vec<u8>),
}

impl Value {
    /// Returns true for SQL NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Integer content, if this is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric content as a float. Integers widen.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Text content, if this is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean content. Stores without a boolean type report 0/1 integers.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            Value::Integer(0) => Some(false),
            Value::Integer(1) => Some(true),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(s) => f.write_str(s),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Blob(b) => write!(f, "<blob {} bytes>", b.len()),
        }
    }
}

impl TryFrom<Value> for Param {
    type Error = Error;

    /// Turns a value read back from the store into a parameter.
    ///
    /// Blobs have no parameter representation and are rejected.
    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Param::Null),
            Value::Integer(i) => Ok(Param::Integer(i)),
            Value::Float(f) => Ok(Param::Float(f)),
            Value::Text(s) => Ok(Param::Text(s)),
            Value::Boolean(b) => Ok(Param::Boolean(b)),
            Value::Blob(_) => Err(Error::UnsupportedParameterType {
                index: 0,
                type_name: "blob",
            }),
        }
    }
}

/// Converts a slice of values into parameters, reporting the 1-based
/// position of the first value that cannot be bound.
pub fn params_from_values<I>(values: I) -> Result<Vec<Param>>
where
    I: IntoIterator<Item = Value>,
{
    values
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            Param::try_from(value).map_err(|err| match err {
                Error::UnsupportedParameterType { type_name, .. } => {
                    Error::UnsupportedParameterType {
                        index: i + 1,
                        type_name,
                    }
                }
                other => other,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_macro() {
        let p = crate::params!["Ana", 42i64, 2.5, false, None::<&str>];
        assert_eq!(
            p,
            vec![
                Param::Text("Ana".to_string()),
                Param::Integer(42),
                Param::Float(2.5),
                Param::Boolean(false),
                Param::Null,
            ]
        );
        assert!(crate::params![].is_empty());
    }

    #[test]
    fn test_integer_and_float_keep_precision() {
        assert_eq!(Param::from(i64::MAX), Param::Integer(i64::MAX));
        assert_eq!(Param::from(0.1 + 0.2), Param::Float(0.1 + 0.2));
    }

    #[test]
    fn test_display_params() {
        let p = vec![Param::from("Ana"), Param::Null, Param::from(3)];
        assert_eq!(display_params(&p), "[\"Ana\", NULL, 3]");
        assert_eq!(display_params(&[]), "[]");
    }

    #[test]
    fn test_value_to_param() {
        assert_eq!(
            Param::try_from(Value::Text("x".to_string())).unwrap(),
            Param::Text("x".to_string())
        );
        let err = params_from_values(vec![Value::Integer(1), Value::Blob(vec![0xde, 0xad])])
            .unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedParameterType {
                index: 2,
                type_name: "blob"
            }
        ));
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::Integer(1).as_bool(), Some(true));
        assert_eq!(Value::Integer(7).as_bool(), None);
        assert_eq!(Value::Integer(3).as_f64(), Some(3.0));
        assert_eq!(Value::Text("a".to_string()).as_str(), Some("a"));
        assert!(Value::Null.is_null());
        assert_eq!(Value::Blob(vec![1, 2]).to_string(), "<blob 2 bytes>");
    }
}
