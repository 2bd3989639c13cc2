use serde_json::Number;
use std::fmt;

/// A typed query parameter value.
///
/// `Undefined` is the absent-value sentinel returned by lookups that find
/// nothing. It is distinct from `Null`, which is a present value produced by
/// coercing the text `null` (and, for compatibility, `undefined`).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl Value {
    /// The numeric zero produced by zero coercion.
    pub fn zero() -> Self {
        Value::Number(Number::from(0))
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// Text form used when a value is written into a query string.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

impl From<&Value> for Value {
    fn from(v: &Value) -> Self {
        v.clone()
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! from_integer {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Value::Number(Number::from(n))
            }
        })*
    };
}

from_integer!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

/// Whole floats are stored as integers so `10.0` renders as `10`.
fn normalize_number(n: Number) -> Number {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 => {
            Number::from(f as i64)
        }
        _ => n,
    }
}

/// Non-finite floats have no JSON number form and become `Null`.
impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Number::from_f64(n)
            .map(|n| Value::Number(normalize_number(n)))
            .unwrap_or(Value::Null)
    }
}

/// `None` is a present null, not the absent sentinel.
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(normalize_number(n)),
            serde_json::Value::String(s) => Value::String(s),
            other => Value::String(other.to_string()),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(v: &Value) -> Self {
        match v {
            Value::Undefined | Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Value::Number(n.clone()),
            Value::String(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl serde::Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde_json::Value::from(self).serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn display_matches_query_text() {
        assert_eq!(Value::from(10).to_string(), "10");
        assert_eq!(Value::from(6.5).to_string(), "6.5");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Undefined.to_string(), "undefined");
        assert_eq!(Value::from(2.0_f64).to_string(), "2");
        assert_eq!(Value::from(-0.0_f64).to_string(), "0");
        assert_eq!(Value::from(json!(10.0)).to_string(), "10");
        assert_eq!(Value::from(1e300).to_string(), Value::from(json!(1e300)).to_string());
    }

    #[test]
    fn accessors() {
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert_eq!(Value::zero().as_str(), None);
        assert_eq!(Value::from(false).as_bool(), Some(false));
    }

    #[test]
    fn none_is_null_not_undefined() {
        assert_eq!(Value::from(None::<&str>), Value::Null);
        assert!(!Value::from(None::<i32>).is_undefined());
    }

    #[test]
    fn json_conversion() {
        assert_eq!(Value::from(json!([1, 2])), Value::from("[1,2]"));
        assert_eq!(serde_json::Value::from(&Value::Undefined), json!(null));
        assert_eq!(serde_json::to_value(Value::zero()).unwrap(), json!(0));
    }
}
