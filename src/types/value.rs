use std::fmt;

/// Parameter values carried by a [`CheckRef`](super::CheckRef).
///
/// Values are totally ordered so that checks can be sorted into a canonical
/// order and interned by content.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// A 64-bit signed integer.
    Int(i64),
    /// A boolean value.
    Bool(bool),
    /// A UTF-8 string.
    String(String),
    /// A bare symbol such as `admin` or `read`.
    Atom(String),
}

impl Value {
    #[must_use]
    pub fn atom(name: &str) -> Self {
        Value::Atom(name.to_owned())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "\"{v}\""),
            Value::Atom(v) => write!(f, "{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_i64() {
        assert_eq!(Value::from(42_i64), Value::Int(42));
    }

    #[test]
    fn from_str_is_string_not_atom() {
        assert_eq!(Value::from("admin"), Value::String("admin".into()));
        assert_ne!(Value::from("admin"), Value::atom("admin"));
    }

    #[test]
    fn display() {
        assert_eq!(Value::Int(-3).to_string(), "-3");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::from("x").to_string(), "\"x\"");
        assert_eq!(Value::atom("admin").to_string(), "admin");
    }

    #[test]
    fn ordering_is_total_across_variants() {
        let mut values = vec![
            Value::atom("b"),
            Value::from("a"),
            Value::Bool(false),
            Value::Int(7),
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                Value::Int(7),
                Value::Bool(false),
                Value::from("a"),
                Value::atom("b"),
            ]
        );
    }
}
