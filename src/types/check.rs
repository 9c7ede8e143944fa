use std::fmt;

use super::Value;

/// Kind of the built-in check that always passes.
pub const ALWAYS: &str = "always";
/// Kind of the built-in check that never passes.
pub const NEVER: &str = "never";

/// Label used when describing a check that is statically true.
pub const ALWAYS_TRUE: &str = "always true";
/// Label used when describing a check that is statically false.
pub const ALWAYS_FALSE: &str = "always false";

/// One authorization predicate instance: a predicate kind plus its parameters.
///
/// Two checks are equal iff their kinds and parameter lists are equal. The
/// derived ordering (kind first, then parameters) is the total order used to
/// canonicalize expressions and to pick branching variables.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CheckRef {
    kind: String,
    params: Vec<(String, Value)>,
}

impl CheckRef {
    #[must_use]
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_owned(),
            params: Vec::new(),
        }
    }

    /// Append a keyed parameter.
    #[must_use]
    pub fn param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.push((key.to_owned(), value.into()));
        self
    }

    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    #[must_use]
    pub fn params(&self) -> &[(String, Value)] {
        &self.params
    }

    /// The truth value of a built-in check, if it is known without a request.
    #[must_use]
    pub fn static_value(&self) -> Option<bool> {
        if !self.params.is_empty() {
            return None;
        }
        match self.kind.as_str() {
            ALWAYS => Some(true),
            NEVER => Some(false),
            _ => None,
        }
    }
}

impl fmt::Display for CheckRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if self.params.is_empty() {
            return Ok(());
        }
        write!(f, "(")?;
        for (i, (key, value)) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        write!(f, ")")
    }
}

/// Shorthand for [`CheckRef::new`].
#[must_use]
pub fn check(kind: &str) -> CheckRef {
    CheckRef::new(kind)
}

/// Renders a check as the human-readable text shown inside a chart node.
pub trait DescribeCheck {
    fn describe(&self, check: &CheckRef) -> String;
}

/// Describes built-in checks by their static value and everything else by its
/// `kind(key: value, ...)` form.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDescriber;

impl DescribeCheck for DefaultDescriber {
    fn describe(&self, check: &CheckRef) -> String {
        match check.static_value() {
            Some(true) => ALWAYS_TRUE.to_owned(),
            Some(false) => ALWAYS_FALSE.to_owned(),
            None => check.to_string(),
        }
    }
}

impl<F> DescribeCheck for F
where
    F: Fn(&CheckRef) -> String,
{
    fn describe(&self, check: &CheckRef) -> String {
        self(check)
    }
}
