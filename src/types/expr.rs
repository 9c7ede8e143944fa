use std::collections::BTreeSet;
use std::fmt;
use std::ops::Not;

use super::check::{ALWAYS, CheckRef, NEVER};

/// Boolean formula over [`CheckRef`] leaves.
///
/// `And` and `Or` are n-ary. Construction order is preserved as written;
/// [`simplify`](crate::simplify::simplify) produces the canonical form in which
/// operand lists are flattened, deduplicated and sorted.
///
/// The derived ordering is the total order used for that canonical sort.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Expr {
    Const(bool),
    Check(CheckRef),
    Not(Box<Expr>),
    And(Vec<Expr>),
    Or(Vec<Expr>),
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Const(b) => write!(f, "{b}"),
            Expr::Check(c) => write!(f, "{c}"),
            Expr::Not(inner) => write!(f, "(NOT {inner})"),
            Expr::And(items) => write_joined(f, items, " AND "),
            Expr::Or(items) => write_joined(f, items, " OR "),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[Expr], sep: &str) -> fmt::Result {
    write!(f, "(")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, "{sep}")?;
        }
        write!(f, "{item}")?;
    }
    write!(f, ")")
}

impl Expr {
    #[must_use]
    pub fn check(check: CheckRef) -> Expr {
        Expr::Check(check)
    }

    /// Conjunction; extends `self` in place when it is already an `And`.
    #[must_use]
    pub fn and(self, other: Expr) -> Expr {
        match self {
            Expr::And(mut items) => {
                items.push(other);
                Expr::And(items)
            }
            this => Expr::And(vec![this, other]),
        }
    }

    /// Disjunction; extends `self` in place when it is already an `Or`.
    #[must_use]
    pub fn or(self, other: Expr) -> Expr {
        match self {
            Expr::Or(mut items) => {
                items.push(other);
                Expr::Or(items)
            }
            this => Expr::Or(vec![this, other]),
        }
    }

    /// Conjunction of every item. An empty iterator yields `true`.
    pub fn all(items: impl IntoIterator<Item = Expr>) -> Expr {
        let items: Vec<Expr> = items.into_iter().collect();
        match items.len() {
            0 => Expr::Const(true),
            1 => items.into_iter().next().unwrap_or(Expr::Const(true)),
            _ => Expr::And(items),
        }
    }

    /// Disjunction of every item. An empty iterator yields `false`.
    pub fn any(items: impl IntoIterator<Item = Expr>) -> Expr {
        let items: Vec<Expr> = items.into_iter().collect();
        match items.len() {
            0 => Expr::Const(false),
            1 => items.into_iter().next().unwrap_or(Expr::Const(false)),
            _ => Expr::Or(items),
        }
    }

    #[must_use]
    pub fn as_const(&self) -> Option<bool> {
        match self {
            Expr::Const(b) => Some(*b),
            _ => None,
        }
    }

    /// Evaluate under a complete assignment of truth values to checks.
    pub fn evaluate(&self, assignment: &impl Fn(&CheckRef) -> bool) -> bool {
        match self {
            Expr::Const(b) => *b,
            Expr::Check(c) => assignment(c),
            Expr::Not(inner) => !inner.evaluate(assignment),
            Expr::And(items) => items.iter().all(|e| e.evaluate(assignment)),
            Expr::Or(items) => items.iter().any(|e| e.evaluate(assignment)),
        }
    }

    /// Every distinct check referenced by this expression, in canonical order.
    #[must_use]
    pub fn checks(&self) -> BTreeSet<&CheckRef> {
        let mut out = BTreeSet::new();
        self.collect_checks(&mut out);
        out
    }

    fn collect_checks<'a>(&'a self, out: &mut BTreeSet<&'a CheckRef>) {
        match self {
            Expr::Const(_) => {}
            Expr::Check(c) => {
                out.insert(c);
            }
            Expr::Not(inner) => inner.collect_checks(out),
            Expr::And(items) | Expr::Or(items) => {
                for item in items {
                    item.collect_checks(out);
                }
            }
        }
    }
}

impl Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        Expr::Not(Box::new(self))
    }
}

impl From<CheckRef> for Expr {
    fn from(check: CheckRef) -> Self {
        Expr::Check(check)
    }
}

impl From<bool> for Expr {
    fn from(b: bool) -> Self {
        Expr::Const(b)
    }
}

/// The built-in check that always passes, as an expression leaf.
#[must_use]
pub fn always() -> Expr {
    Expr::Check(CheckRef::new(ALWAYS))
}

/// The built-in check that never passes, as an expression leaf.
#[must_use]
pub fn never() -> Expr {
    Expr::Check(CheckRef::new(NEVER))
}
