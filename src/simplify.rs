use std::collections::BTreeSet;

use crate::{CheckRef, Expr};

/// What a [`transform`] callback wants done with a check leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transform {
    /// Leave the check in place.
    Keep,
    /// Replace the check with a known truth value.
    Const(bool),
    /// Splice in another formula.
    Replace(Expr),
}

/// Rewrite every check leaf of `expr` through `f`, leaves first.
///
/// The result is not simplified; run [`simplify`] on it afterwards.
pub fn transform(expr: &Expr, f: &mut impl FnMut(&CheckRef) -> Transform) -> Expr {
    match expr {
        Expr::Const(b) => Expr::Const(*b),
        Expr::Check(c) => match f(c) {
            Transform::Keep => Expr::Check(c.clone()),
            Transform::Const(b) => Expr::Const(b),
            Transform::Replace(replacement) => replacement,
        },
        Expr::Not(inner) => Expr::Not(Box::new(transform(inner, f))),
        Expr::And(items) => Expr::And(items.iter().map(|e| transform(e, f)).collect()),
        Expr::Or(items) => Expr::Or(items.iter().map(|e| transform(e, f)).collect()),
    }
}

/// Substitute the built-in `always` / `never` checks with constants.
pub fn resolve_static_checks(expr: &Expr) -> Expr {
    transform(expr, &mut |c| match c.static_value() {
        Some(b) => Transform::Const(b),
        None => Transform::Keep,
    })
}

/// Substitute a single check with a truth value and simplify the result.
#[must_use]
pub fn assign(expr: &Expr, check: &CheckRef, value: bool) -> Expr {
    let substituted = transform(expr, &mut |c| {
        if c == check {
            Transform::Const(value)
        } else {
            Transform::Keep
        }
    });
    simplify(&substituted)
}

/// Bring `expr` into canonical form.
///
/// Applies double negation, constant absorption, idempotence, complement
/// detection (`A AND NOT A`, `A OR NOT A`) and absorption
/// (`A AND (A OR B) = A`). Nested operators of the same kind are flattened and
/// operand lists are sorted by the total order on [`Expr`], so equivalent
/// formulas built in a different order compare equal.
///
/// `simplify(&simplify(e)) == simplify(e)` for every `e`.
#[must_use]
pub fn simplify(expr: &Expr) -> Expr {
    match expr {
        Expr::Const(_) | Expr::Check(_) => expr.clone(),
        Expr::Not(inner) => match simplify(inner) {
            Expr::Const(b) => Expr::Const(!b),
            Expr::Not(double) => *double,
            other => Expr::Not(Box::new(other)),
        },
        Expr::And(items) => simplify_nary(items, Op::And),
        Expr::Or(items) => simplify_nary(items, Op::Or),
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Op {
    And,
    Or,
}

impl Op {
    /// The constant that is dropped from operand lists.
    fn identity(self) -> bool {
        self == Op::And
    }

    fn wrap(self, items: Vec<Expr>) -> Expr {
        match self {
            Op::And => Expr::And(items),
            Op::Or => Expr::Or(items),
        }
    }

    /// Operands of a nested expression with the same operator.
    fn unwrap(self, expr: Expr) -> Result<Vec<Expr>, Expr> {
        match (self, expr) {
            (Op::And, Expr::And(items)) | (Op::Or, Expr::Or(items)) => Ok(items),
            (_, other) => Err(other),
        }
    }

    /// Operands of a nested expression with the dual operator.
    fn dual_operands(self, expr: &Expr) -> Option<&[Expr]> {
        match (self, expr) {
            (Op::And, Expr::Or(items)) | (Op::Or, Expr::And(items)) => Some(items),
            _ => None,
        }
    }
}

fn simplify_nary(items: &[Expr], op: Op) -> Expr {
    let annihilator = !op.identity();
    let mut operands: BTreeSet<Expr> = BTreeSet::new();

    for item in items {
        match op.unwrap(simplify(item)) {
            Ok(nested) => operands.extend(nested),
            Err(Expr::Const(b)) if b == op.identity() => {}
            Err(Expr::Const(_)) => return Expr::Const(annihilator),
            Err(other) => {
                operands.insert(other);
            }
        }
    }

    let has_complement = operands.iter().any(|e| match e {
        Expr::Not(inner) => operands.contains(inner.as_ref()),
        _ => false,
    });
    if has_complement {
        return Expr::Const(annihilator);
    }

    let kept = absorb(op, &operands);

    match kept.len() {
        0 => Expr::Const(op.identity()),
        1 => kept.into_iter().next().unwrap_or(Expr::Const(op.identity())),
        _ => op.wrap(kept),
    }
}

/// Drop every operand made redundant by a sibling whose dual-operand set is a
/// strict subset of its own.
fn absorb(op: Op, operands: &BTreeSet<Expr>) -> Vec<Expr> {
    let clauses: Vec<BTreeSet<&Expr>> = operands.iter().map(|e| clause(op, e)).collect();

    operands
        .iter()
        .enumerate()
        .filter(|(i, _)| {
            !clauses
                .iter()
                .enumerate()
                .any(|(j, other)| j != *i && other.is_subset(&clauses[*i]) && other != &clauses[*i])
        })
        .map(|(_, e)| e.clone())
        .collect()
}

fn clause(op: Op, expr: &Expr) -> BTreeSet<&Expr> {
    match op.dual_operands(expr) {
        Some(items) => items.iter().collect(),
        None => BTreeSet::from([expr]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check;

    fn leaf(kind: &str) -> Expr {
        Expr::Check(check(kind))
    }

    #[test]
    fn double_negation() {
        assert_eq!(simplify(&!!leaf("a")), leaf("a"));
    }

    #[test]
    fn negated_constant() {
        assert_eq!(simplify(&!Expr::Const(true)), Expr::Const(false));
    }

    #[test]
    fn constant_absorption() {
        assert_eq!(simplify(&leaf("a").and(Expr::Const(false))), Expr::Const(false));
        assert_eq!(simplify(&leaf("a").or(Expr::Const(true))), Expr::Const(true));
        assert_eq!(simplify(&leaf("a").and(Expr::Const(true))), leaf("a"));
        assert_eq!(simplify(&leaf("a").or(Expr::Const(false))), leaf("a"));
    }

    #[test]
    fn idempotence_of_operands() {
        assert_eq!(simplify(&leaf("a").and(leaf("a"))), leaf("a"));
        assert_eq!(simplify(&leaf("a").or(leaf("a"))), leaf("a"));
    }

    #[test]
    fn empty_operators() {
        assert_eq!(simplify(&Expr::And(vec![])), Expr::Const(true));
        assert_eq!(simplify(&Expr::Or(vec![])), Expr::Const(false));
    }

    #[test]
    fn commutative_order_is_canonical() {
        let ab = simplify(&leaf("a").and(leaf("b")));
        let ba = simplify(&leaf("b").and(leaf("a")));
        assert_eq!(ab, ba);
        assert_eq!(ab, Expr::And(vec![leaf("a"), leaf("b")]));
    }

    #[test]
    fn nested_same_operator_flattens() {
        let expr = Expr::And(vec![leaf("c"), Expr::And(vec![leaf("b"), leaf("a")])]);
        assert_eq!(
            simplify(&expr),
            Expr::And(vec![leaf("a"), leaf("b"), leaf("c")])
        );
    }

    #[test]
    fn complement() {
        assert_eq!(simplify(&leaf("a").and(!leaf("a"))), Expr::Const(false));
        assert_eq!(simplify(&leaf("a").or(!leaf("a"))), Expr::Const(true));
    }

    #[test]
    fn absorption() {
        let expr = leaf("a").and(leaf("a").or(leaf("b")));
        assert_eq!(simplify(&expr), leaf("a"));

        let expr = leaf("a").or(leaf("a").and(leaf("b")));
        assert_eq!(simplify(&expr), leaf("a"));
    }

    #[test]
    fn absorption_between_clauses() {
        // (a AND b) OR (a AND b AND c) = a AND b
        let ab = leaf("a").and(leaf("b"));
        let abc = leaf("a").and(leaf("b")).and(leaf("c"));
        assert_eq!(simplify(&ab.clone().or(abc)), simplify(&ab));
    }

    #[test]
    fn simplify_is_idempotent_on_examples() {
        let exprs = vec![
            leaf("a").and(leaf("b").or(!leaf("c"))).or(!(leaf("d").and(Expr::Const(true)))),
            !(!leaf("a")).and(leaf("a").or(leaf("b"))),
            Expr::Or(vec![Expr::And(vec![]), leaf("z")]),
        ];
        for expr in exprs {
            let once = simplify(&expr);
            assert_eq!(simplify(&once), once, "not idempotent for {expr}");
        }
    }

    #[test]
    fn transform_substitutes_constants() {
        let expr = leaf("a").and(leaf("b"));
        let out = transform(&expr, &mut |c| {
            if c.kind() == "a" {
                Transform::Const(true)
            } else {
                Transform::Keep
            }
        });
        assert_eq!(out, Expr::And(vec![Expr::Const(true), leaf("b")]));
        assert_eq!(simplify(&out), leaf("b"));
    }

    #[test]
    fn transform_splices_replacement() {
        let expr = !leaf("a");
        let out = transform(&expr, &mut |_| Transform::Replace(leaf("x").or(leaf("y"))));
        assert_eq!(out, !Expr::Or(vec![leaf("x"), leaf("y")]));
    }

    #[test]
    fn transform_visits_every_leaf() {
        let expr = leaf("a").and(!leaf("b")).or(leaf("a"));
        let mut seen = Vec::new();
        let _ = transform(&expr, &mut |c| {
            seen.push(c.kind().to_owned());
            Transform::Keep
        });
        assert_eq!(seen, vec!["a", "b", "a"]);
    }

    #[test]
    fn resolve_static_checks_replaces_builtins() {
        let expr = crate::always().and(leaf("a")).or(crate::never());
        assert_eq!(simplify(&resolve_static_checks(&expr)), leaf("a"));
    }

    #[test]
    fn assign_simplifies() {
        let expr = leaf("a").and(leaf("b")).or(leaf("c"));
        assert_eq!(assign(&expr, &check("a"), false), leaf("c"));
        assert_eq!(assign(&expr, &check("c"), true), Expr::Const(true));
    }
}
