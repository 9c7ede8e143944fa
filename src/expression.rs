use crate::{CheckType, Expr, Policy, PolicyCheck};

/// The expression that holds exactly when `policies` authorize a request.
///
/// At least one policy must apply. Policies are then combined from the last
/// one backwards: a bypass policy that applies and passes authorizes on its
/// own, otherwise evaluation falls through to the remaining policies; a
/// regular policy must pass whenever it applies.
///
/// An empty policy list yields `false`.
#[must_use]
pub fn policies_expression(policies: &[Policy]) -> Expr {
    if policies.is_empty() {
        return Expr::Const(false);
    }

    let at_least_one_applies = Expr::any(policies.iter().map(condition_expression));

    let combined = policies
        .iter()
        .rev()
        .fold(Expr::Const(true), |rest, policy| {
            let condition = condition_expression(policy);
            let checks = checks_expression(&policy.checks);
            if policy.bypass {
                condition.and(checks).or(rest)
            } else {
                Expr::Or(vec![!condition, checks]).and(rest)
            }
        });

    Expr::And(vec![at_least_one_applies, combined])
}

/// Conjunction of a policy's conditions; `true` when it has none.
#[must_use]
pub fn condition_expression(policy: &Policy) -> Expr {
    Expr::all(policy.condition.iter().cloned().map(Expr::Check))
}

/// First-match evaluation of a check list with an implicit forbid at the end.
///
/// A policy that declares no checks at all imposes nothing and yields `true`.
#[must_use]
pub fn checks_expression(checks: &[PolicyCheck]) -> Expr {
    if checks.is_empty() {
        return Expr::Const(true);
    }
    checks.iter().rev().fold(Expr::Const(false), |rest, c| {
        let leaf = Expr::Check(c.check.clone());
        match c.check_type {
            CheckType::AuthorizeIf => Expr::Or(vec![leaf, rest]),
            CheckType::AuthorizeUnless => Expr::Or(vec![!leaf, rest]),
            CheckType::ForbidIf => Expr::And(vec![!leaf, rest]),
            CheckType::ForbidUnless => Expr::And(vec![leaf, rest]),
        }
    })
}
