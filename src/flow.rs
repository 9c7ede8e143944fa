//! Per-policy flow chart: one node per condition and per check, routed by a
//! fixed table instead of a deduplicated decision tree.

use crate::flowchart::{
    AUTHORIZED, Edge, Entry, FALSE_LABEL, FORBIDDEN, Flowchart, Node, START, Subgraph, TRUE_LABEL,
    collect_edges, results_entries,
};
use crate::types::{ALWAYS_TRUE, ChartOptions, CheckType, DescribeCheck, Policy};

/// Id of the gate that requires at least one policy to apply.
pub const GATE: &str = "at_least_one_policy";

/// Render `policies` as a per-policy flow chart.
///
/// Policy `i` becomes a subgraph holding its condition node `{i}_conditions`
/// and one node `{i}_checks_{j}` per check. When several policies carry real
/// conditions and none applies unconditionally, a gate between `start` and the
/// first policy forbids requests that no policy applies to. An empty policy
/// list is always forbidden.
#[must_use]
pub fn policy_flow(
    policies: &[Policy],
    describer: &dyn DescribeCheck,
    options: &ChartOptions,
) -> Flowchart {
    let mut entries = vec![Entry::Node(Node::terminal(START))];

    if policies.is_empty() {
        entries.push(Entry::Edge(Edge::new(START, FORBIDDEN)));
        entries.extend(results_entries(false, true));
        return Flowchart::new(options.direction, entries);
    }

    let router = Router { policies };
    let conditioned: Vec<String> = policies
        .iter()
        .filter(|p| !has_trivial_condition(p))
        .map(|p| condition_label(p, describer))
        .collect();
    let guaranteed = conditioned.len() < policies.len();

    if !guaranteed && policies.len() > 1 {
        let label = conditioned
            .iter()
            .map(|c| format!("({c})"))
            .collect::<Vec<_>>()
            .join(" or ");
        entries.push(Entry::Node(Node::decision(GATE, &label)));
        entries.push(Entry::Edge(Edge::new(START, GATE)));
        entries.push(Entry::Edge(Edge::labeled(GATE, &conditions_id(0), TRUE_LABEL)));
        entries.push(Entry::Edge(Edge::labeled(GATE, FORBIDDEN, FALSE_LABEL)));
    } else {
        entries.push(Entry::Edge(Edge::new(START, &conditions_id(0))));
    }

    for (i, policy) in policies.iter().enumerate() {
        let not_applicable = if !guaranteed && policies.len() == 1 {
            FORBIDDEN.to_owned()
        } else {
            router.next_policy(i)
        };
        entries.push(Entry::Subgraph(policy_subgraph(
            i,
            policy,
            &router,
            &not_applicable,
            describer,
        )));
    }

    let mut edges = Vec::new();
    collect_edges(&entries, &mut edges);
    let authorized = edges.iter().any(|e| e.to == AUTHORIZED);
    let forbidden = edges.iter().any(|e| e.to == FORBIDDEN);
    entries.extend(results_entries(authorized, forbidden));

    Flowchart::new(options.direction, entries)
}

fn conditions_id(policy: usize) -> String {
    format!("{policy}_conditions")
}

fn check_id(policy: usize, check: usize) -> String {
    format!("{policy}_checks_{check}")
}

fn has_trivial_condition(policy: &Policy) -> bool {
    policy
        .condition
        .iter()
        .all(|c| c.static_value() == Some(true))
}

fn condition_label(policy: &Policy, describer: &dyn DescribeCheck) -> String {
    if has_trivial_condition(policy) {
        return ALWAYS_TRUE.to_owned();
    }
    policy
        .condition
        .iter()
        .filter(|c| c.static_value() != Some(true))
        .map(|c| describer.describe(c))
        .collect::<Vec<_>>()
        .join(" and ")
}

struct Router<'a> {
    policies: &'a [Policy],
}

impl Router<'_> {
    /// The next policy's condition node, or `authorized` after the last one.
    fn next_policy(&self, policy: usize) -> String {
        if policy + 1 < self.policies.len() {
            conditions_id(policy + 1)
        } else {
            AUTHORIZED.to_owned()
        }
    }

    /// The next check of the same policy, or `fallback` after the last one.
    fn next_check_or(&self, policy: usize, check: usize, fallback: &str) -> String {
        if check + 1 < self.policies[policy].checks.len() {
            check_id(policy, check + 1)
        } else {
            fallback.to_owned()
        }
    }

    /// `(on_true, on_false)` targets of check `check` of policy `policy`.
    fn check_targets(&self, policy: usize, check: usize) -> (String, String) {
        let p = &self.policies[policy];
        let next_policy = self.next_policy(policy);
        let check_type = p.checks[check].check_type;
        match (check_type, p.bypass) {
            (CheckType::AuthorizeIf, false) => (
                next_policy,
                self.next_check_or(policy, check, FORBIDDEN),
            ),
            (CheckType::AuthorizeIf, true) => (AUTHORIZED.to_owned(), next_policy),
            (CheckType::ForbidIf, false) => (
                FORBIDDEN.to_owned(),
                self.next_check_or(policy, check, &next_policy),
            ),
            (CheckType::ForbidIf, true) => {
                let on_false = self.next_check_or(policy, check, &next_policy);
                (next_policy, on_false)
            }
            (CheckType::AuthorizeUnless, false) => (
                self.next_check_or(policy, check, FORBIDDEN),
                next_policy,
            ),
            (CheckType::AuthorizeUnless, true) => (next_policy, AUTHORIZED.to_owned()),
            (CheckType::ForbidUnless, false) => (
                self.next_check_or(policy, check, &next_policy),
                FORBIDDEN.to_owned(),
            ),
            (CheckType::ForbidUnless, true) => {
                let on_true = self.next_check_or(policy, check, &next_policy);
                (on_true, next_policy)
            }
        }
    }
}

fn policy_subgraph(
    i: usize,
    policy: &Policy,
    router: &Router<'_>,
    not_applicable: &str,
    describer: &dyn DescribeCheck,
) -> Subgraph {
    let cond_id = conditions_id(i);
    // A check-less bypass grants access outright; a check-less regular policy
    // imposes nothing.
    let applies = match (policy.checks.is_empty(), policy.bypass) {
        (false, _) => check_id(i, 0),
        (true, true) => AUTHORIZED.to_owned(),
        (true, false) => router.next_policy(i),
    };

    let mut entries = vec![
        Entry::Node(Node::decision(&cond_id, &condition_label(policy, describer))),
        Entry::Edge(Edge::labeled(&cond_id, &applies, TRUE_LABEL)),
        Entry::Edge(Edge::labeled(&cond_id, not_applicable, FALSE_LABEL)),
    ];

    for (j, check) in policy.checks.iter().enumerate() {
        let id = check_id(i, j);
        let (on_true, on_false) = router.check_targets(i, j);
        entries.push(Entry::Node(Node::decision(&id, &describer.describe(&check.check))));
        entries.push(Entry::Edge(Edge::labeled(&id, &on_true, TRUE_LABEL)));
        entries.push(Entry::Edge(Edge::labeled(&id, &on_false, FALSE_LABEL)));
    }

    let title = match &policy.description {
        Some(description) => description.clone(),
        None if policy.bypass => format!("Bypass policy {}", i + 1),
        None => format!("Policy {}", i + 1),
    };
    Subgraph::new(&format!("policy_{i}"), &title, entries)
}
