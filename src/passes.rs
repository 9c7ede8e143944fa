//! Rewrite passes that remove provably redundant structure from a chart.
//!
//! Every pass preserves the set of paths from `start` to the sinks; the
//! fixpoint passes give up silently (with a warning) when their iteration cap
//! is reached and return the chart as it stands.

use std::collections::HashSet;

use crate::flowchart::{
    AUTHORIZED, Edge, Entry, FALSE_LABEL, FORBIDDEN, Flowchart, OR_LABEL, RESULTS, START, Shape,
    StyleDirective, TRUE_LABEL, collect_edges, collect_nodes, escape_label, results_entries,
};
use crate::types::{ALWAYS_FALSE, ALWAYS_TRUE};

/// Run all passes in order: always-links, constant nodes, empty subgraphs.
#[must_use]
pub fn simplify_chart(chart: Flowchart, max_iterations: usize) -> Flowchart {
    let chart = remove_always_links(chart, max_iterations);
    let chart = collapse_constant_nodes(chart, max_iterations);
    remove_empty_subgraphs(chart)
}

/// Splice out nodes labelled `always true` / `always false`.
///
/// Every edge into such a node is redirected to the target of the node's
/// statically chosen `True` / `False` edge. When that edge does not exist the
/// branch is an implicit forbid, so the incoming edges go to `forbidden`.
///
/// After a splice, structure no longer reachable from `start` is dropped and
/// the `Results` sinks are re-emitted to match the remaining edges.
#[must_use]
pub fn remove_always_links(chart: Flowchart, max_iterations: usize) -> Flowchart {
    let always_true = escape_label(ALWAYS_TRUE);
    let always_false = escape_label(ALWAYS_FALSE);
    let mut spliced = false;
    let mut chart = fixpoint("remove_always_links", chart, max_iterations, |entries| {
        let changed = remove_one_always_node(entries, &always_true, &always_false);
        spliced |= changed;
        changed
    });
    if spliced {
        prune_unreachable(&mut chart.entries);
    }
    chart
}

/// Remove decision nodes whose `True` and `False` edges share a destination,
/// pointing their incoming edges straight at it.
///
/// Redirected edges keep a `True` / `False` label they already had. Unlabeled
/// ones stay unlabeled when the destination is a sink and are marked `Or`
/// otherwise.
#[must_use]
pub fn collapse_constant_nodes(chart: Flowchart, max_iterations: usize) -> Flowchart {
    fixpoint("collapse_constant_nodes", chart, max_iterations, collapse_one_node)
}

/// Delete subgraphs left without nodes or nested subgraphs. Their remaining
/// edges and style directives move into the enclosing entry list.
#[must_use]
pub fn remove_empty_subgraphs(mut chart: Flowchart) -> Flowchart {
    chart.entries = hoist_empty_subgraphs(std::mem::take(&mut chart.entries));
    chart
}

fn fixpoint(
    pass: &str,
    mut chart: Flowchart,
    max_iterations: usize,
    mut step: impl FnMut(&mut Vec<Entry>) -> bool,
) -> Flowchart {
    for iteration in 0..max_iterations {
        if !step(&mut chart.entries) {
            tracing::trace!(pass, iteration, "pass converged");
            return chart;
        }
    }
    tracing::warn!(pass, max_iterations, "pass stopped at iteration cap");
    chart
}

fn remove_one_always_node(entries: &mut Vec<Entry>, always_true: &str, always_false: &str) -> bool {
    let found = {
        let mut nodes = Vec::new();
        collect_nodes(entries, &mut nodes);
        let mut edges = Vec::new();
        collect_edges(entries, &mut edges);

        nodes.iter().find_map(|node| {
            let branch = if node.label == always_true {
                TRUE_LABEL
            } else if node.label == always_false {
                FALSE_LABEL
            } else {
                return None;
            };
            let target = edges
                .iter()
                .find(|e| e.from == node.id && e.has_label(branch))
                .map_or_else(|| FORBIDDEN.to_owned(), |e| e.to.clone());
            (target != node.id).then(|| (node.id.clone(), target))
        })
    };

    let Some((id, target)) = found else {
        return false;
    };

    retain_entries(entries, &|entry| match entry {
        Entry::Node(node) => node.id != id,
        Entry::Edge(edge) => edge.from != id,
        Entry::Subgraph(_) | Entry::Style(_) => true,
    });
    for_each_edge_mut(entries, &mut |edge| {
        if edge.to == id {
            edge.to.clone_from(&target);
        }
    });
    dedup_edges(entries);

    tracing::trace!(node = %id, to = %target, "removed always node");
    true
}

/// Drop nodes and edges that `start` no longer reaches, then rebuild the
/// `Results` subgraph from the sinks still in use. Charts without a `start`
/// node are left alone.
fn prune_unreachable(entries: &mut Vec<Entry>) {
    let reachable = {
        let mut nodes = Vec::new();
        collect_nodes(entries, &mut nodes);
        if !nodes.iter().any(|n| n.id == START) {
            return;
        }
        let mut edges = Vec::new();
        collect_edges(entries, &mut edges);

        let mut reachable = HashSet::new();
        let mut stack = vec![START.to_owned()];
        while let Some(id) = stack.pop() {
            if !reachable.contains(&id) {
                stack.extend(edges.iter().filter(|e| e.from == id).map(|e| e.to.clone()));
                reachable.insert(id);
            }
        }
        reachable
    };

    retain_entries(entries, &|entry| match entry {
        Entry::Node(node) => is_sink(&node.id) || reachable.contains(&node.id),
        Entry::Edge(edge) => reachable.contains(&edge.from),
        Entry::Subgraph(_) | Entry::Style(_) => true,
    });

    let has_results = entries
        .iter()
        .any(|e| matches!(e, Entry::Subgraph(sub) if sub.id == RESULTS));
    if has_results {
        entries.retain(|entry| match entry {
            Entry::Subgraph(sub) => sub.id != RESULTS,
            Entry::Style(style) => !is_sink_style(style),
            Entry::Node(_) | Entry::Edge(_) => true,
        });
        entries.extend(results_entries(
            reachable.contains(AUTHORIZED),
            reachable.contains(FORBIDDEN),
        ));
    }
    tracing::trace!(reachable = reachable.len(), "pruned unreachable structure");
}

fn is_sink(id: &str) -> bool {
    id == AUTHORIZED || id == FORBIDDEN
}

fn is_sink_style(style: &StyleDirective) -> bool {
    match style {
        StyleDirective::ClassDef { name, .. } => is_sink(name),
        StyleDirective::Class { class, .. } => is_sink(class),
    }
}

fn collapse_one_node(entries: &mut Vec<Entry>) -> bool {
    let found = {
        let mut nodes = Vec::new();
        collect_nodes(entries, &mut nodes);
        let mut edges = Vec::new();
        collect_edges(entries, &mut edges);

        nodes
            .iter()
            .filter(|node| node.shape == Shape::Rhombus)
            .find_map(|node| {
                let branch_target = |label: &str| {
                    edges
                        .iter()
                        .find(|e| e.from == node.id && e.has_label(label))
                        .map(|e| e.to.as_str())
                };
                match (branch_target(TRUE_LABEL), branch_target(FALSE_LABEL)) {
                    (Some(t), Some(f)) if t == f && t != node.id => {
                        Some((node.id.clone(), t.to_owned()))
                    }
                    _ => None,
                }
            })
    };

    let Some((id, target)) = found else {
        return false;
    };

    retain_entries(entries, &|entry| match entry {
        Entry::Node(node) => node.id != id,
        Entry::Edge(edge) => edge.from != id,
        Entry::Subgraph(_) | Entry::Style(_) => true,
    });
    let into_sink = is_sink(&target);
    for_each_edge_mut(entries, &mut |edge| {
        if edge.to == id {
            edge.to.clone_from(&target);
            if edge.label.is_none() && !into_sink {
                edge.label = Some(OR_LABEL.to_owned());
            }
        }
    });
    dedup_edges(entries);

    tracing::trace!(node = %id, to = %target, "collapsed constant node");
    true
}

fn hoist_empty_subgraphs(entries: Vec<Entry>) -> Vec<Entry> {
    let mut out = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry {
            Entry::Subgraph(mut sub) => {
                sub.entries = hoist_empty_subgraphs(sub.entries);
                let keeps_content = sub
                    .entries
                    .iter()
                    .any(|e| matches!(e, Entry::Node(_) | Entry::Subgraph(_)));
                if keeps_content {
                    out.push(Entry::Subgraph(sub));
                } else {
                    tracing::trace!(subgraph = %sub.id, "removed empty subgraph");
                    out.extend(sub.entries);
                }
            }
            other => out.push(other),
        }
    }
    out
}

fn retain_entries(entries: &mut Vec<Entry>, keep: &impl Fn(&Entry) -> bool) {
    entries.retain(|entry| keep(entry));
    for entry in entries.iter_mut() {
        if let Entry::Subgraph(sub) = entry {
            retain_entries(&mut sub.entries, keep);
        }
    }
}

fn for_each_edge_mut(entries: &mut [Entry], f: &mut impl FnMut(&mut Edge)) {
    for entry in entries {
        match entry {
            Entry::Edge(edge) => f(edge),
            Entry::Subgraph(sub) => for_each_edge_mut(&mut sub.entries, f),
            Entry::Node(_) | Entry::Style(_) => {}
        }
    }
}

/// Drop repeated identical edges, keeping the first in emission order.
fn dedup_edges(entries: &mut Vec<Entry>) {
    fn walk(entries: &mut Vec<Entry>, seen: &mut HashSet<Edge>) {
        entries.retain(|entry| match entry {
            Entry::Edge(edge) => seen.insert(edge.clone()),
            _ => true,
        });
        for entry in entries.iter_mut() {
            if let Entry::Subgraph(sub) = entry {
                walk(&mut sub.entries, seen);
            }
        }
    }
    walk(entries, &mut HashSet::new());
}
