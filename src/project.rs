use std::collections::HashMap;

use crate::DescribeCheck;
use crate::flowchart::{
    AUTHORIZED, Edge, Entry, FALSE_LABEL, FORBIDDEN, Flowchart, Node, START, TRUE_LABEL,
    results_entries,
};
use crate::tree::{DecisionTree, NodeId, TreeRef};
use crate::types::ChartOptions;

/// Project a decision tree onto flowchart entries.
///
/// Each distinct decision node becomes exactly one rhombus, however many
/// paths reach it. The first time a node is reached it is emitted with an id
/// derived from the path taken (`l` for the false branch, `r` for the true
/// branch) and its two outgoing edges are labelled `False` / `True`; every
/// later path only draws an edge to the already emitted node.
///
/// A `true` leaf draws an edge into `authorized`. A `false` leaf draws nothing
/// unless [`ChartOptions::explicit_forbidden`] is set. A tree that is the
/// constant `false` becomes `start --> forbidden`.
#[must_use]
pub fn project(
    tree: &DecisionTree,
    describer: &dyn DescribeCheck,
    options: &ChartOptions,
) -> Flowchart {
    let mut entries = vec![Entry::Node(Node::terminal(START))];

    if tree.root() == TreeRef::False {
        entries.push(Entry::Edge(Edge::new(START, FORBIDDEN)));
        entries.extend(results_entries(false, true));
        return Flowchart::new(options.direction, entries);
    }

    let mut projector = Projector {
        tree,
        describer,
        explicit_forbidden: options.explicit_forbidden,
        cache: HashMap::new(),
        uses_forbidden: false,
    };
    let body = projector.traverse(tree.root(), START, &mut String::new());
    entries.extend(body);
    entries.extend(results_entries(true, projector.uses_forbidden));

    Flowchart::new(options.direction, entries)
}

/// Id of the decision node first reached along `path`.
fn decision_id(path: &str) -> String {
    if path.is_empty() {
        "check".to_owned()
    } else {
        format!("check_{path}")
    }
}

struct Projector<'a> {
    tree: &'a DecisionTree,
    describer: &'a dyn DescribeCheck,
    explicit_forbidden: bool,
    cache: HashMap<NodeId, String>,
    uses_forbidden: bool,
}

impl Projector<'_> {
    fn traverse(&mut self, at: TreeRef, from: &str, path: &mut String) -> Vec<Entry> {
        let id = match at {
            TreeRef::True => return vec![Entry::Edge(Edge::new(from, AUTHORIZED))],
            TreeRef::False if self.explicit_forbidden => {
                self.uses_forbidden = true;
                return vec![Entry::Edge(Edge::new(from, FORBIDDEN))];
            }
            TreeRef::False => return Vec::new(),
            TreeRef::Node(id) => id,
        };

        if let Some(existing) = self.cache.get(&id) {
            return vec![Entry::Edge(Edge::new(from, existing))];
        }

        let tree = self.tree;
        let decision = tree.node(id);
        let node_id = decision_id(path);
        let mut entries = vec![
            Entry::Node(Node::decision(
                &node_id,
                &self.describer.describe(&decision.check),
            )),
            Entry::Edge(Edge::new(from, &node_id)),
        ];

        path.push('l');
        let mut on_false = self.traverse(decision.on_false, &node_id, path);
        path.pop();
        path.push('r');
        let mut on_true = self.traverse(decision.on_true, &node_id, path);
        path.pop();

        promote_first_edge(&mut on_false, &node_id, FALSE_LABEL);
        promote_first_edge(&mut on_true, &node_id, TRUE_LABEL);
        entries.append(&mut on_false);
        entries.append(&mut on_true);

        self.cache.insert(id, node_id);
        entries
    }
}

/// Label the first unlabeled edge leaving `from` and drop any further
/// unlabeled edges leaving it, so the branch contributes a single decision edge.
fn promote_first_edge(entries: &mut Vec<Entry>, from: &str, label: &str) {
    let mut promoted = false;
    entries.retain_mut(|entry| match entry {
        Entry::Edge(edge) if edge.from == from && edge.label.is_none() => {
            if promoted {
                false
            } else {
                edge.label = Some(label.to_owned());
                promoted = true;
                true
            }
        }
        _ => true,
    });
}
