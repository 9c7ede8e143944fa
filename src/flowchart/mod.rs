//! Flowchart entries produced by the chart builders.
//!
//! A [`Flowchart`] is an ordered list of [`Entry`] values; its `Display`
//! implementation composes Mermaid flowchart text.

mod escape;
mod render;

pub use escape::{escape_label, escape_text};

/// Id of the entry node of every chart.
pub const START: &str = "start";
/// Id of the sink reached when the request is authorized.
pub const AUTHORIZED: &str = "authorized";
/// Id of the sink reached when the request is forbidden.
pub const FORBIDDEN: &str = "forbidden";
/// Id of the subgraph holding the sinks.
pub const RESULTS: &str = "results";

/// Edge label taken when a decision holds.
pub const TRUE_LABEL: &str = "True";
/// Edge label taken when a decision does not hold.
pub const FALSE_LABEL: &str = "False";
/// Edge label used when a collapsed decision is bypassed.
pub const OR_LABEL: &str = "Or";

/// Style declarations of the `authorized` class.
pub const AUTHORIZED_STYLE: &str = "fill:#4CAF50,stroke:#1B5E20,color:#fff";
/// Style declarations of the `forbidden` class.
pub const FORBIDDEN_STYLE: &str = "fill:#F44336,stroke:#B71C1C,color:#fff";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    #[default]
    TopDown,
    BottomUp,
    LeftRight,
    RightLeft,
}

impl Direction {
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Direction::TopDown => "TB",
            Direction::BottomUp => "BT",
            Direction::LeftRight => "LR",
            Direction::RightLeft => "RL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Shape {
    /// Start and sink nodes.
    Circle,
    /// Decisions.
    Rhombus,
    /// Plain text.
    Rectangle,
}

/// A chart node. `label` is stored escaped and quoted, ready for emission.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub id: String,
    pub label: String,
    pub shape: Shape,
}

impl Node {
    /// Create a node, escaping `text` into its label.
    #[must_use]
    pub fn new(id: &str, text: &str, shape: Shape) -> Self {
        Self {
            id: id.to_owned(),
            label: escape_label(text),
            shape,
        }
    }

    #[must_use]
    pub fn decision(id: &str, text: &str) -> Self {
        Self::new(id, text, Shape::Rhombus)
    }

    /// A circle whose label is its own id.
    #[must_use]
    pub fn terminal(id: &str) -> Self {
        Self::new(id, id, Shape::Circle)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub label: Option<String>,
}

impl Edge {
    #[must_use]
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_owned(),
            to: to.to_owned(),
            label: None,
        }
    }

    #[must_use]
    pub fn labeled(from: &str, to: &str, label: &str) -> Self {
        Self {
            from: from.to_owned(),
            to: to.to_owned(),
            label: Some(label.to_owned()),
        }
    }

    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        self.label.as_deref() == Some(label)
    }
}

/// A named visual container.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Subgraph {
    pub id: String,
    pub label: String,
    pub entries: Vec<Entry>,
}

impl Subgraph {
    #[must_use]
    pub fn new(id: &str, text: &str, entries: Vec<Entry>) -> Self {
        Self {
            id: id.to_owned(),
            label: escape_label(text),
            entries,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StyleDirective {
    /// Declare a named style class.
    ClassDef { name: String, declarations: String },
    /// Assign nodes to a style class.
    Class { node_ids: Vec<String>, class: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Entry {
    Node(Node),
    Edge(Edge),
    Subgraph(Subgraph),
    Style(StyleDirective),
}

/// A complete chart.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Flowchart {
    pub direction: Direction,
    pub entries: Vec<Entry>,
}

impl Flowchart {
    #[must_use]
    pub fn new(direction: Direction, entries: Vec<Entry>) -> Self {
        Self { direction, entries }
    }

    /// Every node, including those nested in subgraphs, in emission order.
    #[must_use]
    pub fn nodes(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        collect_nodes(&self.entries, &mut out);
        out
    }

    /// Every edge, including those nested in subgraphs, in emission order.
    #[must_use]
    pub fn edges(&self) -> Vec<&Edge> {
        let mut out = Vec::new();
        collect_edges(&self.entries, &mut out);
        out
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes().into_iter().find(|n| n.id == id)
    }

    #[must_use]
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.edges().iter().any(|e| e.from == from && e.to == to)
    }

    /// Every subgraph, including nested ones.
    #[must_use]
    pub fn subgraphs(&self) -> Vec<&Subgraph> {
        let mut out = Vec::new();
        collect_subgraphs(&self.entries, &mut out);
        out
    }
}

pub(crate) fn collect_nodes<'a>(entries: &'a [Entry], out: &mut Vec<&'a Node>) {
    for entry in entries {
        match entry {
            Entry::Node(node) => out.push(node),
            Entry::Subgraph(sub) => collect_nodes(&sub.entries, out),
            Entry::Edge(_) | Entry::Style(_) => {}
        }
    }
}

pub(crate) fn collect_edges<'a>(entries: &'a [Entry], out: &mut Vec<&'a Edge>) {
    for entry in entries {
        match entry {
            Entry::Edge(edge) => out.push(edge),
            Entry::Subgraph(sub) => collect_edges(&sub.entries, out),
            Entry::Node(_) | Entry::Style(_) => {}
        }
    }
}

fn collect_subgraphs<'a>(entries: &'a [Entry], out: &mut Vec<&'a Subgraph>) {
    for entry in entries {
        if let Entry::Subgraph(sub) = entry {
            out.push(sub);
            collect_subgraphs(&sub.entries, out);
        }
    }
}

/// The `Results` subgraph holding whichever sinks are in use, followed by the
/// two style classes and their assignments.
#[must_use]
pub fn results_entries(authorized: bool, forbidden: bool) -> Vec<Entry> {
    let mut sinks = Vec::new();
    if authorized {
        sinks.push(Entry::Node(Node::terminal(AUTHORIZED)));
    }
    if forbidden {
        sinks.push(Entry::Node(Node::terminal(FORBIDDEN)));
    }

    let mut entries = vec![
        Entry::Subgraph(Subgraph::new(RESULTS, "Results", sinks)),
        Entry::Style(StyleDirective::ClassDef {
            name: AUTHORIZED.to_owned(),
            declarations: AUTHORIZED_STYLE.to_owned(),
        }),
        Entry::Style(StyleDirective::ClassDef {
            name: FORBIDDEN.to_owned(),
            declarations: FORBIDDEN_STYLE.to_owned(),
        }),
    ];
    for (used, id) in [(authorized, AUTHORIZED), (forbidden, FORBIDDEN)] {
        if used {
            entries.push(Entry::Style(StyleDirective::Class {
                node_ids: vec![id.to_owned()],
                class: id.to_owned(),
            }));
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Flowchart {
        Flowchart::new(
            Direction::TopDown,
            vec![
                Entry::Node(Node::terminal(START)),
                Entry::Node(Node::decision("d", "owner")),
                Entry::Edge(Edge::new(START, "d")),
                Entry::Edge(Edge::labeled("d", AUTHORIZED, TRUE_LABEL)),
                Entry::Subgraph(Subgraph::new(
                    "outer",
                    "Outer",
                    vec![Entry::Subgraph(Subgraph::new(
                        "inner",
                        "Inner",
                        vec![Entry::Node(Node::terminal(AUTHORIZED))],
                    ))],
                )),
            ],
        )
    }

    #[test]
    fn nodes_include_nested() {
        let chart = sample();
        let ids: Vec<&str> = chart.nodes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["start", "d", "authorized"]);
    }

    #[test]
    fn edges_and_lookup() {
        let chart = sample();
        assert_eq!(chart.edges().len(), 2);
        assert!(chart.has_edge("d", "authorized"));
        assert!(!chart.has_edge("authorized", "d"));
        assert_eq!(chart.node("d").map(|n| n.shape), Some(Shape::Rhombus));
    }

    #[test]
    fn subgraphs_include_nested() {
        assert_eq!(sample().subgraphs().len(), 2);
    }

    #[test]
    fn node_label_is_escaped() {
        let node = Node::decision("x", "a < b");
        assert_eq!(node.label, "\"a &lt; b\"");
    }

    #[test]
    fn edge_labels() {
        let edge = Edge::labeled("a", "b", TRUE_LABEL);
        assert!(edge.has_label("True"));
        assert!(!Edge::new("a", "b").has_label("True"));
    }

    #[test]
    fn results_with_both_sinks() {
        let entries = results_entries(true, true);
        assert_eq!(entries.len(), 5);
        match &entries[0] {
            Entry::Subgraph(sub) => assert_eq!(sub.entries.len(), 2),
            other => panic!("expected Results subgraph, got {other:?}"),
        }
    }

    #[test]
    fn results_with_one_sink() {
        let entries = results_entries(false, true);
        let assignments: Vec<&StyleDirective> = entries
            .iter()
            .filter_map(|e| match e {
                Entry::Style(s @ StyleDirective::Class { .. }) => Some(s),
                _ => None,
            })
            .collect();
        assert_eq!(
            assignments,
            vec![&StyleDirective::Class {
                node_ids: vec!["forbidden".into()],
                class: "forbidden".into(),
            }]
        );
    }
}
