use std::fmt;

use super::{Edge, Entry, Flowchart, Node, Shape, StyleDirective, Subgraph};

const INDENT: &str = "    ";

impl fmt::Display for Flowchart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "flowchart {}", self.direction.keyword())?;
        write_entries(f, &self.entries, 1)
    }
}

fn write_entries(f: &mut fmt::Formatter<'_>, entries: &[Entry], depth: usize) -> fmt::Result {
    for entry in entries {
        match entry {
            Entry::Node(node) => write_node(f, node, depth)?,
            Entry::Edge(edge) => write_edge(f, edge, depth)?,
            Entry::Subgraph(sub) => write_subgraph(f, sub, depth)?,
            Entry::Style(style) => write_style(f, style, depth)?,
        }
    }
    Ok(())
}

fn indent(f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        f.write_str(INDENT)?;
    }
    Ok(())
}

fn write_node(f: &mut fmt::Formatter<'_>, node: &Node, depth: usize) -> fmt::Result {
    indent(f, depth)?;
    let (open, close) = match node.shape {
        Shape::Circle => ("((", "))"),
        Shape::Rhombus => ("{", "}"),
        Shape::Rectangle => ("[", "]"),
    };
    writeln!(f, "{}{open}{}{close}", node.id, node.label)
}

fn write_edge(f: &mut fmt::Formatter<'_>, edge: &Edge, depth: usize) -> fmt::Result {
    indent(f, depth)?;
    match &edge.label {
        Some(label) => writeln!(f, "{} -->|{label}| {}", edge.from, edge.to),
        None => writeln!(f, "{} --> {}", edge.from, edge.to),
    }
}

fn write_subgraph(f: &mut fmt::Formatter<'_>, sub: &Subgraph, depth: usize) -> fmt::Result {
    indent(f, depth)?;
    writeln!(f, "subgraph {} [{}]", sub.id, sub.label)?;
    write_entries(f, &sub.entries, depth + 1)?;
    indent(f, depth)?;
    writeln!(f, "end")
}

fn write_style(f: &mut fmt::Formatter<'_>, style: &StyleDirective, depth: usize) -> fmt::Result {
    indent(f, depth)?;
    match style {
        StyleDirective::ClassDef { name, declarations } => {
            writeln!(f, "classDef {name} {declarations}")
        }
        StyleDirective::Class { node_ids, class } => {
            writeln!(f, "class {} {class}", node_ids.join(","))
        }
    }
}
