//! Read-only Graphviz export of the tree shape for external visualization.

use std::fmt::Display;
use std::io::{self, Write};

use crate::node::NodeId;
use crate::tree::{Comparator, OrdSet};

/// Serialize the tree as a Graphviz digraph: one record per node with its
/// identity, key, color, and links, plus explicit gray boxes for sentinel
/// children. Walks the tree without mutating it; the caller chooses where
/// the output goes.
pub fn write_dot<K, C, W>(set: &OrdSet<K, C>, out: &mut W) -> io::Result<()>
where
    K: Display,
    C: Comparator<K>,
    W: Write,
{
    writeln!(out, "digraph G {{")?;
    writeln!(out, "    rankdir=TB;")?;
    writeln!(
        out,
        "    node [style=filled, fontname=\"Helvetica\", fontcolor=darkblue, \
         fillcolor=peachpuff, color=\"#252A34\", penwidth=2.5];"
    )?;
    writeln!(out, "    bgcolor=\"lemonchiffon\";")?;
    writeln!(out)?;

    list_nodes(set, set.root_id(), out)?;
    writeln!(out)?;
    connect_nodes(set, set.root_id(), out)?;

    writeln!(out, "}}")
}

fn link_name(id: NodeId) -> String {
    if id.is_nil() {
        "nil".to_owned()
    } else {
        format!("node_{}", id.index())
    }
}

fn list_nodes<K, C, W>(set: &OrdSet<K, C>, id: NodeId, out: &mut W) -> io::Result<()>
where
    K: Display,
    C: Comparator<K>,
    W: Write,
{
    if id.is_nil() {
        return Ok(());
    }
    let node = set.node(id);
    let fillcolor = if node.is_red() { "salmon" } else { "lightgray" };

    writeln!(
        out,
        "    node_{id}[shape=Mrecord; style=filled; fillcolor={fill}; color=\"#000000\"; \
         fontcolor=\"#000000\"; label=\"{{ node_{id} | key: {key} | parent: {parent} | \
         {{ left: {left} | right: {right} }} }}\"];",
        id = id.index(),
        fill = fillcolor,
        key = set.key(id),
        parent = link_name(node.parent),
        left = link_name(node.left),
        right = link_name(node.right),
    )?;

    list_nodes(set, node.left, out)?;
    list_nodes(set, node.right, out)
}

fn connect_nodes<K, C, W>(set: &OrdSet<K, C>, id: NodeId, out: &mut W) -> io::Result<()>
where
    K: Display,
    C: Comparator<K>,
    W: Write,
{
    if id.is_nil() {
        return Ok(());
    }
    let node = set.node(id);

    for (child, tag) in [(node.left, "L"), (node.right, "R")] {
        if !child.is_nil() {
            writeln!(out, "    node_{} -> node_{};", id.index(), child.index())?;
        } else {
            writeln!(
                out,
                "    nil_{id}_{tag} [shape=Mrecord; style=filled; fillcolor=lightgray; \
                 color=\"#000000\"; fontcolor=\"#000000\"; label=\"nil_node\"];",
                id = id.index(),
                tag = tag,
            )?;
            writeln!(out, "    node_{} -> nil_{}_{};", id.index(), id.index(), tag)?;
        }
    }

    connect_nodes(set, node.left, out)?;
    connect_nodes(set, node.right, out)
}
