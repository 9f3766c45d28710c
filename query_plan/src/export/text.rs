//! Indented-text rendering: one line per node, children nested under their
//! parent, carrying the fields an operator or analyst would want to read
//! off a compiled plan at a glance — assignee, size, and the three
//! visibility sets.

use std::io::Write;

use query_plan_domain::catalog::{format_attribute_set, Catalog};
use query_plan_domain::plan::{NodeId, PlanTree};

use crate::error::ReadError;

use super::PlanExporter;

/// Renders the tree as indented text, depth-first from the root.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextExporter;

impl PlanExporter for TextExporter {
    fn export(&self, tree: &PlanTree, _catalog: &Catalog, out: &mut dyn Write) -> Result<(), ReadError> {
        write_node(tree, tree.root(), 0, out)?;
        Ok(())
    }
}

fn write_node(tree: &PlanTree, id: NodeId, depth: usize, out: &mut dyn Write) -> Result<(), ReadError> {
    let node = tree.get(id);
    let assignee = node.assignee.as_ref().map(|s| s.to_string()).unwrap_or_else(|| "?".to_string());
    let label = node.print_label.as_deref().unwrap_or("");

    writeln!(
        out,
        "{}#{} {} [assignee={}, size={}] vp={{{}}} ve={{{}}} vE={{{}}}{}",
        "  ".repeat(depth),
        node.id,
        node.op,
        assignee,
        node.size,
        format_attribute_set(&node.profile.vp),
        format_attribute_set(&node.profile.ve),
        format_attribute_set(&node.profile.v_enc),
        if label.is_empty() { String::new() } else { format!(" \"{label}\"") },
    )?;

    for &child in &node.children {
        write_node(tree, child, depth + 1, out)?;
    }
    Ok(())
}
