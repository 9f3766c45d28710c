//! Graphviz DOT rendering. `spec.md` §1 explicitly carves "exporting the
//! resulting tree to a diagram" out of the core's scope as an external
//! collaborator's job; this produces the DOT source such a collaborator
//! (e.g. a `dot -Tsvg` invocation) would consume, not the rendered image.

use std::io::Write;

use query_plan_domain::catalog::{format_attribute_set, Catalog};
use query_plan_domain::plan::{NodeId, PlanTree};

use crate::error::ReadError;

use super::PlanExporter;

#[derive(Debug, Default, Clone, Copy)]
pub struct GraphvizExporter;

impl PlanExporter for GraphvizExporter {
    fn export(&self, tree: &PlanTree, _catalog: &Catalog, out: &mut dyn Write) -> Result<(), ReadError> {
        writeln!(out, "digraph plan {{")?;
        writeln!(out, "  node [shape=box, fontname=\"monospace\"];")?;
        for id in tree.pre_order() {
            write_node_decl(tree, id, out)?;
        }
        for id in tree.pre_order() {
            for &child in tree.children(id) {
                writeln!(out, "  n{child} -> n{id};")?;
            }
        }
        writeln!(out, "}}")?;
        Ok(())
    }
}

fn write_node_decl(tree: &PlanTree, id: NodeId, out: &mut dyn Write) -> Result<(), ReadError> {
    let node = tree.get(id);
    let assignee = node.assignee.as_ref().map(|s| s.to_string()).unwrap_or_else(|| "?".to_string());
    let color = if node.cryptographic { "lightgoldenrod1" } else { "white" };
    let label = format!(
        "{}\\n#{}\\nassignee={}\\nvp={{{}}} ve={{{}}} vE={{{}}}",
        node.op,
        node.id,
        assignee,
        format_attribute_set(&node.profile.vp),
        format_attribute_set(&node.profile.ve),
        format_attribute_set(&node.profile.v_enc),
    );
    writeln!(out, "  n{id} [label=\"{label}\", style=filled, fillcolor={color}];")?;
    Ok(())
}
