//! # Catalog Readers
//!
//! Turns the four CSV tables `spec.md` §6 describes into the in-memory
//! types `query_plan_domain::catalog` and `query_plan_domain::plan::tree`
//! expect. Each sub-module owns one file; [`read_catalog`] ties them
//! together and resolves the one cross-file reference (`relations.csv`'s
//! `node_id` binding a relation to a `tree.csv` leaf).

pub mod authorizations;
pub mod relations;
pub mod subjects;
pub mod tree;

use std::collections::HashMap;
use std::path::Path;

use query_plan_domain::catalog::Catalog;
use query_plan_domain::plan::{NodeId, PlanTree};

use crate::error::ReadError;

/// Reads all four catalog files from `dir` (expected to contain
/// `tree.csv`, `relations.csv`, `subjects.csv`, `authorizations.csv`) and
/// returns the plan tree (before the synthetic `query` root is attached)
/// plus the fully assembled [`Catalog`].
pub fn read_catalog(dir: &Path) -> Result<(PlanTree, Catalog), ReadError> {
    let (mut nodes, root) = tree::read_tree(&dir.join("tree.csv"))?;
    let (relations, bindings) = relations::read_relations(&dir.join("relations.csv"))?;
    let subjects = subjects::read_subjects(&dir.join("subjects.csv"))?;
    let authorizations = authorizations::read_authorizations(&dir.join("authorizations.csv"))?;

    bind_relations(&mut nodes, &bindings)?;

    let catalog = Catalog::new(relations, subjects, authorizations)?;
    let tree = PlanTree::new(nodes, root);
    Ok((tree, catalog))
}

/// Binds each parsed relation to the leaf node named by its `node_id`
/// column, failing if the id doesn't resolve to a node in `tree.csv`.
fn bind_relations(
    nodes: &mut HashMap<NodeId, query_plan_domain::plan::Node>,
    bindings: &[(NodeId, usize)],
) -> Result<(), ReadError> {
    for &(node_id, relation_idx) in bindings {
        let node = nodes.get_mut(&node_id).ok_or(ReadError::DanglingNodeId(node_id))?;
        node.relation = Some(relation_idx);
    }
    Ok(())
}
