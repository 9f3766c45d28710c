//! # Compiler Driver
//!
//! Wires the whole tree (§2 of the specification) together: attach the
//! synthetic `query` root over whatever subtree was read from `tree.csv`,
//! then run the four compiler passes in order, each a full traversal of its
//! own before the next begins — nothing here interleaves passes, matching
//! the specification's staged pipeline.

use std::collections::VecDeque;

use crate::catalog::{Catalog, SubjectId};
use crate::error::PlanError;
use crate::plan::assignment::compute_assignment;
use crate::plan::candidates::identify_candidates;
use crate::plan::cost::compute_cost;
use crate::plan::extend::extend_plan;
use crate::plan::node::{Node, OperatorKind};
use crate::plan::profile::compute_profile;
use crate::plan::tree::PlanTree;

/// Attaches the synthetic `query` root above `tree`'s current root and
/// compiles the whole thing: candidate identification, cost, assignment,
/// extension, and a final profile sweep.
///
/// `manual` is the optional manual-assignment override queue threaded
/// through to [`compute_assignment`]; pass an empty queue for ordinary
/// compilation.
pub fn compile(tree: &mut PlanTree, catalog: &Catalog, manual: &mut VecDeque<SubjectId>) -> Result<(), PlanError> {
    compile_observed(tree, catalog, manual, |_| {})
}

/// As [`compile`], but calls `on_pass` with the name of each pass just
/// before it runs. This crate has no logging dependency of its own
/// (a compiler core should stay silent and testable); `on_pass` is how a
/// caller that does own a logger — `query_plan`'s driver use case — narrates
/// the five-pass pipeline without this crate depending on `tracing`.
pub fn compile_observed(
    tree: &mut PlanTree,
    catalog: &Catalog,
    manual: &mut VecDeque<SubjectId>,
    mut on_pass: impl FnMut(&str),
) -> Result<(), PlanError> {
    on_pass("attach_query_root");
    attach_query_root(tree, catalog);

    on_pass("identify_candidates");
    identify_candidates(tree, catalog)?;
    on_pass("compute_cost");
    compute_cost(tree, catalog);
    on_pass("compute_assignment");
    compute_assignment(tree, catalog, manual)?;
    on_pass("extend_plan");
    extend_plan(tree, catalog)?;

    Ok(())
}

/// Inserts the synthetic `query` node above the tree's current root,
/// unless the root is already a `query` node (idempotent re-compilation).
fn attach_query_root(tree: &mut PlanTree, catalog: &Catalog) {
    let root_id = tree.root();
    if tree.get(root_id).op == OperatorKind::Query {
        return;
    }

    let new_id = tree.alloc_id();
    let mut query = Node::new(new_id, OperatorKind::Query, Default::default(), Default::default(), Default::default(), None, false, 0, None)
        .expect("synthetic query root has empty, pairwise-disjoint Ap/Ae/As");
    query.assignee = Some(SubjectId::user());

    tree.insert_above(root_id, query);
    compute_profile(tree, catalog, new_id);
}
