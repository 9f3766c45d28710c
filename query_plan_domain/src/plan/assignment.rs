//! # Assignment Pass (§4.5)
//!
//! Pre-order, mutating: picks one assignee per node from its candidate
//! list, inserting `re-encryption` nodes wherever a chosen assignee can't
//! (or won't) carry an obligation forward itself, and threading a single
//! pass-local `to_enc_dec` set down the flattened pre-order walk — the
//! source material disagrees on whether that set should fork per branch;
//! this implementation keeps one set threaded sequentially through the
//! whole traversal, matching §4.5's literal wording ("a mutable set",
//! singular, "traversal is pre-order from root").
use std::collections::VecDeque;

use crate::catalog::{format_attribute_set, AttributeSet, Catalog, SubjectId};
use crate::error::PlanError;
use crate::plan::authorize::is_authorized;
use crate::plan::cost::{to_enc_dec_cost, transfer_cost};
use crate::plan::node::{Node, NodeId, OperatorKind};
use crate::plan::profile::compute_profile;
use crate::plan::tree::PlanTree;

/// Runs the assignment pass over the whole tree, pre-order.
///
/// `manual` is the optional "manual assignment" override (§9 design note):
/// consumed head-first at each non-leaf, non-cryptographic node visited, for
/// reproducing textbook examples. Empty in normal operation.
pub fn compute_assignment(tree: &mut PlanTree, catalog: &Catalog, manual: &mut VecDeque<SubjectId>) -> Result<(), PlanError> {
    let order = tree.pre_order();
    let mut to_enc_dec = AttributeSet::new();

    for id in order {
        let node = tree.get(id);
        if node.cryptographic {
            continue;
        }
        if node.op == OperatorKind::Query {
            tree.get_mut(id).assignee = Some(SubjectId::user());
            continue;
        }
        if node.is_leaf() {
            assign_leaf(tree, catalog, id, &mut to_enc_dec)?;
        } else {
            assign_internal(tree, catalog, id, &mut to_enc_dec, manual)?;
        }
    }
    Ok(())
}

fn assign_leaf(tree: &mut PlanTree, catalog: &Catalog, id: NodeId, to_enc_dec: &mut AttributeSet) -> Result<(), PlanError> {
    let rel_idx = tree.get(id).relation.unwrap_or_else(|| panic!("leaf node {id} has no bound relation"));
    let relation = catalog.relation(rel_idx);
    let storage = relation.storage.clone();
    tree.get_mut(id).assignee = Some(storage);

    let pending: AttributeSet = to_enc_dec.intersection(&relation.enc).copied().collect();
    if pending.is_empty() {
        return Ok(());
    }

    // Candidates for a leaf are every subject (§4.3), already in ascending
    // price order courtesy of `Catalog::new`'s sort.
    let candidates = tree.get(id).candidates.clone();
    let mut unresolved = pending.clone();

    for attr in pending.iter().copied() {
        for subject_id in &candidates {
            let auth = catalog.authorization(subject_id);
            if !auth.plain.contains(&attr) {
                continue;
            }
            if !is_authorized(&auth, tree, id) {
                continue;
            }
            let new_id = tree.alloc_id();
            let mut crypto = Node::new_crypto(new_id, OperatorKind::ReEncryption, AttributeSet::from([attr]));
            crypto.assignee = Some(subject_id.clone());
            tree.insert_above(id, crypto);
            compute_profile(tree, catalog, new_id);

            unresolved.remove(&attr);
            to_enc_dec.remove(&attr);
            break;
        }
    }

    if !unresolved.is_empty() {
        return Err(PlanError::UnresolvableReencryption {
            node_id: id,
            attrs: format_attribute_set(&unresolved),
        });
    }
    Ok(())
}

fn assign_internal(
    tree: &mut PlanTree,
    catalog: &Catalog,
    id: NodeId,
    to_enc_dec: &mut AttributeSet,
    manual: &mut VecDeque<SubjectId>,
) -> Result<(), PlanError> {
    let candidates = tree.get(id).candidates.clone();

    let s_min = match manual.pop_front() {
        Some(chosen) => {
            if !candidates.contains(&chosen) {
                return Err(PlanError::InputValidation(format!(
                    "manual assignment {chosen} for node {id} is not among its candidates"
                )));
            }
            chosen
        }
        None => select_cheapest(tree, catalog, id, &candidates, to_enc_dec),
    };

    tree.get_mut(id).assignee = Some(s_min.clone());
    let auth = catalog.authorization(&s_min);

    // Step 2: attributes already owed by an ancestor that this assignee can
    // itself re-encrypt — settle them here.
    let resolved: AttributeSet = to_enc_dec.intersection(&auth.plain).copied().collect();
    if !resolved.is_empty() {
        let new_id = tree.alloc_id();
        let mut crypto = Node::new_crypto(new_id, OperatorKind::ReEncryption, resolved.clone());
        crypto.assignee = Some(s_min.clone());
        tree.insert_above(id, crypto);
        compute_profile(tree, catalog, new_id);
        for a in &resolved {
            to_enc_dec.remove(a);
        }
    }

    // Step 3: attributes this node re-encrypts (its own Ae) that the
    // assignee cannot carry out itself become a new obligation on
    // whichever ancestor can.
    let node_ae = tree.get(id).ae.clone();
    let delegated: AttributeSet = node_ae.difference(&auth.plain).copied().collect();
    to_enc_dec.extend(delegated);

    // Step 4: the Ae attributes the assignee *can* re-encrypt locally are
    // pushed down as re-encryption children just above the leaves that
    // actually hold them encrypted, skipping any attribute an intervening
    // descendant already re-encrypts.
    let local: AttributeSet = node_ae.intersection(&auth.plain).copied().collect();
    if !local.is_empty() {
        for &leaf_id in &tree.leaves_under(id) {
            let rel_idx = match tree.get(leaf_id).relation {
                Some(r) => r,
                None => continue,
            };
            let rel_enc = catalog.relation(rel_idx).enc.clone();
            for attr in local.iter().copied() {
                if !rel_enc.contains(&attr) {
                    continue;
                }
                if tree.covered_by_descendant_ae(id, leaf_id, attr) {
                    continue;
                }
                let new_id = tree.alloc_id();
                let mut crypto = Node::new_crypto(new_id, OperatorKind::ReEncryption, AttributeSet::from([attr]));
                crypto.assignee = Some(s_min.clone());
                tree.insert_above(leaf_id, crypto);
                compute_profile(tree, catalog, new_id);
            }
        }
    }

    Ok(())
}

/// Picks the cheapest candidate for `id`, ties broken by first appearance
/// in the (already price-ascending) candidate list — `Iterator::min_by_key`
/// keeps the first minimal element on ties, which gives that ordering for
/// free as long as `candidates` is iterated in its original order.
fn select_cheapest(tree: &PlanTree, catalog: &Catalog, id: NodeId, candidates: &[SubjectId], to_enc_dec: &AttributeSet) -> SubjectId {
    let parent_assignee = tree.parent(id).and_then(|p| tree.get(p).assignee.clone());
    let size = tree.get(id).size;
    let base_costs = &tree.get(id).comp_cost;

    candidates
        .iter()
        .min_by_key(|s| {
            let base = *base_costs.get(*s).unwrap_or(&0);
            let transfer = transfer_cost(catalog, size, s, parent_assignee.as_ref());
            let obligation = to_enc_dec_cost(catalog, s, to_enc_dec);
            base.saturating_add(transfer).saturating_add(obligation)
        })
        .cloned()
        .unwrap_or_else(|| panic!("node {id} has no candidates at assignment time"))
}
