//! # Cost Model (§4.4)
//!
//! `compute_cost` fills in `node.comp_cost`, a per-subject cost estimate
//! accumulated bottom-up (post-order), covering three of the five terms
//! §4.4 describes: the operator's own computational weight, the cost of
//! decrypting attributes this node exposes in plaintext that a storage
//! provider holds encrypted, and the cost of delegating re-encryption of
//! `totAe` attributes a subject cannot see in plaintext itself.
//!
//! The remaining two terms — transfer cost against a specific parent
//! assignee, and the running `to_enc_dec` obligation cost — depend on
//! state only the top-down assignment pass (§4.5) has (the parent's chosen
//! assignee, the pass-local `to_enc_dec` set), so they are added on top of
//! `node.comp_cost` at selection time by [`crate::plan::assignment`] rather
//! than stored here. This mirrors the pipeline's own separation: `compute_cost`
//! runs as one post-order pass, `compute_assignment` as a distinct pre-order
//! one, and a node's children must already know their own cost for *every*
//! subject in the catalog, not only the subjects that end up candidates —
//! an ancestor may pick an assignee for itself that isn't a candidate of an
//! arbitrary descendant.
use std::collections::BTreeMap;

use crate::catalog::{Attribute, Catalog};
use crate::plan::node::NodeId;
use crate::plan::tree::PlanTree;

/// Runs the cost pass over the whole tree, post-order.
pub fn compute_cost(tree: &mut PlanTree, catalog: &Catalog) {
    for id in tree.post_order() {
        compute_cost_at(tree, catalog, id);
    }
}

fn compute_cost_at(tree: &mut PlanTree, catalog: &Catalog, id: NodeId) {
    let node = tree.get(id);
    let weight = node.op.weight();
    let children: Vec<NodeId> = node.children.clone();
    let profile_vp = node.profile.vp.clone();
    let tot_ae = node.tot_ae.clone();

    let mut costs = BTreeMap::new();
    for subject in catalog.subjects() {
        let sid = &subject.id;
        let mut cost = weight.saturating_mul(subject.comp_price);

        for &child in &children {
            cost = cost.saturating_add(*tree.get(child).comp_cost.get(sid).unwrap_or(&0));
        }

        let auth = catalog.authorization(sid);

        // Decryption cost: attributes this node surfaces in plaintext that
        // the subject is also authorized to see in plaintext, but that some
        // relation holds encrypted at rest.
        for a in profile_vp.intersection(&auth.plain) {
            for rel_idx in catalog.relations_with_enc_attr(*a) {
                let rel = catalog.relation(rel_idx);
                cost = cost.saturating_add(rel.dec_cost_of(*a).saturating_mul(subject.comp_price));
            }
        }

        // Delegated re-encryption cost: totAe attributes the subject cannot
        // view in plaintext, priced at the catalog-wide average prices plus
        // this subject's own transfer price.
        for a in tot_ae.iter().copied() {
            if auth.plain.contains(&a) {
                continue;
            }
            for rel_idx in catalog.relations_with_enc_attr(a) {
                cost = cost.saturating_add(delegated_reencryption_cost(catalog, rel_idx, a, subject.transfer_price));
            }
        }

        costs.insert(sid.clone(), cost);
    }

    tree.get_mut(id).comp_cost = costs;
}

fn delegated_reencryption_cost(catalog: &Catalog, rel_idx: usize, a: Attribute, transfer_price: u64) -> u64 {
    let rel = catalog.relation(rel_idx);
    let comp_term = rel
        .dec_cost_of(a)
        .saturating_add(rel.enc_cost_of(a))
        .saturating_mul(catalog.avg_comp_price());
    let transfer_term = rel.size_of(a).saturating_mul(catalog.avg_transfer_price().saturating_add(transfer_price));
    comp_term.saturating_add(transfer_term)
}

/// Extra cost, on top of `node.comp_cost[subject]`, of re-encrypting
/// attributes `to_enc_dec` that `subject` can already view in plaintext —
/// §4.4's fourth cost term, evaluated by the assignment pass once it knows
/// the running obligation set.
pub fn to_enc_dec_cost(catalog: &Catalog, subject: &crate::catalog::SubjectId, to_enc_dec: &crate::catalog::AttributeSet) -> u64 {
    let auth = catalog.authorization(subject);
    let comp_price = catalog.comp_price(subject);
    let mut cost = 0u64;
    for a in to_enc_dec.iter().copied() {
        if !auth.plain.contains(&a) {
            continue;
        }
        for rel_idx in catalog.relations_with_enc_attr(a) {
            let rel = catalog.relation(rel_idx);
            cost = cost.saturating_add(rel.dec_cost_of(a).saturating_add(rel.enc_cost_of(a)).saturating_mul(comp_price));
        }
    }
    cost
}

/// Transfer cost of shipping `node`'s output to a subject other than the
/// parent's assignee — §4.4's second cost term.
pub fn transfer_cost(catalog: &Catalog, size: u64, subject: &crate::catalog::SubjectId, parent_assignee: Option<&crate::catalog::SubjectId>) -> u64 {
    if parent_assignee == Some(subject) {
        0
    } else {
        size.saturating_mul(catalog.transfer_price(subject))
    }
}
