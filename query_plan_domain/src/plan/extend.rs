//! # Plan Extension Pass (§4.6)
//!
//! Post-order: injects the `decryption`/`encryption` nodes needed at every
//! boundary where an assignee's authorization falls short of what a
//! neighbor exposes, plus the terminal decryption that gets the result back
//! to the requesting user in plaintext. Every insertion recomputes the new
//! node's own profile immediately (§4.1: "Profiles are recomputed after any
//! structural rewrite"), so a later step in the same pass that reads a
//! just-inserted node's profile sees accurate data rather than the
//! all-empty default — the full-tree recompute at the end then cleans up
//! every node, including the ones this pass never touched.
use crate::catalog::{AttributeSet, Catalog};
use crate::error::PlanError;
use crate::plan::node::{Node, NodeId, OperatorKind};
use crate::plan::profile::compute_profile;
use crate::plan::tree::PlanTree;

/// Runs the extension pass over the whole tree, post-order, then recomputes
/// every node's profile so §3's invariants hold end to end.
pub fn extend_plan(tree: &mut PlanTree, catalog: &Catalog) -> Result<(), PlanError> {
    let order = tree.post_order();
    for id in order {
        extend_at(tree, catalog, id);
    }
    for id in tree.post_order() {
        compute_profile(tree, catalog, id);
    }
    Ok(())
}

fn extend_at(tree: &mut PlanTree, catalog: &Catalog, id: NodeId) {
    if tree.get(id).cryptographic {
        return;
    }

    if tree.get(id).op == OperatorKind::Query {
        extend_root(tree, catalog, id);
        return;
    }

    insert_child_decryptions(tree, catalog, id);
    insert_parent_encryption(tree, catalog, id);
}

/// At the synthetic root: if anything the original plan's output still
/// carries re-encrypted or encrypted reaches `U`, insert one terminal
/// decryption node between the root and its subtree.
fn extend_root(tree: &mut PlanTree, catalog: &Catalog, root_id: NodeId) {
    let child_id = match tree.children(root_id).first().copied() {
        Some(c) => c,
        None => return,
    };
    let child_profile = tree.get(child_id).profile.clone();
    let decrypt: AttributeSet = child_profile.ve.union(&child_profile.v_enc).copied().collect();
    if decrypt.is_empty() {
        return;
    }

    let new_id = tree.alloc_id();
    let mut crypto = Node::new_crypto(new_id, OperatorKind::Decryption, decrypt);
    crypto.assignee = tree.get(root_id).assignee.clone();
    tree.insert_above(child_id, crypto);
    compute_profile(tree, catalog, new_id);
}

/// For each of `id`'s current children: if `id`'s own `Ap` needs an
/// attribute in plaintext that the child can only supply re-encrypted or
/// encrypted, insert a decryption node between them, assigned to `id`'s
/// assignee.
fn insert_child_decryptions(tree: &mut PlanTree, catalog: &Catalog, id: NodeId) {
    let node_ap = tree.get(id).ap.clone();
    let assignee = tree.get(id).assignee.clone();
    let children = tree.get(id).children.clone();

    for child_id in children {
        let child_profile = tree.get(child_id).profile.clone();
        let child_encrypted: AttributeSet = child_profile.ve.union(&child_profile.v_enc).copied().collect();
        let dec: AttributeSet = node_ap
            .intersection(&child_encrypted)
            .copied()
            .collect::<AttributeSet>()
            .difference(&child_profile.vp)
            .copied()
            .collect();
        if dec.is_empty() {
            continue;
        }

        let new_id = tree.alloc_id();
        let mut crypto = Node::new_crypto(new_id, OperatorKind::Decryption, dec);
        crypto.assignee = assignee.clone();
        tree.insert_above(child_id, crypto);
        compute_profile(tree, catalog, new_id);
    }
}

/// If `id` is not the root and its (non-cryptographic) parent needs an
/// attribute that `id` exposes in plaintext, but only in deterministically
/// re-encrypted form, insert an encryption node between `id` and the
/// parent, assigned to `id`'s own assignee.
fn insert_parent_encryption(tree: &mut PlanTree, catalog: &Catalog, id: NodeId) {
    if tree.is_root(id) {
        return;
    }
    let parent_id = match tree.parent(id) {
        Some(p) => p,
        None => return,
    };
    if tree.get(parent_id).cryptographic {
        return;
    }
    let parent_assignee = match tree.get(parent_id).assignee.clone() {
        Some(a) => a,
        None => return,
    };

    let auth = catalog.authorization(&parent_assignee);
    let node_vp = tree.get(id).profile.vp.clone();
    let enc: AttributeSet = node_vp.intersection(&auth.enc).copied().collect();
    if enc.is_empty() {
        return;
    }

    let my_assignee = tree.get(id).assignee.clone();
    let new_id = tree.alloc_id();
    let mut crypto = Node::new_crypto(new_id, OperatorKind::Encryption, enc);
    crypto.assignee = my_assignee;
    tree.insert_above(id, crypto);
    compute_profile(tree, catalog, new_id);
}
