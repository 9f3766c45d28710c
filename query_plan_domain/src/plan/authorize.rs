//! # Authorization Predicate
//!
//! `is_authorized` implements §4.2: a subject is a viable candidate for a
//! node only if everything that node (and each of its direct children)
//! exposes is within that subject's authorized visibility, and the subject
//! sees every attribute in a frozen equivalence class under one consistent
//! representation.

use crate::catalog::{Authorization, AttributeSet};
use crate::plan::tree::PlanTree;
use crate::plan::NodeId;

/// True if `auth` authorizes `subject` to be assigned `id` — i.e. for `id`
/// and each of its direct children, every attribute surfaced in plaintext
/// or implicit-plaintext form is in `auth.plain`, every attribute surfaced
/// encrypted/re-encrypted or implicit-encrypted is in `auth.plain ∪
/// auth.enc`, and every frozen equivalence class is either entirely within
/// `auth.plain` or entirely within `auth.plain ∪ auth.enc` (uniform
/// visibility: a subject may never see part of a class in plaintext and
/// part only in encrypted form, since that would let it break the
/// encryption by comparison).
pub fn is_authorized(auth: &Authorization, tree: &PlanTree, id: NodeId) -> bool {
    let visible = auth.visible();

    if !node_satisfies(auth, &visible, tree, id) {
        return false;
    }
    for &child in tree.children(id) {
        if !node_satisfies(auth, &visible, tree, child) {
            return false;
        }
    }
    true
}

fn node_satisfies(auth: &Authorization, visible: &AttributeSet, tree: &PlanTree, id: NodeId) -> bool {
    let profile = &tree.get(id).profile;

    let plain_exposed: AttributeSet = profile.vp.union(&profile.ip).copied().collect();
    if !plain_exposed.is_subset(&auth.plain) {
        return false;
    }

    let enc_exposed: AttributeSet = profile.ve.union(&profile.v_enc).copied().collect::<AttributeSet>().union(&profile.ie).copied().collect();
    if !enc_exposed.is_subset(visible) {
        return false;
    }

    for class in &profile.eq {
        let in_plain = class.is_subset(&auth.plain);
        let in_visible = class.is_subset(visible);
        if !in_plain && !in_visible {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{parse_attribute_set, Catalog, Subject};
    use crate::plan::node::{Node, OperatorKind};
    use crate::plan::profile::compute_profile;
    use std::collections::{BTreeSet, HashMap};

    fn sample_catalog() -> Catalog {
        Catalog::new(vec![], vec![Subject::new("S", 1, 1)], HashMap::new()).unwrap()
    }

    fn leaf_with_profile(id: NodeId, vp: &str, ve: &str, v_enc: &str) -> Node {
        let mut n = Node::new(id, OperatorKind::Projection, AttributeSet::new(), AttributeSet::new(), AttributeSet::new(), None, false, 1, None).unwrap();
        n.profile.vp = parse_attribute_set(vp);
        n.profile.ve = parse_attribute_set(ve);
        n.profile.v_enc = parse_attribute_set(v_enc);
        n
    }

    fn single_node_tree(node: Node) -> PlanTree {
        let id = node.id;
        let mut nodes = HashMap::new();
        nodes.insert(id, node);
        PlanTree::new(nodes, id)
    }

    #[test]
    fn authorized_when_visibility_covers_exposure() {
        let catalog = sample_catalog();
        let _ = catalog;
        let tree = single_node_tree(leaf_with_profile(1, "N", "S", ""));
        let auth = Authorization::new(parse_attribute_set("N"), parse_attribute_set("S"));
        assert!(is_authorized(&auth, &tree, 1));
    }

    #[test]
    fn unauthorized_when_plaintext_exposure_exceeds_visibility() {
        let tree = single_node_tree(leaf_with_profile(1, "NP", "", ""));
        let auth = Authorization::new(parse_attribute_set("N"), AttributeSet::new());
        assert!(!is_authorized(&auth, &tree, 1));
    }

    #[test]
    fn unauthorized_when_equivalence_class_split_across_visibility() {
        let mut node = leaf_with_profile(1, "", "", "");
        node.profile.eq = BTreeSet::from([parse_attribute_set("NS")]);
        let tree = single_node_tree(node);
        let auth = Authorization::new(parse_attribute_set("N"), parse_attribute_set("S"));
        assert!(!is_authorized(&auth, &tree, 1));
    }

    #[test]
    fn authorized_when_equivalence_class_uniformly_plain() {
        let mut node = leaf_with_profile(1, "NS", "", "");
        node.profile.eq = BTreeSet::from([parse_attribute_set("NS")]);
        let tree = single_node_tree(node);
        let auth = Authorization::new(parse_attribute_set("NS"), AttributeSet::new());
        assert!(is_authorized(&auth, &tree, 1));
    }

    #[test]
    fn child_exposure_is_also_checked() {
        let parent_id = 2;
        let mut parent = Node::new(parent_id, OperatorKind::Selection, AttributeSet::new(), AttributeSet::new(), AttributeSet::new(), None, false, 1, None).unwrap();
        parent.children = vec![1];
        let mut child = leaf_with_profile(1, "NP", "", "");
        child.parent = Some(parent_id);

        let mut nodes = HashMap::new();
        nodes.insert(1, child);
        nodes.insert(parent_id, parent.clone());
        let mut tree = PlanTree::new(nodes, parent_id);
        compute_profile(&mut tree, &sample_catalog(), parent_id);

        let auth = Authorization::new(parse_attribute_set("N"), AttributeSet::new());
        assert!(!is_authorized(&auth, &tree, parent_id));
    }
}
