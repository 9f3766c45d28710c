//! # Candidate Identification (§4.3)
//!
//! Bottom-up pass: every leaf is a candidate for every subject; every
//! internal node inherits its children's candidate pools when doing so is
//! sound (their `Ap` is already implicit at the parent), and otherwise
//! starts from the whole subject list, filtering either way by
//! [`is_authorized`].

use crate::catalog::{Catalog, SubjectId};
use crate::error::PlanError;
use crate::plan::authorize::is_authorized;
use crate::plan::profile::compute_profile;
use crate::plan::tree::PlanTree;
use crate::plan::NodeId;

/// Runs candidate identification over the whole tree, post-order.
pub fn identify_candidates(tree: &mut PlanTree, catalog: &Catalog) -> Result<(), PlanError> {
    for id in tree.post_order() {
        identify_candidates_at(tree, catalog, id)?;
    }
    Ok(())
}

fn identify_candidates_at(tree: &mut PlanTree, catalog: &Catalog, id: NodeId) -> Result<(), PlanError> {
    compute_profile(tree, catalog, id);

    let candidates = if tree.get(id).is_leaf() {
        // §4.3: every leaf is a candidate for every subject, unfiltered —
        // the storage provider is fixed by the leaf's relation regardless
        // of who else could "execute" it, so authorization is checked only
        // once the assignment pass binds the leaf to its storage provider.
        catalog.subject_ids()
    } else {
        let pool = initial_pool(tree, catalog, id);
        pool.into_iter()
            .filter(|subject_id| {
                let auth = catalog.authorization(subject_id);
                is_authorized(&auth, tree, id)
            })
            .collect()
    };

    if candidates.is_empty() {
        let node = tree.get(id);
        return Err(PlanError::NoCandidate {
            node_id: id,
            context: node.op.to_string(),
        });
    }

    tree.get_mut(id).candidates = candidates;
    Ok(())
}

/// The pool of subjects to test for node `id`: the deduplicated union of
/// children's candidate lists (first child's order preserved) when every
/// child's `Ap` is already implicit at the parent (`child.ap ⊆ node.ip`),
/// else the full subject list in ascending-price order.
fn initial_pool(tree: &PlanTree, catalog: &Catalog, id: NodeId) -> Vec<SubjectId> {
    let node = tree.get(id);
    let children = &node.children;
    let ip = node.profile.ip.clone();

    let all_inherited = children.iter().all(|&c| tree.get(c).ap.is_subset(&ip));

    if all_inherited {
        let mut seen = std::collections::BTreeSet::new();
        let mut pool = Vec::new();
        for &c in children {
            for subject_id in &tree.get(c).candidates {
                if seen.insert(subject_id.clone()) {
                    pool.push(subject_id.clone());
                }
            }
        }
        pool
    } else {
        catalog.subject_ids()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{parse_attribute_set, Authorization, AttributeSet, Relation, Subject};
    use crate::plan::node::{Node, OperatorKind};
    use std::collections::{BTreeMap, HashMap};

    fn relation(storage: &str, plain: &str, enc: &str) -> Relation {
        let plain_set = parse_attribute_set(plain);
        let enc_set = parse_attribute_set(enc);
        let all: AttributeSet = plain_set.union(&enc_set).copied().collect();
        Relation::new(
            "R",
            SubjectId::from(storage),
            AttributeSet::new(),
            plain_set,
            enc_set,
            all.iter().map(|a| (*a, 1)).collect::<BTreeMap<_, _>>(),
            all.iter().map(|a| (*a, 1)).collect::<BTreeMap<_, _>>(),
            all.iter().map(|a| (*a, 1)).collect::<BTreeMap<_, _>>(),
        )
        .unwrap()
    }

    /// S5: leaves over `NPSD` authorize all of X, Y, Z; a join on `N,S`
    /// with `Ae`-only children narrows candidates to Z alone.
    #[test]
    fn s5_candidate_authorization() {
        let rel = relation("S", "NPSD", "");
        let mut auths = HashMap::new();
        auths.insert(SubjectId::from("X"), Authorization::new(parse_attribute_set("CD"), parse_attribute_set("S")));
        auths.insert(SubjectId::from("Y"), Authorization::new(parse_attribute_set("NP"), parse_attribute_set("SD")));
        auths.insert(SubjectId::from("Z"), Authorization::new(parse_attribute_set("NS"), parse_attribute_set("DP")));

        let subjects = vec![Subject::new("X", 1, 1), Subject::new("Y", 2, 2), Subject::new("Z", 3, 3)];
        let catalog = Catalog::new(vec![rel], subjects, auths).unwrap();

        let leaf1 = 1;
        let leaf2 = 2;
        let proj1 = 3;
        let proj2 = 4;
        let join_id = 5;

        let mut l1 = Node::new(leaf1, OperatorKind::Projection, AttributeSet::new(), AttributeSet::new(), AttributeSet::new(), None, false, 1, None).unwrap();
        l1.relation = Some(0);
        l1.parent = Some(proj1);
        let mut l2 = Node::new(leaf2, OperatorKind::Projection, AttributeSet::new(), AttributeSet::new(), AttributeSet::new(), None, false, 1, None).unwrap();
        l2.relation = Some(0);
        l2.parent = Some(proj2);

        let mut p1 = Node::new(proj1, OperatorKind::Projection, AttributeSet::new(), parse_attribute_set("NP"), AttributeSet::new(), None, false, 1, None).unwrap();
        p1.children = vec![leaf1];
        p1.parent = Some(join_id);
        let mut p2 = Node::new(proj2, OperatorKind::Projection, AttributeSet::new(), parse_attribute_set("SD"), AttributeSet::new(), None, false, 1, None).unwrap();
        p2.children = vec![leaf2];
        p2.parent = Some(join_id);

        let mut join = Node::new(join_id, OperatorKind::Join, parse_attribute_set("NS"), AttributeSet::new(), AttributeSet::new(), None, false, 1, None).unwrap();
        join.children = vec![proj1, proj2];

        let mut nodes = HashMap::new();
        nodes.insert(leaf1, l1);
        nodes.insert(leaf2, l2);
        nodes.insert(proj1, p1);
        nodes.insert(proj2, p2);
        nodes.insert(join_id, join);
        let mut tree = PlanTree::new(nodes, join_id);

        identify_candidates(&mut tree, &catalog).unwrap();

        let leaf_candidates: Vec<String> = tree.get(leaf1).candidates.iter().map(|s| s.0.clone()).collect();
        assert_eq!(leaf_candidates, vec!["X", "Y", "Z"]);

        let join_candidates: Vec<String> = tree.get(join_id).candidates.iter().map(|s| s.0.clone()).collect();
        assert_eq!(join_candidates, vec!["Z"]);
    }

    #[test]
    fn empty_candidate_set_is_fatal() {
        let rel = relation("S", "N", "");
        let subjects = vec![Subject::new("X", 1, 1)];
        let catalog = Catalog::new(vec![rel], subjects, HashMap::new()).unwrap();

        let leaf_id = 1;
        let mut leaf = Node::new(leaf_id, OperatorKind::Projection, AttributeSet::new(), AttributeSet::new(), AttributeSet::new(), None, false, 1, None).unwrap();
        leaf.relation = Some(0);
        let mut nodes = HashMap::new();
        nodes.insert(leaf_id, leaf);
        let mut tree = PlanTree::new(nodes, leaf_id);

        let err = identify_candidates(&mut tree, &catalog).unwrap_err();
        assert!(matches!(err, PlanError::NoCandidate { .. }));
    }
}
