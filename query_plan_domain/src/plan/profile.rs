//! # Profile Algebra
//!
//! `compute_profile` derives the six visibility sets described in the
//! glossary (`vp`, `ve`, `v_enc`, `ip`, `ie`, `eq`) for a single node from
//! its children's already-computed profiles. Pure function of
//! `(node parameters, children profiles)` — idempotent given fixed
//! children (spec. invariant 5), and safe to re-run after any structural
//! rewrite.

use std::collections::BTreeSet;

use crate::catalog::{Attribute, AttributeSet, Catalog};
use crate::plan::node::OperatorKind;
use crate::plan::tree::PlanTree;
use crate::plan::NodeId;

/// `vE` in the spec is spelled `v_enc` here: Rust identifiers are
/// case-insensitive to the borrow checker but not to a reader scanning a
/// diff, and `ve`/`vE` differing only in case invites a transposition bug
/// at every call site.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    /// Visible in plaintext.
    pub vp: AttributeSet,
    /// Visible, re-encrypted (deterministic encryption, not the original
    /// key).
    pub ve: AttributeSet,
    /// Visible, encrypted under the original key.
    pub v_enc: AttributeSet,
    /// Read to evaluate the operator but not surfaced in its output,
    /// plaintext form.
    pub ip: AttributeSet,
    /// As `ip`, but for attributes read in encrypted/re-encrypted form.
    pub ie: AttributeSet,
    /// Equivalence classes: attribute sets that must be seen under one
    /// consistent representation (deterministic-encryption comparisons).
    pub eq: BTreeSet<AttributeSet>,
}

impl Profile {
    fn union(a: &Profile, b: &Profile) -> Profile {
        Profile {
            vp: a.vp.union(&b.vp).copied().collect(),
            ve: a.ve.union(&b.ve).copied().collect(),
            v_enc: a.v_enc.union(&b.v_enc).copied().collect(),
            ip: a.ip.union(&b.ip).copied().collect(),
            ie: a.ie.union(&b.ie).copied().collect(),
            eq: a.eq.union(&b.eq).cloned().collect(),
        }
    }
}

/// Recomputes `node.profile` (and `node.tot_ap`/`node.tot_ae`) from its
/// children's current profiles, per §4.1. Children must already have
/// up-to-date profiles — callers drive this in post-order.
pub fn compute_profile(tree: &mut PlanTree, catalog: &Catalog, id: NodeId) {
    let node = tree.get(id);

    if node.is_leaf() {
        let profile = match node.relation {
            Some(rel_idx) => {
                let rel = catalog.relation(rel_idx);
                Profile {
                    vp: rel.plain.clone(),
                    ve: AttributeSet::new(),
                    v_enc: rel.enc.clone(),
                    ip: AttributeSet::new(),
                    ie: AttributeSet::new(),
                    eq: BTreeSet::new(),
                }
            }
            None => Profile::default(),
        };
        let ap = node.ap.clone();
        let ae = node.ae.clone();
        let node = tree.get_mut(id);
        node.tot_ap = ap;
        node.tot_ae = ae;
        node.profile = profile;
        return;
    }

    let op = node.op;
    let ap = node.ap.clone();
    let ae = node.ae.clone();
    let a_s = node.a_s.clone();
    let group_attr = node.group_attr;
    let select_multi_attr = node.select_multi_attr;
    let children: Vec<NodeId> = node.children.clone();
    let cryptographic = node.cryptographic;

    let mut profile = children
        .iter()
        .map(|c| tree.get(*c).profile.clone())
        .fold(Profile::default(), |acc, p| Profile::union(&acc, &p));

    let tot_ap: AttributeSet = children
        .iter()
        .fold(ap.clone(), |acc, c| acc.union(&tree.get(*c).tot_ap).copied().collect());
    let tot_ae: AttributeSet = children
        .iter()
        .fold(ae.clone(), |acc, c| acc.union(&tree.get(*c).tot_ae).copied().collect());

    if !cryptographic {
        if !ap.is_empty() {
            profile.vp = profile.vp.union(&ap).copied().collect();
            profile.ve = profile.ve.difference(&ap).copied().collect();
            profile.v_enc = profile.v_enc.difference(&ap).copied().collect();
        }
        if !ae.is_empty() {
            profile.vp = profile.vp.difference(&ae).copied().collect();
            profile.ve = profile.ve.union(&ae).copied().collect();
            profile.v_enc = profile.v_enc.difference(&ae).copied().collect();
        }
    }

    apply_operator_rule(&mut profile, op, &ap, &ae, &a_s, group_attr, select_multi_attr, cryptographic);

    let node = tree.get_mut(id);
    node.tot_ap = tot_ap;
    node.tot_ae = tot_ae;
    node.profile = profile;
}

#[allow(clippy::too_many_arguments)]
fn apply_operator_rule(
    profile: &mut Profile,
    op: OperatorKind,
    ap: &AttributeSet,
    ae: &AttributeSet,
    a_s: &AttributeSet,
    group_attr: Option<Attribute>,
    select_multi_attr: bool,
    cryptographic: bool,
) {
    match op {
        OperatorKind::Projection => {
            let total: AttributeSet = ap.union(ae).copied().collect::<AttributeSet>().union(a_s).copied().collect();
            profile.vp = profile.vp.intersection(&total).copied().collect();
            profile.ve = profile.ve.intersection(&total).copied().collect();
            profile.v_enc = profile.v_enc.intersection(&total).copied().collect();
        }
        OperatorKind::Selection => {
            if select_multi_attr {
                for class in [ap, ae, a_s] {
                    if !class.is_empty() {
                        profile.eq.insert(class.clone());
                    }
                }
            } else {
                profile.ip = profile.ip.union(&profile.vp.intersection(ap).copied().collect()).copied().collect();
                let ae_as: AttributeSet = ae.union(a_s).copied().collect();
                let visible_enc: AttributeSet = profile.ve.union(&profile.v_enc).copied().collect();
                profile.ie = profile
                    .ie
                    .union(&visible_enc.intersection(&ae_as).copied().collect())
                    .copied()
                    .collect();
            }
        }
        OperatorKind::Cartesian => {}
        OperatorKind::Join => {
            let total: AttributeSet = ap.union(ae).copied().collect::<AttributeSet>().union(a_s).copied().collect();
            if !total.is_empty() {
                profile.eq.insert(total);
            }
        }
        OperatorKind::GroupBy => {
            let mut total: AttributeSet = ap.union(ae).copied().collect::<AttributeSet>().union(a_s).copied().collect();
            if let Some(g) = group_attr {
                total.insert(g);
            }
            profile.vp = profile.vp.intersection(&total).copied().collect();
            profile.ve = profile.ve.intersection(&total).copied().collect();
            profile.v_enc = profile.v_enc.intersection(&total).copied().collect();

            if let Some(g) = group_attr {
                if profile.vp.contains(&g) {
                    profile.ip.insert(g);
                }
                if profile.ve.contains(&g) || profile.v_enc.contains(&g) {
                    profile.ie.insert(g);
                }
            }
        }
        OperatorKind::Encryption => {
            profile.vp = profile.vp.difference(ap).copied().collect();
            profile.ve = profile.ve.union(ap).copied().collect();
        }
        OperatorKind::Decryption => {
            profile.vp = profile.vp.union(ae).copied().collect();
            profile.ve = profile.ve.difference(ae).copied().collect();
            profile.v_enc = profile.v_enc.difference(ae).copied().collect();
        }
        OperatorKind::ReEncryption => {
            profile.ve = profile.ve.union(ae).copied().collect();
            profile.v_enc = profile.v_enc.difference(ae).copied().collect();
        }
        OperatorKind::Query => {
            debug_assert!(!cryptographic);
        }
    }
}
