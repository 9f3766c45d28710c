//! # Plan Tree
//!
//! A mutable, rooted, ordered tree of operator [`Node`]s, held in an arena
//! ([`PlanTree`]) and addressed by [`NodeId`] rather than by owned
//! parent/child pointers — traversals index into the arena, and structural
//! rewrites (§4.5, §4.6) just relink ids.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::catalog::{Attribute, AttributeSet, RelationIdx, SubjectId};
use crate::error::PlanError;
use crate::plan::profile::Profile;

/// Identifies a node within a [`PlanTree`]. Leaf/operator nodes read from
/// `tree.csv` keep the CSV's 1-based `ID`; nodes synthesized by the
/// assignment and extension passes get ids allocated past the highest id
/// seen in the input (`PlanTree::alloc_id`).
pub type NodeId = usize;

/// The kind of relational or cryptographic operation a node performs.
///
/// A flat enum rather than a trait-object hierarchy: the operator set is
/// fixed and small (spec. §3), and a `match` over kinds is what every pass
/// in this compiler needs — there's no case for dynamic dispatch here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OperatorKind {
    Projection,
    Selection,
    Cartesian,
    Join,
    GroupBy,
    Encryption,
    Decryption,
    ReEncryption,
    /// Synthetic root representing the requesting user. Never present in
    /// `tree.csv` — only the driver inserts it.
    Query,
}

impl OperatorKind {
    /// True for the three cryptographic operator kinds.
    pub fn is_cryptographic(self) -> bool {
        matches!(self, OperatorKind::Encryption | OperatorKind::Decryption | OperatorKind::ReEncryption)
    }

    /// Fixed per-operator computational weight used by the cost model
    /// (§4.4). `Query` has no weight: the synthetic root never executes,
    /// it only receives the final decryption's output.
    pub fn weight(self) -> u64 {
        match self {
            OperatorKind::Projection => 1,
            OperatorKind::Selection => 3,
            OperatorKind::Cartesian => 5,
            OperatorKind::Join => 5,
            OperatorKind::GroupBy => 2,
            OperatorKind::Encryption => 2,
            OperatorKind::Decryption => 2,
            OperatorKind::ReEncryption => 3,
            OperatorKind::Query => 0,
        }
    }

    /// Expected child count for a node of this kind: `Some(n)` when fixed,
    /// `None` for `Cartesian`/`Join`, which are the only binary operators
    /// but share their arity with no other kind worth distinguishing here.
    pub fn is_binary(self) -> bool {
        matches!(self, OperatorKind::Cartesian | OperatorKind::Join)
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OperatorKind::Projection => "projection",
            OperatorKind::Selection => "selection",
            OperatorKind::Cartesian => "cartesian",
            OperatorKind::Join => "join",
            OperatorKind::GroupBy => "group-by",
            OperatorKind::Encryption => "encryption",
            OperatorKind::Decryption => "decryption",
            OperatorKind::ReEncryption => "re-encryption",
            OperatorKind::Query => "query",
        };
        write!(f, "{s}")
    }
}

impl FromStr for OperatorKind {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "projection" => Ok(OperatorKind::Projection),
            "selection" => Ok(OperatorKind::Selection),
            "cartesian" => Ok(OperatorKind::Cartesian),
            "join" => Ok(OperatorKind::Join),
            "group-by" | "groupby" | "group_by" => Ok(OperatorKind::GroupBy),
            "encryption" => Ok(OperatorKind::Encryption),
            "decryption" => Ok(OperatorKind::Decryption),
            "re-encryption" | "reencryption" | "re_encryption" => Ok(OperatorKind::ReEncryption),
            "query" => Ok(OperatorKind::Query),
            other => Err(PlanError::InputValidation(format!("unknown operator kind: {other:?}"))),
        }
    }
}

/// A node in the plan tree.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub op: OperatorKind,

    /// Attributes to be observed in plaintext by this operator.
    pub ap: AttributeSet,
    /// Attributes to be re-encrypted by this operator.
    pub ae: AttributeSet,
    /// Attributes to be observed encrypted (untouched) by this operator.
    pub a_s: AttributeSet,

    pub group_attr: Option<Attribute>,
    pub select_multi_attr: bool,
    pub cryptographic: bool,

    /// Binds a leaf node to a base relation.
    pub relation: Option<RelationIdx>,

    pub size: u64,
    pub print_label: Option<String>,

    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,

    // --- derived, recomputed by the passes ---
    pub profile: Profile,
    /// `Ap ∪ union(children totAp)` — §4.3 step 1.
    pub tot_ap: AttributeSet,
    /// `Ae ∪ union(children totAe)` — §4.3 step 1.
    pub tot_ae: AttributeSet,
    pub candidates: Vec<SubjectId>,
    pub assignee: Option<SubjectId>,
    pub comp_cost: BTreeMap<SubjectId, u64>,
}

impl Node {
    /// Constructs a node as read from `tree.csv`, before any profile or
    /// cost information has been derived.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: NodeId,
        op: OperatorKind,
        ap: AttributeSet,
        ae: AttributeSet,
        a_s: AttributeSet,
        group_attr: Option<Attribute>,
        select_multi_attr: bool,
        size: u64,
        print_label: Option<String>,
    ) -> Result<Self, PlanError> {
        if !ap.is_disjoint(&ae) || !ap.is_disjoint(&a_s) || !ae.is_disjoint(&a_s) {
            return Err(PlanError::InputValidation(format!(
                "node {id}: Ap/Ae/As are not pairwise disjoint"
            )));
        }
        if group_attr.is_some() && op != OperatorKind::GroupBy {
            return Err(PlanError::InputValidation(format!(
                "node {id}: group_attr is only meaningful for group-by, found on {op}"
            )));
        }
        Ok(Self {
            id,
            op,
            cryptographic: op.is_cryptographic(),
            ap,
            ae,
            a_s,
            group_attr,
            select_multi_attr,
            relation: None,
            size,
            print_label,
            parent: None,
            children: Vec::new(),
            profile: Profile::default(),
            tot_ap: AttributeSet::new(),
            tot_ae: AttributeSet::new(),
            candidates: Vec::new(),
            assignee: None,
            comp_cost: BTreeMap::new(),
        })
    }

    /// Constructs a cryptographic node (`encryption`/`decryption`/
    /// `re-encryption`) the assignment or extension passes insert. The
    /// assigned attribute set goes in `Ae` for decryption/re-encryption and
    /// `Ap` for encryption, matching §4.1's per-operator profile rules.
    pub fn new_crypto(id: NodeId, op: OperatorKind, attrs: AttributeSet) -> Self {
        debug_assert!(op.is_cryptographic());
        let (ap, ae) = match op {
            OperatorKind::Encryption => (attrs, AttributeSet::new()),
            OperatorKind::Decryption | OperatorKind::ReEncryption => (AttributeSet::new(), attrs),
            _ => unreachable!("new_crypto called with a non-cryptographic op"),
        };
        Self {
            id,
            op,
            cryptographic: true,
            ap,
            ae,
            a_s: AttributeSet::new(),
            group_attr: None,
            select_multi_attr: false,
            relation: None,
            size: 0,
            print_label: None,
            parent: None,
            children: Vec::new(),
            profile: Profile::default(),
            tot_ap: AttributeSet::new(),
            tot_ae: AttributeSet::new(),
            candidates: Vec::new(),
            assignee: None,
            comp_cost: BTreeMap::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::parse_attribute_set;

    #[test]
    fn rejects_overlapping_parameter_sets() {
        let err = Node::new(
            1,
            OperatorKind::Projection,
            parse_attribute_set("N"),
            parse_attribute_set("N"),
            AttributeSet::new(),
            None,
            false,
            1,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, PlanError::InputValidation(_)));
    }

    #[test]
    fn rejects_group_attr_on_non_group_by_operator() {
        let err = Node::new(
            1,
            OperatorKind::Projection,
            AttributeSet::new(),
            AttributeSet::new(),
            AttributeSet::new(),
            Some(Attribute('G')),
            false,
            1,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, PlanError::InputValidation(_)));
    }

    #[test]
    fn accepts_group_attr_on_group_by() {
        let node = Node::new(
            1,
            OperatorKind::GroupBy,
            AttributeSet::new(),
            AttributeSet::new(),
            AttributeSet::new(),
            Some(Attribute('G')),
            false,
            1,
            None,
        )
        .unwrap();
        assert_eq!(node.group_attr, Some(Attribute('G')));
    }
}
