//! # Catalog Model
//!
//! Immutable value types describing the universe the compiler plans over:
//! base relations, subjects, and authorizations. Nothing in this module
//! mutates after construction — all mutation in the compiler happens on the
//! plan tree (`crate::plan`).

pub mod attribute;
pub mod authorization;
pub mod relation;
pub mod subject;

pub use attribute::{format_attribute_set, parse_attribute_set, parse_optional_attribute, Attribute, AttributeSet};
pub use authorization::Authorization;
pub use relation::Relation;
pub use subject::{Subject, SubjectId};

use std::collections::HashMap;

use crate::error::PlanError;

/// Index of a [`Relation`] within [`Catalog::relations`].
pub type RelationIdx = usize;

/// The full input catalog: relations, subjects (kept price-sorted), and
/// per-subject authorizations, plus the derived per-subject price averages
/// the cost model needs for delegated re-encryption (§4.4).
#[derive(Debug, Clone)]
pub struct Catalog {
    relations: Vec<Relation>,
    subjects: Vec<Subject>,
    authorizations: HashMap<SubjectId, Authorization>,
    avg_comp_price: u64,
    avg_transfer_price: u64,
}

impl Catalog {
    /// Builds a catalog, sorting subjects ascending by `comp_price +
    /// transfer_price` (stable, so equal-priced subjects keep their input
    /// order) and computing the average prices used by the cost model.
    ///
    /// A subject absent from `authorizations` is treated as authorized for
    /// nothing — it simply never becomes a candidate for any node that
    /// needs visibility, rather than being rejected at load time.
    pub fn new(
        relations: Vec<Relation>,
        mut subjects: Vec<Subject>,
        authorizations: HashMap<SubjectId, Authorization>,
    ) -> Result<Self, PlanError> {
        if subjects.is_empty() {
            return Err(PlanError::InputValidation("catalog has no subjects".to_string()));
        }
        subjects.sort_by_key(Subject::price_key);

        let n = subjects.len() as u64;
        let comp_sum: u64 = subjects.iter().map(|s| s.comp_price).sum();
        let transfer_sum: u64 = subjects.iter().map(|s| s.transfer_price).sum();

        Ok(Self {
            relations,
            subjects,
            authorizations,
            avg_comp_price: comp_sum / n,
            avg_transfer_price: transfer_sum / n,
        })
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    pub fn relation(&self, idx: RelationIdx) -> &Relation {
        &self.relations[idx]
    }

    /// Subjects sorted ascending by `comp_price + transfer_price`.
    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn subject_ids(&self) -> Vec<SubjectId> {
        self.subjects.iter().map(|s| s.id.clone()).collect()
    }

    pub fn subject(&self, id: &SubjectId) -> Option<&Subject> {
        self.subjects.iter().find(|s| &s.id == id)
    }

    pub fn comp_price(&self, id: &SubjectId) -> u64 {
        self.subject(id).map(|s| s.comp_price).unwrap_or(0)
    }

    pub fn transfer_price(&self, id: &SubjectId) -> u64 {
        self.subject(id).map(|s| s.transfer_price).unwrap_or(0)
    }

    pub fn avg_comp_price(&self) -> u64 {
        self.avg_comp_price
    }

    pub fn avg_transfer_price(&self) -> u64 {
        self.avg_transfer_price
    }

    /// Authorization for `id`, defaulting to "sees nothing" when the
    /// catalog's `authorizations.csv` has no row for it.
    pub fn authorization(&self, id: &SubjectId) -> Authorization {
        self.authorizations.get(id).cloned().unwrap_or_default()
    }

    /// Relations (and their index) whose encrypted attribute set contains
    /// `a`. Used by the cost model to find `dec_cost`/`enc_cost`/`size` for
    /// an attribute that isn't known to belong to one particular leaf
    /// (e.g. the running `to_enc_dec` set during assignment).
    pub fn relations_with_enc_attr(&self, a: Attribute) -> Vec<RelationIdx> {
        self.relations
            .iter()
            .enumerate()
            .filter(|(_, r)| r.enc.contains(&a))
            .map(|(idx, _)| idx)
            .collect()
    }
}
