//! Base relations: the leaves of a plan tree, stored wholly or partly
//! encrypted at some storage-provider subject.

use std::collections::BTreeMap;

use super::attribute::{format_attribute_set, Attribute, AttributeSet};
use super::subject::SubjectId;
use crate::error::PlanError;

/// `R = (name, storage, pk, plain, enc, enc_cost, dec_cost, size)`.
///
/// Invariants enforced by [`Relation::new`]: `plain ∩ enc = ∅`,
/// `pk ⊆ plain ∪ enc`, and the three cost vectors are defined exactly on
/// `plain ∪ enc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    pub name: String,
    pub storage: SubjectId,
    pub pk: AttributeSet,
    pub plain: AttributeSet,
    pub enc: AttributeSet,
    pub enc_cost: BTreeMap<Attribute, u64>,
    pub dec_cost: BTreeMap<Attribute, u64>,
    pub size: BTreeMap<Attribute, u64>,
}

impl Relation {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        storage: SubjectId,
        pk: AttributeSet,
        plain: AttributeSet,
        enc: AttributeSet,
        enc_cost: BTreeMap<Attribute, u64>,
        dec_cost: BTreeMap<Attribute, u64>,
        size: BTreeMap<Attribute, u64>,
    ) -> Result<Self, PlanError> {
        let relation = Self {
            name: name.into(),
            storage,
            pk,
            plain,
            enc,
            enc_cost,
            dec_cost,
            size,
        };
        relation.validate()?;
        Ok(relation)
    }

    fn validate(&self) -> Result<(), PlanError> {
        if !self.plain.is_disjoint(&self.enc) {
            return Err(PlanError::InputValidation(format!(
                "relation {:?}: plain and enc attributes overlap ({})",
                self.name,
                format_attribute_set(&self.plain.intersection(&self.enc).copied().collect())
            )));
        }
        if !self.pk.is_subset(&self.attributes()) {
            return Err(PlanError::InputValidation(format!(
                "relation {:?}: primary key {} is not a subset of plain ∪ enc",
                self.name,
                format_attribute_set(&self.pk)
            )));
        }
        for (label, vector) in [("enc_cost", &self.enc_cost), ("dec_cost", &self.dec_cost), ("size", &self.size)] {
            let keys: AttributeSet = vector.keys().copied().collect();
            if keys != self.attributes() {
                return Err(PlanError::InputValidation(format!(
                    "relation {:?}: {label} vector is defined on {} but plain ∪ enc is {}",
                    self.name,
                    format_attribute_set(&keys),
                    format_attribute_set(&self.attributes())
                )));
            }
        }
        Ok(())
    }

    /// `plain ∪ enc` — every attribute this relation carries.
    pub fn attributes(&self) -> AttributeSet {
        self.plain.union(&self.enc).copied().collect()
    }

    pub fn enc_cost_of(&self, a: Attribute) -> u64 {
        self.enc_cost.get(&a).copied().unwrap_or(0)
    }

    pub fn dec_cost_of(&self, a: Attribute) -> u64 {
        self.dec_cost.get(&a).copied().unwrap_or(0)
    }

    pub fn size_of(&self, a: Attribute) -> u64 {
        self.size.get(&a).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::attribute::parse_attribute_set;

    fn cost_map(attrs: &AttributeSet, v: u64) -> BTreeMap<Attribute, u64> {
        attrs.iter().map(|a| (*a, v)).collect()
    }

    #[test]
    fn rejects_overlapping_plain_and_enc() {
        let plain = parse_attribute_set("NS");
        let enc = parse_attribute_set("SP");
        let res = Relation::new(
            "R",
            SubjectId::from("S"),
            AttributeSet::new(),
            plain.clone(),
            enc.clone(),
            cost_map(&enc, 1),
            cost_map(&enc, 1),
            cost_map(&plain.union(&enc).copied().collect(), 1),
        );
        assert!(res.is_err());
    }

    #[test]
    fn rejects_pk_outside_attributes() {
        let plain = parse_attribute_set("NS");
        let enc = parse_attribute_set("PC");
        let all = plain.union(&enc).copied().collect::<AttributeSet>();
        let res = Relation::new(
            "R",
            SubjectId::from("S"),
            parse_attribute_set("X"),
            plain,
            enc,
            cost_map(&all, 1),
            cost_map(&all, 1),
            cost_map(&all, 1),
        );
        assert!(res.is_err());
    }

    #[test]
    fn accepts_well_formed_relation() {
        let plain = parse_attribute_set("NS");
        let enc = parse_attribute_set("PC");
        let all: AttributeSet = plain.union(&enc).copied().collect();
        let r = Relation::new(
            "R",
            SubjectId::from("S"),
            parse_attribute_set("N"),
            plain,
            enc,
            cost_map(&all, 2),
            cost_map(&all, 3),
            cost_map(&all, 10),
        )
        .unwrap();
        assert_eq!(r.attributes(), all);
        assert_eq!(r.dec_cost_of(Attribute('P')), 3);
    }
}
