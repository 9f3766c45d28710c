// /////////////////////////////////////////////////////////////////////////////
// Query Plan Compiler
// Copyright (c) 2025 A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Error System
//!
//! Errors raised by the catalog model and the compilation passes. Every
//! variant maps to one of the three categories the core distinguishes:
//! input validation (reported at construction, before any pass runs),
//! and the two runtime-fatal conditions the assignment passes can hit.

use thiserror::Error;

/// Domain-specific errors for the query plan compiler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// Catalog or tree construction violated an invariant: `Ap/Ae/As` not
    /// disjoint, primary key not a subset of `plain ∪ enc`, a cost/size
    /// vector whose length doesn't match `plain_attr`+`enc_attr`, an unknown
    /// operator kind, or a `group_attr` outside the operator's attributes.
    #[error("invalid input: {0}")]
    InputValidation(String),

    /// §4.3: a node's candidate set is empty after authorization filtering.
    #[error("no subject is authorized to execute node {node_id} ({context})")]
    NoCandidate { node_id: usize, context: String },

    /// §4.5: a leaf's pending re-encryption obligation can't be covered by
    /// any authorized, cheaper-first subject.
    #[error("cannot resolve re-encryption of {attrs} at leaf node {node_id}")]
    UnresolvableReencryption { node_id: usize, attrs: String },
}

impl PlanError {
    /// Coarse category, used by the CLI layer to pick a Unix exit code.
    pub fn category(&self) -> &'static str {
        match self {
            PlanError::InputValidation(_) => "input",
            PlanError::NoCandidate { .. } => "no_candidate",
            PlanError::UnresolvableReencryption { .. } => "unresolvable_reencryption",
        }
    }

    /// All `PlanError` variants are fatal: the core has no retry path.
    /// Kept as a method (rather than a hardcoded `true` at call sites) so
    /// the day a recoverable variant is added, callers don't have to be
    /// re-audited one by one.
    pub fn is_fatal(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_are_distinct() {
        let a = PlanError::InputValidation("x".into());
        let b = PlanError::NoCandidate { node_id: 1, context: "join".into() };
        let c = PlanError::UnresolvableReencryption { node_id: 2, attrs: "N".into() };
        assert_eq!(a.category(), "input");
        assert_eq!(b.category(), "no_candidate");
        assert_eq!(c.category(), "unresolvable_reencryption");
    }
}
