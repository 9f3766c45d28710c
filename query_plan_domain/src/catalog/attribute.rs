//! Attribute symbols — the opaque column identifiers that flow through the
//! catalog and the plan tree.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::PlanError;

/// A single attribute symbol.
///
/// The reference catalogs encode attributes as single characters (`N`, `S`,
/// `P`, ...); the type stays a thin newtype around `char` rather than a
/// general interned string so that attribute sets sort and hash cheaply and
/// so equivalence-class membership checks stay `Copy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Attribute(pub char);

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An (unordered, deduplicated) set of attribute symbols.
///
/// `BTreeSet` rather than `HashSet`: candidate lists, profile sets, and
/// equivalence classes must iterate in a deterministic order so that
/// candidate monotonicity (spec. invariant 6) and cost tie-breaking are
/// reproducible across runs.
pub type AttributeSet = BTreeSet<Attribute>;

/// Parses a string of attribute symbols (e.g. `"NSPC"`) into an
/// [`AttributeSet`]. An empty string yields an empty set.
pub fn parse_attribute_set(s: &str) -> AttributeSet {
    s.chars().map(Attribute).collect()
}

/// Parses a single attribute symbol, e.g. a `group_attr` column.
///
/// Returns `Ok(None)` for an empty string (no group-by attribute), and an
/// error if more than one character is present.
pub fn parse_optional_attribute(s: &str) -> Result<Option<Attribute>, PlanError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let mut chars = trimmed.chars();
    let first = chars.next().expect("checked non-empty above");
    if chars.next().is_some() {
        return Err(PlanError::InputValidation(format!(
            "expected a single attribute symbol, got {trimmed:?}"
        )));
    }
    Ok(Some(Attribute(first)))
}

/// Renders an [`AttributeSet`] back into its compact string form, in sorted
/// order, for error messages and exporter output.
pub fn format_attribute_set(set: &AttributeSet) -> String {
    set.iter().map(|a| a.0).collect()
}
