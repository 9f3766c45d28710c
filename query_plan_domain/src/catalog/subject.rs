//! Subjects — users and compute providers that can be assigned to execute
//! plan operators.

use std::fmt;

/// A subject identifier. Kept as a thin `String` newtype (rather than the
/// catalog's ULID-style generic ids) because subject identity here is
/// externally assigned by the catalog CSVs, not generated by this system.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubjectId(pub String);

impl SubjectId {
    /// The distinguished identifier for the user formulating the query.
    pub const USER: &'static str = "U";

    /// Returns the subject id representing the requesting user.
    pub fn user() -> Self {
        SubjectId(Self::USER.to_string())
    }

    pub fn is_user(&self) -> bool {
        self.0 == Self::USER
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SubjectId {
    fn from(s: &str) -> Self {
        SubjectId(s.to_string())
    }
}

impl From<String> for SubjectId {
    fn from(s: String) -> Self {
        SubjectId(s)
    }
}

/// A compute provider or user, with the per-unit prices the cost model
/// charges against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub id: SubjectId,
    /// Computational cost per unit of operator work.
    pub comp_price: u64,
    /// Data-transfer cost per unit of size.
    pub transfer_price: u64,
}

impl Subject {
    pub fn new(id: impl Into<SubjectId>, comp_price: u64, transfer_price: u64) -> Self {
        Self { id: id.into(), comp_price, transfer_price }
    }

    /// Ascending sort key used to order the subjects list and, through it,
    /// every candidate list derived from it (§3: "sorted by ascending
    /// comp_price + transfer_price").
    pub fn price_key(&self) -> u64 {
        self.comp_price.saturating_add(self.transfer_price)
    }
}
