//! # Plan Tree & Compiler Passes
//!
//! The mutable plan tree and the five passes §2 of the specification lays
//! out, run in a fixed sequence by [`driver::compile`]:
//! `identify_candidates` → `compute_cost` → `compute_assignment` →
//! `extend_plan` → a final profile recomputation.

pub mod assignment;
pub mod authorize;
pub mod candidates;
pub mod cost;
pub mod driver;
pub mod extend;
pub mod node;
pub mod profile;
pub mod tree;

pub use node::{Node, NodeId, OperatorKind};
pub use profile::Profile;
pub use tree::PlanTree;
