// /////////////////////////////////////////////////////////////////////////////
// Query Plan Compiler
// Copyright (c) 2025 A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Application-Layer Error
//!
//! Wraps [`PlanError`] with the failure modes that only appear once the
//! core is wired to real files: unreadable input, malformed CSV rows, and
//! dangling cross-references between `tree.csv` and `relations.csv`. The
//! core's own `PlanError` is not reused directly for these — the teacher's
//! layers each wrap, rather than re-export, the error of the layer below
//! them (`bootstrap::cli::validator::ParseError` wraps lower-layer errors
//! the same way).

use std::path::PathBuf;

use thiserror::Error;

use query_plan_domain::PlanError;

/// Errors raised while reading a catalog from disk, compiling it, or
/// writing the result out through a [`crate::export::PlanExporter`].
#[derive(Error, Debug)]
pub enum ReadError {
    /// A required catalog file could not be opened.
    #[error("cannot open {path:?}: {source}")]
    Io { path: PathBuf, #[source] source: std::io::Error },

    /// A row failed to parse or deserialize.
    #[error("malformed row in {path:?}: {source}")]
    Csv { path: PathBuf, #[source] source: csv::Error },

    /// A `relations.csv` row's `node_id` does not name a leaf in `tree.csv`.
    #[error("relations.csv: node_id {0} does not reference a known leaf")]
    DanglingNodeId(usize),

    /// The core rejected the catalog or plan tree before compilation began.
    #[error(transparent)]
    Plan(#[from] PlanError),

    /// Writing the compiled plan through a [`crate::export::PlanExporter`]
    /// failed.
    #[error("failed writing plan output: {0}")]
    Write(#[from] std::io::Error),
}

impl ReadError {
    /// Coarse category, mirrored from [`PlanError::category`] and extended
    /// with the two I/O-layer variants, for the bootstrap layer's exit-code
    /// mapping.
    pub fn category(&self) -> &'static str {
        match self {
            ReadError::Io { .. } => "io",
            ReadError::Csv { .. } => "csv",
            ReadError::DanglingNodeId(_) => "input",
            ReadError::Plan(inner) => inner.category(),
            ReadError::Write(_) => "io",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_error_category_passes_through() {
        let err = ReadError::Plan(PlanError::InputValidation("x".into()));
        assert_eq!(err.category(), "input");
    }

    #[test]
    fn dangling_node_id_is_input_category() {
        let err = ReadError::DanglingNodeId(7);
        assert_eq!(err.category(), "input");
        assert!(err.to_string().contains('7'));
    }
}
