//! # Compile-Plan Use Case
//!
//! Ties the catalog readers, the domain driver, and a [`PlanExporter`]
//! together: read the four CSVs, run the five-pass pipeline, write the
//! result. This is the one place in the workspace allowed to know about
//! both I/O and the compiler core — everything below it (`query_plan_domain`)
//! stays pure, everything above it (`query_plan_bootstrap`) only knows
//! about CLI flags and exit codes.

use std::collections::VecDeque;
use std::fs::File;
use std::path::Path;

use query_plan_domain::catalog::SubjectId;
use query_plan_domain::plan::driver::compile_observed;

use crate::error::ReadError;
use crate::export::PlanExporter;
use crate::io::read_catalog;

/// Reads the catalog at `input_dir`, compiles it (optionally honoring a
/// manual assignment override, consumed head-first per `spec.md` §9), and
/// writes the result through `exporter` to `output_path`.
///
/// Each pass boundary is narrated at `tracing::debug!` level — this layer,
/// not the domain crate, owns the logging dependency (`SPEC_FULL.md` §5.2).
pub fn compile_plan(
    input_dir: &Path,
    output_path: &Path,
    manual: Vec<String>,
    exporter: &dyn PlanExporter,
) -> Result<(), ReadError> {
    tracing::info!(input = %input_dir.display(), "reading catalog");
    let (mut tree, catalog) = read_catalog(input_dir)?;

    let mut manual_queue: VecDeque<SubjectId> = manual.into_iter().map(SubjectId::from).collect();

    compile_observed(&mut tree, &catalog, &mut manual_queue, |pass| {
        tracing::debug!(pass, "running compiler pass");
    })?;

    tracing::info!(output = %output_path.display(), "writing compiled plan");
    let mut file = File::create(output_path).map_err(|source| ReadError::Io { path: output_path.to_path_buf(), source })?;
    exporter.export(&tree, &catalog, &mut file)?;

    Ok(())
}
