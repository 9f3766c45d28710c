// /////////////////////////////////////////////////////////////////////////////
// Query Plan Compiler
// Copyright (c) 2025 A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Bootstrap
//!
//! Sits outside `query_plan_domain`/`query_plan`: owns argument parsing,
//! the bootstrap-phase logger, and Unix exit-code mapping, then wires
//! everything into one call to [`query_plan::compile_plan`]. Mirrors the
//! teacher's `bootstrap` crate split of `cli::parser` / `cli::validator` /
//! `logger` / `exit_code` — scaled to a synchronous, single-pass CLI with
//! no signal handling or platform abstraction, since a batch compiler run
//! has nothing to gracefully shut down.
//!
//! ## Module structure
//!
//! - [`cli`] — argument parsing and validation
//! - [`exit_code`] — BSD `sysexits.h`-style process exit codes
//! - [`logger`] — bootstrap-phase logging trait

pub mod cli;
pub mod exit_code;
pub mod logger;

use cli::{Cli, Format, SecureArgParser};
use exit_code::ExitCode;
use logger::BootstrapLogger;
use query_plan::export::{GraphvizExporter, PlanExporter, TextExporter};
use query_plan::compile_plan;

/// Validates `cli`, runs the compiler, and reports the outcome through
/// `logger`. Never panics and never calls `std::process::exit` itself —
/// that's `main`'s job, so this function stays testable.
pub fn run(cli: Cli, logger: &dyn BootstrapLogger) -> ExitCode {
    let validated = match SecureArgParser::validate(cli) {
        Ok(v) => v,
        Err(err) => {
            logger.error(&err.to_string());
            return ExitCode::UsageError;
        }
    };

    let exporter: Box<dyn PlanExporter> = match validated.format {
        Format::Text => Box::new(TextExporter),
        Format::Dot => Box::new(GraphvizExporter),
    };

    logger.info(&format!("compiling catalog at {}", validated.input.display()));
    match compile_plan(&validated.input, &validated.output, validated.manual, exporter.as_ref()) {
        Ok(()) => {
            logger.info(&format!("wrote compiled plan to {}", validated.output.display()));
            ExitCode::Success
        }
        Err(err) => {
            logger.error(&err.to_string());
            ExitCode::from_read_error(&err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logger::NoOpLogger;
    use std::fs::File;
    use std::io::Write;

    fn write_file(dir: &std::path::Path, name: &str, contents: &str) {
        let mut f = File::create(dir.join(name)).unwrap();
        write!(f, "{contents}").unwrap();
    }

    fn minimal_catalog(dir: &std::path::Path) {
        write_file(
            dir,
            "tree.csv",
            "ID,operation,Ap,Ae,As,group_attr,size,print_label,parent\n1,projection,N,,,,1,leaf,0\n",
        );
        write_file(
            dir,
            "relations.csv",
            "name,provider,primary_key,plain_attr,enc_attr,enc_costs,dec_costs,size,node_id\nR,Storage,,N,,1,1,1,1\n",
        );
        write_file(dir, "subjects.csv", "subject,comp_price,transfer_price\nStorage,1,1\n");
        write_file(dir, "authorizations.csv", "subject,plain,enc\nStorage,N,\n");
    }

    #[test]
    fn succeeds_on_a_well_formed_catalog() {
        let dir = tempfile::tempdir().unwrap();
        minimal_catalog(dir.path());
        let output = dir.path().join("out.txt");

        let cli = Cli { input: dir.path().to_path_buf(), output: output.clone(), manual: vec![], format: Format::Text, verbose: 0 };
        let code = run(cli, &NoOpLogger);

        assert_eq!(code, ExitCode::Success);
        assert!(output.exists());
    }

    #[test]
    fn reports_usage_error_for_missing_input_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let output = dir.path().join("out.txt");

        let cli = Cli { input: missing, output, manual: vec![], format: Format::Text, verbose: 0 };
        let code = run(cli, &NoOpLogger);

        assert_eq!(code, ExitCode::UsageError);
    }

    #[test]
    fn reports_data_error_for_malformed_catalog() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "tree.csv", "ID,operation,Ap,Ae,As,group_attr,size,print_label,parent\n1,bogus-op,,,,,1,leaf,0\n");
        write_file(dir.path(), "relations.csv", "name,provider,primary_key,plain_attr,enc_attr,enc_costs,dec_costs,size,node_id\n");
        write_file(dir.path(), "subjects.csv", "subject,comp_price,transfer_price\n");
        write_file(dir.path(), "authorizations.csv", "subject,plain,enc\n");
        let output = dir.path().join("out.txt");

        let cli = Cli { input: dir.path().to_path_buf(), output, manual: vec![], format: Format::Text, verbose: 0 };
        let code = run(cli, &NoOpLogger);

        assert_eq!(code, ExitCode::DataError);
    }
}
