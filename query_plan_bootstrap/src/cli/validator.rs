// /////////////////////////////////////////////////////////////////////////////
// Query Plan Compiler
// Copyright (c) 2025 A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Secure CLI Validation
//!
//! `spec.md` §7 wants invalid input reported before any compiler pass runs;
//! this module is where that happens for the things clap itself can't
//! check — an input directory that doesn't exist, or a manual subject id
//! that smuggles shell metacharacters (the catalog's subject ids are meant
//! to be simple tokens, not an open string). Modeled on the teacher's
//! `bootstrap::cli::validator::SecureArgParser`, scaled to this CLI's much
//! smaller surface.

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::parser::{Cli, Format};

/// Maximum length for a single manual-assignment subject id.
const MAX_ARG_LENGTH: usize = 256;

/// Characters a subject id has no legitimate reason to contain.
const DANGEROUS_PATTERNS: &[&str] = &["..", "~", "$", "`", ";", "&", "|", ">", "<", "\n", "\r", "\0"];

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("input directory does not exist: {0}")]
    InputNotFound(PathBuf),

    #[error("input path is not a directory: {0}")]
    InputNotADirectory(PathBuf),

    #[error("output directory does not exist: {0}")]
    OutputDirectoryNotFound(PathBuf),

    #[error("manual subject id too long (max {MAX_ARG_LENGTH} characters): {0:?}")]
    ArgumentTooLong(String),

    #[error("dangerous pattern '{pattern}' in manual subject id {arg:?}")]
    DangerousPattern { pattern: String, arg: String },
}

/// `Cli` after every field has passed validation: an `--input` directory
/// that exists, an `--output` path whose parent directory exists, and
/// manual subject ids that are safe to pass straight to the compiler.
#[derive(Debug, Clone)]
pub struct ValidatedCli {
    pub input: PathBuf,
    pub output: PathBuf,
    pub manual: Vec<String>,
    pub format: Format,
    pub verbose: u8,
}

pub struct SecureArgParser;

impl SecureArgParser {
    pub fn validate(cli: Cli) -> Result<ValidatedCli, ParseError> {
        let input = Self::validate_input_dir(&cli.input)?;
        let output = Self::validate_output_path(&cli.output)?;
        for subject in &cli.manual {
            Self::validate_subject_id(subject)?;
        }

        Ok(ValidatedCli { input, output, manual: cli.manual, format: cli.format, verbose: cli.verbose })
    }

    fn validate_input_dir(path: &Path) -> Result<PathBuf, ParseError> {
        if !path.exists() {
            return Err(ParseError::InputNotFound(path.to_path_buf()));
        }
        if !path.is_dir() {
            return Err(ParseError::InputNotADirectory(path.to_path_buf()));
        }
        Ok(path.to_path_buf())
    }

    fn validate_output_path(path: &Path) -> Result<PathBuf, ParseError> {
        let parent = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));
        if !parent.exists() {
            return Err(ParseError::OutputDirectoryNotFound(parent.to_path_buf()));
        }
        Ok(path.to_path_buf())
    }

    fn validate_subject_id(arg: &str) -> Result<(), ParseError> {
        if arg.len() > MAX_ARG_LENGTH {
            return Err(ParseError::ArgumentTooLong(arg.chars().take(32).collect()));
        }
        for pattern in DANGEROUS_PATTERNS {
            if arg.contains(pattern) {
                return Err(ParseError::DangerousPattern { pattern: pattern.to_string(), arg: arg.to_string() });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::parser::Cli;

    fn cli(input: &Path, output: &Path, manual: Vec<String>) -> Cli {
        Cli { input: input.to_path_buf(), output: output.to_path_buf(), manual, format: Format::Text, verbose: 0 }
    }

    #[test]
    fn rejects_missing_input_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let output = dir.path().join("out.txt");
        let err = SecureArgParser::validate(cli(&missing, &output, vec![])).unwrap_err();
        assert!(matches!(err, ParseError::InputNotFound(_)));
    }

    #[test]
    fn rejects_output_in_nonexistent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("missing-dir").join("out.txt");
        let err = SecureArgParser::validate(cli(dir.path(), &output, vec![])).unwrap_err();
        assert!(matches!(err, ParseError::OutputDirectoryNotFound(_)));
    }

    #[test]
    fn rejects_dangerous_manual_subject_id() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.txt");
        let err = SecureArgParser::validate(cli(dir.path(), &output, vec!["X;rm -rf /".to_string()])).unwrap_err();
        assert!(matches!(err, ParseError::DangerousPattern { .. }));
    }

    #[test]
    fn accepts_well_formed_arguments() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.txt");
        let validated = SecureArgParser::validate(cli(dir.path(), &output, vec!["X".to_string(), "Y".to_string()])).unwrap();
        assert_eq!(validated.manual, vec!["X".to_string(), "Y".to_string()]);
    }
}
