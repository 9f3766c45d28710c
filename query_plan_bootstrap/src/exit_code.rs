// /////////////////////////////////////////////////////////////////////////////
// Query Plan Compiler
// Copyright (c) 2025 A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Exit Code Mapping
//!
//! Standardized Unix exit codes following BSD `sysexits.h` conventions, the
//! same enumeration the teacher's `bootstrap::exit_code` defines. Where the
//! teacher's `from_error` sniffs an arbitrary `dyn Error`'s message text,
//! [`ExitCode::from_read_error`] instead matches on [`ReadError`]'s actual
//! variants: this binary's only failure surface is a small, closed error
//! type, so pattern matching is exact rather than a heuristic.

use std::fmt;

use query_plan::ReadError;
use query_plan_domain::PlanError;

/// Exit codes following Unix conventions (BSD sysexits.h).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum ExitCode {
    /// Successful termination (0).
    #[default]
    Success = 0,

    /// General error (1): anything not mapped more specifically below.
    Error = 1,

    /// Command line usage error (64): unparseable flags, missing arguments.
    UsageError = 64,

    /// Data format error (65): malformed CSV rows or a catalog the domain
    /// rejected outright (`PlanError::InputValidation`, `ReadError::Csv`).
    DataError = 65,

    /// Cannot open input (66): a catalog file is missing or unreadable.
    NoInput = 66,

    /// Cannot create output file (73): the output path couldn't be written.
    CantCreate = 73,

    /// Internal software error (70): the compiler itself could not produce
    /// a valid plan for an otherwise well-formed catalog
    /// (`PlanError::NoCandidate`, `PlanError::UnresolvableReencryption`) —
    /// `spec.md` §7 calls these "infeasible problem inputs," not usage bugs.
    Software = 70,

    /// I/O error (74): any other read/write failure.
    IoError = 74,
}

impl ExitCode {
    /// Converts to the `i32` `std::process::exit` expects.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Maps a failed [`query_plan::compile_plan`] call to an exit code.
    pub fn from_read_error(error: &ReadError) -> Self {
        match error {
            ReadError::Io { .. } => ExitCode::NoInput,
            ReadError::Csv { .. } => ExitCode::DataError,
            ReadError::DanglingNodeId(_) => ExitCode::DataError,
            ReadError::Plan(PlanError::InputValidation(_)) => ExitCode::DataError,
            ReadError::Plan(PlanError::NoCandidate { .. }) => ExitCode::Software,
            ReadError::Plan(PlanError::UnresolvableReencryption { .. }) => ExitCode::Software,
            ReadError::Write(_) => ExitCode::CantCreate,
        }
    }

    /// Human-readable description, mirrored from the teacher's enum.
    pub fn description(self) -> &'static str {
        match self {
            ExitCode::Success => "Success",
            ExitCode::Error => "General error",
            ExitCode::UsageError => "Command line usage error",
            ExitCode::DataError => "Data format error",
            ExitCode::NoInput => "Cannot open input",
            ExitCode::CantCreate => "Cannot create output file",
            ExitCode::Software => "Internal software error",
            ExitCode::IoError => "I/O error",
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Success)
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_i32())
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code.as_i32()
    }
}
