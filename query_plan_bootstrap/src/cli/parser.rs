// /////////////////////////////////////////////////////////////////////////////
// Query Plan Compiler
// Copyright (c) 2025 A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # CLI Parser
//!
//! Command-line structure, parsed with `clap`. Security validation happens
//! afterward in [`super::validator`].

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Encryption-aware query plan compiler.
#[derive(Parser, Debug, Clone)]
#[command(name = "query-plan-compile")]
#[command(about = concat!("Encryption-aware query plan compiler v", env!("CARGO_PKG_VERSION")))]
#[command(version)]
pub struct Cli {
    /// Directory containing tree.csv, relations.csv, subjects.csv, authorizations.csv
    #[arg(short, long)]
    pub input: PathBuf,

    /// Path the compiled plan is written to
    #[arg(short, long)]
    pub output: PathBuf,

    /// Manual assignment override, consumed head-first by internal nodes in
    /// pre-order (comma-separated subject ids)
    #[arg(long, value_delimiter = ',')]
    pub manual: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Increase logging verbosity (repeatable: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Which [`query_plan::export::PlanExporter`] renders the compiled plan.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Indented human-readable text.
    Text,
    /// Graphviz DOT source.
    Dot,
}

/// Parses `std::env::args()` into a [`Cli`]. Clap exits the process itself
/// with a usage message on malformed arguments.
pub fn parse_cli() -> Cli {
    Cli::parse()
}
