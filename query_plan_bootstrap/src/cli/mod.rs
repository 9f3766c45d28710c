// /////////////////////////////////////////////////////////////////////////////
// Query Plan Compiler
// Copyright (c) 2025 A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Command-Line Interface
//!
//! ```text
//! 1. parser::parse_cli()        parse argv with clap
//! 2. validator::SecureArgParser  validate paths and subject ids
//! 3. ValidatedCli                safe to hand to compile_plan
//! ```

pub mod parser;
pub mod validator;

pub use parser::{parse_cli, Cli, Format};
pub use validator::{ParseError, SecureArgParser, ValidatedCli};
