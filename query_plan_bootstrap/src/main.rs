// /////////////////////////////////////////////////////////////////////////////
// Query Plan Compiler
// Copyright (c) 2025 A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # `query-plan-compile`
//!
//! Entry point: parse arguments, set up logging at the requested
//! verbosity, compile the catalog, and exit with the mapped Unix status
//! code.

use query_plan_bootstrap::cli::parse_cli;
use query_plan_bootstrap::logger::ConsoleLogger;
use query_plan_bootstrap::run;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = parse_cli();
    init_tracing(cli.verbose);

    let code = run(cli, &ConsoleLogger);
    std::process::exit(code.as_i32());
}

/// `-v` raises the default filter from `warn` through `info`/`debug`/`trace`;
/// `RUST_LOG`, if set, always takes precedence.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}
