// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! gotest-tree: print nested Go test trees from `go test -json` output
//!
//! This binary reads a `go test -json` stream, rebuilds the subtest hierarchy
//! and prints it, optionally with each subtest's own log.

use std::process::ExitCode;

use clap::Parser;
use gotest_tree::CancelToken;
use gotest_tree_cli::config::Config;
use tracing::error;

fn main() -> ExitCode {
    let config = Config::parse();

    // Logs go to stderr; stdout carries the tree
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .init();

    if let Err(err) = config.validate() {
        error!("{err}");
        return ExitCode::from(2);
    }

    let result = gotest_tree_cli::open_input(&config).and_then(|input| {
        let mut stdout = std::io::stdout().lock();
        gotest_tree_cli::run(&config, input, &CancelToken::new(), &mut stdout)
    });

    match result {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(err) => {
            error!("{err:#}");
            ExitCode::from(2)
        }
    }
}
