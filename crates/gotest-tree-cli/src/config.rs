// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Configuration for the gotest-tree command
//!
//! This module provides the command-line configuration: where to read the
//! `go test -json` stream from, how to print the reconstructed tree, and
//! logging options.

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};

/// Rebuild nested Go test trees and per-subtest logs from `go test -json` output
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "gotest-tree")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// File containing `go test -json` output
    ///
    /// Reads from stdin when omitted or `-`.
    ///
    /// Example:
    ///   go test -json ./... | gotest-tree
    #[arg(env = "GOTEST_TREE_INPUT")]
    pub input: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Tree, env = "GOTEST_TREE_FORMAT")]
    pub format: OutputFormat,

    /// Print each test's reconstructed log under it (tree format only)
    #[arg(short, long, default_value = "false")]
    pub logs: bool,

    /// Fail when the input contained lines that could not be decoded
    #[arg(long, default_value = "false")]
    pub strict: bool,

    /// Enable verbose logging (debug level)
    ///
    /// Logs are written to stderr so they never mix with the printed tree.
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    ///
    /// Only errors and warnings will be logged.
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

/// How the reconstructed tree is printed
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Indented text view, one line per test
    #[default]
    Tree,
    /// The full result set as pretty-printed JSON
    Json,
}

impl Config {
    /// Input file, or `None` when reading stdin
    #[must_use]
    pub fn input_path(&self) -> Option<&Path> {
        self.input
            .as_deref()
            .filter(|path| *path != Path::new("-"))
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if an input file is given that does not exist or is
    /// not a regular file.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(input) = self.input_path() {
            if !input.exists() {
                return Err(ConfigError::InputNotFound(input.to_path_buf()));
            }
            if !input.is_file() {
                return Err(ConfigError::InputNotFile(input.to_path_buf()));
            }
        }
        Ok(())
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Input file not found
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    /// Input path is not a regular file
    #[error("Input path is not a file: {0}")]
    InputNotFile(PathBuf),
}
