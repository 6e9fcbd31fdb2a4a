// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the guardstack driver.
//!
//! Two subcommands: `demo` walks the canonical push/pop sequence and dumps the
//! stack after every step, `run` executes a line script against a stack of the
//! chosen element type.

pub mod display;
pub mod script;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "guardstack",
    about = "Drive a self-checking stack and watch it catch corruption",
    version
)]
pub struct Cli {
    /// Log stack diagnostics at debug level (GUARDSTACK_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Push two values, pop three times, dumping the stack after each step
    Demo {
        /// Element type of the stack
        #[arg(short = 't', long = "type", value_enum, default_value = "i32")]
        element: ElementType,

        /// JSON stack configuration
        #[arg(long)]
        config: Option<String>,
    },

    /// Execute a script of stack commands
    ///
    /// One command per line: push <value>, pop, peek <index>, top, dump,
    /// validate, raise <code>, destroy. Lines starting with # are comments.
    Run {
        /// Path to the script file
        script: String,

        /// Element type of the stack
        #[arg(short = 't', long = "type", value_enum, default_value = "i32")]
        element: ElementType,

        /// Initial capacity
        #[arg(short, long, default_value = "1")]
        capacity: usize,

        /// JSON stack configuration
        #[arg(long)]
        config: Option<String>,

        /// Exit with status 1 if any command failed
        #[arg(long)]
        strict: bool,
    },
}

/// Element types the driver can instantiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ElementType {
    I32,
    I64,
    F64,
    Char,
    Str,
}
