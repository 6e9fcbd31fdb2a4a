// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Parser;
use guardstack::{GuardedStack, Sentinel, StackConfig, StackError};
use tracing_subscriber::EnvFilter;

mod cli;
use cli::display::{self, fail_badge, ok_badge, themed, GRAY, YELLOW};
use cli::script::{self, Outcome};
use cli::{Cli, Commands, ElementType};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("❌ {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Stack diagnostics go to stderr; `GUARDSTACK_LOG` takes an `EnvFilter` directive.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("GUARDSTACK_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn load_config(path: Option<&str>) -> Result<StackConfig> {
    let Some(path) = path else {
        return Ok(StackConfig::default());
    };
    let raw =
        fs::read_to_string(path).with_context(|| format!("Failed to read config {}", path))?;
    StackConfig::from_json(&raw).with_context(|| format!("Invalid config {}", path))
}

/// Returns false when a `--strict` run saw a failed command.
fn run(command: Commands) -> Result<bool> {
    match command {
        Commands::Demo { element, config } => {
            let config = load_config(config.as_deref())?;
            match element {
                ElementType::I32 => demo::<i32>(config, [5, 7])?,
                ElementType::I64 => demo::<i64>(config, [5, 7])?,
                ElementType::F64 => demo::<f64>(config, [2.5, 7.25])?,
                ElementType::Char => demo::<char>(config, ['a', 'b'])?,
                ElementType::Str => demo::<String>(config, ["alpha".into(), "beta".into()])?,
            }
            Ok(true)
        }
        Commands::Run {
            script: path,
            element,
            capacity,
            config,
            strict,
        } => {
            let config = load_config(config.as_deref())?;
            let text = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read script {}", path))?;
            let lines = script::parse(&text)?;

            let failures = match element {
                ElementType::I32 => run_script::<i32>(capacity, config, &lines)?,
                ElementType::I64 => run_script::<i64>(capacity, config, &lines)?,
                ElementType::F64 => run_script::<f64>(capacity, config, &lines)?,
                ElementType::Char => run_script::<char>(capacity, config, &lines)?,
                ElementType::Str => run_script::<String>(capacity, config, &lines)?,
            };
            Ok(!(strict && failures > 0))
        }
    }
}

fn demo<T: Sentinel>(config: StackConfig, values: [T; 2]) -> Result<()> {
    let mut stack = GuardedStack::<T>::with_config(1, config)?;
    display::boxed("create(1)", &stack.describe().to_string());

    for value in values {
        let label = format!("push({:?})", value);
        let result = stack.push(value).map(|()| String::new());
        show_step(&label, &result);
        display::boxed(&label, &stack.describe().to_string());
    }
    for _ in 0..3 {
        let result = stack.pop().map(|v| format!("{:?}", v));
        show_step("pop()", &result);
        display::boxed("pop()", &stack.describe().to_string());
    }
    Ok(())
}

fn run_script<T>(capacity: usize, config: StackConfig, lines: &[script::Line]) -> Result<usize>
where
    T: Sentinel + FromStr,
{
    let mut stack = GuardedStack::<T>::with_config(capacity, config)
        .with_context(|| format!("Failed to create stack with capacity {}", capacity))?;
    let outcomes = script::execute(&mut stack, lines)?;

    for outcome in &outcomes {
        print_outcome(outcome);
    }

    let failures = outcomes.iter().filter(|o| !o.is_ok()).count();
    println!(
        "\n{} commands, {} failed",
        outcomes.len(),
        themed(if failures > 0 { YELLOW } else { GRAY }, &[], &failures.to_string())
    );
    Ok(failures)
}

fn print_outcome(outcome: &Outcome) {
    let label = format!("[{:>3}] {}", outcome.line.number, outcome.line.step);
    match (&outcome.line.step, &outcome.result) {
        (script::Step::Dump, Ok(text)) => display::boxed(&label, text),
        (_, result) => show_step(&label, result),
    }
}

fn show_step(label: &str, result: &Result<String, StackError>) {
    match result {
        Ok(text) if text.is_empty() => println!("{} {}", label, ok_badge()),
        Ok(text) => println!("{} {} {}", label, ok_badge(), themed(GRAY, &[], text)),
        Err(err) => println!(
            "{} {} {}",
            label,
            fail_badge(),
            themed(GRAY, &[], &err.to_string())
        ),
    }
}
