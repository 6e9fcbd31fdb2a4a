// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Line scripts for the `run` subcommand.
//!
//! ```text
//! # grow past the initial capacity
//! push 5
//! push 7
//! dump
//! pop
//! peek 3
//! raise 6
//! ```
//!
//! Parsing is separate from execution: values stay as raw text until the
//! element type is known, so one script can drive stacks of any type.

use std::fmt;
use std::str::FromStr;

use guardstack::{GuardedStack, Reporter, Sentinel, StackError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Push(String),
    Pop,
    Peek(usize),
    Top,
    Dump,
    Validate,
    Raise(u32),
    Destroy,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Push(raw) => write!(f, "push {}", raw),
            Step::Pop => write!(f, "pop"),
            Step::Peek(index) => write!(f, "peek {}", index),
            Step::Top => write!(f, "top"),
            Step::Dump => write!(f, "dump"),
            Step::Validate => write!(f, "validate"),
            Step::Raise(code) => write!(f, "raise {}", code),
            Step::Destroy => write!(f, "destroy"),
        }
    }
}

/// A step with its 1-based source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub number: usize,
    pub step: Step,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("line {line}: unknown command '{command}'")]
    UnknownCommand { line: usize, command: String },

    #[error("line {line}: '{command}' expects {expected}")]
    MissingArgument {
        line: usize,
        command: &'static str,
        expected: &'static str,
    },

    #[error("line {line}: cannot parse '{value}' as {what}")]
    InvalidArgument {
        line: usize,
        what: &'static str,
        value: String,
    },
}

/// Parse a whole script. Blank lines and `#` comments are skipped.
pub fn parse(text: &str) -> Result<Vec<Line>, ScriptError> {
    let mut lines = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let number = i + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let (command, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (trimmed, ""),
        };

        let step = match command.to_lowercase().as_str() {
            "push" if rest.is_empty() => {
                return Err(ScriptError::MissingArgument {
                    line: number,
                    command: "push",
                    expected: "a value",
                })
            }
            "push" => Step::Push(rest.to_string()),
            "pop" => Step::Pop,
            "peek" => Step::Peek(number_arg(number, "peek", "an index", rest)?),
            "top" => Step::Top,
            "dump" => Step::Dump,
            "validate" => Step::Validate,
            "raise" => Step::Raise(number_arg(number, "raise", "an error code", rest)?),
            "destroy" => Step::Destroy,
            _ => {
                return Err(ScriptError::UnknownCommand {
                    line: number,
                    command: command.to_string(),
                })
            }
        };
        lines.push(Line { number, step });
    }
    Ok(lines)
}

fn number_arg<N: FromStr>(
    line: usize,
    command: &'static str,
    expected: &'static str,
    raw: &str,
) -> Result<N, ScriptError> {
    if raw.is_empty() {
        return Err(ScriptError::MissingArgument {
            line,
            command,
            expected,
        });
    }
    raw.parse().map_err(|_| ScriptError::InvalidArgument {
        line,
        what: expected,
        value: raw.to_string(),
    })
}

/// Result of one executed step. `Ok` carries the text to show.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub line: Line,
    pub result: Result<String, StackError>,
}

impl Outcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Run every step against `stack`, collecting outcomes.
///
/// Stack errors are outcomes, not failures. The only hard error is a push
/// value that doesn't parse as the element type.
pub fn execute<T, R>(
    stack: &mut GuardedStack<T, R>,
    lines: &[Line],
) -> Result<Vec<Outcome>, ScriptError>
where
    T: Sentinel + FromStr,
    R: Reporter,
{
    let mut outcomes = Vec::with_capacity(lines.len());
    for line in lines {
        let result = match &line.step {
            Step::Push(raw) => {
                let value = raw.parse::<T>().map_err(|_| ScriptError::InvalidArgument {
                    line: line.number,
                    what: T::TYPE_TAG,
                    value: raw.clone(),
                })?;
                stack.push(value).map(|()| String::new())
            }
            Step::Pop => stack.pop().map(|v| format!("{:?}", v)),
            Step::Peek(index) => stack.peek(*index).map(|v| format!("{:?}", v)),
            Step::Top => stack.top().map(|v| format!("{:?}", v)),
            Step::Dump => Ok(stack.describe().to_string()),
            Step::Validate => stack.validate().map(|()| "valid".to_string()),
            Step::Raise(code) => stack.report_error(*code).map(|()| "no error".to_string()),
            Step::Destroy => {
                stack.destroy();
                Ok("destroyed".to_string())
            }
        };
        outcomes.push(Outcome {
            line: line.clone(),
            result,
        });
    }
    Ok(outcomes)
}
