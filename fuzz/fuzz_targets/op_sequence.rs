// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for arbitrary operation sequences.
//!
//! Replays fuzzer-chosen pushes, pops, peeks and error codes against a stack
//! and a `Vec` model. The two must agree on every result, and the stack must
//! pass validation after every step until something destroys it.

#![no_main]

use arbitrary::Arbitrary;
use guardstack::{GuardedStack, RecordingReporter, StackConfig, StackError};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    Push(i32),
    Pop,
    Peek(u8),
    Top,
    Raise(u8),
}

#[derive(Debug, Arbitrary)]
struct OpSequence {
    initial_capacity: u8,
    report_only: bool,
    ops: Vec<Op>,
}

fuzz_target!(|input: OpSequence| {
    let config = if input.report_only {
        StackConfig::lenient()
    } else {
        StackConfig::default()
    };
    let mut stack = GuardedStack::<i32, _>::with_reporter(
        input.initial_capacity as usize,
        config,
        RecordingReporter::new(),
    )
    .expect("small allocation");
    let mut model: Vec<i32> = Vec::new();

    for op in input.ops.iter().take(4096) {
        match *op {
            Op::Push(v) => {
                assert_eq!(stack.push(v), Ok(()));
                model.push(v);
            }
            Op::Pop => match model.pop() {
                Some(v) => assert_eq!(stack.pop(), Ok(v)),
                None => assert_eq!(stack.pop(), Err(StackError::Empty)),
            },
            Op::Peek(i) => {
                let i = i as usize;
                match model.get(i) {
                    Some(v) => assert_eq!(stack.peek(i), Ok(v)),
                    None => assert!(stack.peek(i).is_err()),
                }
            }
            Op::Top => assert_eq!(stack.top().ok(), model.last()),
            Op::Raise(code) => {
                let result = stack.report_error(code as u32);
                assert_eq!(result.is_ok(), code == 0);
                if stack.is_destroyed() {
                    // Fatal codes end the run; everything else is refused now
                    assert_eq!(stack.push(1), Err(StackError::InvalidReference));
                    return;
                }
            }
        }

        assert_eq!(stack.as_slice(), model.as_slice());
        assert_eq!(stack.inspect(), Ok(()));
    }
});
