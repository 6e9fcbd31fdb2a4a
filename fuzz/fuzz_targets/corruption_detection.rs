// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for corruption detection.
//!
//! Builds a stack, then writes a non-poison value into a fuzzer-chosen slot
//! at or above the top. Validation must name that exact slot, and no
//! mutation may go through until the slot is repaired.

#![no_main]

use arbitrary::Arbitrary;
use guardstack::testing::scribble;
use guardstack::{GuardedStack, SilentReporter, StackConfig, StackError};
use libfuzzer_sys::fuzz_target;

const POISON: i32 = -661;

#[derive(Debug, Arbitrary)]
struct CorruptionInput {
    pushes: u8,
    pops: u8,
    slot: u8,
    value: i32,
}

fuzz_target!(|input: CorruptionInput| {
    if input.value == POISON {
        return;
    }
    let mut stack =
        GuardedStack::<i32, _>::with_reporter(1, StackConfig::default(), SilentReporter)
            .expect("small allocation");
    for v in 0..input.pushes as i32 {
        stack.push(v).expect("push onto healthy stack");
    }
    for _ in 0..input.pops.min(input.pushes) {
        stack.pop().expect("pop from non-empty stack");
    }

    let size = stack.size();
    let tail = stack.capacity() - size;
    if tail == 0 {
        return;
    }
    let index = size + input.slot as usize % tail;
    assert!(scribble(&mut stack, index, input.value));

    let expected = StackError::PoisonRegionViolated { index };
    assert_eq!(stack.inspect(), Err(expected.clone()));
    assert_eq!(stack.push(0), Err(expected.clone()));
    assert_eq!(stack.size(), size);

    assert!(scribble(&mut stack, index, POISON));
    assert_eq!(stack.inspect(), Ok(()));
});
