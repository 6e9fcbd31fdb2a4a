//! Shared test utilities and fixtures.

#![allow(dead_code)]

use guardstack::{GuardedStack, RecordingReporter, Sentinel, StackConfig, StackError};

/// The poison value of the canonical `i32` stack.
pub const POISON: i32 = -661;

/// A stack that records every incident instead of logging it.
pub type Recorded<T> = GuardedStack<T, RecordingReporter>;

pub fn recorded<T: Sentinel>(capacity: usize) -> Recorded<T> {
    recorded_with(capacity, StackConfig::default())
}

pub fn recorded_with<T: Sentinel>(capacity: usize, config: StackConfig) -> Recorded<T> {
    GuardedStack::with_reporter(capacity, config, RecordingReporter::new())
        .expect("allocation of a small test stack")
}

/// Build an `i32` stack holding `values`, bottom first.
pub fn filled(capacity: usize, values: &[i32]) -> Recorded<i32> {
    let mut stack = recorded(capacity);
    for &v in values {
        stack.push(v).expect("push onto a fresh stack");
    }
    stack
}

/// Assert every structural invariant of a live stack.
pub fn assert_well_formed<T: Sentinel>(stack: &Recorded<T>) {
    assert!(!stack.is_destroyed(), "stack unexpectedly destroyed");
    assert!(
        stack.size() <= stack.capacity(),
        "size {} exceeds capacity {}",
        stack.size(),
        stack.capacity()
    );
    assert_eq!(stack.guards(), (guardstack::GUARD_MAGIC, guardstack::GUARD_MAGIC));
    assert_eq!(
        stack.checksum(),
        guardstack::checksum::compute(stack.capacity(), stack.size(), T::signature()),
        "checksum not resealed"
    );
    for (i, slot) in stack.raw_slots().iter().enumerate().skip(stack.size()) {
        assert!(slot.is_poison(), "slot {} above top is not poison: {:?}", i, slot);
    }
    assert_eq!(stack.inspect(), Ok(()));
}

/// Errors reported so far.
pub fn reported<T: Sentinel>(stack: &Recorded<T>) -> Vec<StackError> {
    stack.reporter().errors()
}
