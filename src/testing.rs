//! Fault injection for tests.
//!
//! This module is always compiled but hidden from documentation. Each helper
//! simulates one kind of memory corruption the stack is supposed to catch,
//! reaching into state no safe caller can otherwise touch.

#![doc(hidden)]

use crate::checksum::Checksum;
use crate::guard::Guard;
use crate::report::Reporter;
use crate::sentinel::Sentinel;
use crate::stack::GuardedStack;

/// Overwrite the front guard word.
pub fn corrupt_front_guard<T: Sentinel, R: Reporter>(stack: &mut GuardedStack<T, R>, value: u64) {
    stack.guard_front = Guard(value);
}

/// Overwrite the back guard word.
pub fn corrupt_back_guard<T: Sentinel, R: Reporter>(stack: &mut GuardedStack<T, R>, value: u64) {
    stack.guard_back = Guard(value);
}

/// Write `value` into any slot, live or poisoned. Returns false if the slot
/// doesn't exist.
pub fn scribble<T: Sentinel, R: Reporter>(
    stack: &mut GuardedStack<T, R>,
    index: usize,
    value: T,
) -> bool {
    match stack.buffer.as_mut().and_then(|b| b.slot_mut(index)) {
        Some(slot) => {
            *slot = value;
            true
        }
        None => false,
    }
}

/// Replace the stored checksum.
pub fn tamper_checksum<T: Sentinel, R: Reporter>(stack: &mut GuardedStack<T, R>, value: u64) {
    stack.checksum = Checksum(value);
}

/// Set `size` without touching anything else.
pub fn force_size<T: Sentinel, R: Reporter>(stack: &mut GuardedStack<T, R>, size: usize) {
    stack.size = size;
}

/// Drop the buffer while leaving the stack marked live.
pub fn release_buffer<T: Sentinel, R: Reporter>(stack: &mut GuardedStack<T, R>) {
    stack.buffer = None;
}
