//! Runtime contracts for the stack's internal invariants.
//!
//! Debug-mode assertions that check the laws the stack is built on. These
//! contracts:
//!
//! 1. Are **zero-cost in release builds** (use `debug_assert!`)
//! 2. Catch **our own bugs**, not caller misuse (that is what validation and
//!    the reporter are for)
//! 3. Only run right after a mutation the stack performed itself, when every
//!    invariant must hold
//!
//! # INVARIANTS (DO NOT REMOVE THESE CHECKS)
//!
//! | Contract Function              | Law                                         |
//! |--------------------------------|---------------------------------------------|
//! | `check_growth_law`             | `new_capacity == 2 * old_capacity + 1`      |
//! | `check_shrink_law`             | `new_capacity == old_capacity / 2`          |
//! | `check_size_within_capacity`   | `size <= capacity`                          |
//! | `check_poison_region`          | `[size, capacity)` all poison               |
//! | `check_sealed`                 | stored checksum matches the shape           |

use crate::checksum;
use crate::sentinel::Sentinel;

// ============================================================================
// RESIZE CONTRACTS
// ============================================================================

/// Check that growth followed `c -> 2c + 1`.
#[inline]
pub fn check_growth_law(old_capacity: usize, new_capacity: usize) {
    debug_assert_eq!(
        Some(new_capacity),
        old_capacity.checked_mul(2).and_then(|c| c.checked_add(1)),
        "Contract violation: growth law - {} grew to {}",
        old_capacity,
        new_capacity
    );
}

/// Check that a shrink followed `c -> c / 2` and kept the live prefix.
#[inline]
pub fn check_shrink_law(old_capacity: usize, new_capacity: usize, size: usize) {
    debug_assert_eq!(
        new_capacity,
        old_capacity / 2,
        "Contract violation: shrink law - {} shrank to {}",
        old_capacity,
        new_capacity
    );
    debug_assert!(
        size <= new_capacity,
        "Contract violation: shrink dropped live elements - size {} > new capacity {}",
        size,
        new_capacity
    );
}

// ============================================================================
// SHAPE CONTRACTS
// ============================================================================

#[inline]
pub fn check_size_within_capacity(size: usize, capacity: usize) {
    debug_assert!(
        size <= capacity,
        "Contract violation: size {} > capacity {}",
        size,
        capacity
    );
}

/// Check every slot in `[size, slots.len())` is poison.
///
/// O(capacity); debug builds only.
#[inline]
pub fn check_poison_region<T: Sentinel>(slots: &[T], size: usize) {
    if cfg!(debug_assertions) {
        for (i, slot) in slots.iter().enumerate().skip(size) {
            debug_assert!(
                slot.is_poison(),
                "Contract violation: slot {} past size {} holds {:?}",
                i,
                size,
                slot
            );
        }
    }
}

/// Check the stored checksum matches a freshly computed one.
#[inline]
pub fn check_sealed(stored: u64, capacity: usize, size: usize, signature: u64) {
    debug_assert_eq!(
        stored,
        checksum::compute(capacity, size, signature),
        "Contract violation: checksum not resealed for capacity {} size {}",
        capacity,
        size
    );
}
