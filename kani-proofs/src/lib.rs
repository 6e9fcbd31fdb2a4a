// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Kani model checking proofs for guardstack's arithmetic.
//!
//! This standalone crate extracts the resize policy and the checksum function
//! and proves their properties for every input using Kani.
//!
//! Run with: `cargo kani`
//!
//! ## Verified Properties
//!
//! 1. **No panics**: none of the functions panic, overflow included
//! 2. **Growth law**: growth yields exactly `2c + 1` or reports overflow
//! 3. **Shrink safety**: a shrink never cuts into the live prefix
//! 4. **Empty checksum**: the closed form for `size == 0`

// ============================================================================
// RESIZE POLICY (copied from src/buffer.rs)
// ============================================================================

#[inline]
pub fn grown_capacity(capacity: usize) -> Option<usize> {
    capacity.checked_mul(2)?.checked_add(1)
}

#[inline]
pub fn shrunk_capacity(capacity: usize) -> usize {
    capacity / 2
}

#[inline]
pub fn should_shrink(new_size: usize, capacity: usize) -> bool {
    new_size.saturating_mul(4) < capacity
}

// ============================================================================
// CHECKSUM (copied from src/checksum.rs)
// ============================================================================

#[inline]
pub fn compute(capacity: usize, size: usize, signature: u64) -> u64 {
    let capacity = capacity as u64;
    let size = size as u64;
    let exponent = (size.wrapping_add(capacity) % 8) as u32;
    capacity
        .wrapping_add(signature)
        .wrapping_add(size.wrapping_pow(exponent))
}

// ============================================================================
// KANI MODEL CHECKING PROOFS
// ============================================================================

#[cfg(kani)]
mod kani_proofs {
    use super::*;

    /// Growth is exact when it succeeds and only fails on overflow.
    #[kani::proof]
    fn verify_growth_law() {
        let capacity: usize = kani::any();
        match grown_capacity(capacity) {
            Some(grown) => {
                kani::assert(grown > capacity, "growth must make progress");
                kani::assert(grown - capacity == capacity + 1, "growth must be 2c + 1");
            }
            None => {
                kani::assert(capacity > (usize::MAX - 1) / 2, "None only on overflow");
            }
        }
    }

    /// A full stack always has room after growing.
    #[kani::proof]
    fn verify_growth_makes_room() {
        let size: usize = kani::any();
        if let Some(grown) = grown_capacity(size) {
            kani::assert(size < grown, "push after growth must fit");
        }
    }

    /// Whenever a shrink triggers, the live elements still fit.
    #[kani::proof]
    fn verify_shrink_keeps_live_prefix() {
        let size: usize = kani::any();
        let capacity: usize = kani::any();
        kani::assume(size <= capacity);

        if should_shrink(size, capacity) {
            let shrunk = shrunk_capacity(capacity);
            kani::assert(size <= shrunk, "shrink must keep every live slot");
            kani::assert(shrunk < capacity, "shrink must reduce capacity");
        }
    }

    /// An empty buffer never shrinks.
    #[kani::proof]
    fn verify_no_shrink_at_zero() {
        let size: usize = kani::any();
        kani::assert(!should_shrink(size, 0), "capacity 0 cannot shrink");
    }

    /// The checksum never panics, whatever the shape.
    #[kani::proof]
    fn verify_checksum_no_panic() {
        let capacity: usize = kani::any();
        let size: usize = kani::any();
        let signature: u64 = kani::any();
        let _ = compute(capacity, size, signature);
    }

    /// With nothing pushed, `size^e` is 1 when `capacity % 8 == 0`, else 0.
    #[kani::proof]
    fn verify_empty_checksum_closed_form() {
        let capacity: usize = kani::any();
        let signature: u64 = kani::any();
        let bump = if capacity % 8 == 0 { 1 } else { 0 };
        kani::assert(
            compute(capacity, 0, signature)
                == (capacity as u64).wrapping_add(signature).wrapping_add(bump),
            "empty-stack checksum closed form",
        );
    }
}
