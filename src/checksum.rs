// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Shape checksum.
//!
//! ```text
//! checksum = capacity + signature + size ^ ((size + capacity) mod 8)
//! ```
//!
//! `signature` is the element type's CRC32 tag signature (see
//! [`Sentinel::signature`](crate::Sentinel::signature)). All arithmetic wraps
//! in `u64`; `0 ^ 0` is 1. The checksum covers the shape of the stack, not its
//! contents: it catches `size`/`capacity` being changed behind the stack's back,
//! which the cheaper `size <= capacity` check cannot see when the corrupted
//! values are still consistent with each other.

use crate::error::{Result, StackError};

/// Compute the checksum for a stack shape.
#[inline]
pub fn compute(capacity: usize, size: usize, signature: u64) -> u64 {
    let capacity = capacity as u64;
    let size = size as u64;
    let exponent = (size.wrapping_add(capacity) % 8) as u32;
    capacity
        .wrapping_add(signature)
        .wrapping_add(size.wrapping_pow(exponent))
}

/// A sealed checksum value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checksum(pub(crate) u64);

impl Checksum {
    /// Seal a shape.
    pub fn of(capacity: usize, size: usize, signature: u64) -> Self {
        Self(compute(capacity, size, signature))
    }

    pub fn value(self) -> u64 {
        self.0
    }

    /// Compare against a freshly computed value for the given shape.
    pub fn verify(self, capacity: usize, size: usize, signature: u64) -> Result<()> {
        let expected = compute(capacity, size, signature);
        if self.0 == expected {
            Ok(())
        } else {
            Err(StackError::ChecksumMismatch {
                stored: self.0,
                expected,
            })
        }
    }
}
