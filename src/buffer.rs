// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Backing storage and the resize policy.
//!
//! A [`PoisonedBuffer`] always holds exactly `capacity` initialized slots. The
//! stack decides which prefix is live; the buffer only knows how to keep
//! everything past a given size poisoned, and how to change capacity:
//!
//! - **Growth** (`size == capacity` on push): `c -> 2c + 1`, so even an empty
//!   buffer makes progress. The new region is poisoned.
//! - **Shrink** (pop leaves `size < capacity / 4`): `c -> c / 2`. The live
//!   prefix always fits, since `size < c / 4 <= c / 2`.
//!
//! Allocation goes through `try_reserve_exact`, so running out of memory is a
//! returned error and the buffer is untouched.

use std::mem;

use crate::contracts;
use crate::error::{Result, StackError};
use crate::sentinel::Sentinel;

/// Capacity after growing from `capacity`, or `None` if it would overflow.
#[inline]
pub fn grown_capacity(capacity: usize) -> Option<usize> {
    capacity.checked_mul(2)?.checked_add(1)
}

/// Capacity after shrinking from `capacity`.
#[inline]
pub fn shrunk_capacity(capacity: usize) -> usize {
    capacity / 2
}

/// Whether a pop that leaves `new_size` live elements should shrink.
///
/// Exact comparison of `new_size < capacity / 4`, without truncating the
/// quarter: popping the last element of a capacity-3 stack shrinks it.
#[inline]
pub fn should_shrink(new_size: usize, capacity: usize) -> bool {
    new_size.saturating_mul(4) < capacity
}

/// Owned, fully-initialized slot storage.
#[derive(Debug, Clone)]
pub struct PoisonedBuffer<T: Sentinel> {
    slots: Vec<T>,
}

impl<T: Sentinel> PoisonedBuffer<T> {
    /// Allocate `capacity` slots, all poisoned.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| StackError::AllocationFailed {
                requested: capacity,
            })?;
        slots.resize_with(capacity, T::poison);
        Ok(Self { slots })
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.slots
    }

    /// Address of the first slot, for diagnostics only.
    pub fn as_ptr(&self) -> *const T {
        self.slots.as_ptr()
    }

    /// Overwrite a slot. Caller guarantees `index < capacity`.
    pub(crate) fn put(&mut self, index: usize, value: T) {
        self.slots[index] = value;
    }

    /// Move a slot's value out, leaving poison behind.
    pub(crate) fn take(&mut self, index: usize) -> T {
        mem::replace(&mut self.slots[index], T::poison())
    }

    /// Direct slot access for fault injection.
    pub(crate) fn slot_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index)
    }

    /// Poison every slot from `start` to the end.
    pub fn poison_from(&mut self, start: usize) {
        for slot in self.slots.iter_mut().skip(start) {
            *slot = T::poison();
        }
    }

    /// First slot in `[size, capacity)` that is not poison.
    pub fn first_violation(&self, size: usize) -> Option<usize> {
        self.slots
            .iter()
            .enumerate()
            .skip(size)
            .find(|(_, slot)| !slot.is_poison())
            .map(|(i, _)| i)
    }

    /// Grow to `2c + 1`, poisoning `[size, new_capacity)`.
    ///
    /// On failure the buffer is unchanged.
    pub fn grow(&mut self, size: usize) -> Result<usize> {
        let old_capacity = self.capacity();
        let new_capacity = self.grow_to(size, grown_capacity(old_capacity))?;

        contracts::check_growth_law(old_capacity, new_capacity);
        tracing::trace!(old_capacity, new_capacity, "grew");
        Ok(new_capacity)
    }

    /// Grow to `target` slots; `None` means the target overflowed `usize`.
    fn grow_to(&mut self, size: usize, target: Option<usize>) -> Result<usize> {
        let old_capacity = self.capacity();
        let new_capacity = target.ok_or(StackError::AllocationFailed {
            requested: usize::MAX,
        })?;

        self.slots
            .try_reserve_exact(new_capacity.saturating_sub(old_capacity))
            .map_err(|_| StackError::AllocationFailed {
                requested: new_capacity,
            })?;
        self.slots.resize_with(new_capacity, T::poison);
        self.poison_from(size.min(old_capacity));
        Ok(new_capacity)
    }

    /// Shrink to `c / 2`, keeping the first `size` slots.
    ///
    /// With `repoison` the retained tail `[size, new_capacity)` is poisoned
    /// again; without it the tail is kept as-is, violations included.
    pub fn shrink(&mut self, size: usize, repoison: bool) -> usize {
        let old_capacity = self.capacity();
        let new_capacity = shrunk_capacity(old_capacity);

        self.slots.truncate(new_capacity);
        self.slots.shrink_to_fit();
        if repoison {
            self.poison_from(size);
        }

        contracts::check_shrink_law(old_capacity, new_capacity, size);
        tracing::trace!(old_capacity, new_capacity, "shrank");
        new_capacity
    }
}
