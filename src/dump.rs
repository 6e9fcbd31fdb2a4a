// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Human-readable state dumps.
//!
//! A [`StackDump`] borrows a stack's parts and renders them on demand:
//!
//! ```text
//! GuardedStack<i32> [0x7ffd5c1e8a40] {
//!     size = 2
//!     capacity = 3
//!     checksum = 3892 (ok)
//!     guards = 0xdeadbeef / 0xdeadbeef
//!     data [0x55d4c6a1b2c0] {
//!         [0] = 5
//!         [1] = 7
//!         [2] = -661 (poison)
//!     }
//! }
//! ```
//!
//! Slots past the live prefix are tagged `(poison)` when they still hold the
//! sentinel and `(POISON VIOLATED)` when they don't.

use std::fmt;

use crate::buffer::PoisonedBuffer;
use crate::checksum;
use crate::guard::Guard;
use crate::sentinel::Sentinel;

/// Borrowed snapshot of a stack, rendered through [`fmt::Display`].
pub struct StackDump<'a, T: Sentinel> {
    pub(crate) address: *const (),
    pub(crate) buffer: Option<&'a PoisonedBuffer<T>>,
    pub(crate) size: usize,
    pub(crate) checksum: u64,
    pub(crate) guards: (Guard, Guard),
}

impl<'a, T: Sentinel> StackDump<'a, T> {
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn capacity(&self) -> usize {
        self.buffer.map_or(0, PoisonedBuffer::capacity)
    }

    /// Slot contents, empty once the buffer is released.
    pub fn slots(&self) -> &'a [T] {
        self.buffer.map(PoisonedBuffer::as_slice).unwrap_or(&[])
    }

    pub fn checksum_ok(&self) -> bool {
        self.buffer.is_some()
            && self.checksum == checksum::compute(self.capacity(), self.size, T::signature())
    }
}

impl<T: Sentinel> fmt::Display for StackDump<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (front, back) = self.guards;
        let flag = |ok: bool| if ok { "ok" } else { "MISMATCH" };

        writeln!(f, "GuardedStack<{}> [{:p}] {{", T::TYPE_TAG, self.address)?;
        writeln!(f, "    size = {}", self.size)?;
        writeln!(f, "    capacity = {}", self.capacity())?;
        writeln!(
            f,
            "    checksum = {} ({})",
            self.checksum,
            flag(self.checksum_ok())
        )?;
        writeln!(
            f,
            "    guards = {:#x} / {:#x}{}",
            front.value(),
            back.value(),
            if front.is_intact() && back.is_intact() {
                ""
            } else {
                " (CORRUPTED)"
            }
        )?;

        match self.buffer {
            None => writeln!(f, "    data [released]")?,
            Some(buffer) => {
                writeln!(f, "    data [{:p}] {{", buffer.as_ptr())?;
                for (i, slot) in buffer.as_slice().iter().enumerate() {
                    let tag = match (i < self.size, slot.is_poison()) {
                        (true, _) => "",
                        (false, true) => " (poison)",
                        (false, false) => " (POISON VIOLATED)",
                    };
                    writeln!(f, "        [{}] = {:?}{}", i, slot, tag)?;
                }
                writeln!(f, "    }}")?;
            }
        }
        write!(f, "}}")
    }
}

impl<T: Sentinel> fmt::Debug for StackDump<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
