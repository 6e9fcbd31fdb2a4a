// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Guard words: fixed markers bracketing a stack's own state.
//!
//! A stack keeps one guard as its first field and one as its last. They are set
//! at construction and nothing legitimate ever writes them again, so a changed
//! guard means something scribbled over the stack itself.

use crate::error::{Result, StackError};

/// The value every guard is born with.
pub const GUARD_MAGIC: u64 = 0xDEAD_BEEF;

/// A single guard word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Guard(pub(crate) u64);

impl Guard {
    pub const fn new() -> Self {
        Self(GUARD_MAGIC)
    }

    pub const fn value(self) -> u64 {
        self.0
    }

    pub const fn is_intact(self) -> bool {
        self.0 == GUARD_MAGIC
    }
}

impl Default for Guard {
    fn default() -> Self {
        Self::new()
    }
}

/// Check both guards of a pair; either one failing reports both values.
pub fn check_pair(front: Guard, back: Guard) -> Result<()> {
    if front.is_intact() && back.is_intact() {
        Ok(())
    } else {
        Err(StackError::GuardCorrupted {
            front: front.value(),
            back: back.value(),
        })
    }
}
