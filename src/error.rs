// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy for guarded stacks.
//!
//! Every error carries a stable numeric code. Codes 1 through 5 are the
//! integrity failures found by validation, 7 through 9 are operational
//! failures (empty pop, bad index, allocation). Anything else is an error the
//! reporter does not recognize, and that is fatal: the stack reports, dumps
//! and destroys itself.

use thiserror::Error;

/// Stack result alias.
pub type Result<T, E = StackError> = std::result::Result<T, E>;

/// Everything that can go wrong with a guarded stack.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StackError {
    /// The stack was destroyed, or its buffer has been released.
    #[error("invalid stack reference: stack destroyed or buffer released")]
    InvalidReference,

    /// `size > capacity`.
    #[error("invalid size: size {size} exceeds capacity {capacity}")]
    InvalidSize { size: usize, capacity: usize },

    /// One of the guard words no longer holds its construction-time value.
    #[error("guard value corrupted: front = {front:#x}, back = {back:#x}")]
    GuardCorrupted { front: u64, back: u64 },

    /// A slot past the live prefix no longer holds the poison value.
    #[error("poison region violated at slot {index}")]
    PoisonRegionViolated { index: usize },

    /// The stored checksum does not match the stack's current shape.
    #[error("checksum mismatch: stored {stored}, expected {expected}")]
    ChecksumMismatch { stored: u64, expected: u64 },

    /// An error code nobody recognizes. Fatal.
    #[error("unknown error code {code}")]
    UnknownError { code: u32 },

    /// Pop or top on a stack with no live elements.
    #[error("cannot pop from an empty stack")]
    Empty,

    /// Element access outside the live prefix.
    #[error("index {index} is out of range for size {size}")]
    OutOfBounds { index: usize, size: usize },

    /// The buffer could not be (re)allocated. The stack is unchanged.
    #[error("failed to allocate {requested} slots")]
    AllocationFailed { requested: usize },
}

/// Fieldless mirror of [`StackError`], keyed by numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidReference,
    InvalidSize,
    GuardCorrupted,
    PoisonRegionViolated,
    ChecksumMismatch,
    Unknown,
    Empty,
    OutOfBounds,
    AllocationFailed,
}

/// How a reported error affects the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Reported; the operation fails but the stack stays usable.
    Recoverable,
    /// Reported with a full dump; the stack is destroyed.
    Fatal,
}

impl ErrorKind {
    /// The code this kind is reported under.
    pub const fn code(self) -> u32 {
        match self {
            ErrorKind::InvalidReference => 1,
            ErrorKind::InvalidSize => 2,
            ErrorKind::GuardCorrupted => 3,
            ErrorKind::PoisonRegionViolated => 4,
            ErrorKind::ChecksumMismatch => 5,
            ErrorKind::Unknown => 6,
            ErrorKind::Empty => 7,
            ErrorKind::OutOfBounds => 8,
            ErrorKind::AllocationFailed => 9,
        }
    }

    /// Map a code back to its kind. Unrecognized codes are [`ErrorKind::Unknown`].
    pub const fn from_code(code: u32) -> Self {
        match code {
            1 => ErrorKind::InvalidReference,
            2 => ErrorKind::InvalidSize,
            3 => ErrorKind::GuardCorrupted,
            4 => ErrorKind::PoisonRegionViolated,
            5 => ErrorKind::ChecksumMismatch,
            7 => ErrorKind::Empty,
            8 => ErrorKind::OutOfBounds,
            9 => ErrorKind::AllocationFailed,
            _ => ErrorKind::Unknown,
        }
    }

    pub const fn severity(self) -> Severity {
        match self {
            ErrorKind::Unknown => Severity::Fatal,
            _ => Severity::Recoverable,
        }
    }
}

impl StackError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StackError::InvalidReference => ErrorKind::InvalidReference,
            StackError::InvalidSize { .. } => ErrorKind::InvalidSize,
            StackError::GuardCorrupted { .. } => ErrorKind::GuardCorrupted,
            StackError::PoisonRegionViolated { .. } => ErrorKind::PoisonRegionViolated,
            StackError::ChecksumMismatch { .. } => ErrorKind::ChecksumMismatch,
            StackError::UnknownError { .. } => ErrorKind::Unknown,
            StackError::Empty => ErrorKind::Empty,
            StackError::OutOfBounds { .. } => ErrorKind::OutOfBounds,
            StackError::AllocationFailed { .. } => ErrorKind::AllocationFailed,
        }
    }

    /// Numeric code. `UnknownError` keeps the code it was raised with.
    pub fn code(&self) -> u32 {
        match self {
            StackError::UnknownError { code } => *code,
            other => other.kind().code(),
        }
    }

    pub fn severity(&self) -> Severity {
        self.kind().severity()
    }

    /// True for the integrity failures validation can find.
    pub fn is_integrity_failure(&self) -> bool {
        matches!(self.code(), 1..=5)
    }
}
