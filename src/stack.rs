// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The guarded stack.
//!
//! Every mutating call runs the validation pass first and refuses to touch a
//! stack that fails it. The pass checks, in order, first failure wins:
//!
//! 1. the stack is still live (not destroyed)
//! 2. `size <= capacity`
//! 3. the buffer is still present
//! 4. both guard words are intact
//! 5. every slot in `[size, capacity)` is poison
//!
//! After validation, push and pop verify the shape checksum (blocking or not,
//! per [`ChecksumPolicy`]), mutate, reseal the checksum and (by default) run the
//! validation pass again. Every failure goes to the [`Reporter`] before it is
//! returned. Failures are recoverable except for an unrecognized error code,
//! which moves the stack to [`Lifecycle::Destroyed`].

use std::fmt;

use crate::buffer::{self, PoisonedBuffer};
use crate::checksum::Checksum;
use crate::config::{ChecksumPolicy, StackConfig};
use crate::contracts;
use crate::dump::StackDump;
use crate::error::{ErrorKind, Result, Severity, StackError};
use crate::guard::{self, Guard};
use crate::report::{Incident, Reporter, TracingReporter};
use crate::sentinel::Sentinel;

/// Value `size` takes once a stack is destroyed.
pub const DESTROYED: usize = usize::MAX;

/// Where a stack is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Live,
    Destroyed,
}

/// A LIFO stack that checks its own integrity on every operation.
pub struct GuardedStack<T: Sentinel, R: Reporter = TracingReporter> {
    pub(crate) guard_front: Guard,
    pub(crate) buffer: Option<PoisonedBuffer<T>>,
    pub(crate) size: usize,
    pub(crate) checksum: Checksum,
    pub(crate) lifecycle: Lifecycle,
    config: StackConfig,
    reporter: R,
    pub(crate) guard_back: Guard,
}

impl<T: Sentinel> GuardedStack<T> {
    /// Create a stack with `initial_capacity` poisoned slots.
    pub fn new(initial_capacity: usize) -> Result<Self> {
        Self::with_config(initial_capacity, StackConfig::default())
    }

    pub fn with_config(initial_capacity: usize, config: StackConfig) -> Result<Self> {
        Self::with_reporter(initial_capacity, config, TracingReporter)
    }
}

impl<T: Sentinel, R: Reporter> GuardedStack<T, R> {
    /// Create a stack that sends incidents to `reporter`.
    ///
    /// A failed allocation is reported before it is returned; there is no
    /// stack yet, so the incident carries no dump.
    pub fn with_reporter(
        initial_capacity: usize,
        config: StackConfig,
        mut reporter: R,
    ) -> Result<Self> {
        let buffer = match PoisonedBuffer::with_capacity(initial_capacity) {
            Ok(buffer) => buffer,
            Err(err) => {
                reporter.report(&Incident {
                    error: &err,
                    severity: err.severity(),
                    type_tag: T::TYPE_TAG,
                    size: 0,
                    capacity: initial_capacity,
                    dump: &"<not allocated>",
                });
                return Err(err);
            }
        };
        Ok(Self {
            guard_front: Guard::new(),
            buffer: Some(buffer),
            size: 0,
            checksum: Checksum::of(initial_capacity, 0, T::signature()),
            lifecycle: Lifecycle::Live,
            config,
            reporter,
            guard_back: Guard::new(),
        })
    }

    // ========================================================================
    // ACCESSORS (no validation)
    // ========================================================================

    /// Live element count; [`DESTROYED`] after destruction.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Allocated slots; 0 after destruction.
    pub fn capacity(&self) -> usize {
        self.buffer.as_ref().map_or(0, PoisonedBuffer::capacity)
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_destroyed(&self) -> bool {
        self.lifecycle == Lifecycle::Destroyed
    }

    pub fn checksum(&self) -> u64 {
        self.checksum.value()
    }

    /// Current `(front, back)` guard words.
    pub fn guards(&self) -> (u64, u64) {
        (self.guard_front.value(), self.guard_back.value())
    }

    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn reporter_mut(&mut self) -> &mut R {
        &mut self.reporter
    }

    /// Live elements, bottom first. Empty once destroyed.
    pub fn as_slice(&self) -> &[T] {
        match &self.buffer {
            Some(buffer) if self.size <= buffer.capacity() => &buffer.as_slice()[..self.size],
            _ => &[],
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Unreported bounds-checked read.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    /// Every slot, poisoned ones included.
    pub fn raw_slots(&self) -> &[T] {
        self.buffer.as_ref().map(PoisonedBuffer::as_slice).unwrap_or(&[])
    }

    /// Snapshot for diagnostics.
    pub fn describe(&self) -> StackDump<'_, T> {
        StackDump {
            address: (self as *const Self).cast(),
            buffer: self.buffer.as_ref(),
            size: self.size,
            checksum: self.checksum.value(),
            guards: (self.guard_front, self.guard_back),
        }
    }

    // ========================================================================
    // OPERATIONS
    // ========================================================================

    /// Push a value, growing the buffer when full.
    ///
    /// On any error the stack is left as it was.
    pub fn push(&mut self, value: T) -> Result<()> {
        self.check()?;
        self.verify_checksum()?;

        let size = self.size;
        let grown = match self.buffer.as_mut() {
            Some(buffer) if size == buffer.capacity() => buffer.grow(size).map(Some),
            Some(_) => Ok(None),
            None => Err(StackError::InvalidReference),
        };
        if let Err(err) = grown {
            return Err(self.fail(err));
        }

        if let Some(buffer) = self.buffer.as_mut() {
            buffer.put(size, value);
        }
        self.size = size + 1;
        self.reseal();
        self.audit();
        Ok(())
    }

    /// Pop the top value, shrinking the buffer when it falls under a quarter full.
    pub fn pop(&mut self) -> Result<T> {
        self.check()?;
        if self.size == 0 {
            return Err(self.fail(StackError::Empty));
        }
        self.verify_checksum()?;

        let new_size = self.size - 1;
        let repoison = self.config.repoison_on_shrink;
        let Some(buffer) = self.buffer.as_mut() else {
            return Err(self.fail(StackError::InvalidReference));
        };
        let value = buffer.take(new_size);
        if buffer::should_shrink(new_size, buffer.capacity()) {
            buffer.shrink(new_size, repoison);
        }

        self.size = new_size;
        self.reseal();
        self.audit();
        Ok(value)
    }

    /// Pop into a caller-provided slot. `out` is untouched on error.
    pub fn pop_into(&mut self, out: &mut T) -> Result<()> {
        *out = self.pop()?;
        Ok(())
    }

    /// Pop and drop the top value.
    pub fn discard(&mut self) -> Result<()> {
        self.pop().map(drop)
    }

    /// Bounds-checked read of a live slot; misses are reported.
    pub fn peek(&mut self, index: usize) -> Result<&T> {
        self.check_reference()?;
        if index >= self.size || index >= self.capacity() {
            let size = self.size;
            return Err(self.fail(StackError::OutOfBounds { index, size }));
        }
        self.get(index).ok_or(StackError::OutOfBounds {
            index,
            size: self.size,
        })
    }

    /// The most recently pushed value.
    pub fn top(&mut self) -> Result<&T> {
        self.check_reference()?;
        if self.size == 0 {
            return Err(self.fail(StackError::Empty));
        }
        self.peek(self.size - 1)
    }

    /// Run the validation pass, reporting any failure.
    ///
    /// The checksum is not part of this pass. Push and pop verify it
    /// separately, after validation and before they mutate, under the
    /// configured [`ChecksumPolicy`].
    pub fn validate(&mut self) -> Result<()> {
        self.check()
    }

    /// Validation pass without reporting.
    pub fn inspect(&self) -> Result<()> {
        if self.is_destroyed() {
            return Err(StackError::InvalidReference);
        }
        let capacity = self.capacity();
        if self.size > capacity {
            return Err(StackError::InvalidSize {
                size: self.size,
                capacity,
            });
        }
        let Some(buffer) = self.buffer.as_ref() else {
            return Err(StackError::InvalidReference);
        };
        guard::check_pair(self.guard_front, self.guard_back)?;
        if let Some(index) = buffer.first_violation(self.size) {
            return Err(StackError::PoisonRegionViolated { index });
        }
        Ok(())
    }

    /// Raise an error by numeric code, as an external collaborator would.
    ///
    /// Code 0 means success. Recognized codes are reported with the stack's
    /// current state filled in and returned. Anything else is fatal: the
    /// stack is dumped, destroyed, and `UnknownError` is returned.
    pub fn report_error(&mut self, code: u32) -> Result<()> {
        if code == 0 {
            return Ok(());
        }
        let capacity = self.capacity();
        let error = match ErrorKind::from_code(code) {
            ErrorKind::InvalidReference => StackError::InvalidReference,
            ErrorKind::InvalidSize => StackError::InvalidSize {
                size: self.size,
                capacity,
            },
            ErrorKind::GuardCorrupted => StackError::GuardCorrupted {
                front: self.guard_front.value(),
                back: self.guard_back.value(),
            },
            ErrorKind::PoisonRegionViolated => StackError::PoisonRegionViolated {
                index: self
                    .buffer
                    .as_ref()
                    .and_then(|b| b.first_violation(self.size))
                    .unwrap_or(self.size),
            },
            ErrorKind::ChecksumMismatch => StackError::ChecksumMismatch {
                stored: self.checksum.value(),
                expected: crate::checksum::compute(capacity, self.size, T::signature()),
            },
            ErrorKind::Empty => StackError::Empty,
            ErrorKind::OutOfBounds => StackError::OutOfBounds {
                index: self.size,
                size: self.size,
            },
            ErrorKind::AllocationFailed => StackError::AllocationFailed {
                requested: capacity,
            },
            ErrorKind::Unknown => StackError::UnknownError { code },
        };
        Err(self.fail(error))
    }

    /// Release the buffer and mark the stack destroyed. Idempotent.
    pub fn destroy(&mut self) {
        if self.is_destroyed() {
            return;
        }
        self.buffer = None;
        self.size = DESTROYED;
        self.lifecycle = Lifecycle::Destroyed;
        tracing::debug!(element = T::TYPE_TAG, "stack destroyed");
    }

    // ========================================================================
    // INTERNALS
    // ========================================================================

    /// Validate and report.
    fn check(&mut self) -> Result<()> {
        match self.inspect() {
            Ok(()) => Ok(()),
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Reads need a live stack with a buffer, nothing more.
    fn check_reference(&mut self) -> Result<()> {
        if self.is_destroyed() || self.buffer.is_none() {
            return Err(self.fail(StackError::InvalidReference));
        }
        Ok(())
    }

    fn verify_checksum(&mut self) -> Result<()> {
        let Err(err) = self
            .checksum
            .verify(self.capacity(), self.size, T::signature())
        else {
            return Ok(());
        };
        let err = self.fail(err);
        match self.config.checksum_policy {
            ChecksumPolicy::Enforce => Err(err),
            ChecksumPolicy::ReportOnly => Ok(()),
        }
    }

    fn reseal(&mut self) {
        self.checksum = Checksum::of(self.capacity(), self.size, T::signature());
    }

    /// Post-mutation checks. The mutation is already committed, so a failure
    /// here is reported but not returned.
    fn audit(&mut self) {
        let capacity = self.capacity();
        contracts::check_size_within_capacity(self.size, capacity);
        contracts::check_poison_region(self.raw_slots(), self.size);
        contracts::check_sealed(self.checksum.value(), capacity, self.size, T::signature());

        if self.config.verify_after_mutation && self.check().is_err() {
            tracing::debug!("post-mutation validation failed after commit");
        }
    }

    /// Report an error and apply its severity. Returns the error for `?`.
    fn fail(&mut self, error: StackError) -> StackError {
        let severity = error.severity();
        let capacity = self.capacity();
        let dump = StackDump {
            address: (self as *const Self).cast(),
            buffer: self.buffer.as_ref(),
            size: self.size,
            checksum: self.checksum.value(),
            guards: (self.guard_front, self.guard_back),
        };
        self.reporter.report(&Incident {
            error: &error,
            severity,
            type_tag: T::TYPE_TAG,
            size: self.size,
            capacity,
            dump: &dump,
        });
        if severity == Severity::Fatal {
            self.destroy();
        }
        error
    }
}

impl<T: Sentinel, R: Reporter> fmt::Debug for GuardedStack<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuardedStack")
            .field("element", &T::TYPE_TAG)
            .field("size", &self.size)
            .field("capacity", &self.capacity())
            .field("lifecycle", &self.lifecycle)
            .field("live", &self.as_slice())
            .finish()
    }
}

impl<'a, T: Sentinel, R: Reporter> IntoIterator for &'a GuardedStack<T, R> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
