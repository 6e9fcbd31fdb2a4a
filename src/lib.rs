//! A LIFO stack that detects its own corruption.
//!
//! [`GuardedStack`] is a growable stack instrumented three ways:
//!
//! - **Guard words** bracket the stack's own fields. Anything that writes over
//!   the struct is likely to hit one of them.
//! - **A shape checksum** over `(capacity, size, element type)` is resealed
//!   after every mutation and verified before the next one.
//! - **Poisoned capacity**: every slot past the top of the stack holds the
//!   element type's sentinel value. A write past the end, or a touch of a
//!   popped slot, shows up on the next validation pass.
//!
//! Problems go to a [`Reporter`] (structured `tracing` events by default) and
//! come back as a [`StackError`]. The stack stays usable afterwards, except
//! for an unrecognized error code, which destroys it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐   ┌────────────┐   ┌─────────────┐
//! │ sentinel.rs │   │  guard.rs  │   │ checksum.rs │
//! │  (poison,   │   │  (guard    │   │  (shape     │
//! │  tolerance) │   │   words)   │   │   seal)     │
//! └──────┬──────┘   └─────┬──────┘   └──────┬──────┘
//!        ▼                │                 │
//! ┌─────────────┐         │                 │
//! │  buffer.rs  │         │                 │
//! │ (grow/shrink│         │                 │
//! │  re-poison) │         │                 │
//! └──────┬──────┘         │                 │
//!        ▼                ▼                 ▼
//! ┌───────────────────────────────────────────────────┐
//! │                    stack.rs                        │
//! │   push / pop / peek with validation interleaved   │
//! └───────────────────────┬───────────────────────────┘
//!                         ▼
//!              ┌─────────────────────┐
//!              │ report.rs / dump.rs │
//!              │  (side channel)     │
//!              └─────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use guardstack::{GuardedStack, StackError};
//!
//! let mut stack = GuardedStack::<i32>::new(1)?;
//! stack.push(5)?;
//! stack.push(7)?;
//! assert_eq!(stack.capacity(), 3);
//! assert_eq!(stack.raw_slots(), &[5, 7, -661]);
//!
//! assert_eq!(stack.pop()?, 7);
//! assert_eq!(stack.pop()?, 5);
//! assert_eq!(stack.pop(), Err(StackError::Empty));
//! # Ok::<(), StackError>(())
//! ```

// Module declarations
pub mod buffer;
pub mod checksum;
pub mod config;
pub mod contracts;
pub mod dump;
pub mod error;
pub mod guard;
pub mod report;
pub mod sentinel;
mod stack;
pub mod testing;

// Re-exports for public API
pub use buffer::PoisonedBuffer;
pub use config::{ChecksumPolicy, StackConfig};
pub use dump::StackDump;
pub use error::{ErrorKind, Result, Severity, StackError};
pub use guard::GUARD_MAGIC;
pub use report::{
    Incident, RecordedIncident, RecordingReporter, Reporter, SilentReporter, TracingReporter,
};
pub use sentinel::Sentinel;
pub use stack::{GuardedStack, Lifecycle, DESTROYED};
