// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Per-stack configuration.
//!
//! The defaults are the strict settings. [`StackConfig::lenient`] reproduces
//! the looser behavior some callers depend on: checksum mismatches are logged
//! but don't stop the operation, and a shrink skips re-poisoning the retained
//! tail.
//!
//! Skipping the re-poison cannot be observed through a [`GuardedStack`]:
//! pop refuses a dirty tail before it gets to shrink, and the slot it vacates
//! is poisoned on the way out. The flag only changes what
//! [`PoisonedBuffer::shrink`] does when driven directly.
//!
//! [`GuardedStack`]: crate::GuardedStack
//! [`PoisonedBuffer::shrink`]: crate::PoisonedBuffer::shrink

use serde::{Deserialize, Serialize};

/// What to do when the stored checksum disagrees with the stack's shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecksumPolicy {
    /// Report the mismatch and fail the pending operation.
    #[default]
    Enforce,
    /// Report the mismatch and carry on.
    ReportOnly,
}

/// Knobs for a single stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    pub checksum_policy: ChecksumPolicy,
    /// Re-poison `[size, new_capacity)` after the buffer shrinks. Redundant
    /// for stack-driven shrinks, whose tail is always clean already.
    pub repoison_on_shrink: bool,
    /// Run the validation pass again after each push/pop.
    pub verify_after_mutation: bool,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            checksum_policy: ChecksumPolicy::Enforce,
            repoison_on_shrink: true,
            verify_after_mutation: true,
        }
    }
}

impl StackConfig {
    /// Detect-but-don't-prevent settings.
    pub fn lenient() -> Self {
        Self {
            checksum_policy: ChecksumPolicy::ReportOnly,
            repoison_on_shrink: false,
            verify_after_mutation: true,
        }
    }

    pub fn with_checksum_policy(mut self, policy: ChecksumPolicy) -> Self {
        self.checksum_policy = policy;
        self
    }

    pub fn with_repoison_on_shrink(mut self, enabled: bool) -> Self {
        self.repoison_on_shrink = enabled;
        self
    }

    pub fn with_verify_after_mutation(mut self, enabled: bool) -> Self {
        self.verify_after_mutation = enabled;
        self
    }

    /// Parse a JSON config. Missing fields take their defaults.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
