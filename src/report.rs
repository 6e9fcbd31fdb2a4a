// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The diagnostic side channel.
//!
//! Whenever a stack detects a problem it hands an [`Incident`] to its
//! [`Reporter`] before returning the error. Reporting never changes the
//! outcome of the operation; the one exception is a fatal incident, after
//! which the stack destroys itself regardless of what the reporter does.

use std::fmt;

use crate::error::{Severity, StackError};

/// One detected problem, with a lazily rendered dump of the stack.
pub struct Incident<'a> {
    pub error: &'a StackError,
    pub severity: Severity,
    /// Element type tag of the reporting stack.
    pub type_tag: &'static str,
    pub size: usize,
    pub capacity: usize,
    pub dump: &'a dyn fmt::Display,
}

/// Receives incidents from a stack.
pub trait Reporter {
    fn report(&mut self, incident: &Incident<'_>);
}

/// Default reporter: structured `tracing` events.
///
/// Recoverable incidents are `warn` events with the full dump at `debug`.
/// Fatal incidents are `error` events carrying the dump inline.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&mut self, incident: &Incident<'_>) {
        let code = incident.error.code();
        match incident.severity {
            Severity::Fatal => {
                tracing::error!(
                    code,
                    error = %incident.error,
                    element = incident.type_tag,
                    size = incident.size,
                    capacity = incident.capacity,
                    "fatal stack error, destroying stack\n{}",
                    incident.dump
                );
            }
            Severity::Recoverable => {
                tracing::warn!(
                    code,
                    error = %incident.error,
                    element = incident.type_tag,
                    size = incident.size,
                    capacity = incident.capacity,
                    "stack error"
                );
                tracing::debug!("{}", incident.dump);
            }
        }
    }
}

/// Reporter that swallows everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn report(&mut self, _incident: &Incident<'_>) {}
}

/// An incident captured by [`RecordingReporter`], dump already rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedIncident {
    pub error: StackError,
    pub severity: Severity,
    pub dump: String,
}

/// Reporter that keeps every incident in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    incidents: Vec<RecordedIncident>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn incidents(&self) -> &[RecordedIncident] {
        &self.incidents
    }

    pub fn errors(&self) -> Vec<StackError> {
        self.incidents.iter().map(|i| i.error.clone()).collect()
    }

    pub fn last(&self) -> Option<&RecordedIncident> {
        self.incidents.last()
    }

    pub fn clear(&mut self) {
        self.incidents.clear();
    }
}

impl Reporter for RecordingReporter {
    fn report(&mut self, incident: &Incident<'_>) {
        self.incidents.push(RecordedIncident {
            error: incident.error.clone(),
            severity: incident.severity,
            dump: incident.dump.to_string(),
        });
    }
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn report(&mut self, incident: &Incident<'_>) {
        (**self).report(incident);
    }
}

impl<R: Reporter + ?Sized> Reporter for Box<R> {
    fn report(&mut self, incident: &Incident<'_>) {
        (**self).report(incident);
    }
}
