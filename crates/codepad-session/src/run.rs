//! Run controller.
//!
//! A pure state machine over [`RunState`]. Submitting produces a
//! [`RunRequest`] for the host to execute; the host reports back with
//! [`RunController::settle`]. At most one request is in flight.

use std::fmt;

use codepad_model::{ExecutionResult, Language, RunState, is_blank};
use thiserror::Error;

use crate::backend::BackendError;

/// Identifies one submitted run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunTicket(u64);

impl fmt::Display for RunTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A request the host must hand to the execution backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub ticket: RunTicket,
    pub source: String,
    pub language: Language,
}

/// Why a run was not started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RunRejection {
    #[error("Please write some code first!")]
    EmptySource,
    #[error("A run is already in progress")]
    AlreadyRunning,
}

#[derive(Debug, Default)]
pub struct RunController {
    state: RunState,
    in_flight: Option<RunTicket>,
    next_ticket: u64,
}

impl RunController {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> &RunState {
        &self.state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Ticket of the request currently in flight.
    #[inline]
    pub fn in_flight(&self) -> Option<RunTicket> {
        self.in_flight
    }

    /// Start a run of `source`.
    ///
    /// Clears the previous output/error and moves to `Running`.
    pub fn submit(&mut self, source: &str, language: Language) -> Result<RunRequest, RunRejection> {
        if self.is_running() {
            return Err(RunRejection::AlreadyRunning);
        }
        if is_blank(source) {
            return Err(RunRejection::EmptySource);
        }

        self.next_ticket += 1;
        let ticket = RunTicket(self.next_ticket);
        self.in_flight = Some(ticket);
        self.state = RunState::Running {
            source: source.to_string(),
            language,
        };

        tracing::info!("Run {} started ({})", ticket, language);
        Ok(RunRequest {
            ticket,
            source: source.to_string(),
            language,
        })
    }

    /// Record the backend's answer for `ticket`.
    ///
    /// Returns `false` and leaves the state alone when `ticket` is not the
    /// request in flight (it was orphaned by a reset).
    pub fn settle(
        &mut self,
        ticket: RunTicket,
        result: Result<ExecutionResult, BackendError>,
    ) -> bool {
        if self.in_flight != Some(ticket) {
            tracing::debug!("Ignoring stale result for run {}", ticket);
            return false;
        }
        self.in_flight = None;

        let result = result.unwrap_or_else(|error| {
            tracing::warn!("Run {} failed: {}", ticket, error);
            ExecutionResult::failure(error.user_message())
        });
        self.state = RunState::settled_from(result);

        tracing::info!(
            "Run {} settled ({})",
            ticket,
            if self.state.error().is_some() { "error" } else { "ok" }
        );
        true
    }

    /// Drop the displayed output. Has no effect while running.
    pub fn clear(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        self.state = RunState::Idle;
        true
    }

    /// Return to `Idle`, orphaning any request in flight.
    pub fn reset(&mut self) {
        if let Some(ticket) = self.in_flight.take() {
            tracing::debug!("Orphaning run {}", ticket);
        }
        self.state = RunState::Idle;
    }
}
