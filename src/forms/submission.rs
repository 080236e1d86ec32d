//! Single-flight submission state shared by both form controllers

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lifecycle of one form's submissions
///
/// `Idle -> Submitting -> Completed(outcome)`; a new submission leaves `Completed`
/// for `Submitting` again and drops the previous outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState<O> {
    Idle,
    Submitting,
    Completed(O),
}

impl<O> Default for SubmissionState<O> {
    fn default() -> Self {
        SubmissionState::Idle
    }
}

impl<O> SubmissionState<O> {
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmissionState::Submitting)
    }

    /// Outcome of the last finished submission, if it is still shown
    #[must_use]
    pub fn outcome(&self) -> Option<&O> {
        match self {
            SubmissionState::Completed(outcome) => Some(outcome),
            _ => None,
        }
    }
}

/// What a call to `submit` did
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum SubmitResult<O> {
    /// Another submission was already in flight; nothing was sent
    Ignored,
    /// The submission ran to completion with this outcome
    Completed(O),
}

impl<O> SubmitResult<O> {
    #[must_use]
    pub fn is_ignored(&self) -> bool {
        matches!(self, SubmitResult::Ignored)
    }

    #[must_use]
    pub fn outcome(self) -> Option<O> {
        match self {
            SubmitResult::Ignored => None,
            SubmitResult::Completed(outcome) => Some(outcome),
        }
    }
}

/// Guard against concurrent submissions from one form instance
#[derive(Debug)]
pub struct SingleFlight<O> {
    state: Mutex<SubmissionState<O>>,
}

impl<O: Clone> Default for SingleFlight<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: Clone> SingleFlight<O> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SubmissionState::Idle),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SubmissionState<O>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enter `Submitting`, clearing any shown outcome
    ///
    /// Returns `None` without touching the state if a submission is already in
    /// flight.
    pub fn try_begin(&self) -> Option<FlightGuard<'_, O>> {
        let mut state = self.lock();
        if state.is_submitting() {
            return None;
        }
        *state = SubmissionState::Submitting;
        Some(FlightGuard {
            flight: self,
            outcome: None,
        })
    }

    /// Copy of the current state
    #[must_use]
    pub fn state(&self) -> SubmissionState<O> {
        self.lock().clone()
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.lock().is_submitting()
    }
}

/// Marks one in-flight submission; leaves `Submitting` when dropped
///
/// Dropped after `complete`, the state becomes `Completed(outcome)`. Dropped
/// without it (the submit future was cancelled or panicked), the state returns to
/// `Idle`.
#[derive(Debug)]
pub struct FlightGuard<'a, O: Clone> {
    flight: &'a SingleFlight<O>,
    outcome: Option<O>,
}

impl<O: Clone> FlightGuard<'_, O> {
    /// Finish the submission and publish `outcome`
    pub fn complete(mut self, outcome: O) -> O {
        self.outcome = Some(outcome.clone());
        outcome
    }
}

impl<O: Clone> Drop for FlightGuard<'_, O> {
    fn drop(&mut self) {
        let mut state = self.flight.lock();
        *state = match self.outcome.take() {
            Some(outcome) => SubmissionState::Completed(outcome),
            None => SubmissionState::Idle,
        };
    }
}
