//! View state of the review client and the transitions the workflows drive it through.
//!
//! Every transition is synchronous and touches nothing but `self`, so the
//! submission and history rules can be exercised without a transport.

use shared::protocol::{AnalysisResult, Review};

use crate::error::{ClientError, VALIDATION_MESSAGE};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub draft_text: String,
    pub last_result: Option<AnalysisResult>,
    pub history: Vec<Review>,
    pub is_submitting: bool,
    pub error_message: Option<String>,
    latest_history_generation: u64,
    applied_history_generation: u64,
}

impl ViewState {
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft_text = text.into();
    }

    pub fn can_submit(&self) -> bool {
        !self.is_submitting && !self.draft_text.trim().is_empty()
    }

    /// Admits a submission of `text`. On `Ok` the caller owns the in-flight
    /// slot and must call [`ViewState::end_submit`] once the request settles.
    pub fn begin_submit(&mut self, text: &str) -> Result<(), ClientError> {
        if self.is_submitting {
            return Err(ClientError::AlreadySubmitting);
        }
        if text.trim().is_empty() {
            self.error_message = Some(VALIDATION_MESSAGE.to_string());
            return Err(ClientError::Validation);
        }
        self.is_submitting = true;
        self.error_message = None;
        Ok(())
    }

    pub fn finish_submit_ok(&mut self, result: AnalysisResult) {
        self.last_result = Some(result);
        self.draft_text.clear();
    }

    pub fn finish_submit_err(&mut self, err: &ClientError) {
        self.error_message = Some(err.user_message());
    }

    pub fn end_submit(&mut self) {
        self.is_submitting = false;
    }

    /// Registers a history fetch and returns its generation.
    pub fn begin_refresh(&mut self) -> u64 {
        self.latest_history_generation += 1;
        self.latest_history_generation
    }

    /// Replaces the history with `reviews` unless a newer fetch has already
    /// been applied. Returns whether it applied.
    pub fn apply_history(&mut self, generation: u64, reviews: Vec<Review>) -> bool {
        if generation < self.applied_history_generation {
            return false;
        }
        self.applied_history_generation = generation;
        self.history = reviews;
        true
    }

    pub fn latest_history_generation(&self) -> u64 {
        self.latest_history_generation
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
