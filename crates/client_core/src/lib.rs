use std::sync::{Arc, Mutex, PoisonError};

use shared::protocol::{
    AnalysisResult, AnalyzeReviewRequest, Review, ReviewListResponse, ANALYZE_REVIEW_PATH,
    REVIEWS_PATH,
};
use tracing::{debug, info, warn};

pub mod error;
pub mod state;
pub mod transport;

pub use error::{ClientError, TransportError};
pub use state::ViewState;
pub use transport::{HttpTransport, ReviewTransport, TransportResponse, DEFAULT_API_BASE_URL};

use error::{ANALYZE_FALLBACK_MESSAGE, HISTORY_FALLBACK_MESSAGE};

/// Drives the submission and history workflows against an injected transport.
///
/// The view state lock is only taken inside short synchronous sections and is
/// never held across a network call.
pub struct ReviewWorkflow {
    transport: Arc<dyn ReviewTransport>,
    state: Mutex<ViewState>,
}

/// Releases the in-flight submission slot however `submit_review` exits.
struct SubmitSlot<'a> {
    workflow: &'a ReviewWorkflow,
}

impl Drop for SubmitSlot<'_> {
    fn drop(&mut self) {
        self.workflow.update(ViewState::end_submit);
    }
}

impl ReviewWorkflow {
    pub fn new(transport: Arc<dyn ReviewTransport>) -> Self {
        Self {
            transport,
            state: Mutex::new(ViewState::default()),
        }
    }

    pub fn snapshot(&self) -> ViewState {
        self.update(|state| state.clone())
    }

    pub fn set_draft(&self, text: impl Into<String>) {
        let text = text.into();
        self.update(|state| state.set_draft(text));
    }

    fn update<R>(&self, f: impl FnOnce(&mut ViewState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    /// Initial history fetch.
    pub async fn load(&self) -> Result<Vec<Review>, ClientError> {
        self.refresh_history().await
    }

    pub async fn submit_draft(&self) -> Result<AnalysisResult, ClientError> {
        let text = self.update(|state| state.draft_text.clone());
        self.submit_review(&text).await
    }

    pub async fn submit_review(&self, text: &str) -> Result<AnalysisResult, ClientError> {
        self.update(|state| state.begin_submit(text))?;

        let outcome = {
            let _slot = SubmitSlot { workflow: self };
            let outcome = self.post_review(text).await;
            match &outcome {
                Ok(result) => {
                    info!(
                        sentiment = %result.sentiment,
                        key_points = result.key_points.len(),
                        "review analyzed"
                    );
                    let result = result.clone();
                    self.update(|state| state.finish_submit_ok(result));
                }
                Err(err) => {
                    warn!(error = %err, "review submission failed");
                    self.update(|state| state.finish_submit_err(err));
                }
            }
            outcome
        };

        if outcome.is_ok() {
            // Failures are already logged and leave the previous history in place.
            let _ = self.refresh_history().await;
        }
        outcome
    }

    async fn post_review(&self, text: &str) -> Result<AnalysisResult, ClientError> {
        let request = AnalyzeReviewRequest {
            review_text: text.to_string(),
        };
        let body =
            serde_json::to_value(&request).map_err(|err| ClientError::Encode(err.to_string()))?;
        let response = self.transport.post_json(ANALYZE_REVIEW_PATH, body).await?;

        if !response.is_success() {
            return Err(ClientError::Server {
                status: response.status,
                message: response
                    .error_message()
                    .unwrap_or_else(|| ANALYZE_FALLBACK_MESSAGE.to_string()),
            });
        }

        response
            .json::<AnalysisResult>()
            .map_err(|err| ClientError::Decode(err.to_string()))
    }

    /// Fetches the full review list and replaces the history with it. A
    /// failure is logged and leaves the current history untouched.
    pub async fn refresh_history(&self) -> Result<Vec<Review>, ClientError> {
        let generation = self.update(ViewState::begin_refresh);
        debug!(generation, "fetching review history");

        let reviews = match self.fetch_reviews().await {
            Ok(reviews) => reviews,
            Err(err) => {
                warn!(generation, error = %err, "failed to fetch review history");
                return Err(err);
            }
        };

        let applied = {
            let reviews = reviews.clone();
            self.update(|state| state.apply_history(generation, reviews))
        };
        if !applied {
            debug!(generation, "discarding stale review history response");
            return Err(ClientError::Superseded);
        }

        info!(generation, count = reviews.len(), "review history updated");
        Ok(reviews)
    }

    async fn fetch_reviews(&self) -> Result<Vec<Review>, ClientError> {
        let response = self.transport.get_json(REVIEWS_PATH).await?;
        if !response.is_success() {
            return Err(ClientError::Server {
                status: response.status,
                message: response
                    .error_message()
                    .unwrap_or_else(|| HISTORY_FALLBACK_MESSAGE.to_string()),
            });
        }

        let list = response
            .json::<ReviewListResponse>()
            .map_err(|err| ClientError::Decode(err.to_string()))?;
        Ok(list.reviews)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
