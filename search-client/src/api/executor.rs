//! Loading/error bookkeeping around a single request attempt.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::error::{ApiError, UNKNOWN_ERROR};

/// Observable lifecycle of the most recent request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestPhase {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

#[derive(Debug, Default)]
struct ExecutorState {
    phase: RequestPhase,
    error: Option<String>,
}

/// Wraps one async call with loading and error state.
///
/// [`execute`](Self::execute) marks the state loading and clears any prior
/// error on entry; on failure it records the failure's message (or a fixed
/// fallback when the message is empty) and returns the failure to the
/// caller. Loading always ends, on every exit path. Exactly one attempt is
/// made; there are no retries at this layer.
#[derive(Debug, Clone, Default)]
pub struct RequestExecutor {
    state: Arc<RwLock<ExecutorState>>,
}

impl RequestExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the operation, tracking loading and error state around it.
    pub async fn execute<T, F>(&self, operation: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        {
            let mut state = self.state.write().await;
            state.phase = RequestPhase::Loading;
            state.error = None;
        }

        let result = operation.await;

        let mut state = self.state.write().await;
        match &result {
            Ok(_) => {
                state.phase = RequestPhase::Succeeded;
            }
            Err(error) => {
                state.phase = RequestPhase::Failed;
                let message = error.to_string();
                state.error = Some(if message.is_empty() {
                    UNKNOWN_ERROR.to_string()
                } else {
                    message
                });
            }
        }
        result
    }

    pub async fn phase(&self) -> RequestPhase {
        self.state.read().await.phase
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.phase == RequestPhase::Loading
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    /// Replace the recorded error with a refined, user-facing message.
    pub(crate) async fn set_error(&self, message: String) {
        self.state.write().await.error = Some(message);
    }

    /// Drop the recorded error, e.g. when the failure belongs to a request
    /// that was superseded and must not be surfaced.
    pub(crate) async fn clear_error(&self) {
        self.state.write().await.error = None;
    }

    /// Return to the initial idle state.
    pub(crate) async fn reset(&self) {
        let mut state = self.state.write().await;
        state.phase = RequestPhase::Idle;
        state.error = None;
    }
}
