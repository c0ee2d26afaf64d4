use std::future::Future;
use std::time::Duration;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tokio::time::Instant;

use crate::app::AppState;
use crate::database::StorageError;

/// Per-request deadline handed to every service and repository call.
///
/// Storage backends that talk to the network race their queries against the
/// deadline; dropping the query future aborts it. A client disconnect drops
/// the whole handler future, which cancels the same way.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestContext {
    deadline: Option<Instant>,
}

impl RequestContext {
    /// Context without a deadline (startup checks, tests)
    pub fn background() -> Self {
        Self { deadline: None }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { deadline: Some(Instant::now() + timeout) }
    }

    /// Run `fut` until it completes or the deadline passes
    pub async fn run<F, T>(&self, op: &'static str, fut: F) -> Result<T, StorageError>
    where
        F: Future<Output = Result<T, StorageError>>,
    {
        match self.deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, fut)
                .await
                .map_err(|_| StorageError::DeadlineExceeded { op })?,
            None => fut.await,
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for RequestContext {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(_parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(RequestContext::with_timeout(state.config.api.request_timeout()))
    }
}
