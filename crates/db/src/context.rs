//! Deadlines and cancellation for store operations.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::StoreError;

/// Bounds a single store operation in time and lets the caller abandon it.
///
/// When the timeout elapses or the token is cancelled, the in-flight query
/// future is dropped and any partial result is discarded.
#[derive(Debug, Clone)]
pub struct OpContext {
    timeout: Duration,
    cancel: CancellationToken,
}

impl OpContext {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            cancel: CancellationToken::new(),
        }
    }

    /// Use `token` (typically a child of a request- or shutdown-scoped
    /// token) to cancel the operation.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Drive `fut` to completion unless the deadline passes or the token
    /// fires first.
    pub(crate) async fn run<T, F>(&self, op: &'static str, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        tokio::select! {
            biased;

            () = self.cancel.cancelled() => {
                tracing::warn!(op, "Store operation cancelled");
                Err(StoreError::Cancelled)
            }
            result = tokio::time::timeout(self.timeout, fut) => match result {
                Ok(inner) => inner.map_err(StoreError::from),
                Err(_) => {
                    tracing::warn!(
                        op,
                        timeout_ms = self.timeout.as_millis() as u64,
                        "Store operation timed out"
                    );
                    Err(StoreError::Timeout(self.timeout))
                }
            },
        }
    }
}

impl Default for OpContext {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TIMEOUT)
    }
}
