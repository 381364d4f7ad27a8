use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::store::StoreError;

/// Request-scoped bound on storage work: an explicit cancellation token plus an
/// absolute expiry. Every store call runs its I/O through [`Deadline::run`].
#[derive(Debug, Clone)]
pub struct Deadline {
    token: CancellationToken,
    shutdown: Option<CancellationToken>,
    expires_at: Instant,
}

impl Deadline {
    pub fn after(timeout: Duration) -> Self {
        Self {
            token: CancellationToken::new(),
            shutdown: None,
            expires_at: Instant::now() + timeout,
        }
    }

    /// Cancelling `shutdown` cancels this deadline too, but not the other way
    /// round. Work aborted that way fails with [`StoreError::ShuttingDown`].
    pub fn with_parent(shutdown: &CancellationToken, timeout: Duration) -> Self {
        Self {
            token: shutdown.child_token(),
            shutdown: Some(shutdown.clone()),
            expires_at: Instant::now() + timeout,
        }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    /// Drives `fut` until it completes, the token fires or the expiry passes,
    /// whichever comes first. A losing future is dropped, never finished.
    pub async fn run<T, F>(&self, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        if self.token.is_cancelled() {
            return Err(self.cancellation());
        }
        if self.is_expired() {
            return Err(StoreError::Timeout);
        }

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(self.cancellation()),
            _ = tokio::time::sleep_until(self.expires_at) => Err(StoreError::Timeout),
            res = fut => res,
        }
    }

    fn cancellation(&self) -> StoreError {
        match &self.shutdown {
            Some(shutdown) if shutdown.is_cancelled() => StoreError::ShuttingDown,
            _ => StoreError::Canceled,
        }
    }
}
