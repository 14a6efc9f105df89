// CHRONOREEL Retry Policy
// Copyright (c) 2026 Xing_The_Creator | CHRONOREEL
//
// Shared by the speech and image synthesis paths so both retry identically.

use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::error::ReelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Fixed backoff.
    pub fn delay_for(&self, _attempt: u32) -> Duration {
        self.delay
    }

    /// Run `op` until it succeeds or attempts run out. The last error is
    /// surfaced as `SynthesisBackend`.
    pub async fn run<T, F, Fut>(&self, stage: &'static str, mut op: F) -> Result<T, ReelError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    last_error = format!("{:#}", e);
                    warn!(
                        "[RETRY] ⚠️ {} attempt {}/{} failed: {}",
                        stage, attempt, attempts, last_error
                    );
                    if attempt < attempts {
                        tokio::time::sleep(self.delay_for(attempt)).await;
                    }
                }
            }
        }

        Err(ReelError::SynthesisBackend {
            stage,
            attempts,
            message: last_error,
        })
    }
}
