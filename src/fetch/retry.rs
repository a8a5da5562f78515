// src/fetch/retry.rs

use std::future::Future;
use tokio::time::sleep;
use tracing::{error, warn};

use crate::config::RetryPolicy;
use crate::error::PipelineError;

const BODY_SNIPPET_CHARS: usize = 300;

/// One failed attempt: the HTTP status if the transport completed, plus a
/// diagnostic (response body or transport error).
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptFailure {
    pub status: Option<u16>,
    pub detail: String,
}

impl AttemptFailure {
    pub fn status(code: u16, body: &str) -> Self {
        Self {
            status: Some(code),
            detail: truncate(body, BODY_SNIPPET_CHARS),
        }
    }

    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self {
            status: None,
            detail: truncate(&err.to_string(), BODY_SNIPPET_CHARS),
        }
    }
}

/// Run `op` until it succeeds or `policy.max_attempts` is spent, sleeping
/// `backoff_base * attempt` between attempts. `op` receives the 1-based
/// attempt number.
pub async fn retry_linear<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, PipelineError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, AttemptFailure>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op(attempt).await {
            Ok(v) => return Ok(v),
            Err(failure) if attempt < max_attempts => {
                let delay = policy.delay_after(attempt);
                warn!(
                    attempt,
                    status = ?failure.status,
                    body = %failure.detail,
                    delay_ms = delay.as_millis() as u64,
                    "request failed; retrying"
                );
                sleep(delay).await;
            }
            Err(failure) => {
                error!(
                    attempt,
                    status = ?failure.status,
                    body = %failure.detail,
                    "exhausted retries"
                );
                return Err(PipelineError::Fetch {
                    attempts: attempt,
                    status: failure.status,
                    detail: failure.detail,
                });
            }
        }
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &s[..idx]),
        None => s.to_string(),
    }
}
