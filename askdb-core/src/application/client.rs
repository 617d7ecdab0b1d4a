use crate::domain::ChatMessage;
use crate::infrastructure::model::{ModelError, ModelProvider, ModelRequest};
use std::time::Duration;
use tracing::{debug, warn};

/// Retry policy for transient model failures.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub attempts: u32,
    pub base_backoff: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: u32, base_backoff: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            base_backoff,
        }
    }

    /// `base * 2^retry`, capped so the shift never overflows.
    pub fn backoff(&self, retry: u32) -> Duration {
        self.base_backoff.saturating_mul(1u32 << retry.min(16))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(500))
    }
}

/// A model call that exhausted its retries, or failed in a way retries
/// cannot fix.
#[derive(Debug)]
pub struct ChatFailure {
    pub attempts: u32,
    pub error: ModelError,
}

/// Thin layer over a [`ModelProvider`] that fixes the model name and
/// retries transient failures with exponential backoff.
pub struct ChatClient<P: ModelProvider> {
    provider: P,
    model: String,
    retry: RetryPolicy,
}

impl<P: ModelProvider> ChatClient<P> {
    pub fn new(provider: P, model: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            provider,
            model: model.into(),
            retry,
        }
    }

    pub async fn chat(
        &self,
        messages: Vec<ChatMessage>,
        session_id: Option<&str>,
    ) -> Result<String, ChatFailure> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let request = ModelRequest {
                model: self.model.clone(),
                messages: messages.clone(),
                session_id: session_id.map(str::to_string),
            };
            match self.provider.chat(request).await {
                Ok(response) => {
                    debug!(attempt, chars = response.message.content.len(), "Model replied");
                    return Ok(response.message.content);
                }
                Err(error) if error.is_transient() && attempt < self.retry.attempts => {
                    let delay = self.retry.backoff(attempt - 1);
                    warn!(
                        attempt,
                        max_attempts = self.retry.attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "Transient model failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(error) => {
                    warn!(attempt, error = %error, "Model call failed");
                    return Err(ChatFailure {
                        attempts: attempt,
                        error,
                    });
                }
            }
        }
    }
}

/// Shortens text for log lines.
pub fn summarise(text: &str) -> String {
    const LIMIT: usize = 120;
    let trimmed = text.trim();
    if trimmed.chars().count() <= LIMIT {
        return trimmed.to_string();
    }
    let mut preview: String = trimmed.chars().take(LIMIT).collect();
    preview.push('…');
    preview
}
