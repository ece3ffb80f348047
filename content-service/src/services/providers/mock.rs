//! Mock provider implementations for testing.

use super::shield_gemma::verdict_from_report;
use super::{GenerationProvider, ModerationProvider, ProviderError};
use crate::models::ModerationOutcome;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Canned reply for a mock provider.
#[derive(Debug, Clone)]
pub enum MockReply<T> {
    Ok(T),
    /// Upstream failure with status and raw body.
    Status(u16, String),
}

/// Mock generation provider that counts its calls.
pub struct MockGenerationProvider {
    reply: MockReply<String>,
    calls: AtomicUsize,
}

impl MockGenerationProvider {
    pub fn new(reply: MockReply<String>) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn text(text: &str) -> Self {
        Self::new(MockReply::Ok(text.to_string()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationProvider for MockGenerationProvider {
    fn model_id(&self) -> &str {
        "mock:text"
    }

    async fn generate(&self, _system_instruction: &str, _prompt: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match &self.reply {
            MockReply::Ok(text) => {
                let text = text.trim();
                if text.is_empty() {
                    Err(ProviderError::EmptyContent)
                } else {
                    Ok(text.to_string())
                }
            }
            MockReply::Status(status, body) => Err(ProviderError::Upstream {
                status: *status,
                body: body.clone(),
            }),
        }
    }
}

/// Mock moderation provider; the verdict comes from the same report mapping
/// as the real adapter.
pub struct MockModerationProvider {
    reply: MockReply<Value>,
    calls: AtomicUsize,
}

impl MockModerationProvider {
    pub fn new(reply: MockReply<Value>) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn report(report: Value) -> Self {
        Self::new(MockReply::Ok(report))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModerationProvider for MockModerationProvider {
    fn model_id(&self) -> &str {
        "mock/moderation"
    }

    async fn moderate(&self, _text: &str) -> Result<ModerationOutcome, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match &self.reply {
            MockReply::Ok(report) => Ok(ModerationOutcome {
                verdict: verdict_from_report(report),
                report: report.clone(),
            }),
            MockReply::Status(status, body) => Err(ProviderError::Upstream {
                status: *status,
                body: body.clone(),
            }),
        }
    }
}
