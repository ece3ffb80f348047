//! Generation orchestrator: validate, generate, moderate, assemble.
//!
//! Each call walks `Received → Validated → Generated → Moderated` and ends in
//! `Returned` or `Rejected`; any provider failure ends in `Errored`. The
//! orchestrator holds only shared, immutable providers and never retries a
//! whole step (retries live inside the providers' HTTP clients).

use super::metrics::{record_generation, record_provider_call, record_provider_error};
use super::providers::{GenerationProvider, ModerationProvider};
use crate::error::GenerateError;
use crate::models::{
    GenerateBody, GenerationRequest, GenerationResult, ModerationVerdict, RequestDefaults,
};
use service_core::middleware::tracing::current_request_id;
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct Orchestrator {
    generator: Arc<dyn GenerationProvider>,
    moderator: Arc<dyn ModerationProvider>,
    defaults: RequestDefaults,
}

fn transition(request_id: &str, state: &'static str) {
    tracing::debug!(request_id = %request_id, state, "Generation state changed");
}

impl Orchestrator {
    pub fn new(
        generator: Arc<dyn GenerationProvider>,
        moderator: Arc<dyn ModerationProvider>,
        defaults: RequestDefaults,
    ) -> Self {
        Self {
            generator,
            moderator,
            defaults,
        }
    }

    /// Validate a raw body and run it. Validation failures never reach a provider.
    pub async fn handle(&self, body: GenerateBody) -> Result<GenerationResult, GenerateError> {
        let request_id = current_request_id().unwrap_or_else(|| "-".to_string());
        transition(&request_id, "received");

        let request = match GenerationRequest::from_body(body, &self.defaults) {
            Ok(request) => request,
            Err(e) => {
                let err = GenerateError::from(e);
                record_generation(err.outcome());
                return Err(err);
            }
        };
        transition(&request_id, "validated");

        let result = self.run(&request_id, &request).await;
        match &result {
            Ok(_) => {
                transition(&request_id, "returned");
                record_generation("success");
            }
            Err(GenerateError::ContentRejected { .. }) => {
                transition(&request_id, "rejected");
                record_generation("rejected");
            }
            Err(err) => {
                transition(&request_id, "errored");
                record_generation(err.outcome());
            }
        }
        result
    }

    async fn run(
        &self,
        request_id: &str,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, GenerateError> {
        let system_instruction = request.system_instruction();

        let started = Instant::now();
        let generated = self
            .generator
            .generate(&system_instruction, &request.prompt)
            .await;
        let elapsed = started.elapsed().as_secs_f64();
        let content = match generated {
            Ok(text) => {
                record_provider_call("generation", "ok", elapsed);
                text
            }
            Err(e) => {
                record_provider_call("generation", "error", elapsed);
                record_provider_error("generation", e.kind());
                return Err(GenerateError::from_generation(e));
            }
        };
        transition(request_id, "generated");

        let started = Instant::now();
        let moderated = self.moderator.moderate(&content).await;
        let elapsed = started.elapsed().as_secs_f64();
        let outcome = match moderated {
            Ok(outcome) => {
                record_provider_call("moderation", "ok", elapsed);
                outcome
            }
            Err(e) => {
                record_provider_call("moderation", "error", elapsed);
                record_provider_error("moderation", e.kind());
                return Err(GenerateError::from_moderation(e));
            }
        };
        transition(request_id, "moderated");

        if outcome.verdict == ModerationVerdict::Unsafe {
            tracing::info!(
                request_id = %request_id,
                model = %self.moderator.model_id(),
                "Generated content flagged by moderation"
            );
            return Err(GenerateError::ContentRejected {
                moderation: outcome.report,
            });
        }

        Ok(GenerationResult {
            content,
            model: self.generator.model_id().to_string(),
            moderation_model: self.moderator.model_id().to_string(),
            moderation: outcome.report,
        })
    }
}
