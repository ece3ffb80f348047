//! Generating content and editing the session draft.

use crate::error::FrontendError;
use crate::models::{Draft, GenerateForm, SessionContext};
use crate::services::content_client::ContentClientError;
use crate::services::metrics::record_generate;
use crate::AppState;
use askama::Template;
use axum::{extract::State, Form};
use serde::Deserialize;

/// Draft fields shown in the result panel.
pub struct ResultView {
    pub content: String,
    pub model: String,
    pub moderation_model: String,
    pub saved_pointer: Option<String>,
    pub notice: Option<String>,
}

impl ResultView {
    pub fn from_draft(draft: &Draft, notice: Option<&str>) -> Self {
        Self {
            content: draft.content.clone(),
            model: draft.model.clone(),
            moderation_model: draft.moderation_model.clone(),
            saved_pointer: draft.saved_pointer.clone(),
            notice: notice.map(str::to_string),
        }
    }
}

#[derive(Template)]
#[template(path = "fragments/result.html")]
pub struct ResultTemplate {
    pub result: ResultView,
}

pub async fn generate(
    State(state): State<AppState>,
    ctx: SessionContext,
    Form(form): Form<GenerateForm>,
) -> Result<ResultTemplate, FrontendError> {
    if !form.has_prompt() {
        record_generate("invalid");
        return Err(FrontendError::MissingPrompt);
    }

    let Some(_guard) = state.inflight.try_acquire(&ctx.client_key) else {
        tracing::info!(client_key = %ctx.client_key, "Generate refused while a request is outstanding");
        record_generate("busy");
        return Err(FrontendError::Busy);
    };

    let generated = match state.content_client.generate(&form).await {
        Ok(generated) => generated,
        Err(e) => {
            match &e {
                ContentClientError::Rejected { status, body } => {
                    tracing::warn!(status = *status, body = %body, "Content service rejected generation")
                }
                other => tracing::error!(error = %other, "Content generation failed"),
            }
            record_generate("failed");
            return Err(FrontendError::GenerationFailed);
        }
    };

    let draft = Draft::from_generation(form, generated);
    ctx.set_draft(&draft).await?;
    record_generate("success");

    tracing::info!(model = %draft.model, "Draft generated");

    Ok(ResultTemplate {
        result: ResultView::from_draft(&draft, None),
    })
}

#[derive(Deserialize)]
pub struct EditForm {
    #[serde(default)]
    pub content: String,
}

/// Replace the draft text with the user's edit. The edit is unsaved until
/// the next save.
pub async fn update_content(
    ctx: SessionContext,
    Form(edit): Form<EditForm>,
) -> Result<ResultTemplate, FrontendError> {
    let mut draft = ctx.draft().await?.ok_or(FrontendError::NothingGenerated)?;

    draft.content = edit.content;
    draft.saved_pointer = None;
    ctx.set_draft(&draft).await?;

    Ok(ResultTemplate {
        result: ResultView::from_draft(&draft, Some("Draft updated")),
    })
}
