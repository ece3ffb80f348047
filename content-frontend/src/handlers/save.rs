use crate::error::FrontendError;
use crate::models::{Draft, SessionContext};
use crate::services::ledger::{GeneratedRecord, NewDraft};
use crate::services::metrics::record_save;
use crate::utils::content_hash::content_address;
use crate::AppState;
use askama::Template;
use axum::extract::State;

#[derive(Template)]
#[template(path = "fragments/saved.html")]
pub struct SavedTemplate {
    pub draft_id: String,
    pub pointer: String,
}

/// Generation parameters recorded with the saved content.
fn generation_params(draft: &Draft) -> String {
    serde_json::json!({
        "platform": draft.request.platform,
        "content_type": draft.request.content_type,
        "tone": draft.request.tone,
        "moderation_model": draft.moderation_model,
    })
    .to_string()
}

pub async fn save(
    State(state): State<AppState>,
    ctx: SessionContext,
) -> Result<SavedTemplate, FrontendError> {
    let result = save_draft(&state, &ctx).await;

    record_save(match &result {
        Ok(_) => "success",
        Err(FrontendError::NothingToSave) => "invalid",
        Err(FrontendError::SignInRequired) => "unauthenticated",
        Err(_) => "failed",
    });

    result
}

async fn save_draft(state: &AppState, ctx: &SessionContext) -> Result<SavedTemplate, FrontendError> {
    let mut draft = match ctx.draft().await? {
        Some(draft) if draft.has_content() => draft,
        _ => return Err(FrontendError::NothingToSave),
    };

    let identity = ctx.identity().await?;
    let actor = state.ledger.acquire(&ctx.client_key, identity.as_ref())?;

    let draft_id = match draft.draft_id.clone() {
        Some(id) => id,
        None => {
            let id = actor
                .create_draft(&NewDraft {
                    prompt: &draft.request.prompt,
                    platform: &draft.request.platform,
                    content_type: &draft.request.content_type,
                    tone: &draft.request.tone,
                })
                .await?;
            // Remember the id before the second call so a retry reuses it
            draft.draft_id = Some(id.clone());
            ctx.set_draft(&draft).await?;
            id
        }
    };

    let address = content_address(&draft.content);
    let record = GeneratedRecord {
        pointer: address.pointer.clone(),
        hash: address.hash,
        model: draft.model.clone(),
        params: generation_params(&draft),
    };
    actor.save_generated(&draft_id, &record).await?;

    draft.saved_pointer = Some(address.pointer.clone());
    ctx.set_draft(&draft).await?;

    tracing::info!(
        draft_id = %draft_id,
        pointer = %address.pointer,
        principal = actor.principal().unwrap_or("anonymous"),
        "Generated content saved"
    );

    Ok(SavedTemplate {
        draft_id,
        pointer: address.pointer,
    })
}
