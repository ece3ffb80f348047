use super::content::ResultView;
use crate::error::FrontendError;
use crate::models::options::{CONTENT_TYPES, PLATFORMS, TONES};
use crate::models::{GenerateForm, SessionContext};
use askama::Template;

/// One `<option>` of a form select.
pub struct OptionView {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

fn option_views(options: &[(&'static str, &'static str)], selected: &str) -> Vec<OptionView> {
    options
        .iter()
        .map(|&(value, label)| OptionView {
            value,
            label,
            selected: value == selected,
        })
        .collect()
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub subject: Option<String>,
    pub prompt: String,
    pub platforms: Vec<OptionView>,
    pub content_types: Vec<OptionView>,
    pub tones: Vec<OptionView>,
    pub result: Option<ResultView>,
}

impl IndexTemplate {
    fn new(form: &GenerateForm, subject: Option<String>, result: Option<ResultView>) -> Self {
        Self {
            subject,
            prompt: form.prompt.clone(),
            platforms: option_views(PLATFORMS, &form.platform),
            content_types: option_views(CONTENT_TYPES, &form.content_type),
            tones: option_views(TONES, &form.tone),
            result,
        }
    }
}

/// The generator page, restored from the session draft when there is one.
pub async fn index(ctx: SessionContext) -> Result<IndexTemplate, FrontendError> {
    let subject = ctx
        .identity()
        .await?
        .filter(|identity| !identity.is_expired())
        .map(|identity| identity.subject);

    let page = match ctx.draft().await? {
        Some(draft) => IndexTemplate::new(&draft.request, subject, Some(ResultView::from_draft(&draft, None))),
        None => IndexTemplate::new(&GenerateForm::default(), subject, None),
    };

    Ok(page)
}

pub async fn health_check() -> &'static str {
    "OK"
}
