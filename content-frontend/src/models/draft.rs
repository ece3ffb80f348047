use super::options::{DEFAULT_CONTENT_TYPE, DEFAULT_PLATFORM, DEFAULT_TONE};
use serde::{Deserialize, Serialize};

/// Fields submitted by the generator form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerateForm {
    #[serde(default)]
    pub prompt: String,
    #[serde(default = "default_platform")]
    pub platform: String,
    #[serde(default = "default_content_type", rename = "contentType")]
    pub content_type: String,
    #[serde(default = "default_tone")]
    pub tone: String,
}

fn default_platform() -> String {
    DEFAULT_PLATFORM.to_string()
}

fn default_content_type() -> String {
    DEFAULT_CONTENT_TYPE.to_string()
}

fn default_tone() -> String {
    DEFAULT_TONE.to_string()
}

impl Default for GenerateForm {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            platform: default_platform(),
            content_type: default_content_type(),
            tone: default_tone(),
        }
    }
}

impl GenerateForm {
    pub fn has_prompt(&self) -> bool {
        !self.prompt.trim().is_empty()
    }
}

/// Successful reply from the content service.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedContent {
    pub content: String,
    pub model: String,
    pub moderation_model: String,
    #[serde(default)]
    pub moderation: serde_json::Value,
}

/// Generated text and its request, kept in the browser session until saved.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Draft {
    pub request: GenerateForm,
    pub content: String,
    pub model: String,
    pub moderation_model: String,
    /// Ledger draft id, set by the first save.
    pub draft_id: Option<String>,
    /// Pointer of the last saved content.
    pub saved_pointer: Option<String>,
}

impl Draft {
    pub fn from_generation(request: GenerateForm, generated: GeneratedContent) -> Self {
        Self {
            request,
            content: generated.content,
            model: generated.model,
            moderation_model: generated.moderation_model,
            draft_id: None,
            saved_pointer: None,
        }
    }

    pub fn has_content(&self) -> bool {
        !self.content.trim().is_empty()
    }
}
