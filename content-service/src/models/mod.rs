//! Request, result and moderation types for `/generate`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A wire value that names no known variant.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownValue {
    pub kind: &'static str,
    pub value: String,
}

/// Declares a lower-case wire enum parsed case-insensitively.
macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal, { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($wire => Ok($name::$variant),)+
                    _ => Err(UnknownValue {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_enum!(
    /// Social platform the content is written for.
    Platform, "platform", {
        Twitter => "twitter",
        Instagram => "instagram",
        Linkedin => "linkedin",
        Facebook => "facebook",
        Tiktok => "tiktok",
    }
);

wire_enum!(
    ContentType, "contentType", {
        Post => "post",
        Thread => "thread",
        Caption => "caption",
        Blog => "blog",
    }
);

wire_enum!(
    Tone, "tone", {
        Professional => "professional",
        Casual => "casual",
        Excited => "excited",
        Humorous => "humorous",
        Technical => "technical",
    }
);

/// Values used when a request omits an enum field or leaves it blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestDefaults {
    pub platform: Platform,
    pub content_type: ContentType,
    pub tone: Tone,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            platform: Platform::Twitter,
            content_type: ContentType::Post,
            tone: Tone::Professional,
        }
    }
}

/// `/generate` body as it arrives on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateBody {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default, rename = "contentType", alias = "content_type")]
    pub content_type: Option<String>,
    #[serde(default)]
    pub tone: Option<String>,
}

/// Why a `/generate` body was refused before any provider call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing prompt")]
    MissingPrompt,

    #[error(transparent)]
    UnknownValue(#[from] UnknownValue),
}

/// A validated generation request. The prompt is never blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub platform: Platform,
    pub content_type: ContentType,
    pub tone: Tone,
}

impl GenerationRequest {
    pub fn from_body(body: GenerateBody, defaults: &RequestDefaults) -> Result<Self, ValidationError> {
        let prompt = match body.prompt {
            Some(prompt) if !prompt.trim().is_empty() => prompt,
            _ => return Err(ValidationError::MissingPrompt),
        };

        Ok(Self {
            prompt,
            platform: parse_or(body.platform.as_deref(), defaults.platform)?,
            content_type: parse_or(body.content_type.as_deref(), defaults.content_type)?,
            tone: parse_or(body.tone.as_deref(), defaults.tone)?,
        })
    }

    /// System turn sent ahead of the user's prompt.
    pub fn system_instruction(&self) -> String {
        format!(
            "You are a content generator. Platform={}, Type={}, Tone={}. Keep output concise and actionable.",
            self.platform.as_str(),
            self.content_type.as_str(),
            self.tone.as_str()
        )
    }
}

fn parse_or<T: FromStr<Err = UnknownValue>>(raw: Option<&str>, default: T) -> Result<T, UnknownValue> {
    match raw {
        Some(value) if !value.trim().is_empty() => value.parse(),
        _ => Ok(default),
    }
}

/// Normalized moderation decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationVerdict {
    Safe,
    Unsafe,
}

/// Verdict plus the provider's raw report, kept for audit.
#[derive(Debug, Clone, PartialEq)]
pub struct ModerationOutcome {
    pub verdict: ModerationVerdict,
    pub report: serde_json::Value,
}

/// Successful `/generate` response.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationResult {
    pub content: String,
    pub model: String,
    pub moderation_model: String,
    pub moderation: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(prompt: Option<&str>) -> GenerateBody {
        GenerateBody {
            prompt: prompt.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn blank_prompt_is_missing() {
        let defaults = RequestDefaults::default();
        assert_eq!(
            GenerationRequest::from_body(body(None), &defaults),
            Err(ValidationError::MissingPrompt)
        );
        assert_eq!(
            GenerationRequest::from_body(body(Some("   ")), &defaults),
            Err(ValidationError::MissingPrompt)
        );
    }

    #[test]
    fn omitted_fields_take_defaults() {
        let request =
            GenerationRequest::from_body(body(Some("hi")), &RequestDefaults::default()).unwrap();
        assert_eq!(request.platform, Platform::Twitter);
        assert_eq!(request.content_type, ContentType::Post);
        assert_eq!(request.tone, Tone::Professional);
    }

    #[test]
    fn enum_values_are_case_insensitive() {
        assert_eq!(" LinkedIn ".parse::<Platform>(), Ok(Platform::Linkedin));
        assert_eq!("BLOG".parse::<ContentType>(), Ok(ContentType::Blog));
    }

    #[test]
    fn unknown_enum_value_is_rejected() {
        let request = GenerateBody {
            prompt: Some("hi".into()),
            tone: Some("sarcastic".into()),
            ..Default::default()
        };
        let err = GenerationRequest::from_body(request, &RequestDefaults::default()).unwrap_err();
        assert_eq!(err.to_string(), "unknown tone 'sarcastic'");
    }

    #[test]
    fn system_instruction_uses_wire_values() {
        let request = GenerationRequest {
            prompt: "Announce a feature".into(),
            platform: Platform::Twitter,
            content_type: ContentType::Caption,
            tone: Tone::Excited,
        };
        assert_eq!(
            request.system_instruction(),
            "You are a content generator. Platform=twitter, Type=caption, Tone=excited. Keep output concise and actionable."
        );
    }

    #[test]
    fn body_accepts_camel_case_content_type() {
        let body: GenerateBody =
            serde_json::from_str(r#"{"prompt":"p","contentType":"thread"}"#).unwrap();
        assert_eq!(body.content_type.as_deref(), Some("thread"));
    }
}
