//! OpenAI chat model definitions.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::capabilities::ModelCapabilities;

/// OpenAI chat models.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString)]
#[serde(into = "String", from = "String")]
pub enum OpenAiModel {
    #[strum(serialize = "gpt-4o")]
    Gpt4o,
    #[strum(serialize = "gpt-4o-mini")]
    Gpt4oMini,
    #[strum(serialize = "gpt-4-turbo")]
    Gpt4Turbo,
    #[strum(serialize = "gpt-4-vision-preview")]
    Gpt4VisionPreview,
    #[strum(serialize = "gpt-4")]
    Gpt4,
    #[strum(serialize = "gpt-3.5-turbo")]
    Gpt35Turbo,
    #[strum(serialize = "gpt-4.1")]
    Gpt41,
    #[strum(serialize = "gpt-4.1-mini")]
    Gpt41Mini,
    /// Custom/unknown OpenAI model by ID.
    #[strum(default)]
    Custom(String),
}

impl OpenAiModel {
    /// Get the API model identifier.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Gpt4o => "gpt-4o",
            Self::Gpt4oMini => "gpt-4o-mini",
            Self::Gpt4Turbo => "gpt-4-turbo",
            Self::Gpt4VisionPreview => "gpt-4-vision-preview",
            Self::Gpt4 => "gpt-4",
            Self::Gpt35Turbo => "gpt-3.5-turbo",
            Self::Gpt41 => "gpt-4.1",
            Self::Gpt41Mini => "gpt-4.1-mini",
            Self::Custom(s) => s,
        }
    }

    pub fn capabilities(&self) -> ModelCapabilities {
        let (ctx, vision, tools) = match self {
            Self::Gpt4o | Self::Gpt4oMini => (128_000, true, true),
            Self::Gpt4Turbo => (128_000, true, true),
            // The preview vision model never supported function calling.
            Self::Gpt4VisionPreview => (128_000, true, false),
            Self::Gpt4 => (8_192, false, true),
            Self::Gpt35Turbo => (16_385, false, true),
            Self::Gpt41 | Self::Gpt41Mini => (1_000_000, true, true),
            Self::Custom(_) => (128_000, true, true),
        };
        ModelCapabilities {
            supports_vision: vision,
            supports_tools: tools,
            supports_system_messages: true,
            context_length: ctx,
            max_output_tokens: Some(if ctx > 16_385 { 16_384 } else { 4_096 }),
        }
    }
}

impl From<String> for OpenAiModel {
    fn from(value: String) -> Self {
        value
            .parse()
            .unwrap_or_else(|_| OpenAiModel::Custom(value))
    }
}

impl From<OpenAiModel> for String {
    fn from(value: OpenAiModel) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_and_custom_ids() {
        assert_eq!("gpt-4o".parse::<OpenAiModel>().unwrap(), OpenAiModel::Gpt4o);
        assert_eq!(
            "gpt-3.5-turbo".parse::<OpenAiModel>().unwrap(),
            OpenAiModel::Gpt35Turbo
        );
        let custom: OpenAiModel = "my-finetune".parse().unwrap();
        assert_eq!(custom.as_str(), "my-finetune");
    }

    #[test]
    fn generator_default_is_text_only() {
        let caps = OpenAiModel::Gpt35Turbo.capabilities();
        assert!(!caps.supports_vision);
        assert!(caps.supports_tools);
    }

    #[test]
    fn serde_uses_model_id_strings() {
        let json = serde_json::to_value(OpenAiModel::Gpt4o).unwrap();
        assert_eq!(json, "gpt-4o");
        let parsed: OpenAiModel = serde_json::from_value(serde_json::json!("gpt-4.1")).unwrap();
        assert_eq!(parsed, OpenAiModel::Gpt41);
    }
}
