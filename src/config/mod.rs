//! Configuration (layered: defaults < TOML file < environment < caller overrides).

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::agent::DEFAULT_APPROVAL_KEYWORD;
use crate::chat::DEFAULT_MAX_ROUNDS;
use crate::error::AtelierError;
use crate::models::{ModelCapabilities, OpenAiModel};
use crate::types::{GenerationSettings, ImageOptions, ImageQuality, ImageSize, ImageStyle};

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";
pub const MAX_ROUNDS_ENV: &str = "ATELIER_MAX_ROUNDS";
pub const IMAGE_PATH_ENV: &str = "ATELIER_IMAGE_PATH";

pub const DEFAULT_IMAGE_PATH: &str = "resource/images/background.png";

const GENERATOR_SYSTEM_PROMPT: &str = "You are a DALL-E agent that generate image from prompt, \
when conversation is terminated, return the most recent image url";

const CRITIC_SYSTEM_PROMPT: &str = "You are a critism that provide feedback to DALL-E agent.
Carefully check the image generated by DALL-E agent and provide feedback.
If the image satisfies the condition, then say [APPROVE].
Otherwise, provide detailed feedback to DALL-E agent so it can generate better image.";

const OPENING_MESSAGE: &str =
    "Hey dalle, please generate image from prompt: English short hair blue cat chase after a mouse";

/// Model and persona for one participant.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    pub name: String,
    pub model: OpenAiModel,
    pub system_prompt: String,
    /// Overrides the model's vision capability when set.
    pub accepts_images: Option<bool>,
    pub settings: GenerationSettings,
}

impl AgentConfig {
    pub fn generator() -> Self {
        Self {
            name: "dalle".to_string(),
            model: OpenAiModel::Gpt35Turbo,
            system_prompt: GENERATOR_SYSTEM_PROMPT.to_string(),
            accepts_images: None,
            settings: GenerationSettings::default(),
        }
    }

    pub fn critic() -> Self {
        Self {
            name: "gpt4v".to_string(),
            model: OpenAiModel::Gpt4o,
            system_prompt: CRITIC_SYSTEM_PROMPT.to_string(),
            accepts_images: None,
            settings: GenerationSettings::default(),
        }
    }

    /// Model capabilities with the image override applied.
    pub fn capabilities(&self) -> ModelCapabilities {
        let mut caps = self.model.capabilities();
        if let Some(accepts) = self.accepts_images {
            caps.supports_vision = accepts;
        }
        caps
    }
}

/// Everything needed to run the image refinement chat.
#[derive(Clone, PartialEq)]
pub struct AtelierConfig {
    pub generator: AgentConfig,
    pub critic: AgentConfig,
    /// Acceptance conditions listed in the critic's system prompt.
    pub criteria: Vec<String>,
    /// First message, sent by the critic to the generator.
    pub opening_message: String,
    pub approval_keyword: String,
    pub image: ImageOptions,
    pub image_path: PathBuf,
    pub max_rounds: u32,
    /// Attempts per HTTP call; 1 disables retries.
    pub retry_attempts: u32,
    pub base_url: Option<String>,
    api_key: Option<String>,
}

impl fmt::Debug for AtelierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtelierConfig")
            .field("generator", &self.generator)
            .field("critic", &self.critic)
            .field("criteria", &self.criteria)
            .field("opening_message", &self.opening_message)
            .field("approval_keyword", &self.approval_keyword)
            .field("image", &self.image)
            .field("image_path", &self.image_path)
            .field("max_rounds", &self.max_rounds)
            .field("retry_attempts", &self.retry_attempts)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

impl Default for AtelierConfig {
    fn default() -> Self {
        Self {
            generator: AgentConfig::generator(),
            critic: AgentConfig::critic(),
            criteria: vec![
                "There should be a cat and a mouse in the image".to_string(),
                "The cat should be chasing after the mouse".to_string(),
            ],
            opening_message: OPENING_MESSAGE.to_string(),
            approval_keyword: DEFAULT_APPROVAL_KEYWORD.to_string(),
            image: ImageOptions::default(),
            image_path: PathBuf::from(DEFAULT_IMAGE_PATH),
            max_rounds: DEFAULT_MAX_ROUNDS,
            retry_attempts: 1,
            base_url: None,
            api_key: None,
        }
    }
}

impl AtelierConfig {
    /// Defaults, then `.env` and process environment.
    pub fn from_env() -> Result<Self, AtelierError> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let mut config = Self::default();
        config.apply_env_with(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Defaults, then the TOML file at `path`, then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, AtelierError> {
        let _ = dotenvy::dotenv();
        let mut config = Self::default();
        if let Some(path) = path {
            let raw = std::fs::read_to_string(path).map_err(|e| {
                AtelierError::Configuration(format!("cannot read {}: {e}", path.display()))
            })?;
            config.apply_toml(&raw)?;
            debug!(path = %path.display(), "Loaded config file");
        }
        config.apply_env_with(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the chat cannot run with.
    ///
    /// Each agent tells its own messages from the other's by sender name, so
    /// the two names must differ.
    pub fn validate(&self) -> Result<(), AtelierError> {
        if self.generator.name == self.critic.name {
            return Err(AtelierError::Configuration(format!(
                "generator and critic must have different names, both are '{}'",
                self.generator.name
            )));
        }
        Ok(())
    }

    /// Overlay values present in a TOML document.
    pub fn apply_toml(&mut self, raw: &str) -> Result<(), AtelierError> {
        let file: ConfigFile = toml::from_str(raw)?;
        file.apply(self);
        Ok(())
    }

    /// Overlay values found through `lookup` (normally `std::env::var`).
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), AtelierError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = lookup(API_KEY_ENV) {
            self.api_key = Some(key);
        }
        if let Some(url) = lookup(BASE_URL_ENV) {
            self.base_url = Some(url);
        }
        if let Some(rounds) = lookup(MAX_ROUNDS_ENV) {
            self.max_rounds = rounds.trim().parse().map_err(|_| {
                AtelierError::Configuration(format!(
                    "{MAX_ROUNDS_ENV} must be a non-negative integer, got '{rounds}'"
                ))
            })?;
        }
        if let Some(path) = lookup(IMAGE_PATH_ENV) {
            self.image_path = PathBuf::from(path);
        }
        Ok(())
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// The OpenAI key; a missing key is fatal.
    pub fn api_key(&self) -> Result<&str, AtelierError> {
        self.api_key.as_deref().ok_or_else(|| {
            AtelierError::Configuration(format!("Please set {API_KEY_ENV} environment variable."))
        })
    }

    /// Critic persona followed by the acceptance conditions.
    pub fn critic_system_prompt(&self) -> String {
        if self.criteria.is_empty() {
            return self.critic.system_prompt.clone();
        }
        let mut prompt = format!(
            "{}\n\nThe image should satisfy the following conditions:",
            self.critic.system_prompt
        );
        for criterion in &self.criteria {
            prompt.push_str("\n- ");
            prompt.push_str(criterion);
        }
        prompt
    }
}

/// On-disk shape; every field is optional so a file only overrides what it names.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    generator: Option<AgentFile>,
    critic: Option<AgentFile>,
    criteria: Option<Vec<String>>,
    opening_message: Option<String>,
    approval_keyword: Option<String>,
    image: Option<ImageFile>,
    image_path: Option<PathBuf>,
    max_rounds: Option<u32>,
    retry_attempts: Option<u32>,
    base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct AgentFile {
    name: Option<String>,
    model: Option<OpenAiModel>,
    system_prompt: Option<String>,
    accepts_images: Option<bool>,
    temperature: Option<f64>,
    max_tokens: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ImageFile {
    model: Option<String>,
    size: Option<ImageSize>,
    style: Option<ImageStyle>,
    quality: Option<ImageQuality>,
}

impl ConfigFile {
    fn apply(self, config: &mut AtelierConfig) {
        if let Some(agent) = self.generator {
            agent.apply(&mut config.generator);
        }
        if let Some(agent) = self.critic {
            agent.apply(&mut config.critic);
        }
        if let Some(image) = self.image {
            image.apply(&mut config.image);
        }
        set(&mut config.criteria, self.criteria);
        set(&mut config.opening_message, self.opening_message);
        set(&mut config.approval_keyword, self.approval_keyword);
        set(&mut config.image_path, self.image_path);
        set(&mut config.max_rounds, self.max_rounds);
        set(&mut config.retry_attempts, self.retry_attempts);
        if self.base_url.is_some() {
            config.base_url = self.base_url;
        }
    }
}

impl AgentFile {
    fn apply(self, agent: &mut AgentConfig) {
        set(&mut agent.name, self.name);
        set(&mut agent.model, self.model);
        set(&mut agent.system_prompt, self.system_prompt);
        if self.accepts_images.is_some() {
            agent.accepts_images = self.accepts_images;
        }
        if self.temperature.is_some() {
            agent.settings.temperature = self.temperature;
        }
        if self.max_tokens.is_some() {
            agent.settings.max_tokens = self.max_tokens;
        }
    }
}

impl ImageFile {
    fn apply(self, image: &mut ImageOptions) {
        set(&mut image.model, self.model);
        set(&mut image.size, self.size);
        set(&mut image.style, self.style);
        set(&mut image.quality, self.quality);
    }
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}
