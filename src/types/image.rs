//! Image generation request and result types.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Output size for generated images.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString, Default)]
pub enum ImageSize {
    #[serde(rename = "256x256")]
    #[strum(serialize = "256x256")]
    Square256,
    #[serde(rename = "512x512")]
    #[strum(serialize = "512x512")]
    Square512,
    #[default]
    #[serde(rename = "1024x1024")]
    #[strum(serialize = "1024x1024")]
    Square1024,
    #[serde(rename = "1792x1024")]
    #[strum(serialize = "1792x1024")]
    Landscape1792,
    #[serde(rename = "1024x1792")]
    #[strum(serialize = "1024x1792")]
    Portrait1792,
}

/// Rendering style.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString, Default)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ImageStyle {
    #[default]
    Vivid,
    Natural,
}

/// Rendering quality.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString, Default)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ImageQuality {
    #[default]
    Standard,
    Hd,
}

/// How the endpoint should return the image.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString, Default)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ImageResponseFormat {
    #[default]
    Url,
    B64Json,
}

/// Options shared by every image generation call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImageOptions {
    pub model: String,
    pub size: ImageSize,
    pub style: ImageStyle,
    pub quality: ImageQuality,
    pub count: u32,
    pub response_format: ImageResponseFormat,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            model: "dall-e-3".to_string(),
            size: ImageSize::default(),
            style: ImageStyle::default(),
            quality: ImageQuality::default(),
            count: 1,
            response_format: ImageResponseFormat::default(),
        }
    }
}

/// A single image generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageGenerationRequest {
    pub prompt: String,
    pub options: ImageOptions,
}

impl ImageGenerationRequest {
    pub fn new(prompt: impl Into<String>, options: ImageOptions) -> Self {
        Self {
            prompt: prompt.into(),
            options,
        }
    }
}

/// An image returned by the generation endpoint.
///
/// `url` is a `data:` URL when the endpoint answered with base64 content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratedImage {
    pub prompt: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revised_prompt: Option<String>,
}
