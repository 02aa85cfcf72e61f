//! Local persistence for the latest generated image.

use std::path::{Path, PathBuf};

use base64::Engine;
use tracing::{debug, info};

use crate::error::AtelierError;
use crate::provider::http::shared_client;

/// Fixed file path the conversation writes its image to.
///
/// Every save replaces the previous file; nothing is ever appended.
#[derive(Debug, Clone)]
pub struct ImageStore {
    path: PathBuf,
}

impl ImageStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete a file left over from an earlier run. Returns whether one existed.
    pub async fn reset(&self) -> Result<bool, AtelierError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                info!(path = %self.path.display(), "Removed previous image");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch `url` (remote or `data:`) and write it to the store path.
    ///
    /// Returns the number of bytes written.
    pub async fn save(&self, url: &str) -> Result<usize, AtelierError> {
        let bytes = if url.starts_with("data:") {
            decode_data_url(url)?
        } else {
            download(url).await?
        };
        if bytes.is_empty() {
            return Err(AtelierError::Download {
                url: url.to_string(),
                message: "empty image payload".to_string(),
            });
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        // The target only ever holds a complete image.
        let staging = self.path.with_extension("part");
        let written = match tokio::fs::write(&staging, &bytes).await {
            Ok(()) => tokio::fs::rename(&staging, &self.path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            if let Err(cleanup) = tokio::fs::remove_file(&staging).await {
                debug!(path = %staging.display(), error = %cleanup, "Staging file not removed");
            }
            return Err(e.into());
        }

        info!(url = %display_url(url), path = %self.path.display(), bytes = bytes.len(), "Image saved");
        Ok(bytes.len())
    }
}

async fn download(url: &str) -> Result<Vec<u8>, AtelierError> {
    debug!(url, "Downloading image");
    let response = shared_client().get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(AtelierError::Download {
            url: url.to_string(),
            message: format!("HTTP {}", status.as_u16()),
        });
    }
    Ok(response.bytes().await?.to_vec())
}

fn decode_data_url(url: &str) -> Result<Vec<u8>, AtelierError> {
    let invalid = |message: &str| AtelierError::Download {
        url: display_url(url).to_string(),
        message: message.to_string(),
    };
    let (header, data) = url
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(','))
        .ok_or_else(|| invalid("malformed data URL"))?;
    if !header.ends_with(";base64") {
        return Err(invalid("only base64 data URLs are supported"));
    }
    base64::engine::general_purpose::STANDARD
        .decode(data.trim())
        .map_err(|e| invalid(&format!("invalid base64: {e}")))
}

/// Shorten a `data:` URL to its header; other URLs pass through.
pub fn display_url(url: &str) -> &str {
    if url.starts_with("data:") {
        url.split_once(',').map(|(header, _)| header).unwrap_or(url)
    } else {
        url
    }
}
