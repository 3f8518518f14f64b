//! Provider configuration from the environment.

use anyhow::{Context, Result};

/// Generation provider (OpenAI-compatible chat-completions endpoint).
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
}

/// Image-analysis provider.
#[derive(Debug, Clone)]
pub struct VisionConfig {
    pub endpoint: String,
    pub api_key: String,
}

/// Storage bucket for uploaded practice photos.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub url: String,
    pub service_key: String,
    pub bucket: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub generation: GenerationConfig,
    pub vision: VisionConfig,
    pub storage: StorageConfig,
}

impl Config {
    /// Read endpoint/key pairs from the environment. Keys are required;
    /// model and bucket names have defaults.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            generation: GenerationConfig {
                endpoint: std::env::var("GENERATION_ENDPOINT")
                    .context("GENERATION_ENDPOINT not set")?,
                api_key: std::env::var("GENERATION_API_KEY")
                    .context("GENERATION_API_KEY not set")?,
                model: std::env::var("GENERATION_MODEL").unwrap_or_else(|_| "gpt-4o".to_string()),
                max_tokens: std::env::var("GENERATION_MAX_TOKENS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(1000),
            },
            vision: VisionConfig {
                endpoint: std::env::var("VISION_ENDPOINT").context("VISION_ENDPOINT not set")?,
                api_key: std::env::var("VISION_KEY").context("VISION_KEY not set")?,
            },
            storage: StorageConfig {
                url: std::env::var("STORAGE_URL").context("STORAGE_URL not set")?,
                service_key: std::env::var("STORAGE_SERVICE_KEY")
                    .context("STORAGE_SERVICE_KEY not set")?,
                bucket: std::env::var("STORAGE_BUCKET")
                    .unwrap_or_else(|_| "describe-image".to_string()),
            },
        })
    }
}
