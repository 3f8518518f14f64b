//! Application state for the inkcoach server.

use std::sync::Arc;

use crate::config::Config;
use crate::llm::{GenerationClient, OpenAiClient};
use crate::storage::{BucketStorageClient, StorageClient};
use crate::vision::{HttpVisionClient, VisionClient};

/// Shared provider clients. Trait objects so tests can swap in mocks.
#[derive(Clone)]
pub struct AppState {
    pub generation: Arc<dyn GenerationClient>,
    pub vision: Arc<dyn VisionClient>,
    pub storage: Arc<dyn StorageClient>,
}

impl AppState {
    pub fn from_config(config: Config) -> Self {
        Self {
            generation: Arc::new(OpenAiClient::new(config.generation)),
            vision: Arc::new(HttpVisionClient::new(config.vision)),
            storage: Arc::new(BucketStorageClient::new(config.storage)),
        }
    }
}
