//! Image-analysis provider client.

use async_trait::async_trait;
use serde::Deserialize;

use shared_types::{BoundingBox, Caption, VisionAnalysis, VisionObject, VisionTag};

use crate::config::VisionConfig;
use crate::llm::ProviderError;

/// Client contract for the vision provider.
#[async_trait]
pub trait VisionClient: Send + Sync {
    /// Analyze an image by public URL: caption, objects, tags.
    async fn analyze(&self, image_url: &str) -> Result<VisionAnalysis, ProviderError>;
}

/// Production client for an Azure-style image-analysis REST endpoint.
pub struct HttpVisionClient {
    config: VisionConfig,
    client: reqwest::Client,
}

impl HttpVisionClient {
    pub fn new(config: VisionConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl VisionClient for HttpVisionClient {
    async fn analyze(&self, image_url: &str) -> Result<VisionAnalysis, ProviderError> {
        let url = format!(
            "{}/imageanalysis:analyze?features=caption,objects,tags&model-version=latest",
            self.config.endpoint.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .header("Ocp-Apim-Subscription-Key", &self.config.api_key)
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({ "url": image_url }))
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Http { status, message });
        }

        let raw: RawAnalysis = response
            .json()
            .await
            .map_err(|e| ProviderError::Schema(format!("failed to parse response: {e}")))?;

        Ok(raw.into())
    }
}

// Provider wire format, normalized into shared-types on the way out.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAnalysis {
    caption_result: Option<RawCaption>,
    objects_result: Option<RawValues<RawObject>>,
    tags_result: Option<RawValues<RawTag>>,
}

#[derive(Debug, Deserialize)]
struct RawCaption {
    text: String,
    confidence: f64,
}

#[derive(Debug, Deserialize)]
struct RawValues<T> {
    #[serde(default = "Vec::new")]
    values: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawObject {
    #[serde(default)]
    tags: Vec<RawTag>,
    bounding_box: Option<BoundingBox>,
}

#[derive(Debug, Deserialize)]
struct RawTag {
    name: String,
    confidence: f64,
}

impl From<RawAnalysis> for VisionAnalysis {
    fn from(raw: RawAnalysis) -> Self {
        VisionAnalysis {
            caption: raw.caption_result.map(|c| Caption {
                text: c.text,
                confidence: c.confidence,
            }),
            objects: raw
                .objects_result
                .map(|o| {
                    o.values
                        .into_iter()
                        .map(|obj| VisionObject {
                            name: obj
                                .tags
                                .first()
                                .map(|t| t.name.clone())
                                .unwrap_or_else(|| "unknown".to_string()),
                            confidence: obj.tags.first().map(|t| t.confidence).unwrap_or(0.0),
                            bounding_box: obj.bounding_box,
                        })
                        .collect()
                })
                .unwrap_or_default(),
            tags: raw
                .tags_result
                .map(|t| {
                    t.values
                        .into_iter()
                        .map(|tag| VisionTag {
                            name: tag.name,
                            confidence: tag.confidence,
                        })
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

/// Mock client for tests.
#[derive(Default)]
pub struct MockVisionClient {
    analysis: VisionAnalysis,
    fail: bool,
}

impl MockVisionClient {
    pub fn with_analysis(analysis: VisionAnalysis) -> Self {
        Self {
            analysis,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl VisionClient for MockVisionClient {
    async fn analyze(&self, _image_url: &str) -> Result<VisionAnalysis, ProviderError> {
        if self.fail {
            return Err(ProviderError::Network("mock vision failure".to_string()));
        }
        Ok(self.analysis.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_provider_response() {
        let body = serde_json::json!({
            "captionResult": { "text": "a mountain lake", "confidence": 0.92 },
            "objectsResult": {
                "values": [
                    {
                        "boundingBox": { "x": 10, "y": 20, "w": 100, "h": 80 },
                        "tags": [{ "name": "tree", "confidence": 0.87 }]
                    },
                    { "tags": [] }
                ]
            },
            "tagsResult": {
                "values": [{ "name": "outdoor", "confidence": 0.99 }]
            }
        });

        let raw: RawAnalysis = serde_json::from_value(body).unwrap();
        let analysis: VisionAnalysis = raw.into();

        assert_eq!(analysis.caption.unwrap().text, "a mountain lake");
        assert_eq!(analysis.objects.len(), 2);
        assert_eq!(analysis.objects[0].name, "tree");
        assert_eq!(analysis.objects[0].bounding_box.unwrap().w, 100);
        assert_eq!(analysis.objects[1].name, "unknown");
        assert_eq!(analysis.tags[0].name, "outdoor");
    }

    #[test]
    fn missing_sections_normalize_to_empty() {
        let raw: RawAnalysis = serde_json::from_value(serde_json::json!({})).unwrap();
        let analysis: VisionAnalysis = raw.into();
        assert!(analysis.caption.is_none());
        assert!(analysis.objects.is_empty());
        assert!(analysis.tags.is_empty());
    }
}
