//! Types for the image-analysis provider's responses.

/// Pixel rectangle of a detected region.
#[derive(Debug, Clone, Copy, Default, serde::Serialize, serde::Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Caption {
    pub text: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisionObject {
    pub name: String,
    pub confidence: f64,
    pub bounding_box: Option<BoundingBox>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct VisionTag {
    pub name: String,
    pub confidence: f64,
}

/// Normalized result of one vision-provider call.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct VisionAnalysis {
    pub caption: Option<Caption>,
    pub objects: Vec<VisionObject>,
    pub tags: Vec<VisionTag>,
}

/// Detected object enriched with a generated writing tip.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedObject {
    pub name: String,
    pub bounding_box: Option<BoundingBox>,
    pub tip: Option<String>,
}
