//! HTTP handlers for the writing-practice API.

use axum::body::Body;
use axum::extract::{Multipart, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use analysis_engine::prompt;
use shared_types::{
    AnalysisResponse, ChatMessage, ChatRole, EnhancedObject, FreeWritingTopic, RegionTips,
    TopicAnswer, VisionAnalysis, VisionObject, VisionTag,
};

use crate::error::ServerError;
use crate::llm::ProviderError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "inkcoach-server".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub content: String,
}

/// Analyze a piece of writing and return categorized feedback records.
pub async fn handle_analyze_writing(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResponse>, ServerError> {
    if request.content.trim().is_empty() {
        return Err(ServerError::InvalidRequest(
            "Content is required".to_string(),
        ));
    }

    info!(
        chars = request.content.chars().count(),
        "analyzing writing sample"
    );

    let analysis: AnalysisResponse = generate_structured(
        &state,
        &prompt::analysis_prompt(&request.content),
        schemars::schema_for!(AnalysisResponse),
    )
    .await?;

    info!(
        highlights = analysis.highlights.len(),
        improvements = analysis.improvements.len(),
        verb_replacements = analysis.verb_replacements.len(),
        "analysis complete"
    );

    Ok(Json(analysis))
}

#[derive(Deserialize)]
pub struct TopicRequest {
    pub answers: Vec<TopicAnswer>,
}

/// Generate a personalized free-writing topic from guided-question answers.
pub async fn handle_topic(
    State(state): State<AppState>,
    Json(request): Json<TopicRequest>,
) -> Result<Json<FreeWritingTopic>, ServerError> {
    if request.answers.is_empty() {
        return Err(ServerError::InvalidRequest(
            "At least one answer is required".to_string(),
        ));
    }
    if request
        .answers
        .iter()
        .any(|a| a.question.trim().is_empty())
    {
        return Err(ServerError::InvalidRequest(
            "Each answer must include its question".to_string(),
        ));
    }

    let topic: FreeWritingTopic = generate_structured(
        &state,
        &prompt::topic_prompt(&request.answers),
        schemars::schema_for!(FreeWritingTopic),
    )
    .await?;

    Ok(Json(topic))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub current_writing: String,
}

/// Stream a coaching chat reply as plain text chunks.
///
/// The system prompt is rebuilt from the writer's current draft on every
/// request; any system messages sent by the client are discarded.
pub async fn handle_writing_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Response, ServerError> {
    let mut messages = vec![ChatMessage::system(prompt::chat_system_prompt(
        &request.current_writing,
    ))];
    messages.extend(
        request
            .messages
            .into_iter()
            .filter(|m| m.role != ChatRole::System),
    );

    let stream = state.generation.stream_chat(messages).await?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(stream),
    )
        .into_response())
}

#[derive(Serialize)]
pub struct DescribeImageResponse {
    pub success: bool,
    pub data: DescribeImageData,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeImageData {
    pub image_url: String,
    pub objects: Vec<VisionObject>,
    pub tags: Vec<VisionTag>,
    pub enhanced_objects: Vec<EnhancedObject>,
}

/// Upload a practice photo, analyze it, and attach a writing tip to each
/// detected object region.
pub async fn handle_describe_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<DescribeImageResponse>, ServerError> {
    let mut upload: Option<(String, String, bytes::Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::InvalidRequest(e.to_string()))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ServerError::InvalidRequest(e.to_string()))?;
        upload = Some((file_name, content_type, data));
        break;
    }

    let Some((file_name, content_type, data)) = upload else {
        return Err(ServerError::InvalidRequest(
            "No image file provided".to_string(),
        ));
    };
    if !content_type.starts_with("image/") {
        return Err(ServerError::InvalidRequest(
            "File must be an image".to_string(),
        ));
    }

    let path = format!(
        "describe-image/{}-{}",
        chrono::Utc::now().timestamp_millis(),
        file_name
    );
    info!(path = %path, size = data.len(), "uploading practice photo");
    let image_url = state.storage.upload(&path, data, &content_type).await?;

    let analysis = state.vision.analyze(&image_url).await?;
    let enhanced_objects = enhance_objects(&state, &analysis).await?;

    Ok(Json(DescribeImageResponse {
        success: true,
        data: DescribeImageData {
            image_url,
            objects: analysis.objects,
            tags: analysis.tags,
            enhanced_objects,
        },
    }))
}

/// Ask the generation provider for one writing tip per detected region and
/// merge them back onto the objects by region id. Regions the provider does
/// not mention keep a `None` tip.
async fn enhance_objects(
    state: &AppState,
    analysis: &VisionAnalysis,
) -> Result<Vec<EnhancedObject>, ServerError> {
    if analysis.objects.is_empty() {
        return Ok(Vec::new());
    }

    let tips: RegionTips = generate_structured(
        state,
        &prompt::region_tips_prompt(analysis),
        schemars::schema_for!(RegionTips),
    )
    .await?;

    Ok(analysis
        .objects
        .iter()
        .enumerate()
        .map(|(idx, object)| {
            let id = prompt::region_id(idx);
            EnhancedObject {
                name: object.name.clone(),
                bounding_box: object.bounding_box,
                tip: tips
                    .regions
                    .iter()
                    .find(|region| region.id == id)
                    .map(|region| region.tip.clone()),
            }
        })
        .collect())
}

/// Run one structured generation call and deserialize the result.
async fn generate_structured<T: serde::de::DeserializeOwned>(
    state: &AppState,
    prompt: &str,
    schema: schemars::Schema,
) -> Result<T, ServerError> {
    let schema = serde_json::to_value(schema)
        .map_err(|e| ServerError::Internal(format!("schema serialization failed: {e}")))?;
    let value = state.generation.generate_object(prompt, schema).await?;
    serde_json::from_value(value).map_err(|e| {
        ServerError::Provider(ProviderError::Schema(format!(
            "response did not match schema: {e}"
        )))
    })
}
