use schemars::JsonSchema;

/// Feedback category attached to an analysis record.
///
/// Serialized as the literal tags the generation provider is instructed to
/// emit: `"excellent"`, `"improvement"`, `"verb"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Excellent,
    Improvement,
    Verb,
}

/// A single feedback item returned by the generation provider.
///
/// `start`/`end` are model-supplied and advisory only. They are never
/// trusted: real offsets are recomputed against the live document text
/// before any highlight is applied.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, JsonSchema)]
pub struct AnalysisRecord {
    /// Literal snippet from the user's text, char-for-char.
    pub text: String,
    #[serde(rename = "type")]
    pub category: Category,
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    pub start: usize,
    pub end: usize,
}

/// Full structured-generation output for one analysis request.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    /// Exemplary sentences.
    pub highlights: Vec<AnalysisRecord>,
    /// Sentences that could be sharpened.
    pub improvements: Vec<AnalysisRecord>,
    /// Verbs with a more precise alternative.
    #[serde(default)]
    pub verb_replacements: Vec<AnalysisRecord>,
}

impl AnalysisResponse {
    /// All records in one pass, in highlight → improvement → verb order.
    pub fn records(&self) -> impl Iterator<Item = &AnalysisRecord> {
        self.highlights
            .iter()
            .chain(self.improvements.iter())
            .chain(self.verb_replacements.iter())
    }
}

/// Generated free-writing exercise.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, JsonSchema)]
pub struct FreeWritingTopic {
    /// Short phrase or sentence at the center of the exercise.
    pub topic: String,
    /// Genre requirement (random when the learner does not specify one).
    pub genre: String,
    /// Possible directions to take the piece.
    pub points: Vec<String>,
}

/// One answered onboarding question for the topic generator.
///
/// `question` must be non-empty; `answer` may be the empty string.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TopicAnswer {
    pub question: String,
    #[serde(default)]
    pub answer: String,
}

/// Writing tip for one detected image region.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, JsonSchema)]
pub struct RegionTip {
    /// Matches the id of a detected object.
    pub id: String,
    pub tip: String,
}

/// Structured-generation output for the image-region tip call.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize, JsonSchema)]
pub struct RegionTips {
    pub regions: Vec<RegionTip>,
}
