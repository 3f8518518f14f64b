pub mod chat;
pub mod types;
pub mod vision;

pub use chat::{ChatMessage, ChatRole};
pub use types::{
    AnalysisRecord, AnalysisResponse, Category, FreeWritingTopic, RegionTip, RegionTips,
    TopicAnswer,
};
pub use vision::{BoundingBox, Caption, EnhancedObject, VisionAnalysis, VisionObject, VisionTag};
