pub mod types;

pub use types::{AnalysisRequest, ErrorResponse, FeedbackResponse, PatternChoice, PATTERN_CHOICES};
