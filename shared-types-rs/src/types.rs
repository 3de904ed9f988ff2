// shared-types-rs/src/types.rs
// Wire-level types shared by the mentor service and its clients

use serde::{Deserialize, Serialize};

/// Inbound analysis submission.
///
/// `code` is the only required field. `problem_name` and `pattern` are
/// advisory text that is interpolated into the mentor prompt, never
/// interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem_name: Option<String>,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// Success payload for `POST /api/analyze`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub feedback: String,
}

/// Failure payload for `POST /api/analyze`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// A pattern label offered by the submission form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternChoice {
    pub value: &'static str,
    pub label: &'static str,
}

/// The fixed set of pattern labels the form offers. Advisory only; the
/// service accepts any text here and never validates against this list.
pub const PATTERN_CHOICES: &[PatternChoice] = &[
    PatternChoice { value: "arrays-hashing", label: "Arrays and Hashing" },
    PatternChoice { value: "two-pointers", label: "Two Pointers" },
    PatternChoice { value: "sliding-window", label: "Sliding Window" },
    PatternChoice { value: "stack", label: "Stack" },
    PatternChoice { value: "binary-search", label: "Binary Search" },
    PatternChoice { value: "dp", label: "Dynamic Programming" },
    PatternChoice { value: "graph", label: "Graph" },
];
