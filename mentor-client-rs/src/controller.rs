// mentor-client-rs/src/controller.rs
// Form controller for the mentor submission flow
//
// Holds the interaction state of the submission form: the three input
// fields, the last feedback or error text, and the busy flag. The rendering
// layer owns presentation; this controller owns the transitions.

use reqwest::Client;

use shared_types_rs::{AnalysisRequest, ErrorResponse, FeedbackResponse};

/// Pattern label preselected by the form.
pub const DEFAULT_PATTERN_CHOICE: &str = "sliding-window";

/// Shown when an error status arrives without a parsable error payload.
pub const REQUEST_FAILED_FALLBACK: &str = "Request failed";

/// Shown when a failure carries no usable message of its own.
pub const TRANSPORT_ERROR_FALLBACK: &str = "Something went wrong";

pub struct MentorForm {
    endpoint: String,
    http: Client,
    problem_name: String,
    code: String,
    pattern: String,
    feedback: String,
    error: String,
    busy: bool,
}

impl MentorForm {
    /// Create a form controller submitting to the given analyze endpoint URL
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            http: Client::new(),
            problem_name: String::new(),
            code: String::new(),
            pattern: DEFAULT_PATTERN_CHOICE.to_string(),
            feedback: String::new(),
            error: String::new(),
            busy: false,
        }
    }

    /// Create a form controller against the configured mentor service address
    pub fn from_env() -> Self {
        let base = config_rs::get_client_address(
            "MENTOR",
            config_rs::get_default_port("MENTOR"),
            None,
        );
        Self::new(format!("{}/api/analyze", base))
    }

    pub fn set_problem_name(&mut self, problem_name: impl Into<String>) {
        self.problem_name = problem_name.into();
    }

    pub fn set_code(&mut self, code: impl Into<String>) {
        self.code = code.into();
    }

    pub fn set_pattern(&mut self, pattern: impl Into<String>) {
        self.pattern = pattern.into();
    }

    pub fn problem_name(&self) -> &str {
        &self.problem_name
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The last received feedback text, empty until a submission succeeds
    pub fn feedback(&self) -> &str {
        &self.feedback
    }

    /// The last error message, empty while nothing has failed
    pub fn error(&self) -> &str {
        &self.error
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Whether the submit affordance is enabled. The endpoint re-validates
    /// regardless.
    pub fn can_submit(&self) -> bool {
        !self.busy && !self.code.trim().is_empty()
    }

    /// Submit the current form state and wait for the single response.
    ///
    /// Overlapping submissions are rejected rather than queued. Every exit
    /// path leaves the controller not busy; exactly one of feedback or error
    /// is populated afterwards.
    pub async fn submit(&mut self) {
        if self.busy {
            log::warn!("submit called while a request is outstanding; ignoring");
            return;
        }
        if self.code.trim().is_empty() {
            return;
        }

        self.busy = true;
        self.feedback.clear();
        self.error.clear();

        let request = AnalysisRequest {
            problem_name: if self.problem_name.is_empty() {
                None
            } else {
                Some(self.problem_name.clone())
            },
            code: self.code.clone(),
            pattern: if self.pattern.is_empty() {
                None
            } else {
                Some(self.pattern.clone())
            },
        };

        match self.send(&request).await {
            Ok(feedback) => self.feedback = feedback,
            Err(message) => {
                log::warn!("Analyze request failed: {}", message);
                self.error = message;
            }
        }

        self.busy = false;
    }

    async fn send(&self, request: &AnalysisRequest) -> Result<String, String> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|err| describe_transport_error(&err))?;

        if !response.status().is_success() {
            // Prefer the server-supplied message, fall back to the generic one
            let error = response
                .json::<ErrorResponse>()
                .await
                .map(|payload| payload.error)
                .unwrap_or_else(|_| REQUEST_FAILED_FALLBACK.to_string());
            return Err(error);
        }

        let payload: FeedbackResponse = response
            .json()
            .await
            .map_err(|err| describe_transport_error(&err))?;

        Ok(payload.feedback)
    }
}

fn describe_transport_error(err: &reqwest::Error) -> String {
    let message = err.to_string();
    if message.is_empty() {
        TRANSPORT_ERROR_FALLBACK.to_string()
    } else {
        message
    }
}
