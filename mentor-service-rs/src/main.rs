// mentor-service-rs/src/main.rs
// Mentor Service - HTTP entry point for code feedback requests
//
// Implements:
// - POST /api/analyze: validate a submission, build the mentor prompt, relay
//   it to the completion provider once and return the feedback verbatim
// - GET /health: liveness plus completion credential status
// - GET /: service summary

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;

mod llm_client;
mod prompt;
mod validation;
#[cfg(test)]
mod tests;

use llm_client::LLMClient;
use prompt::{build_feedback_prompt, MENTOR_SYSTEM_PROMPT};
use shared_types_rs::{ErrorResponse, FeedbackResponse};
use validation::parse_analysis_request;

// Track service start time for uptime reporting
static START_TIME: Lazy<Instant> = Lazy::new(Instant::now);

/// Maximum accepted request payload size (1MB). The form posts a single code
/// snippet; anything larger is rejected before prompt construction.
const MAX_PAYLOAD_SIZE: usize = 1024 * 1024;

/// Substituted when the provider returns no usable feedback text.
const NO_FEEDBACK_FALLBACK: &str = "No feedback generated.";

/// Generic failure payload; the classified detail stays in the server log.
const SERVER_ERROR_MESSAGE: &str = "Server error";

/// Shared application state
pub struct AppState {
    llm: LLMClient,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub service_name: String,
    pub uptime_seconds: i64,
    pub status: String,
}

/// POST /api/analyze - Relay a code submission to the completion provider
async fn analyze_handler(State(state): State<Arc<AppState>>, body: Bytes) -> impl IntoResponse {
    let request = match parse_analysis_request(&body) {
        Ok(request) => request,
        Err(err) => {
            log::info!("Rejected analyze request: {}", err);
            return err.to_response().into_response();
        }
    };

    log::info!(
        "Analyze request: problem={:?}, pattern={:?}, code length={}",
        request.problem_name,
        request.pattern,
        request.code.len()
    );

    let feedback_prompt = build_feedback_prompt(
        request.problem_name.as_deref(),
        request.pattern.as_deref(),
        &request.code,
    );

    match state
        .llm
        .generate_feedback(MENTOR_SYSTEM_PROMPT, &feedback_prompt)
        .await
    {
        Ok(text) => {
            let trimmed = text.trim();
            let feedback = if trimmed.is_empty() {
                NO_FEEDBACK_FALLBACK.to_string()
            } else {
                trimmed.to_string()
            };
            (StatusCode::OK, Json(FeedbackResponse { feedback })).into_response()
        }
        Err(err) => {
            log::error!("Feedback generation failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: SERVER_ERROR_MESSAGE.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// GET /health - Health check endpoint
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let uptime = START_TIME.elapsed().as_secs() as i64;
    let configured = state.llm.is_configured();

    Json(HealthResponse {
        healthy: configured,
        service_name: "mentor-service".to_string(),
        uptime_seconds: uptime,
        status: if configured {
            "SERVING".to_string()
        } else {
            "DEGRADED".to_string()
        },
    })
}

/// GET / - Root endpoint
async fn root_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "service": "Mentor Service",
        "version": "0.1.0",
        "endpoints": [
            "GET /health",
            "POST /api/analyze"
        ]
    }))
}

/// Build the service router with middleware
fn app(state: Arc<AppState>) -> Router {
    // Build CORS layer for the browser form
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/api/analyze", post(analyze_handler))
        .layer(RequestBodyLimitLayer::new(MAX_PAYLOAD_SIZE))
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    dotenv::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let _ = *START_TIME;

    // The completion client is built once and reused across requests
    let state = Arc::new(AppState {
        llm: LLMClient::new(),
    });

    let addr = config_rs::get_bind_address("MENTOR", config_rs::get_default_port("MENTOR"));

    log::info!("Mentor Service starting on {}", addr);
    println!("Mentor Service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
