use ai_llm_service::AiLlmError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Public application error type.
///
/// Request-level variants render as the flat JSON bodies clients rely on
/// (`{"error": ...}` plus `fallback_answer` or `details` where relevant).
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("chat service setup failed: {0}")]
    ChatSetup(#[source] AiLlmError),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("Question is required for academic assistance")]
    MissingQuestion,

    #[error("Valid question content is required")]
    EmptyQuestion,

    /// Chat provider answered unsuccessfully; the caller still gets usable text.
    #[error("Hermione is temporarily busy in the library")]
    ServiceUnavailable { fallback_answer: String },

    #[error("An unexpected error occurred in the academic chat")]
    Unexpected { details: String },

    #[error("Endpoint not found in the magical realm")]
    NotFound,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 4xx
            AppError::MissingQuestion | AppError::EmptyQuestion => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,

            // 5xx
            AppError::ServiceUnavailable { .. } | AppError::Unexpected { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::InvalidConfig(_)
            | AppError::ChatSetup(_)
            | AppError::Bind(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fallback_answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = self.to_string();
        let body = match self {
            AppError::ServiceUnavailable { fallback_answer } => ErrorBody {
                error,
                fallback_answer: Some(fallback_answer),
                details: None,
            },
            AppError::Unexpected { details } => ErrorBody {
                error,
                fallback_answer: None,
                details: Some(details),
            },
            _ => ErrorBody {
                error,
                fallback_answer: None,
                details: None,
            },
        };
        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;
