//! POST /api/hermione/chat: academic Q&A in Hermione's style.

use std::sync::Arc;

use ai_llm_service::ChatService;
use axum::{
    Extension,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use text_utils::{DEFAULT_MAX_KEYWORDS, clean_text, extract_keywords};
use tracing::{debug, error, info, warn};

use crate::{
    core::{app_state::AppState, auth::CurrentUser, http::json_response::safe_json_response},
    error_handler::{AppError, AppResult},
    routes::hermione::{
        academic::{
            ACADEMIC_PERSONALITY, CONFIDENCE, academic_context, fallback_answer,
            source_suggestions,
        },
        chat_request::AcademicChatRequest,
        chat_response::AcademicChatResponse,
    },
};

/// Model name reported when the provider did not say which model answered.
const UNKNOWN_MODEL: &str = "unknown";

/// Handler: POST /api/hermione/chat
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:5000/api/hermione/chat \
///   -H 'content-type: application/json' \
///   -d '{"question":"What is a derivative?","subject":"mathematics","difficulty":"intermediate"}'
/// ```
pub async fn academic_chat(
    State(state): State<Arc<AppState>>,
    user: Option<Extension<CurrentUser>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request_id = headers
        .get("X-Request-Id")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-");
    let uid = user
        .as_ref()
        .and_then(|Extension(CurrentUser(u))| u.as_ref())
        .map(|u| u.uid.as_str())
        .unwrap_or("-");

    debug!(request_id = %request_id, user = %uid, "academic_chat: start");

    match answer_question(state.chat.as_ref(), &body).await {
        Ok(resp) => {
            info!(
                request_id = %request_id,
                user = %uid,
                subject = %resp.subject,
                difficulty = %resp.difficulty,
                model = %resp.model_used,
                keywords = resp.keywords.len(),
                "academic_chat: answered"
            );
            safe_json_response(&resp, StatusCode::OK)
        }
        Err(err) => {
            match &err {
                AppError::MissingQuestion | AppError::EmptyQuestion => {
                    debug!(request_id = %request_id, error = %err, "academic_chat: rejected");
                }
                AppError::ServiceUnavailable { .. } => {
                    warn!(request_id = %request_id, user = %uid, "academic_chat: served fallback");
                }
                other => {
                    error!(
                        request_id = %request_id,
                        user = %uid,
                        error = %other,
                        "academic_chat: failed"
                    );
                }
            }
            err.into_response()
        }
    }
}

/// Validates the body, asks the chat service and shapes the answer.
///
/// # Errors
/// - [`AppError::MissingQuestion`] / [`AppError::EmptyQuestion`] on invalid input
///   (the chat service is not called)
/// - [`AppError::ServiceUnavailable`] when the service answers unsuccessfully
/// - [`AppError::Unexpected`] when the service call itself fails
pub async fn answer_question(
    chat: &dyn ChatService,
    body: &[u8],
) -> AppResult<AcademicChatResponse> {
    let request = AcademicChatRequest::from_body(body)?;

    let question = clean_text(&request.question);
    if question.is_empty() {
        return Err(AppError::EmptyQuestion);
    }

    let context = academic_context(&request.subject, &request.difficulty);

    let reply = chat
        .chat(&question, &context, ACADEMIC_PERSONALITY)
        .await
        .map_err(|e| AppError::Unexpected {
            details: e.to_string(),
        })?;

    if !reply.success {
        return Err(AppError::ServiceUnavailable {
            fallback_answer: fallback_answer(&request.question),
        });
    }

    let keywords = extract_keywords(&reply.response, DEFAULT_MAX_KEYWORDS);
    let source_suggestions = source_suggestions(&request.subject)
        .iter()
        .map(|s| s.to_string())
        .collect();

    Ok(AcademicChatResponse {
        success: true,
        answer: reply.response,
        subject: request.subject,
        difficulty: request.difficulty,
        keywords,
        confidence: CONFIDENCE,
        source_suggestions,
        model_used: reply
            .model
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| UNKNOWN_MODEL.to_string()),
    })
}
