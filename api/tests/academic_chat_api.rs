// tests/academic_chat_api.rs

use std::sync::{Arc, Mutex};

use ai_llm_service::{
    AiLlmError, ChatReply, ChatService, HealthStatus, Personality,
    error_handler::{ProviderError, ProviderErrorKind},
    LlmProvider,
};
use api::core::{
    app_config::CorsOrigins,
    app_state::AppState,
    auth::{AuthUser, TokenVerifier},
};
use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

/// What the scripted chat service answers.
#[derive(Clone)]
enum Script {
    Answer { response: String, model: Option<String> },
    Unavailable,
    Fail,
}

/// Recorded `chat` invocation.
#[derive(Debug, Clone, PartialEq)]
struct Call {
    prompt: String,
    context: String,
    personality: Personality,
}

struct ScriptedChat {
    script: Script,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedChat {
    fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn answering(response: &str, model: &str) -> Arc<Self> {
        Self::new(Script::Answer {
            response: response.into(),
            model: Some(model.into()),
        })
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatService for ScriptedChat {
    async fn chat(
        &self,
        prompt: &str,
        context: &str,
        personality: Personality,
    ) -> Result<ChatReply, AiLlmError> {
        self.calls.lock().unwrap().push(Call {
            prompt: prompt.into(),
            context: context.into(),
            personality,
        });
        match &self.script {
            Script::Answer { response, model } => Ok(ChatReply {
                success: true,
                response: response.clone(),
                model: model.clone(),
                personality,
            }),
            Script::Unavailable => Ok(ChatReply::unavailable(personality)),
            Script::Fail => Err(ProviderError::new(
                LlmProvider::Gemini,
                ProviderErrorKind::Decode("unexpected payload".into()),
            )
            .into()),
        }
    }

    async fn health(&self) -> Option<HealthStatus> {
        Some(HealthStatus {
            provider: "gemini".into(),
            endpoint: "https://example.test".into(),
            model: Some("scripted".into()),
            ok: true,
            latency_ms: 1,
            message: "scripted".into(),
        })
    }
}

/// Chat service whose provider call panics.
struct PanickingChat;

#[async_trait]
impl ChatService for PanickingChat {
    async fn chat(
        &self,
        _prompt: &str,
        _context: &str,
        _personality: Personality,
    ) -> Result<ChatReply, AiLlmError> {
        panic!("kaboom in provider")
    }
}

/// Accepts exactly one token.
struct FixedVerifier {
    seen: Mutex<Vec<String>>,
}

#[async_trait]
impl TokenVerifier for FixedVerifier {
    async fn verify(&self, id_token: &str) -> Option<AuthUser> {
        self.seen.lock().unwrap().push(id_token.to_string());
        (id_token == "good-token").then(|| AuthUser {
            uid: "student-1".into(),
            email: None,
        })
    }
}

fn app(chat: Arc<ScriptedChat>) -> Router {
    api::router(Arc::new(AppState::anonymous(chat)), &CorsOrigins::Any)
}

async fn post_chat(app: Router, body: &str) -> (StatusCode, Value) {
    post_chat_with(app, body, None).await
}

async fn post_chat_with(app: Router, body: &str, auth: Option<&str>) -> (StatusCode, Value) {
    let mut req = Request::builder()
        .method("POST")
        .uri("/api/hermione/chat")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(a) = auth {
        req = req.header(header::AUTHORIZATION, a);
    }
    let response = app
        .oneshot(req.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn derivative_question_gets_mathematics_sources() {
    let chat =
        ScriptedChat::answering("A derivative measures rate of change.", "gemini-2.0-flash");
    let (status, body) = post_chat(
        app(chat.clone()),
        r#"{"question":"What is a derivative?","subject":"mathematics","difficulty":"intermediate"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "answer": "A derivative measures rate of change.",
            "subject": "mathematics",
            "difficulty": "intermediate",
            "keywords": ["derivative", "measures", "rate", "change"],
            "confidence": "high",
            "source_suggestions": [
                "Khan Academy - Comprehensive video lessons",
                "MIT OpenCourseWare - University-level content",
                "Paul's Online Math Notes - Clear explanations"
            ],
            "model_used": "gemini-2.0-flash"
        })
    );

    let calls = chat.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].prompt, "What is a derivative?");
    assert_eq!(calls[0].personality, Personality::Hermione);
    assert!(calls[0].context.contains("mathematics question at intermediate level"));
}

#[tokio::test]
async fn defaults_and_generic_sources() {
    let chat = ScriptedChat::answering("R", "M");
    let (status, body) =
        post_chat(app(chat.clone()), r#"{"question":"  Why   is the sky blue? "}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answer"], "R");
    assert_eq!(body["model_used"], "M");
    assert_eq!(body["subject"], "general");
    assert_eq!(body["difficulty"], "intermediate");
    assert_eq!(body["confidence"], "high");
    assert_eq!(body["keywords"], json!([]));
    assert_eq!(
        body["source_suggestions"],
        json!([
            "Wikipedia - General overview and references",
            "Google Scholar - Academic papers and research",
            "Educational YouTube channels - Visual explanations"
        ])
    );
    assert_eq!(chat.calls()[0].prompt, "Why is the sky blue?");
}

#[tokio::test]
async fn missing_model_is_reported_as_unknown() {
    let chat = ScriptedChat::new(Script::Answer {
        response: "Entropy measures disorder.".into(),
        model: None,
    });
    let (status, body) = post_chat(
        app(chat),
        r#"{"question":"What is entropy?","subject":"physics","difficulty":"advanced"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model_used"], "unknown");
    assert_eq!(body["difficulty"], "advanced");
    assert_eq!(body["source_suggestions"][0], "Feynman Lectures - Conceptual understanding");
}

#[tokio::test]
async fn empty_object_is_missing_question() {
    let chat = ScriptedChat::answering("R", "M");
    let (status, body) = post_chat(app(chat.clone()), "{}").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Question is required for academic assistance" }));
    assert!(chat.calls().is_empty());
}

#[tokio::test]
async fn absent_or_malformed_body_is_missing_question() {
    for raw in ["", "{not json", r#"{"subject":"physics"}"#] {
        let chat = ScriptedChat::answering("R", "M");
        let (status, body) = post_chat(app(chat.clone()), raw).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {raw:?}");
        assert_eq!(body["error"], "Question is required for academic assistance");
        assert!(chat.calls().is_empty());
    }
}

#[tokio::test]
async fn whitespace_question_is_invalid() {
    let chat = ScriptedChat::answering("R", "M");
    let (status, body) = post_chat(app(chat.clone()), r#"{"question":"   "}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Valid question content is required" }));
    assert!(chat.calls().is_empty());
}

#[tokio::test]
async fn unavailable_service_returns_fallback_with_question() {
    let chat = ScriptedChat::new(Script::Unavailable);
    let (status, body) = post_chat(
        app(chat),
        r#"{"question":"How do enzymes work?","subject":"biology"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Hermione is temporarily busy in the library");
    let fallback = body["fallback_answer"].as_str().unwrap();
    assert!(fallback.contains("How do enzymes work?"));
    assert!(fallback.starts_with("I'd love to help you explore How do enzymes work?!"));
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn failing_service_is_unexpected_error_with_details() {
    let chat = ScriptedChat::new(Script::Fail);
    let (status, body) = post_chat(app(chat), r#"{"question":"What is a vector?"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "An unexpected error occurred in the academic chat");
    assert!(body["details"].as_str().unwrap().contains("unexpected payload"));
}

#[tokio::test]
async fn panicking_service_is_unexpected_error_with_panic_message() {
    let app = api::router(
        Arc::new(AppState::anonymous(Arc::new(PanickingChat))),
        &CorsOrigins::Any,
    );
    let (status, body) = post_chat(app, r#"{"question":"What is a vector?"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({
            "error": "An unexpected error occurred in the academic chat",
            "details": "kaboom in provider"
        })
    );
}

#[tokio::test]
async fn auth_header_is_optional_and_never_rejects() {
    let verifier = Arc::new(FixedVerifier {
        seen: Mutex::new(Vec::new()),
    });
    let chat = ScriptedChat::answering("R", "M");
    let state = Arc::new(AppState::new(chat, verifier.clone()));
    let app = api::router(state, &CorsOrigins::Any);

    for auth in [None, Some("Bearer good-token"), Some("Bearer bad-token"), Some("Basic abc")] {
        let (status, _) = post_chat_with(app.clone(), r#"{"question":"q"}"#, auth).await;
        assert_eq!(status, StatusCode::OK, "auth {auth:?}");
    }

    assert_eq!(
        *verifier.seen.lock().unwrap(),
        vec!["good-token".to_string(), "bad-token".to_string()]
    );
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let response = app(ScriptedChat::answering("R", "M"))
        .oneshot(Request::builder().uri("/api/nowhere").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "error": "Endpoint not found in the magical realm" }));
}

#[tokio::test]
async fn health_reports_provider_probe() {
    let response = app(ScriptedChat::answering("R", "M"))
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["llm"]["ok"], true);
    assert_eq!(body["llm"]["model"], "scripted");
}

#[tokio::test]
async fn root_lists_chat_endpoint() {
    let response = app(ScriptedChat::answering("R", "M"))
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["endpoints"]["hermione"], "/api/hermione/chat");
}
