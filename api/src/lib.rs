pub mod core;
pub mod error_handler;
pub mod middleware_layer;
pub mod routes;

use std::{any::Any, sync::Arc};

use ai_llm_service::{
    ChatService, LlmChatService, config::default_config::config_from_env,
};
use axum::{
    Router, middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tokio::signal;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::{error, info};

use crate::{
    core::{
        app_config::{AppConfig, CorsOrigins},
        app_state::AppState,
        auth::{AnonymousVerifier, FirebaseTokenVerifier, TokenVerifier},
    },
    error_handler::AppError,
    middleware_layer::optional_auth::optional_auth,
    routes::{
        hermione::chat_route::academic_chat,
        system::{health_route::health, not_found_route::not_found, root_route::root},
    },
};

/// Builds the HTTP router.
///
/// - `GET  /`                   : welcome + endpoint map
/// - `GET  /health`             : liveness + provider probe
/// - `POST /api/hermione/chat`  : academic Q&A (optional auth)
pub fn router(state: Arc<AppState>, cors: &CorsOrigins) -> Router {
    let hermione = Router::new()
        .route("/chat", post(academic_chat))
        .route_layer(middleware::from_fn_with_state(state.clone(), optional_auth))
        .route_layer(CatchPanicLayer::custom(academic_chat_panic));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api/hermione", hermione)
        .fallback(not_found)
        .layer(cors.layer())
        .with_state(state)
}

/// Loads configuration, wires the services and serves until Ctrl+C.
pub async fn start() -> Result<(), AppError> {
    let config = AppConfig::from_env()?;

    let llm_cfg = config_from_env().map_err(AppError::ChatSetup)?;
    let chat: Arc<dyn ChatService> =
        Arc::new(LlmChatService::new(llm_cfg).map_err(AppError::ChatSetup)?);

    let verifier: Arc<dyn TokenVerifier> = match &config.firebase {
        Some(fb) => Arc::new(FirebaseTokenVerifier::new(fb.clone())?),
        None => {
            info!("FIREBASE_WEB_API_KEY not set; all requests are anonymous");
            Arc::new(AnonymousVerifier)
        }
    };

    let app = router(Arc::new(AppState::new(chat, verifier)), &config.cors);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .map_err(AppError::Bind)?;
    info!(addr = %config.bind_addr, "listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

fn academic_chat_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };
    error!(%details, "academic_chat: panic");
    AppError::Unexpected { details }.into_response()
}
