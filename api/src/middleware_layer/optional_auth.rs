use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::core::{
    app_state::AppState,
    auth::{CurrentUser, bearer_token},
};

/// Attaches [`CurrentUser`] to every request. Never rejects.
///
/// A missing, malformed or unverifiable `Authorization` header yields an
/// anonymous caller.
pub async fn optional_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token)
        .map(str::to_owned);

    let user = match token {
        Some(t) => state.verifier.verify(&t).await,
        None => None,
    };

    debug!(authenticated = user.is_some(), "optional_auth");
    req.extensions_mut().insert(CurrentUser(user));
    next.run(req).await
}
