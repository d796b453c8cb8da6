use axum::Json;
use serde_json::{Value, json};

/// GET /: welcome message and endpoint map.
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Welcome to WizEdia - Your Hogwarts Learning Companion!",
        "endpoints": {
            "hermione": "/api/hermione/chat",
            "health": "/health",
        }
    }))
}
