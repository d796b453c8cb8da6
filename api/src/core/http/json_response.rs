use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// Serializes `data` into a JSON response with `status`.
///
/// Serialization failures never escape: they become a 500 with
/// `{"error": "Response formatting error: ..."}`.
pub fn safe_json_response<T>(data: &T, status: StatusCode) -> Response
where
    T: Serialize + ?Sized,
{
    match serde_json::to_value(data) {
        Ok(value) => (status, Json(value)).into_response(),
        Err(e) => {
            error!(error = %e, "failed to serialize response body");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": format!("Response formatting error: {e}") })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[derive(Serialize)]
    struct Answer {
        answer: &'static str,
    }

    #[tokio::test]
    async fn serializable_data_keeps_status() {
        let resp = safe_json_response(&Answer { answer: "42" }, StatusCode::OK);
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let v: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(v["answer"], "42");
    }

    #[tokio::test]
    async fn unserializable_data_becomes_500() {
        // JSON object keys must be strings.
        let mut bad = HashMap::new();
        bad.insert(vec![1u8], "x");
        let resp = safe_json_response(&bad, StatusCode::OK);
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let v: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(v["error"].as_str().unwrap().starts_with("Response formatting error"));
    }
}
