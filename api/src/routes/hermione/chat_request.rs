use serde_json::Value;

use crate::{
    error_handler::{AppError, AppResult},
    routes::hermione::academic::{DEFAULT_DIFFICULTY, DEFAULT_SUBJECT},
};

/// Request payload for `POST /api/hermione/chat`.
///
/// Parsed leniently from raw bytes so that every malformed body maps to the
/// same validation error instead of a framework rejection.
#[derive(Debug, Clone, PartialEq)]
pub struct AcademicChatRequest {
    /// Raw question text, not yet cleaned. Empty when the JSON value was not a string.
    pub question: String,
    pub subject: String,
    pub difficulty: String,
}

impl AcademicChatRequest {
    /// Parses the request body.
    ///
    /// # Errors
    /// [`AppError::MissingQuestion`] when the body is empty, not a JSON object,
    /// or has no `question` key.
    pub fn from_body(body: &[u8]) -> AppResult<Self> {
        let value: Value = serde_json::from_slice(body).map_err(|_| AppError::MissingQuestion)?;
        let Value::Object(map) = value else {
            return Err(AppError::MissingQuestion);
        };

        let question = match map.get("question") {
            None => return Err(AppError::MissingQuestion),
            Some(Value::String(s)) => s.clone(),
            Some(_) => String::new(),
        };

        Ok(Self {
            question,
            subject: string_or(map.get("subject"), DEFAULT_SUBJECT),
            difficulty: string_or(map.get("difficulty"), DEFAULT_DIFFICULTY),
        })
    }
}

fn string_or(value: Option<&Value>, default: &str) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        _ => default.to_string(),
    }
}
