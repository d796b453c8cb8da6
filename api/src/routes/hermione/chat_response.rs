use serde::Serialize;

/// Successful response payload for `POST /api/hermione/chat`.
#[derive(Debug, Serialize)]
pub struct AcademicChatResponse {
    pub success: bool,
    /// Model answer (plain text).
    pub answer: String,
    pub subject: String,
    pub difficulty: String,
    /// Significant words pulled from the answer.
    pub keywords: Vec<String>,
    pub confidence: &'static str,
    /// Further-reading suggestions for the subject.
    pub source_suggestions: Vec<String>,
    pub model_used: String,
}
