//! Prompt text and static lookup data for the academic assistant.

use ai_llm_service::Personality;

/// Personality every academic chat is answered with.
pub const ACADEMIC_PERSONALITY: Personality = Personality::Hermione;

pub const DEFAULT_SUBJECT: &str = "general";
pub const DEFAULT_DIFFICULTY: &str = "intermediate";

/// Label attached to successful answers. Not computed from any signal.
pub const CONFIDENCE: &str = "high";

/// Further-reading suggestions per subject. Add a row to support a new subject.
pub const SOURCES_BY_SUBJECT: &[(&str, [&str; 3])] = &[
    (
        "mathematics",
        [
            "Khan Academy - Comprehensive video lessons",
            "MIT OpenCourseWare - University-level content",
            "Paul's Online Math Notes - Clear explanations",
        ],
    ),
    (
        "physics",
        [
            "Feynman Lectures - Conceptual understanding",
            "PhET Simulations - Interactive experiments",
            "MIT Physics Courses - Rigorous treatment",
        ],
    ),
    (
        "chemistry",
        [
            "Organic Chemistry Portal - Reaction mechanisms",
            "ChemCollective - Virtual labs",
            "NIST Chemistry WebBook - Reference data",
        ],
    ),
];

/// Suggestions for any subject missing from [`SOURCES_BY_SUBJECT`].
pub const GENERIC_SOURCES: [&str; 3] = [
    "Wikipedia - General overview and references",
    "Google Scholar - Academic papers and research",
    "Educational YouTube channels - Visual explanations",
];

/// Source suggestions for `subject` (exact, case-sensitive match).
pub fn source_suggestions(subject: &str) -> &'static [&'static str] {
    SOURCES_BY_SUBJECT
        .iter()
        .find(|(name, _)| *name == subject)
        .map(|(_, sources)| sources.as_slice())
        .unwrap_or(&GENERIC_SOURCES)
}

/// Instruction block sent to the model as chat context.
pub fn academic_context(subject: &str, difficulty: &str) -> String {
    format!(
        "You are Hermione Granger, brilliant and studious.\n\
         Answer this {subject} question at {difficulty} level with an enthusiastic tone:\n\
         1. Clear, detailed, specific explanations\n\
         2. Examples if helpful\n\
         3. A brief list of related topics at the end (just topic names)\n\
         \n\
         Be thorough but not overwhelming, and always encourage further learning."
    )
}

/// Canned answer served when the chat provider is unavailable.
pub fn fallback_answer(question: &str) -> String {
    format!(
        "I'd love to help you explore {question}! While I can't access my full library right now, \
         I encourage you to break down complex problems into smaller parts, use visual aids when \
         possible, and don't hesitate to ask for clarification on specific concepts."
    )
}
