//! Content generation: prompts, response schemas, and the cache-aware
//! generator, plus the request/outcome types the session controller
//! exchanges with it.

pub mod generator;
pub mod prompts;
pub mod schemas;

pub use generator::{ContentError, ContentGenerator, IMAGE_REQUEST_DELAY};

use crate::models::{DeckContent, ExamType, Question, Topic, UserAnswer};

/// Explicit study-guide request. One shape for every caller: a just
/// finished exam passes its fresh result id, the history view passes the
/// stored record's id, and a purely transient guide passes no target.
#[derive(Debug, Clone, PartialEq)]
pub struct StudyGuideRequest {
    pub exam_type: ExamType,
    pub incorrect_answers: Vec<UserAnswer>,
    /// Persisted result the finished guide should attach to, when known.
    pub target_id: Option<String>,
}

/// A remote generation the session controller wants performed.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationRequest {
    PracticeExam { exam: ExamType },
    Deck { topic: Topic, exam: ExamType, force_refresh: bool },
    StudyGuide(StudyGuideRequest),
}

/// What a generation produced. Failures carry only the user-facing
/// message; detail is already logged at the source.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    PracticeExam(Vec<Question>),
    Deck(DeckContent),
    StudyGuide(String),
    Failed { message: String },
}
