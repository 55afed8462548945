//! Core data model for exams, flashcard decks, and results.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// NHA certification track. Serialized as the full official label so
/// persisted records and cache keys survive across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExamType {
    #[serde(rename = "CCMA (Certified Clinical Medical Assistant)")]
    Ccma,
    #[serde(rename = "Phlebotomy Technician (CPT)")]
    Phlebotomy,
    #[serde(rename = "EKG Technician (CET)")]
    Ekg,
}

impl ExamType {
    pub const ALL: [ExamType; 3] = [ExamType::Ccma, ExamType::Phlebotomy, ExamType::Ekg];

    /// Full official label, as shown to the user and used in cache keys.
    pub fn label(&self) -> &'static str {
        match self {
            ExamType::Ccma => "CCMA (Certified Clinical Medical Assistant)",
            ExamType::Phlebotomy => "Phlebotomy Technician (CPT)",
            ExamType::Ekg => "EKG Technician (CET)",
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            ExamType::Ccma => "CCMA",
            ExamType::Phlebotomy => "Phlebotomy",
            ExamType::Ekg => "EKG",
        }
    }
}

impl fmt::Display for ExamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Shape of the cards a topic deck produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckKind {
    Plain,
    Ekg,
    BodyPositions,
}

/// A flashcard subject area. Distinct from the exam type: topics drive
/// cache keys, prompt selection, and regenerate dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Topic {
    General,
    Shorthand,
    Grief,
    Vitals,
    Preventive,
    Pathology,
    TubeDraw,
    Specialized,
    EkgLeads,
    EkgRhythms,
    BodyPositions,
}

impl Topic {
    /// Storage key for this topic's deck. The general deck is keyed per
    /// exam type; every other topic has one fixed key.
    pub fn cache_key(&self, exam: ExamType) -> String {
        match self {
            Topic::General => format!("{}{}", crate::storage::keys::FLASHCARDS_GENERAL, exam.label()),
            Topic::Shorthand => crate::storage::keys::FLASHCARDS_SHORTHAND.to_string(),
            Topic::Grief => crate::storage::keys::FLASHCARDS_GRIEF.to_string(),
            Topic::Vitals => crate::storage::keys::FLASHCARDS_VITALS.to_string(),
            Topic::Preventive => crate::storage::keys::FLASHCARDS_PREVENTIVE.to_string(),
            Topic::Pathology => crate::storage::keys::FLASHCARDS_PATHOLOGY.to_string(),
            Topic::TubeDraw => crate::storage::keys::FLASHCARDS_TUBE_DRAW.to_string(),
            Topic::Specialized => crate::storage::keys::FLASHCARDS_SPECIALIZED.to_string(),
            Topic::EkgLeads => crate::storage::keys::FLASHCARDS_EKG_LEADS.to_string(),
            Topic::EkgRhythms => crate::storage::keys::FLASHCARDS_EKG_RHYTHMS.to_string(),
            Topic::BodyPositions => crate::storage::keys::FLASHCARDS_BODY_POSITIONS.to_string(),
        }
    }

    pub fn deck_kind(&self) -> DeckKind {
        match self {
            Topic::EkgRhythms => DeckKind::Ekg,
            Topic::BodyPositions => DeckKind::BodyPositions,
            _ => DeckKind::Plain,
        }
    }

    /// Menu / title label.
    pub fn label(&self) -> &'static str {
        match self {
            Topic::General => "General Flashcards",
            Topic::Shorthand => "Medical Shorthand",
            Topic::Grief => "Psychology & Grief",
            Topic::Vitals => "Vitals & Lab Values",
            Topic::Preventive => "Preventive Care",
            Topic::Pathology => "Pathology",
            Topic::TubeDraw => "Order of Draw",
            Topic::Specialized => "Specialized Collections",
            Topic::EkgLeads => "Leads & Anatomy",
            Topic::EkgRhythms => "Rhythm Strips",
            Topic::BodyPositions => "Body Positions",
        }
    }

    /// Spinner message shown while this topic's deck is being produced.
    pub fn loading_message(&self, force_refresh: bool) -> &'static str {
        if force_refresh {
            return match self {
                Topic::EkgRhythms => "Regenerating EKG strips...",
                Topic::BodyPositions => "Regenerating illustrations...",
                _ => "Regenerating deck...",
            };
        }
        match self {
            Topic::General => "Loading general flashcard deck...",
            Topic::Shorthand => "Loading Medical Shorthand flashcards...",
            Topic::Grief => "Loading Psychology & Grief flashcards...",
            Topic::Vitals => "Loading Vitals & Lab Values flashcards...",
            Topic::Preventive => "Loading Preventive Care flashcards...",
            Topic::Pathology => "Loading Pathology & Disease flashcards...",
            Topic::TubeDraw => "Loading Tube Order of Draw flashcards...",
            Topic::Specialized => "Loading Specialized Collections flashcards...",
            Topic::EkgLeads => "Loading EKG Leads & Anatomy flashcards...",
            Topic::EkgRhythms => "Loading EKG Rhythm flashcards (images may take a moment)...",
            Topic::BodyPositions => "Loading Body Positions flashcards (images may take a moment)...",
        }
    }
}

impl FromStr for Topic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "general" => Ok(Topic::General),
            "shorthand" => Ok(Topic::Shorthand),
            "grief" => Ok(Topic::Grief),
            "vitals" => Ok(Topic::Vitals),
            "preventive" => Ok(Topic::Preventive),
            "pathology" => Ok(Topic::Pathology),
            "tube-draw" => Ok(Topic::TubeDraw),
            "specialized" => Ok(Topic::Specialized),
            "ekg-leads" => Ok(Topic::EkgLeads),
            "ekg-rhythms" => Ok(Topic::EkgRhythms),
            "body-positions" => Ok(Topic::BodyPositions),
            other => Err(format!("unknown topic: {}", other)),
        }
    }
}

/// A multiple-choice practice question. Immutable once generated; the
/// correct answer is the verbatim text of one of the options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: String,
}

/// The user's recorded answer to one question. Created once, on the
/// first selection; never updated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAnswer {
    pub question: String,
    pub selected_answer: String,
    pub is_correct: bool,
    pub correct_answer: String,
    pub explanation: String,
}

/// Plain term/definition flashcard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub term: String,
    pub definition: String,
    #[serde(default)]
    pub context: String,
}

/// EKG rhythm card. `image` holds a base64 data URI once the image
/// generation step has run; cards whose image call failed keep `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EkgFlashcard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub interpretation: String,
    pub explanation: String,
    pub response_procedure: String,
}

impl EkgFlashcard {
    /// Decoded image payload, stripping the data-URI prefix.
    pub fn image_bytes(&self) -> Option<Vec<u8>> {
        decode_data_uri(self.image.as_deref()?)
    }
}

/// Patient body-position card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyPositionFlashcard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub position_name: String,
    pub description: String,
    pub purpose: String,
}

impl BodyPositionFlashcard {
    /// Decoded image payload, stripping the data-URI prefix.
    pub fn image_bytes(&self) -> Option<Vec<u8>> {
        decode_data_uri(self.image.as_deref()?)
    }
}

fn decode_data_uri(uri: &str) -> Option<Vec<u8>> {
    use base64::Engine;
    let encoded = uri.split_once("base64,").map(|(_, rest)| rest)?;
    base64::engine::general_purpose::STANDARD.decode(encoded).ok()
}

/// The cards a deck generation produced, in one of the three shapes.
/// In-memory only; the cache stores the typed card lists themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeckContent {
    Plain(Vec<Flashcard>),
    Ekg(Vec<EkgFlashcard>),
    BodyPositions(Vec<BodyPositionFlashcard>),
}

impl DeckContent {
    pub fn len(&self) -> usize {
        match self {
            DeckContent::Plain(cards) => cards.len(),
            DeckContent::Ekg(cards) => cards.len(),
            DeckContent::BodyPositions(cards) => cards.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A finished exam attempt, persisted to history.
///
/// Invariant: `score + incorrect_answers.len() == total_questions`.
/// The study guide is attached after the fact, once generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamResult {
    pub id: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub exam_type: ExamType,
    pub score: usize,
    pub total_questions: usize,
    pub incorrect_answers: Vec<UserAnswer>,
    pub study_guide: Option<String>,
}

impl ExamResult {
    /// Build a result with a fresh time-derived id.
    pub fn new(
        exam_type: ExamType,
        score: usize,
        total_questions: usize,
        incorrect_answers: Vec<UserAnswer>,
    ) -> Self {
        let timestamp = chrono::Utc::now().timestamp_millis();
        Self {
            id: timestamp.to_string(),
            timestamp,
            exam_type,
            score,
            total_questions,
            incorrect_answers,
            study_guide: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exam_type_round_trips_through_label_string() {
        for exam in ExamType::ALL {
            let json = serde_json::to_string(&exam).unwrap();
            assert_eq!(json, format!("\"{}\"", exam.label()));
            let back: ExamType = serde_json::from_str(&json).unwrap();
            assert_eq!(back, exam);
        }
    }

    #[test]
    fn general_deck_key_is_per_exam() {
        let ccma = Topic::General.cache_key(ExamType::Ccma);
        let ekg = Topic::General.cache_key(ExamType::Ekg);
        assert_ne!(ccma, ekg);
        assert!(ccma.starts_with("flashcards_general_"));
    }

    #[test]
    fn topic_keys_are_fixed_for_non_general_decks() {
        assert_eq!(
            Topic::Shorthand.cache_key(ExamType::Ccma),
            Topic::Shorthand.cache_key(ExamType::Ekg)
        );
        assert_eq!(Topic::TubeDraw.cache_key(ExamType::Phlebotomy), "flashcards_tube_draw");
    }

    #[test]
    fn topic_parses_from_cli_names() {
        assert_eq!("ekg-rhythms".parse::<Topic>().unwrap(), Topic::EkgRhythms);
        assert_eq!("BODY_POSITIONS".parse::<Topic>().unwrap(), Topic::BodyPositions);
        assert!("cardiology".parse::<Topic>().is_err());
    }

    #[test]
    fn image_bytes_decodes_the_data_uri() {
        let card = EkgFlashcard {
            image: Some("data:image/png;base64,RUtH".to_string()),
            interpretation: "NSR".to_string(),
            explanation: "Regular rhythm".to_string(),
            response_procedure: "Monitor".to_string(),
        };
        assert_eq!(card.image_bytes().unwrap(), b"EKG");

        let imageless = EkgFlashcard { image: None, ..card.clone() };
        assert!(imageless.image_bytes().is_none());

        let garbled = EkgFlashcard { image: Some("data:image/png;base64,@@".to_string()), ..card };
        assert!(garbled.image_bytes().is_none());
    }

    #[test]
    fn result_fields_are_camel_case_on_disk() {
        let result = ExamResult::new(ExamType::Ccma, 2, 3, Vec::new());
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("totalQuestions").is_some());
        assert!(json.get("incorrectAnswers").is_some());
        assert!(json.get("studyGuide").is_some());
    }
}
