//! Fixed response schemas, one per content category.
//!
//! Each is a JSON array of objects with named, required fields; the
//! remote model is constrained to this shape before parsing ever runs.

use std::collections::HashMap;

use crate::genai::Schema;

/// Schema for a practice exam: a list of question objects.
pub fn question_list() -> Schema {
    let question = Schema::object(HashMap::from([
        (
            "question".to_string(),
            Schema::string().with_description("The multiple-choice question."),
        ),
        (
            "options".to_string(),
            Schema::array(Schema::string()).with_description("An array of 4 possible answers."),
        ),
        (
            "correctAnswer".to_string(),
            Schema::string().with_description("The correct answer from the options array."),
        ),
        (
            "explanation".to_string(),
            Schema::string().with_description("A brief explanation for why the answer is correct."),
        ),
    ]))
    .with_required(vec![
        "question".to_string(),
        "options".to_string(),
        "correctAnswer".to_string(),
        "explanation".to_string(),
    ]);

    Schema::array(question)
}

/// Schema for plain term/definition flashcards.
pub fn flashcard_list() -> Schema {
    let card = Schema::object(HashMap::from([
        (
            "term".to_string(),
            Schema::string().with_description("The key term, concept, or abbreviation."),
        ),
        (
            "definition".to_string(),
            Schema::string().with_description("A clear and concise definition or explanation of the term."),
        ),
        (
            "context".to_string(),
            Schema::string().with_description(
                "Additional context, clinical significance, or a practical example to deepen understanding. Explains why this is important for a medical assistant to know.",
            ),
        ),
    ]))
    .with_required(vec!["term".to_string(), "definition".to_string(), "context".to_string()]);

    Schema::array(card)
}

/// Schema for EKG rhythm cards (pre-image, with the visual prompt).
pub fn ekg_card_list() -> Schema {
    let card = Schema::object(HashMap::from([
        (
            "interpretation".to_string(),
            Schema::string().with_description("The name of the rhythm, condition, or calculation method."),
        ),
        (
            "explanation".to_string(),
            Schema::string().with_description(
                "Key features identifying this rhythm OR the steps/formula for the calculation method.",
            ),
        ),
        (
            "responseProcedure".to_string(),
            Schema::string().with_description(
                "The NHA required response/intervention OR 'Calculation Technique' for method cards.",
            ),
        ),
        (
            "visualPrompt".to_string(),
            Schema::string().with_description(
                "A detailed visual description for an image generator (e.g., 'EKG strip showing saw-tooth F-waves' or 'Diagram of EKG grid highlighting 1500 small boxes').",
            ),
        ),
    ]))
    .with_required(vec![
        "interpretation".to_string(),
        "explanation".to_string(),
        "visualPrompt".to_string(),
        "responseProcedure".to_string(),
    ]);

    Schema::array(card)
}

/// Schema for body-position cards (pre-image, with the visual prompt).
pub fn body_position_card_list() -> Schema {
    let card = Schema::object(HashMap::from([
        ("positionName".to_string(), Schema::string()),
        ("description".to_string(), Schema::string()),
        ("purpose".to_string(), Schema::string()),
        (
            "visualPrompt".to_string(),
            Schema::string().with_description(
                "A detailed visual description of the patient position for an image generator.",
            ),
        ),
    ]))
    .with_required(vec![
        "positionName".to_string(),
        "description".to_string(),
        "purpose".to_string(),
        "visualPrompt".to_string(),
    ]);

    Schema::array(card)
}
