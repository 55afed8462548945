//! Reserved storage keys, one per content category.

/// Prefix for general decks; the exam type label is appended.
pub const FLASHCARDS_GENERAL: &str = "flashcards_general_";
pub const FLASHCARDS_SHORTHAND: &str = "flashcards_shorthand";
pub const FLASHCARDS_GRIEF: &str = "flashcards_grief";
pub const FLASHCARDS_VITALS: &str = "flashcards_vitals";
pub const FLASHCARDS_PREVENTIVE: &str = "flashcards_preventive";
pub const FLASHCARDS_PATHOLOGY: &str = "flashcards_pathology";
pub const FLASHCARDS_TUBE_DRAW: &str = "flashcards_tube_draw";
pub const FLASHCARDS_SPECIALIZED: &str = "flashcards_specialized";
pub const FLASHCARDS_EKG_LEADS: &str = "flashcards_ekg_leads";
pub const FLASHCARDS_EKG_RHYTHMS: &str = "flashcards_ekg_rhythms";
pub const FLASHCARDS_BODY_POSITIONS: &str = "flashcards_body_positions";
pub const EXAM_HISTORY: &str = "exam_history";
