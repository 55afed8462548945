//! Session state: the active view plus the cross-cutting context the
//! controller carries between views.

use crate::models::{
    BodyPositionFlashcard, EkgFlashcard, ExamResult, ExamType, Flashcard, Question, Topic,
};

/// Top-level views of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    Exam,
    Flashcards,
    EkgFlashcards,
    BodyPositionFlashcards,
    History,
    Profile,
}

/// Identity of one outstanding generation request. A completion is
/// applied only while its token still matches the pending slot, so a
/// response that arrives after the user has moved on is discarded
/// instead of clobbering newer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(pub u64);

/// What a menu entry triggers when activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Profile,
    History,
    StartExam,
    StartDeck(Topic),
}

/// One side-menu entry. The set of entries varies with the selected
/// exam type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub label: &'static str,
    pub detail: &'static str,
    pub action: MenuAction,
}

impl MenuEntry {
    fn new(label: &'static str, detail: &'static str, action: MenuAction) -> Self {
        Self { label, detail, action }
    }
}

pub struct SessionState {
    pub view: View,
    pub selected_exam: Option<ExamType>,
    /// Drives regenerate dispatch; survives navigation back to Home.
    pub current_topic: Option<Topic>,

    pub questions: Vec<Question>,
    pub flashcards: Vec<Flashcard>,
    pub ekg_flashcards: Vec<EkgFlashcard>,
    pub body_position_flashcards: Vec<BodyPositionFlashcard>,
    /// Transient study guide for the current results screen.
    pub study_guide: Option<String>,
    /// History list as displayed (newest first).
    pub exam_history: Vec<ExamResult>,

    /// Id of the persisted result the next study guide attaches to.
    pub current_result_id: Option<String>,
    pub is_generating_guide: bool,
    /// Id of the record a retroactive guide is being generated for.
    pub current_generating_id: Option<String>,

    /// Spinner message; `Some` while a main generation is in flight.
    pub loading_message: Option<String>,
    pub error: Option<String>,

    pub(crate) pending: Option<RequestToken>,
    pub(crate) pending_guide: Option<RequestToken>,
    next_token: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            view: View::Home,
            selected_exam: None,
            current_topic: None,
            questions: Vec::new(),
            flashcards: Vec::new(),
            ekg_flashcards: Vec::new(),
            body_position_flashcards: Vec::new(),
            study_guide: None,
            exam_history: Vec::new(),
            current_result_id: None,
            is_generating_guide: false,
            current_generating_id: None,
            loading_message: None,
            error: None,
            pending: None,
            pending_guide: None,
            next_token: 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading_message.is_some()
    }

    pub(crate) fn issue_token(&mut self) -> RequestToken {
        self.next_token += 1;
        RequestToken(self.next_token)
    }

    /// Side-menu entries for the current selection. Profile and history
    /// are always present; study modules appear once an exam is chosen,
    /// with the track-specific decks after the shared ones.
    pub fn menu_entries(&self) -> Vec<MenuEntry> {
        let mut items = vec![
            MenuEntry::new("Profile & Settings", "Billing & Info", MenuAction::Profile),
            MenuEntry::new("My Exam History", "Past Results & Guides", MenuAction::History),
        ];

        let exam = match self.selected_exam {
            Some(exam) => exam,
            None => return items,
        };

        items.push(MenuEntry::new("Practice Exam", "Comprehensive Test", MenuAction::StartExam));
        items.push(MenuEntry::new(
            "General Flashcards",
            "Core Terms",
            MenuAction::StartDeck(Topic::General),
        ));

        match exam {
            ExamType::Ccma => {
                items.push(MenuEntry::new(
                    "Medical Shorthand",
                    "Abbreviations",
                    MenuAction::StartDeck(Topic::Shorthand),
                ));
                items.push(MenuEntry::new(
                    "Body Positions",
                    "Visual Guide",
                    MenuAction::StartDeck(Topic::BodyPositions),
                ));
                items.push(MenuEntry::new(
                    "Psychology & Grief",
                    "Stages & Coping",
                    MenuAction::StartDeck(Topic::Grief),
                ));
                items.push(MenuEntry::new(
                    "Vitals & Lab Values",
                    "Normal Ranges",
                    MenuAction::StartDeck(Topic::Vitals),
                ));
                items.push(MenuEntry::new(
                    "Preventive Care",
                    "Screenings",
                    MenuAction::StartDeck(Topic::Preventive),
                ));
                items.push(MenuEntry::new(
                    "Pathology",
                    "Disease Types",
                    MenuAction::StartDeck(Topic::Pathology),
                ));
            }
            ExamType::Phlebotomy => {
                items.push(MenuEntry::new(
                    "Order of Draw",
                    "Tubes & Additives",
                    MenuAction::StartDeck(Topic::TubeDraw),
                ));
                items.push(MenuEntry::new(
                    "Specialized Collections",
                    "Handling & Prep",
                    MenuAction::StartDeck(Topic::Specialized),
                ));
            }
            ExamType::Ekg => {
                items.push(MenuEntry::new(
                    "Rhythm Strips",
                    "Interpretation",
                    MenuAction::StartDeck(Topic::EkgRhythms),
                ));
                items.push(MenuEntry::new(
                    "Leads & Anatomy",
                    "Placement & Biology",
                    MenuAction::StartDeck(Topic::EkgLeads),
                ));
            }
        }

        items
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
