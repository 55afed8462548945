//! TUI-local state layered over the session controller.
//!
//! The controller owns everything that survives navigation; this struct
//! adds what only the terminal frontend cares about: cursor positions,
//! card flip state, the in-progress exam attempt, and the channel that
//! carries generation completions back into the event loop.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use certprep_lib::content::{
    ContentGenerator, GenerationOutcome, GenerationRequest, StudyGuideRequest,
};
use certprep_lib::exam::{ExamAttempt, ExamStats};
use certprep_lib::genai::GeminiClient;
use certprep_lib::session::{
    Command, MenuAction, RequestToken, SessionController, SessionEvent, View,
};

use crate::app::App;

pub struct TuiState {
    pub controller: SessionController,
    generator: Option<Arc<ContentGenerator<GeminiClient>>>,
    config_error: Option<String>,
    handle: tokio::runtime::Handle,
    tx: Sender<SessionEvent>,
    rx: Receiver<SessionEvent>,

    pub data_dir: PathBuf,
    pub api_key_configured: bool,

    // Home state
    pub menu_selected: usize,

    // Exam state
    pub attempt: Option<ExamAttempt>,
    pub showing_results: bool,
    pub last_stats: Option<ExamStats>,

    // Deck state
    pub card_index: usize,
    pub card_flipped: bool,

    // History state
    pub history_selected: usize,

    pub quit: bool,
}

impl TuiState {
    pub fn new(app: App, handle: tokio::runtime::Handle) -> Self {
        let (tx, rx) = mpsc::channel();
        let controller = SessionController::new(app.history_store());
        let api_key_configured = app.api_key_configured();

        Self {
            controller,
            generator: app.generator,
            config_error: app.config_error,
            handle,
            tx,
            rx,
            data_dir: app.data_dir,
            api_key_configured,
            menu_selected: 0,
            attempt: None,
            showing_results: false,
            last_stats: None,
            card_index: 0,
            card_flipped: false,
            history_selected: 0,
            quit: false,
        }
    }

    /// Drain completions posted by finished generation tasks.
    pub fn pump_completions(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            self.dispatch(event);
        }
    }

    /// Feed one event to the controller and execute whatever command it
    /// returns. Also resets view-local cursors on view changes.
    pub fn dispatch(&mut self, event: SessionEvent) {
        let deck_completed = matches!(
            &event,
            SessionEvent::GenerationCompleted { outcome: GenerationOutcome::Deck(_), .. }
        );
        let prev_view = self.controller.state().view;

        if let Some(Command::Generate { token, request }) = self.controller.handle(event) {
            self.run_generation(token, request);
        }

        let view = self.controller.state().view;
        if view != prev_view {
            self.on_view_entered(view);
        } else if deck_completed {
            // Regenerated deck in place: restart from the first card.
            self.card_index = 0;
            self.card_flipped = false;
        }
    }

    fn on_view_entered(&mut self, view: View) {
        self.card_index = 0;
        self.card_flipped = false;
        self.history_selected = 0;

        if view == View::Exam {
            let questions = self.controller.state().questions.clone();
            self.attempt = Some(ExamAttempt::new(questions));
            self.showing_results = false;
            self.last_stats = None;
        }
    }

    /// Spawn the generation on the runtime; the completion re-enters
    /// through the channel. Without a configured key the request fails
    /// immediately, before any network work, with the blocking message.
    fn run_generation(&mut self, token: RequestToken, request: GenerationRequest) {
        let tx = self.tx.clone();
        match &self.generator {
            Some(generator) => {
                let generator = Arc::clone(generator);
                self.handle.spawn(async move {
                    let outcome = generator.execute(request).await;
                    let _ = tx.send(SessionEvent::GenerationCompleted { token, outcome });
                });
            }
            None => {
                let message = self
                    .config_error
                    .clone()
                    .unwrap_or_else(|| "Content generation is not configured.".to_string());
                let _ = tx.send(SessionEvent::GenerationCompleted {
                    token,
                    outcome: GenerationOutcome::Failed { message },
                });
            }
        }
    }

    // ==================== Home ====================

    pub fn menu_move_down(&mut self) {
        let len = self.controller.state().menu_entries().len();
        if len > 0 && self.menu_selected < len - 1 {
            self.menu_selected += 1;
        }
    }

    pub fn menu_move_up(&mut self) {
        self.menu_selected = self.menu_selected.saturating_sub(1);
    }

    pub fn activate_menu_entry(&mut self) {
        let entries = self.controller.state().menu_entries();
        let entry = match entries.get(self.menu_selected) {
            Some(entry) => entry.clone(),
            None => return,
        };

        match entry.action {
            MenuAction::Profile => self.dispatch(SessionEvent::ProfileRequested),
            MenuAction::History => self.dispatch(SessionEvent::HistoryRequested),
            MenuAction::StartExam => self.dispatch(SessionEvent::ExamStartRequested),
            MenuAction::StartDeck(topic) => {
                self.dispatch(SessionEvent::DeckRequested { topic, force_refresh: false })
            }
        }
    }

    // ==================== Exam ====================

    pub fn select_option(&mut self, index: usize) {
        let option = match self
            .attempt
            .as_ref()
            .and_then(|a| a.current_question())
            .and_then(|q| q.options.get(index))
        {
            Some(option) => option.clone(),
            None => return,
        };
        if let Some(attempt) = self.attempt.as_mut() {
            attempt.select(&option);
        }
    }

    pub fn exam_next(&mut self) {
        let at_end = match self.attempt.as_mut() {
            Some(attempt) => !attempt.next(),
            None => return,
        };
        if at_end {
            self.finish_exam();
        }
    }

    pub fn exam_previous(&mut self) {
        if let Some(attempt) = self.attempt.as_mut() {
            attempt.previous();
        }
    }

    pub fn finish_exam(&mut self) {
        let stats = match &self.attempt {
            Some(attempt) => attempt.finish(),
            None => return,
        };
        self.last_stats = Some(stats.clone());
        self.showing_results = true;
        self.dispatch(SessionEvent::ExamFinished(stats));
    }

    /// Manual (re)try of the study guide from the results screen.
    pub fn retry_study_guide(&mut self) {
        let state = self.controller.state();
        if state.is_generating_guide {
            return;
        }
        let exam = match state.selected_exam {
            Some(exam) => exam,
            None => return,
        };
        let stats = match &self.last_stats {
            Some(stats) if !stats.incorrect_answers.is_empty() => stats.clone(),
            _ => return,
        };

        let request = StudyGuideRequest {
            exam_type: exam,
            incorrect_answers: stats.incorrect_answers,
            target_id: state.current_result_id.clone(),
        };
        self.dispatch(SessionEvent::StudyGuideRequested(request));
    }

    // ==================== Decks ====================

    pub fn deck_len(&self) -> usize {
        let state = self.controller.state();
        match state.view {
            View::Flashcards => state.flashcards.len(),
            View::EkgFlashcards => state.ekg_flashcards.len(),
            View::BodyPositionFlashcards => state.body_position_flashcards.len(),
            _ => 0,
        }
    }

    pub fn flip_card(&mut self) {
        self.card_flipped = !self.card_flipped;
    }

    pub fn next_card(&mut self) {
        let len = self.deck_len();
        if len > 0 && self.card_index < len - 1 {
            self.card_index += 1;
            self.card_flipped = false;
        }
    }

    pub fn previous_card(&mut self) {
        if self.card_index > 0 {
            self.card_index -= 1;
            self.card_flipped = false;
        }
    }

    // ==================== History ====================

    pub fn history_move_down(&mut self) {
        let len = self.controller.state().exam_history.len();
        if len > 0 && self.history_selected < len - 1 {
            self.history_selected += 1;
        }
    }

    pub fn history_move_up(&mut self) {
        self.history_selected = self.history_selected.saturating_sub(1);
    }

    /// Retroactive study guide for the selected history entry.
    pub fn generate_guide_for_selected(&mut self) {
        let state = self.controller.state();
        if state.is_generating_guide {
            return;
        }
        let result = match state.exam_history.get(self.history_selected) {
            Some(result) => result.clone(),
            None => return,
        };
        if result.incorrect_answers.is_empty() {
            return;
        }

        let request = StudyGuideRequest {
            exam_type: result.exam_type,
            incorrect_answers: result.incorrect_answers,
            target_id: Some(result.id),
        };
        self.dispatch(SessionEvent::StudyGuideRequested(request));
    }
}
