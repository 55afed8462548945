//! The session controller: an explicit state machine over the view and
//! its context fields.
//!
//! Every user intent and every generation completion enters through
//! `handle`, which mutates the state and returns at most one
//! side-effecting command for the driver (TUI or CLI) to execute.
//! Remote completions re-enter as `GenerationCompleted` events carrying
//! the token they were issued with; a token that no longer matches the
//! pending slot marks a stale response and is discarded.

use crate::content::{GenerationOutcome, GenerationRequest, StudyGuideRequest};
use crate::exam::ExamStats;
use crate::models::{DeckContent, ExamResult, ExamType, Topic};
use crate::session::state::{RequestToken, SessionState, View};
use crate::storage::HistoryStore;

/// User intents and asynchronous completions.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    ExamSelected(ExamType),
    ExamStartRequested,
    DeckRequested { topic: Topic, force_refresh: bool },
    RegenerateRequested,
    ExamFinished(ExamStats),
    StudyGuideRequested(StudyGuideRequest),
    HistoryRequested,
    ProfileRequested,
    BackRequested,
    ErrorDismissed,
    GenerationCompleted { token: RequestToken, outcome: GenerationOutcome },
}

/// Side effect the driver must perform on the controller's behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Generate { token: RequestToken, request: GenerationRequest },
}

pub struct SessionController {
    state: SessionState,
    history: HistoryStore,
}

impl SessionController {
    pub fn new(history: HistoryStore) -> Self {
        Self { state: SessionState::new(), history }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Apply one event. Returns the command to run, if the transition
    /// needs a remote generation.
    pub fn handle(&mut self, event: SessionEvent) -> Option<Command> {
        match event {
            SessionEvent::ExamSelected(exam) => {
                self.state.selected_exam = Some(exam);
                None
            }
            SessionEvent::ExamStartRequested => self.start_exam(),
            SessionEvent::DeckRequested { topic, force_refresh } => {
                self.start_deck(topic, force_refresh)
            }
            SessionEvent::RegenerateRequested => {
                let topic = self.state.current_topic?;
                self.start_deck(topic, true)
            }
            SessionEvent::ExamFinished(stats) => self.finish_exam(stats),
            SessionEvent::StudyGuideRequested(request) => self.begin_guide(request),
            SessionEvent::HistoryRequested => {
                self.view_history();
                None
            }
            SessionEvent::ProfileRequested => {
                self.state.view = View::Profile;
                None
            }
            SessionEvent::BackRequested => {
                // Selection and generated content survive the return home.
                self.state.view = View::Home;
                None
            }
            SessionEvent::ErrorDismissed => {
                self.state.error = None;
                None
            }
            SessionEvent::GenerationCompleted { token, outcome } => {
                self.complete(token, outcome);
                None
            }
        }
    }

    fn start_exam(&mut self) -> Option<Command> {
        let exam = self.state.selected_exam?;
        self.state.current_topic = None;
        self.state.study_guide = None;
        self.state.current_result_id = None;
        Some(self.begin_generation(
            "Generating your practice exam...".to_string(),
            GenerationRequest::PracticeExam { exam },
        ))
    }

    fn start_deck(&mut self, topic: Topic, force_refresh: bool) -> Option<Command> {
        let exam = self.state.selected_exam?;
        self.state.current_topic = Some(topic);
        Some(self.begin_generation(
            topic.loading_message(force_refresh).to_string(),
            GenerationRequest::Deck { topic, exam, force_refresh },
        ))
    }

    /// Arm the main pending slot. Issuing a new token here is what
    /// invalidates any still-outstanding request.
    fn begin_generation(&mut self, message: String, request: GenerationRequest) -> Command {
        self.state.error = None;
        self.state.loading_message = Some(message);
        let token = self.state.issue_token();
        self.state.pending = Some(token);
        Command::Generate { token, request }
    }

    fn begin_guide(&mut self, request: StudyGuideRequest) -> Option<Command> {
        self.state.is_generating_guide = true;
        self.state.current_generating_id = request.target_id.clone();
        let token = self.state.issue_token();
        self.state.pending_guide = Some(token);
        Some(Command::Generate { token, request: GenerationRequest::StudyGuide(request) })
    }

    fn finish_exam(&mut self, stats: ExamStats) -> Option<Command> {
        let exam = match self.state.selected_exam {
            Some(exam) => exam,
            None => {
                log::warn!("exam finished without a selected exam type; dropping result");
                return None;
            }
        };

        if stats.score + stats.incorrect_answers.len() > stats.total_questions
            || stats.incorrect_answers.iter().any(|a| a.is_correct)
        {
            log::warn!(
                "inconsistent exam tally (score {}, incorrect {}, total {}); dropping result",
                stats.score,
                stats.incorrect_answers.len(),
                stats.total_questions
            );
            return None;
        }

        let result =
            ExamResult::new(exam, stats.score, stats.total_questions, stats.incorrect_answers);
        self.state.current_result_id = Some(result.id.clone());
        self.history.save(&result);

        if result.incorrect_answers.is_empty() {
            return None;
        }

        // A fresh result with misses gets its study guide immediately.
        self.begin_guide(StudyGuideRequest {
            exam_type: exam,
            incorrect_answers: result.incorrect_answers,
            target_id: Some(result.id),
        })
    }

    fn view_history(&mut self) {
        let mut history = self.history.load();
        history.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        self.state.exam_history = history;
        self.state.view = View::History;
    }

    fn complete(&mut self, token: RequestToken, outcome: GenerationOutcome) {
        if self.state.pending == Some(token) {
            self.state.pending = None;
            self.state.loading_message = None;
            self.apply_main_outcome(outcome);
        } else if self.state.pending_guide == Some(token) {
            self.state.pending_guide = None;
            self.state.is_generating_guide = false;
            let target_id = self.state.current_generating_id.take();
            self.apply_guide_outcome(outcome, target_id);
        } else {
            log::info!("discarding stale generation result for token {:?}", token);
        }
    }

    fn apply_main_outcome(&mut self, outcome: GenerationOutcome) {
        match outcome {
            GenerationOutcome::PracticeExam(questions) => {
                self.state.questions = questions;
                self.state.view = View::Exam;
            }
            GenerationOutcome::Deck(DeckContent::Plain(cards)) => {
                self.state.flashcards = cards;
                self.state.view = View::Flashcards;
            }
            GenerationOutcome::Deck(DeckContent::Ekg(cards)) => {
                self.state.ekg_flashcards = cards;
                self.state.view = View::EkgFlashcards;
            }
            GenerationOutcome::Deck(DeckContent::BodyPositions(cards)) => {
                self.state.body_position_flashcards = cards;
                self.state.view = View::BodyPositionFlashcards;
            }
            GenerationOutcome::Failed { message } => {
                // Stay on the current view; the banner shows the message.
                self.state.error = Some(message);
            }
            GenerationOutcome::StudyGuide(_) => {
                log::warn!("study guide outcome arrived on the main request slot; ignoring");
            }
        }
    }

    fn apply_guide_outcome(&mut self, outcome: GenerationOutcome, target_id: Option<String>) {
        match outcome {
            GenerationOutcome::StudyGuide(guide) => {
                self.state.study_guide = Some(guide.clone());

                let id = match target_id {
                    Some(id) => id,
                    None => return,
                };
                let mut record = match self.history.find(&id) {
                    Some(record) => record,
                    // A guide can target a result that was never
                    // persisted (or has been cleared); it stays transient.
                    None => return,
                };

                record.study_guide = Some(guide);
                self.history.save(&record);

                if self.state.view == View::History {
                    if let Some(entry) =
                        self.state.exam_history.iter_mut().find(|r| r.id == id)
                    {
                        *entry = record;
                    }
                }
            }
            GenerationOutcome::Failed { message } => {
                log::error!("study guide generation failed: {}", message);
            }
            other => {
                log::warn!("unexpected outcome on the study-guide slot: {:?}", other);
            }
        }
    }
}
