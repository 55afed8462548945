//! Practice exam attempt bookkeeping.
//!
//! Tracks the question cursor and the answers recorded so far. An
//! answer is recorded on the user's first selection for a question and
//! never changes afterwards; later selections for the same question are
//! no-ops.

use crate::models::{Question, UserAnswer};

/// Tally produced when an attempt is finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamStats {
    pub score: usize,
    pub total_questions: usize,
    pub incorrect_answers: Vec<UserAnswer>,
}

pub struct ExamAttempt {
    questions: Vec<Question>,
    answers: Vec<UserAnswer>,
    current: usize,
}

impl ExamAttempt {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions, answers: Vec::new(), current: 0 }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    pub fn is_last_question(&self) -> bool {
        !self.questions.is_empty() && self.current == self.questions.len() - 1
    }

    /// The recorded answer for a question, keyed by question text.
    pub fn answer_for(&self, question: &str) -> Option<&UserAnswer> {
        self.answers.iter().find(|a| a.question == question)
    }

    pub fn current_answer(&self) -> Option<&UserAnswer> {
        self.current_question().and_then(|q| self.answer_for(&q.question))
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn unanswered_count(&self) -> usize {
        self.questions.len() - self.answers.len()
    }

    /// Record a selection for the current question. First selection
    /// wins: if an answer for this question already exists, nothing
    /// changes.
    pub fn select(&mut self, selected: &str) {
        let question = match self.current_question() {
            Some(q) => q.clone(),
            None => return,
        };

        if self.answer_for(&question.question).is_some() {
            return;
        }

        let is_correct = selected == question.correct_answer;
        self.answers.push(UserAnswer {
            question: question.question,
            selected_answer: selected.to_string(),
            is_correct,
            correct_answer: question.correct_answer,
            explanation: question.explanation,
        });
    }

    /// Advance the cursor. Returns false when already on the last
    /// question (the caller finishes instead).
    pub fn next(&mut self) -> bool {
        if self.current + 1 < self.questions.len() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    pub fn previous(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    /// Final tally over the accumulated answers. Questions the user
    /// skipped count toward the total but toward neither the score nor
    /// the incorrect list, matching the recorded-answers-only contract.
    pub fn finish(&self) -> ExamStats {
        let score = self.answers.iter().filter(|a| a.is_correct).count();
        let incorrect_answers: Vec<UserAnswer> =
            self.answers.iter().filter(|a| !a.is_correct).cloned().collect();

        ExamStats {
            score,
            total_questions: self.questions.len(),
            incorrect_answers,
        }
    }
}
