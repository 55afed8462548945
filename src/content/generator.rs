//! Cache-aware content generation over the remote model.
//!
//! One operation per content category. Deck operations consult the
//! cache first (unless a refresh is forced), call the model with the
//! category's declared schema on a miss, enrich image-bearing decks
//! through the sequential batch runner, and store the final result
//! before returning it.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::batch::run_sequentially;
use crate::content::{prompts, schemas, GenerationRequest, GenerationOutcome};
use crate::genai::{GenAiError, GenerativeModel};
use crate::models::{
    BodyPositionFlashcard, DeckContent, DeckKind, EkgFlashcard, ExamType, Flashcard, Question,
    Topic, UserAnswer,
};
use crate::storage::CacheStore;

/// Model used for practice exams (the largest structured generation).
pub const EXAM_MODEL: &str = "gemini-2.5-pro";
/// Model used for flashcards and study guides.
pub const TEXT_MODEL: &str = "gemini-2.5-flash";
/// Model used for card illustrations.
pub const IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Pause between consecutive image requests, to stay under the image
/// endpoint's rate limit.
pub const IMAGE_REQUEST_DELAY: Duration = Duration::from_secs(2);

#[derive(Error, Debug)]
pub enum ContentError {
    /// The remote service credential is absent. Nothing can be produced
    /// until it is configured.
    #[error("{0}")]
    Configuration(String),

    /// The remote call failed or its response did not match the expected
    /// structure. The message is user-facing; detail is logged only.
    #[error("{0}")]
    Generation(String),
}

/// EKG card as the model returns it: the visual prompt is consumed by
/// the image step and dropped from the final card.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EkgCardDraft {
    #[serde(default)]
    image: Option<String>,
    interpretation: String,
    explanation: String,
    response_procedure: String,
    visual_prompt: String,
}

impl From<EkgCardDraft> for EkgFlashcard {
    fn from(draft: EkgCardDraft) -> Self {
        Self {
            image: draft.image,
            interpretation: draft.interpretation,
            explanation: draft.explanation,
            response_procedure: draft.response_procedure,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BodyPositionCardDraft {
    #[serde(default)]
    image: Option<String>,
    position_name: String,
    description: String,
    purpose: String,
    visual_prompt: String,
}

impl From<BodyPositionCardDraft> for BodyPositionFlashcard {
    fn from(draft: BodyPositionCardDraft) -> Self {
        Self {
            image: draft.image,
            position_name: draft.position_name,
            description: draft.description,
            purpose: draft.purpose,
        }
    }
}

pub struct ContentGenerator<M> {
    model: M,
    cache: CacheStore,
    image_delay: Duration,
}

impl<M: GenerativeModel> ContentGenerator<M> {
    pub fn new(model: M, cache: CacheStore) -> Self {
        Self { model, cache, image_delay: IMAGE_REQUEST_DELAY }
    }

    /// Override the inter-image pause (tests use zero).
    pub fn with_image_delay(mut self, delay: Duration) -> Self {
        self.image_delay = delay;
        self
    }

    /// Generate a full practice exam. Never cached.
    pub async fn practice_exam(&self, exam: ExamType) -> Result<Vec<Question>, ContentError> {
        const MESSAGE: &str = "Failed to generate practice exam. Please try again.";

        let prompt = prompts::practice_exam(exam);
        let text = self
            .model
            .generate_text(EXAM_MODEL, &prompt, Some(schemas::question_list()))
            .await
            .map_err(|e| remote_error(e, MESSAGE))?;
        parse_generated(&text, MESSAGE)
    }

    /// Generate a study guide from missed questions. Never cached; the
    /// guide is always attached to a result or held transiently.
    pub async fn study_guide(
        &self,
        exam: ExamType,
        missed: &[UserAnswer],
    ) -> Result<String, ContentError> {
        const MESSAGE: &str = "Failed to generate study guide.";

        let prompt = prompts::study_guide(exam, missed);
        self.model
            .generate_text(TEXT_MODEL, &prompt, None)
            .await
            .map_err(|e| remote_error(e, MESSAGE))
    }

    /// Produce the deck for a topic, consulting the topic's cache key
    /// unless `force_refresh` is set.
    pub async fn deck(
        &self,
        topic: Topic,
        exam: ExamType,
        force_refresh: bool,
    ) -> Result<DeckContent, ContentError> {
        match topic.deck_kind() {
            DeckKind::Plain => {
                self.plain_deck(topic, exam, force_refresh).await.map(DeckContent::Plain)
            }
            DeckKind::Ekg => self.ekg_deck(exam, force_refresh).await.map(DeckContent::Ekg),
            DeckKind::BodyPositions => self
                .body_position_deck(exam, force_refresh)
                .await
                .map(DeckContent::BodyPositions),
        }
    }

    async fn plain_deck(
        &self,
        topic: Topic,
        exam: ExamType,
        force_refresh: bool,
    ) -> Result<Vec<Flashcard>, ContentError> {
        const MESSAGE: &str = "Failed to generate flashcards. Please try again.";

        let key = topic.cache_key(exam);
        if !force_refresh {
            if let Some(cached) = self.cache.get::<Vec<Flashcard>>(&key) {
                return Ok(cached);
            }
        }

        let prompt = prompts::deck_prompt(topic, exam);
        let text = self
            .model
            .generate_text(TEXT_MODEL, &prompt, Some(schemas::flashcard_list()))
            .await
            .map_err(|e| remote_error(e, MESSAGE))?;
        let cards: Vec<Flashcard> = parse_generated(&text, MESSAGE)?;

        self.cache.set(&key, &cards);
        Ok(cards)
    }

    async fn ekg_deck(
        &self,
        exam: ExamType,
        force_refresh: bool,
    ) -> Result<Vec<EkgFlashcard>, ContentError> {
        const MESSAGE: &str = "Failed to generate EKG flashcards.";

        let key = Topic::EkgRhythms.cache_key(exam);
        if !force_refresh {
            if let Some(cached) = self.cache.get::<Vec<EkgFlashcard>>(&key) {
                return Ok(cached);
            }
        }

        let text = self
            .model
            .generate_text(TEXT_MODEL, prompts::EKG_RHYTHMS_DECK, Some(schemas::ekg_card_list()))
            .await
            .map_err(|e| remote_error(e, MESSAGE))?;
        let drafts: Vec<EkgCardDraft> = parse_generated(&text, MESSAGE)?;

        let enriched = run_sequentially(drafts, self.image_delay, |draft| {
            let model = &self.model;
            async move {
                let prompt = prompts::ekg_image(&draft.visual_prompt);
                let data = model.generate_image(IMAGE_MODEL, &prompt).await?;
                Ok::<_, GenAiError>(EkgCardDraft {
                    image: Some(format!("data:image/png;base64,{data}")),
                    ..draft
                })
            }
        })
        .await;

        let cards: Vec<EkgFlashcard> = enriched.into_iter().map(Into::into).collect();
        self.cache.set(&key, &cards);
        Ok(cards)
    }

    async fn body_position_deck(
        &self,
        exam: ExamType,
        force_refresh: bool,
    ) -> Result<Vec<BodyPositionFlashcard>, ContentError> {
        const MESSAGE: &str = "Failed to generate Body Position flashcards.";

        let key = Topic::BodyPositions.cache_key(exam);
        if !force_refresh {
            if let Some(cached) = self.cache.get::<Vec<BodyPositionFlashcard>>(&key) {
                return Ok(cached);
            }
        }

        let text = self
            .model
            .generate_text(
                TEXT_MODEL,
                prompts::BODY_POSITIONS_DECK,
                Some(schemas::body_position_card_list()),
            )
            .await
            .map_err(|e| remote_error(e, MESSAGE))?;
        let drafts: Vec<BodyPositionCardDraft> = parse_generated(&text, MESSAGE)?;

        let enriched = run_sequentially(drafts, self.image_delay, |draft| {
            let model = &self.model;
            async move {
                let prompt = prompts::body_position_image(&draft.position_name, &draft.visual_prompt);
                let data = model.generate_image(IMAGE_MODEL, &prompt).await?;
                Ok::<_, GenAiError>(BodyPositionCardDraft {
                    image: Some(format!("data:image/png;base64,{data}")),
                    ..draft
                })
            }
        })
        .await;

        let cards: Vec<BodyPositionFlashcard> = enriched.into_iter().map(Into::into).collect();
        self.cache.set(&key, &cards);
        Ok(cards)
    }

    /// Run one session-controller request to its outcome. Errors are
    /// folded into `Failed` so the controller only ever sees data.
    pub async fn execute(&self, request: GenerationRequest) -> GenerationOutcome {
        match request {
            GenerationRequest::PracticeExam { exam } => match self.practice_exam(exam).await {
                Ok(questions) => GenerationOutcome::PracticeExam(questions),
                Err(e) => GenerationOutcome::Failed { message: e.to_string() },
            },
            GenerationRequest::Deck { topic, exam, force_refresh } => {
                match self.deck(topic, exam, force_refresh).await {
                    Ok(content) => GenerationOutcome::Deck(content),
                    Err(e) => GenerationOutcome::Failed { message: e.to_string() },
                }
            }
            GenerationRequest::StudyGuide(request) => {
                match self.study_guide(request.exam_type, &request.incorrect_answers).await {
                    Ok(guide) => GenerationOutcome::StudyGuide(guide),
                    Err(e) => GenerationOutcome::Failed { message: e.to_string() },
                }
            }
        }
    }
}

/// Map a remote failure into the error taxonomy: a missing credential is
/// a configuration error, everything else a generation error carrying
/// only the category's generic message. The cause is logged here.
fn remote_error(error: GenAiError, message: &str) -> ContentError {
    log::error!("generation request failed: {}", error);
    match error {
        GenAiError::MissingApiKey => ContentError::Configuration(error.to_string()),
        _ => ContentError::Generation(message.to_string()),
    }
}

fn parse_generated<T: DeserializeOwned>(text: &str, message: &str) -> Result<T, ContentError> {
    serde_json::from_str(text.trim()).map_err(|e| {
        log::error!("generated response did not match the expected structure: {}", e);
        ContentError::Generation(message.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tempfile::tempdir;

    /// Scripted stand-in for the remote service.
    struct FakeModel {
        text_response: Mutex<Result<String, String>>,
        image_ok: bool,
        text_calls: AtomicUsize,
        image_calls: AtomicUsize,
    }

    impl FakeModel {
        fn returning(text: &str) -> Self {
            Self {
                text_response: Mutex::new(Ok(text.to_string())),
                image_ok: true,
                text_calls: AtomicUsize::new(0),
                image_calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                text_response: Mutex::new(Err("service unavailable".to_string())),
                image_ok: true,
                text_calls: AtomicUsize::new(0),
                image_calls: AtomicUsize::new(0),
            }
        }

        fn without_images(mut self) -> Self {
            self.image_ok = false;
            self
        }
    }

    #[async_trait]
    impl GenerativeModel for FakeModel {
        async fn generate_text(
            &self,
            _model: &str,
            _prompt: &str,
            _schema: Option<crate::genai::Schema>,
        ) -> Result<String, GenAiError> {
            self.text_calls.fetch_add(1, Ordering::SeqCst);
            self.text_response
                .lock()
                .unwrap()
                .clone()
                .map_err(|message| GenAiError::Api { status: 503, message })
        }

        async fn generate_image(&self, _model: &str, _prompt: &str) -> Result<String, GenAiError> {
            self.image_calls.fetch_add(1, Ordering::SeqCst);
            if self.image_ok {
                Ok("aW1hZ2U=".to_string())
            } else {
                Err(GenAiError::EmptyResponse)
            }
        }
    }

    fn generator(model: FakeModel, dir: &tempfile::TempDir) -> ContentGenerator<FakeModel> {
        ContentGenerator::new(model, CacheStore::new(dir.path().to_path_buf()))
            .with_image_delay(Duration::ZERO)
    }

    const PLAIN_DECK_JSON: &str =
        r#"[{"term": "NPO", "definition": "Nothing by mouth", "context": "Pre-procedure order"}]"#;

    const EKG_DECK_JSON: &str = r#"[
        {"interpretation": "V-Fib", "explanation": "Chaotic waveform", "responseProcedure": "Start CPR", "visualPrompt": "EKG strip with chaotic fibrillation"},
        {"interpretation": "Asystole", "explanation": "Flatline", "responseProcedure": "Start CPR", "visualPrompt": "Flat EKG strip"}
    ]"#;

    #[tokio::test]
    async fn cached_deck_short_circuits_generation() {
        let dir = tempdir().unwrap();
        let cache = CacheStore::new(dir.path().to_path_buf());
        let cached = vec![Flashcard {
            term: "PRN".to_string(),
            definition: "As needed".to_string(),
            context: "Medication timing".to_string(),
        }];
        cache.set(&Topic::Shorthand.cache_key(ExamType::Ccma), &cached);

        let gen = generator(FakeModel::returning(PLAIN_DECK_JSON), &dir);
        let deck = gen.deck(Topic::Shorthand, ExamType::Ccma, false).await.unwrap();

        assert_eq!(deck, DeckContent::Plain(cached));
        assert_eq!(gen.model.text_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn force_refresh_bypasses_and_overwrites_cache() {
        let dir = tempdir().unwrap();
        let cache = CacheStore::new(dir.path().to_path_buf());
        let key = Topic::Shorthand.cache_key(ExamType::Ccma);
        cache.set(
            &key,
            &vec![Flashcard {
                term: "stale".to_string(),
                definition: "old".to_string(),
                context: String::new(),
            }],
        );

        let gen = generator(FakeModel::returning(PLAIN_DECK_JSON), &dir);
        let deck = gen.deck(Topic::Shorthand, ExamType::Ccma, true).await.unwrap();

        assert_eq!(gen.model.text_calls.load(Ordering::SeqCst), 1);
        match &deck {
            DeckContent::Plain(cards) => assert_eq!(cards[0].term, "NPO"),
            other => panic!("expected plain deck, got {other:?}"),
        }

        let stored: Vec<Flashcard> = cache.get(&key).unwrap();
        assert_eq!(stored[0].term, "NPO");
    }

    #[tokio::test]
    async fn malformed_response_is_a_generation_error() {
        let dir = tempdir().unwrap();
        let gen = generator(FakeModel::returning("this is not json"), &dir);

        let err = gen.deck(Topic::Grief, ExamType::Ccma, false).await.unwrap_err();
        match err {
            ContentError::Generation(message) => {
                assert_eq!(message, "Failed to generate flashcards. Please try again.")
            }
            other => panic!("expected generation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn remote_failure_keeps_detail_out_of_the_message() {
        let dir = tempdir().unwrap();
        let gen = generator(FakeModel::failing(), &dir);

        let err = gen.practice_exam(ExamType::Ekg).await.unwrap_err();
        match err {
            ContentError::Generation(message) => {
                assert_eq!(message, "Failed to generate practice exam. Please try again.");
                assert!(!message.contains("service unavailable"));
            }
            other => panic!("expected generation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn ekg_deck_attaches_one_image_per_card() {
        let dir = tempdir().unwrap();
        let gen = generator(FakeModel::returning(EKG_DECK_JSON), &dir);

        let deck = gen.deck(Topic::EkgRhythms, ExamType::Ekg, false).await.unwrap();
        let cards = match deck {
            DeckContent::Ekg(cards) => cards,
            other => panic!("expected EKG deck, got {other:?}"),
        };

        assert_eq!(cards.len(), 2);
        assert_eq!(gen.model.image_calls.load(Ordering::SeqCst), 2);
        for card in &cards {
            assert_eq!(card.image.as_deref(), Some("data:image/png;base64,aW1hZ2U="));
        }

        // The enriched deck is what lands in the cache.
        let cache = CacheStore::new(dir.path().to_path_buf());
        let stored: Vec<EkgFlashcard> = cache.get(&Topic::EkgRhythms.cache_key(ExamType::Ekg)).unwrap();
        assert_eq!(stored, cards);
    }

    #[tokio::test]
    async fn failed_image_calls_degrade_cards_without_aborting() {
        let dir = tempdir().unwrap();
        let gen = generator(FakeModel::returning(EKG_DECK_JSON).without_images(), &dir);

        let deck = gen.deck(Topic::EkgRhythms, ExamType::Ekg, false).await.unwrap();
        let cards = match deck {
            DeckContent::Ekg(cards) => cards,
            other => panic!("expected EKG deck, got {other:?}"),
        };

        assert_eq!(cards.len(), 2);
        assert!(cards.iter().all(|c| c.image.is_none()));
        assert_eq!(cards[0].interpretation, "V-Fib");
    }

    #[tokio::test]
    async fn study_guide_returns_plain_text() {
        let dir = tempdir().unwrap();
        let gen = generator(FakeModel::returning("Focus Area 1: Order of Draw..."), &dir);

        let guide = gen.study_guide(ExamType::Phlebotomy, &[]).await.unwrap();
        assert_eq!(guide, "Focus Area 1: Order of Draw...");
    }
}
