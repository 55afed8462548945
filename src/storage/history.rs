//! Exam history persistence.
//!
//! All results live as one list under a single key. Saving upserts by
//! result id: a matching id replaces the stored record in place, a new
//! id appends. Storage failures degrade to misses/no-ops via the cache.

use crate::models::ExamResult;
use crate::storage::keys::EXAM_HISTORY;
use crate::storage::CacheStore;

pub struct HistoryStore {
    cache: CacheStore,
}

impl HistoryStore {
    pub fn new(cache: CacheStore) -> Self {
        Self { cache }
    }

    /// All stored results, in insertion order. Display ordering (newest
    /// first) is the caller's concern.
    pub fn load(&self) -> Vec<ExamResult> {
        self.cache.get(EXAM_HISTORY).unwrap_or_default()
    }

    /// Look up one result by id.
    pub fn find(&self, id: &str) -> Option<ExamResult> {
        self.load().into_iter().find(|r| r.id == id)
    }

    /// Insert or replace a result by id.
    pub fn save(&self, result: &ExamResult) {
        let mut history = self.load();
        match history.iter_mut().find(|r| r.id == result.id) {
            Some(existing) => *existing = result.clone(),
            None => history.push(result.clone()),
        }
        self.cache.set(EXAM_HISTORY, &history);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExamType;
    use tempfile::tempdir;

    fn store(dir: &tempfile::TempDir) -> HistoryStore {
        HistoryStore::new(CacheStore::new(dir.path().to_path_buf()))
    }

    fn result_with_id(id: &str) -> ExamResult {
        ExamResult {
            id: id.to_string(),
            timestamp: id.parse().unwrap_or(0),
            exam_type: ExamType::Ccma,
            score: 2,
            total_questions: 3,
            incorrect_answers: Vec::new(),
            study_guide: None,
        }
    }

    #[test]
    fn empty_history_loads_as_empty_list() {
        let dir = tempdir().unwrap();
        assert!(store(&dir).load().is_empty());
    }

    #[test]
    fn new_id_appends() {
        let dir = tempdir().unwrap();
        let history = store(&dir);

        history.save(&result_with_id("100"));
        history.save(&result_with_id("200"));
        assert_eq!(history.load().len(), 2);
    }

    #[test]
    fn matching_id_replaces_in_place() {
        let dir = tempdir().unwrap();
        let history = store(&dir);

        history.save(&result_with_id("100"));
        history.save(&result_with_id("200"));

        let mut updated = result_with_id("100");
        updated.study_guide = Some("Focus on the order of draw.".to_string());
        history.save(&updated);

        let stored = history.load();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].id, "100");
        assert_eq!(stored[0].study_guide.as_deref(), Some("Focus on the order of draw."));
    }

    #[test]
    fn find_returns_none_for_unknown_id() {
        let dir = tempdir().unwrap();
        let history = store(&dir);
        history.save(&result_with_id("100"));
        assert!(history.find("999").is_none());
        assert!(history.find("100").is_some());
    }
}
