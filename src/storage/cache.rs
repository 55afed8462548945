//! File-backed key-value cache.
//!
//! One JSON file per key under the data directory. The public API never
//! surfaces an error: a failed read is a miss, a failed write is a no-op,
//! and the underlying cause is logged. Records are wrapped in a versioned
//! envelope; a record whose version does not match the current schema
//! version is rejected as a miss instead of being passed through.

use std::fs;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Version tag written into every persisted record.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    version: u32,
    data: &'a T,
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    data: serde_json::Value,
}

/// Persistent string-keyed store for generated content.
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Default data directory (e.g. ~/.local/share/certprep).
    pub fn default_data_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("certprep"))
    }

    /// Map a key to a file path. Keys may contain spaces and punctuation
    /// (the general deck key embeds the exam label), so everything
    /// outside [A-Za-z0-9_-] is folded to '_'.
    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", name))
    }

    /// Look up a key. Any failure (missing file, unreadable JSON, wrong
    /// schema version, shape mismatch) is a miss.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.path_for(key);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                log::error!("cache read failed for {:?}: {}", key, e);
                return None;
            }
        };

        let envelope: Envelope = match serde_json::from_str(&content) {
            Ok(envelope) => envelope,
            Err(e) => {
                log::warn!("cache record for {:?} is not a valid envelope: {}", key, e);
                return None;
            }
        };

        if envelope.version != SCHEMA_VERSION {
            log::warn!(
                "cache record for {:?} has schema version {} (expected {}), ignoring",
                key,
                envelope.version,
                SCHEMA_VERSION
            );
            return None;
        }

        match serde_json::from_value(envelope.data) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("cache record for {:?} does not match the expected shape: {}", key, e);
                None
            }
        }
    }

    /// Store a value, overwriting any previous record wholesale. Write
    /// failures (e.g. disk full) are logged and swallowed so the caller
    /// continues as if the save succeeded.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) {
        if let Err(e) = self.try_set(key, value) {
            log::error!("cache write failed for {:?}: {}", key, e);
        }
    }

    fn try_set<T: Serialize>(&self, key: &str, value: &T) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp_path = path.with_extension("json.tmp");
        let envelope = EnvelopeRef { version: SCHEMA_VERSION, data: value };
        let json = serde_json::to_string_pretty(&envelope)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Delete a key. Missing keys and failed deletes are no-ops.
    pub fn remove(&self, key: &str) {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::error!("cache remove failed for {:?}: {}", key, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Flashcard;
    use tempfile::tempdir;

    fn sample_deck() -> Vec<Flashcard> {
        vec![Flashcard {
            term: "NPO".to_string(),
            definition: "Nothing by mouth".to_string(),
            context: "Common pre-procedure order".to_string(),
        }]
    }

    #[test]
    fn set_then_get_round_trips() {
        let dir = tempdir().unwrap();
        let cache = CacheStore::new(dir.path().to_path_buf());

        cache.set("flashcards_shorthand", &sample_deck());
        let loaded: Option<Vec<Flashcard>> = cache.get("flashcards_shorthand");
        assert_eq!(loaded, Some(sample_deck()));
    }

    #[test]
    fn missing_key_is_a_miss() {
        let dir = tempdir().unwrap();
        let cache = CacheStore::new(dir.path().to_path_buf());

        let loaded: Option<Vec<Flashcard>> = cache.get("flashcards_grief");
        assert!(loaded.is_none());
    }

    #[test]
    fn keys_with_punctuation_stay_distinct() {
        let dir = tempdir().unwrap();
        let cache = CacheStore::new(dir.path().to_path_buf());

        cache.set("flashcards_general_CCMA (Certified Clinical Medical Assistant)", &1u32);
        cache.set("flashcards_general_EKG Technician (CET)", &2u32);

        assert_eq!(cache.get::<u32>("flashcards_general_CCMA (Certified Clinical Medical Assistant)"), Some(1));
        assert_eq!(cache.get::<u32>("flashcards_general_EKG Technician (CET)"), Some(2));
    }

    #[test]
    fn corrupted_record_is_a_miss() {
        let dir = tempdir().unwrap();
        let cache = CacheStore::new(dir.path().to_path_buf());

        cache.set("flashcards_vitals", &sample_deck());
        let path = cache.path_for("flashcards_vitals");
        std::fs::write(&path, "not json {{{").unwrap();

        let loaded: Option<Vec<Flashcard>> = cache.get("flashcards_vitals");
        assert!(loaded.is_none());
    }

    #[test]
    fn unknown_schema_version_is_rejected() {
        let dir = tempdir().unwrap();
        let cache = CacheStore::new(dir.path().to_path_buf());

        cache.set("flashcards_pathology", &sample_deck());
        let path = cache.path_for("flashcards_pathology");
        let raw = std::fs::read_to_string(&path).unwrap();
        std::fs::write(&path, raw.replace("\"version\": 1", "\"version\": 99")).unwrap();

        let loaded: Option<Vec<Flashcard>> = cache.get("flashcards_pathology");
        assert!(loaded.is_none());
    }

    #[test]
    fn shape_mismatch_is_a_miss() {
        let dir = tempdir().unwrap();
        let cache = CacheStore::new(dir.path().to_path_buf());

        cache.set("flashcards_preventive", &"just a string");
        let loaded: Option<Vec<Flashcard>> = cache.get("flashcards_preventive");
        assert!(loaded.is_none());
    }

    #[test]
    fn set_overwrites_wholesale() {
        let dir = tempdir().unwrap();
        let cache = CacheStore::new(dir.path().to_path_buf());

        cache.set("flashcards_shorthand", &vec![1u32, 2, 3]);
        cache.set("flashcards_shorthand", &vec![9u32]);
        assert_eq!(cache.get::<Vec<u32>>("flashcards_shorthand"), Some(vec![9]));
    }

    #[test]
    fn remove_deletes_and_tolerates_missing() {
        let dir = tempdir().unwrap();
        let cache = CacheStore::new(dir.path().to_path_buf());

        cache.set("flashcards_grief", &sample_deck());
        cache.remove("flashcards_grief");
        assert!(cache.get::<Vec<Flashcard>>("flashcards_grief").is_none());

        // Removing again must not panic or error.
        cache.remove("flashcards_grief");
    }
}
