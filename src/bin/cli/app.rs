//! Shared wiring for CLI commands and the TUI.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use certprep_lib::content::ContentGenerator;
use certprep_lib::genai::GeminiClient;
use certprep_lib::storage::{CacheStore, HistoryStore};

pub struct App {
    /// Present when the API key is configured. When absent, generation
    /// requests fail immediately with `config_error` instead of ever
    /// reaching the network; cached content and history still work.
    pub generator: Option<Arc<ContentGenerator<GeminiClient>>>,
    pub config_error: Option<String>,
    pub data_dir: PathBuf,
}

impl App {
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => CacheStore::default_data_dir()
                .context("could not determine a data directory for this platform")?,
        };

        let (generator, config_error) = match GeminiClient::from_env() {
            Ok(client) => {
                let generator =
                    ContentGenerator::new(client, CacheStore::new(data_dir.clone()));
                (Some(Arc::new(generator)), None)
            }
            Err(e) => {
                log::warn!("generation disabled: {}", e);
                (None, Some(e.to_string()))
            }
        };

        Ok(Self { generator, config_error, data_dir })
    }

    pub fn history_store(&self) -> HistoryStore {
        HistoryStore::new(CacheStore::new(self.data_dir.clone()))
    }

    pub fn api_key_configured(&self) -> bool {
        self.generator.is_some()
    }
}
