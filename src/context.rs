// src/context.rs
use log::{info, warn};
use reqwest::Client;
use tokio::sync::Mutex;

use crate::config::AppConfig;
use crate::services::gemini::GeminiClient;
use crate::services::loan_state::LoanScreen;
use crate::services::storage::{FileStore, StateStore};

/// Everything the handlers share.
pub struct AppContext {
    pub config: AppConfig,
    pub http: Client,
    pub gemini: Option<GeminiClient>,
    pub store: StateStore,
    pub screen: Mutex<LoanScreen>,
}

impl AppContext {
    pub fn new(config: AppConfig, store: StateStore) -> Self {
        let gemini = match GeminiClient::new(&config.gemini) {
            Ok(client) => {
                info!("Gemini client configured with model {}", config.gemini.model);
                Some(client)
            }
            Err(e) => {
                warn!("AI features disabled: {}", e);
                None
            }
        };

        let screen = LoanScreen::new(store.has_saved_state());

        AppContext {
            config,
            http: Client::new(),
            gemini,
            store,
            screen: Mutex::new(screen),
        }
    }

    pub fn from_config(config: AppConfig) -> Self {
        let store = StateStore::new(Box::new(FileStore::new(config.state_dir.clone())));
        Self::new(config, store)
    }
}
