// src/config.rs
use log::warn;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3030;
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_EXCHANGE_RATES_URL: &str = "https://open.er-api.com/v6/latest";
pub const DEFAULT_STATE_DIR: &str = "data";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub gemini: GeminiConfig,
    pub exchange_rates_url: String,
    pub state_dir: PathBuf,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

impl AppConfig {
    /// Reads settings from the process environment (call `dotenv().ok()` first).
    pub fn from_env() -> Self {
        let port = match env::var("PORT") {
            Ok(value) => value.parse().unwrap_or_else(|_| {
                warn!("PORT={} is not a number, defaulting to {}", value, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            Err(_) => {
                warn!("$PORT not set, defaulting to {}", DEFAULT_PORT);
                DEFAULT_PORT
            }
        };

        let api_key = env::var("GEMINI_API_KEY")
            .or_else(|_| env::var("API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty());

        AppConfig {
            port,
            gemini: GeminiConfig {
                api_key,
                model: var_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
                base_url: var_or("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
            },
            exchange_rates_url: var_or("EXCHANGE_RATES_URL", DEFAULT_EXCHANGE_RATES_URL),
            state_dir: PathBuf::from(var_or("STATE_DIR", DEFAULT_STATE_DIR)),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            port: DEFAULT_PORT,
            gemini: GeminiConfig {
                api_key: None,
                model: DEFAULT_GEMINI_MODEL.to_string(),
                base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            },
            exchange_rates_url: DEFAULT_EXCHANGE_RATES_URL.to_string(),
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
        }
    }
}
