use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Runtime configuration, loaded from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub knowledge_path: PathBuf,
    pub reminders_path: PathBuf,
    pub llm_url: String,
    pub llm_timeout: Duration,
    pub search_url: String,
    pub search_timeout: Duration,
    /// TTS program to pipe replies through. `None` keeps replies on the console.
    pub speech_command: Option<String>,
    pub home_page: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            knowledge_path: PathBuf::from("knowledge_base.json"),
            reminders_path: PathBuf::from("reminders.json"),
            llm_url: "http://localhost:8080".to_string(),
            llm_timeout: Duration::from_millis(8000),
            search_url: "https://html.duckduckgo.com/html/".to_string(),
            search_timeout: Duration::from_millis(5000),
            speech_command: None,
            home_page: "https://www.google.com".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from `JARVIS_*` environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let defaults = Self::default();

        let knowledge_path = std::env::var("JARVIS_KNOWLEDGE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.knowledge_path);
        let reminders_path = std::env::var("JARVIS_REMINDERS_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.reminders_path);

        let llm_url = std::env::var("JARVIS_LLM_URL").unwrap_or(defaults.llm_url);
        let llm_timeout = millis_var("JARVIS_LLM_TIMEOUT_MS")?.unwrap_or(defaults.llm_timeout);

        let search_url = std::env::var("JARVIS_SEARCH_URL").unwrap_or(defaults.search_url);
        let search_timeout =
            millis_var("JARVIS_SEARCH_TIMEOUT_MS")?.unwrap_or(defaults.search_timeout);

        let speech_command = std::env::var("JARVIS_SPEECH_COMMAND")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let home_page = std::env::var("JARVIS_HOME_PAGE").unwrap_or(defaults.home_page);

        Ok(Self {
            knowledge_path,
            reminders_path,
            llm_url,
            llm_timeout,
            search_url,
            search_timeout,
            speech_command,
            home_page,
        })
    }
}

fn millis_var(name: &str) -> Result<Option<Duration>, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(|ms| Some(Duration::from_millis(ms)))
            .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string())),
        Err(_) => Ok(None),
    }
}
