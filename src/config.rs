use std::env;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

const APP_DIRECTORY: &str = "ticketeer";
const CONFIG_FILE_NAME: &str = "config.json";

const ENV_JIRA_DOMAIN: &str = "TICKETEER_JIRA_DOMAIN";
const ENV_JIRA_EMAIL: &str = "TICKETEER_JIRA_EMAIL";
const ENV_JIRA_TOKEN: &str = "TICKETEER_JIRA_TOKEN";
const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
const ENV_OPENAI_MODEL: &str = "TICKETEER_OPENAI_MODEL";

/// Values persisted by `config init`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredConfig {
    pub jira_domain: Option<String>,
    pub jira_email: Option<String>,
    pub jira_token: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_model: Option<String>,
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        let path = config_file_path()?;
        match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|err| AppError::Configuration(format!("invalid config file: {err}"))),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self) -> AppResult<()> {
        let path = config_file_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to write config: {err}")))?;
        fs::write(&path, data)?;
        Ok(())
    }
}

/// Effective configuration: the stored file overlaid with environment values.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub jira_domain: Option<String>,
    pub jira_email: Option<String>,
    pub jira_token: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_model: Option<String>,
}

impl AppConfig {
    pub fn load() -> AppResult<Self> {
        let stored = StoredConfig::load()?;
        Ok(Self::merge(stored, |name| env::var(name).ok()))
    }

    fn merge(stored: StoredConfig, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let pick = |name: &str, fallback: Option<String>| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .or(fallback)
                .filter(|value| !value.trim().is_empty())
        };

        Self {
            jira_domain: pick(ENV_JIRA_DOMAIN, stored.jira_domain),
            jira_email: pick(ENV_JIRA_EMAIL, stored.jira_email),
            jira_token: pick(ENV_JIRA_TOKEN, stored.jira_token),
            openai_api_key: pick(ENV_OPENAI_API_KEY, stored.openai_api_key),
            openai_model: pick(ENV_OPENAI_MODEL, stored.openai_model),
        }
    }

    /// Names of the settings a full session needs but that are unset.
    pub fn missing_settings(&self) -> Vec<&'static str> {
        [
            ("Jira domain", &self.jira_domain),
            ("Jira email", &self.jira_email),
            ("Jira API token", &self.jira_token),
            ("OpenAI API key", &self.openai_api_key),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect()
    }
}

pub fn config_directory() -> AppResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIRECTORY))
        .ok_or_else(|| AppError::Configuration("could not locate config directory".to_string()))
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}
