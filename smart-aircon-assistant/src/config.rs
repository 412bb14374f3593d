use std::env;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const API_KEY_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];
const MODEL_VAR: &str = "GEMINI_MODEL";
const BASE_URL_VAR: &str = "GEMINI_BASE_URL";

#[derive(Clone, Debug, PartialEq)]
pub struct AssistantConfig {
    /// `None` leaves the assistant unconfigured, which is not an error
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        AssistantConfig {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl AssistantConfig {
    pub fn from_env() -> AssistantConfig {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from `lookup`, treating blank values as unset.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> AssistantConfig {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = AssistantConfig::default();

        AssistantConfig {
            api_key: API_KEY_VARS.iter().find_map(|&key| non_blank(key)),
            model: non_blank(MODEL_VAR).unwrap_or(defaults.model),
            base_url: non_blank(BASE_URL_VAR).unwrap_or(defaults.base_url),
            timeout: defaults.timeout,
        }
    }

    pub fn with_api_key<S: Into<String>>(mut self, api_key: S) -> AssistantConfig {
        self.api_key = Some(api_key.into());
        self
    }
}
