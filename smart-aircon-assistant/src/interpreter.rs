use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use smart_aircon_device::state::patch::StatePatch;
use smart_aircon_device::state::DeviceState;

use crate::config::AssistantConfig;
use crate::gemini::GeminiClient;
use crate::prompt::{build_prompt, RESPONSE_SCHEMA};
use crate::settings;
use crate::Result;

pub const NOT_CONFIGURED_REPLY: &str =
    "AI assistant is not configured. Please add your Gemini API key.";
pub const CONNECTION_FAILED_REPLY: &str =
    "Sorry, I couldn't connect to the smart assistant service.";

/// A service that answers a prompt with JSON text shaped like `schema`.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate_json(&self, prompt: &str, schema: &Value) -> Result<String>;
}

/// What a command turned into: an optional validated patch and a reply that
/// can always be shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpretation {
    pub settings: Option<StatePatch>,
    pub reply: String,
}

impl Interpretation {
    fn reply_only(reply: &str) -> Interpretation {
        Interpretation {
            settings: None,
            reply: reply.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawInterpretation {
    #[serde(default)]
    settings: Option<Value>,
    reply: String,
}

impl From<RawInterpretation> for Interpretation {
    fn from(RawInterpretation { settings, reply }: RawInterpretation) -> Self {
        let settings = match settings {
            Some(Value::Object(fields)) => Some(settings::validate(&fields)),
            Some(Value::Null) | None => None,
            Some(other) => {
                warn!("ignoring settings that are not an object: {}", other);
                None
            }
        }
        .filter(|patch| !patch.is_empty());
        Interpretation { settings, reply }
    }
}

/// Translates free text into a [`StatePatch`] through a [`LanguageModel`].
///
/// Calls are independent of each other; the caller decides how many may be in
/// flight and applies results in whatever order they arrive.
#[derive(Debug)]
pub struct CommandInterpreter<M> {
    model: Option<M>,
}

impl CommandInterpreter<GeminiClient> {
    /// Gemini-backed interpreter, unconfigured if `config` has no API key.
    pub fn from_config(config: &AssistantConfig) -> Result<Self> {
        let model = match &config.api_key {
            Some(key) => Some(GeminiClient::new(key.clone(), config)?),
            None => {
                info!("no API key found, assistant disabled");
                None
            }
        };
        Ok(CommandInterpreter { model })
    }
}

impl<M: LanguageModel> CommandInterpreter<M> {
    pub fn new(model: Option<M>) -> Self {
        CommandInterpreter { model }
    }

    pub fn is_configured(&self) -> bool {
        self.model.is_some()
    }

    /// Returns `None` for blank commands without calling out. Every other
    /// outcome, including failures, is a displayable [`Interpretation`].
    pub async fn interpret(&self, command: &str, current: &DeviceState) -> Option<Interpretation> {
        let command = command.trim();
        if command.is_empty() {
            trace!("ignoring blank command");
            return None;
        }

        let model = match &self.model {
            Some(model) => model,
            None => return Some(Interpretation::reply_only(NOT_CONFIGURED_REPLY)),
        };

        Some(match Self::request(model, command, current).await {
            Ok(interpretation) => {
                debug!("interpreted {:?} as {:?}", command, interpretation);
                interpretation
            }
            Err(e) => {
                error!("language model error: {}", e);
                Interpretation::reply_only(CONNECTION_FAILED_REPLY)
            }
        })
    }

    async fn request(model: &M, command: &str, current: &DeviceState) -> Result<Interpretation> {
        let prompt = build_prompt(command, current)?;
        let text = model.generate_json(&prompt, &RESPONSE_SCHEMA).await?;
        let raw = serde_json::from_str::<RawInterpretation>(&text)?;
        Ok(raw.into())
    }
}
