#[macro_use]
extern crate log;
#[macro_use]
extern crate lazy_static;

use thiserror::Error;

pub mod config;
pub mod gemini;
pub mod interpreter;
pub mod prompt;
pub mod settings;

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Could not reach the language model service")]
    Http(#[from] reqwest::Error),
    #[error("Language model response had no text")]
    EmptyResponse,
    #[error("Could not parse language model response")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AssistantError>;
