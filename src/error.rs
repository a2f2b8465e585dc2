//! Error type for everything that talks to the host page.
//!
//! Gameplay itself (reset / update / collision) cannot fail; errors only come
//! from DOM plumbing and from user supplied configuration.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("document has no body")]
    NoBody,
    #[error("canvas 2d context unavailable")]
    NoContext,
    #[error("js call failed: {0}")]
    Js(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("config json: {0}")]
    ConfigJson(#[from] serde_json::Error),
}

impl From<JsValue> for GameError {
    fn from(value: JsValue) -> Self {
        GameError::Js(
            value
                .as_string()
                .unwrap_or_else(|| format!("{:?}", value)),
        )
    }
}

impl From<GameError> for JsValue {
    fn from(err: GameError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
