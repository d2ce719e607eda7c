//! Crate error type
//!
//! Nothing here is surfaced to the player; callers log and skip.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("missing element: {0}")]
    MissingElement(&'static str),
    #[error("canvas has no 2d context")]
    NoCanvasContext,
    #[error("js error: {0}")]
    Js(String),
    #[error("invalid tuning json: {0}")]
    Config(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    InvalidTuning(String),
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for Error {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        Error::Js(format!("{:?}", value))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<Error> for wasm_bindgen::JsValue {
    fn from(err: Error) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
