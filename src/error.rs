use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum Error {
    #[error("javascript error: {0}")]
    Js(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("toolbar is already initialized")]
    AlreadyInitialized,

    #[error("toolbar is not initialized")]
    NotInitialized,

    #[error("toolbar has been destroyed")]
    Destroyed,

    #[error("unable to acquire a 2d canvas context")]
    MissingContext,
}

impl From<JsValue> for Error {
    fn from(value: JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}
