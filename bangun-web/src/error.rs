use bangun_core::ShapeError;
use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors raised while setting up or driving the browser viewer.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("no global window")]
    NoWindow,

    #[error("window has no document")]
    NoDocument,

    #[error("element #{0} not found")]
    MissingElement(String),

    #[error("no webgl2 context")]
    NoWebGl2,

    #[error("shader compile failed: {0}")]
    ShaderCompile(String),

    #[error("program link failed: {0}")]
    ProgramLink(String),

    #[error("failed to create {0}")]
    Create(&'static str),

    #[error("DOM call failed: {0}")]
    Dom(String),

    #[error(transparent)]
    Shape(#[from] ShapeError),
}

pub type Result<T, E = ViewerError> = std::result::Result<T, E>;

impl From<JsValue> for ViewerError {
    fn from(value: JsValue) -> Self {
        ViewerError::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<ViewerError> for JsValue {
    fn from(err: ViewerError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
