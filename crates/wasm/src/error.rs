//! Error handling for WASM bindings.
//!
//! Converts autotoc's error types into JavaScript-friendly errors.

use autotoc_core::TocError;
use wasm_bindgen::prelude::*;

/// Error codes for TypeScript consumption.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Settings could not be deserialized
    Settings,
    /// No window or document (e.g. running in a worker)
    Unavailable,
    /// Unknown error
    Unknown,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Settings => "SETTINGS_ERROR",
            ErrorCode::Unavailable => "UNAVAILABLE_ERROR",
            ErrorCode::Unknown => "UNKNOWN_ERROR",
        }
    }
}

/// A JavaScript-friendly error type.
///
/// Not a `wasm_bindgen` struct: it converts into a JavaScript `Error` object
/// carrying a `code` property.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct AutotocError {
    code: ErrorCode,
    message: String,
}

impl AutotocError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn settings(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Settings, message)
    }

    pub fn unavailable() -> Self {
        Self::new(ErrorCode::Unavailable, "No window or document available")
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<TocError> for AutotocError {
    fn from(err: TocError) -> Self {
        let code = match err {
            TocError::InvalidSettings(_) => ErrorCode::Settings,
            _ => ErrorCode::Unknown,
        };
        Self::new(code, err.to_string())
    }
}

impl From<serde_wasm_bindgen::Error> for AutotocError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        Self::settings(err.to_string())
    }
}

impl From<AutotocError> for JsValue {
    fn from(err: AutotocError) -> Self {
        let js_error = js_sys::Error::new(&err.message);
        js_sys::Reflect::set(
            &js_error,
            &"code".into(),
            &JsValue::from_str(err.code.as_str()),
        )
        .ok();
        js_error.into()
    }
}
