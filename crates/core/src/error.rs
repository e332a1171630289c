use autotoc_traits::PageError;
use thiserror::Error;

/// Reasons a TOC pipeline step could not run.
///
/// None of these reach the page: the bootstrapper logs them and leaves the
/// document as it was.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TocError {
    #[error("No {role} container matches '{selector}'")]
    MissingContainer {
        role: &'static str,
        selector: String,
    },

    #[error("No headings found and no back-link configured")]
    NothingToShow,

    #[error("Selector query failed: {0}")]
    Selector(#[from] PageError),

    #[error("Invalid table of contents settings: {0}")]
    InvalidSettings(String),
}

impl From<serde_json::Error> for TocError {
    fn from(e: serde_json::Error) -> Self {
        TocError::InvalidSettings(e.to_string())
    }
}
