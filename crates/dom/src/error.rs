use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomError {
    #[error("Selector parse error in '{0}': {1}")]
    Selector(String, String),

    #[error("Markup parse error: {0}")]
    Markup(String),
}

impl From<roxmltree::Error> for DomError {
    fn from(e: roxmltree::Error) -> Self {
        DomError::Markup(e.to_string())
    }
}
