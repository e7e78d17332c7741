//! Error types for arrangement generation.

use thiserror::Error;

/// Result type alias for arrangement operations.
pub type Result<T> = std::result::Result<T, ArrangeError>;

/// Errors that abort an arrangement call.
///
/// "Nothing fits here" is not an error; it is reported as an unsuccessful
/// [`ArrangementResult`](crate::placement::ArrangementResult).
#[derive(Debug, Error)]
pub enum ArrangeError {
    /// The requested root category is not in the category table.
    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    /// Static data references a model or category whose geometry is absent.
    #[error("Missing geometry data for `{model}`: {detail}")]
    MissingGeometryData { model: String, detail: String },

    /// Tables or catalog JSON failed to parse.
    #[error("Table parse error: {0}")]
    Tables(#[from] serde_json::Error),
}

impl ArrangeError {
    pub(crate) fn missing(model: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::MissingGeometryData {
            model: model.into(),
            detail: detail.into(),
        }
    }
}
