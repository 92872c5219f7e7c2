use thiserror::Error;

/// All the ways an inventory operation can fail
#[derive(Error, Debug)]
pub enum Error {
    /// User input rejected before touching the collection
    #[error("Please fill all fields correctly: {field} {reason}")]
    Validation { field: &'static str, reason: String },

    /// The inventory file exists but is not a JSON array of records
    #[error("Failed to parse inventory file: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export failed: {0}")]
    Export(String),

    /// The active storage backend can't do this (e.g. writing in preview mode)
    #[error("{0}")]
    Unsupported(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Error::Validation {
            field,
            reason: reason.into(),
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for Error {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Error::Export(err.to_string())
    }
}
