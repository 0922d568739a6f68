use thiserror::Error;

/// Errors raised while turning a source file into a [`StudentDataset`].
///
/// Any of these aborts the whole load; no partial dataset is returned.
///
/// [`StudentDataset`]: super::model::StudentDataset
#[derive(Debug, Error)]
pub enum LoadError {
    /// A required field is missing or cannot be coerced to its type.
    #[error("malformed record at row {row}: field '{field}' {reason}")]
    MalformedRecord {
        row: usize,
        field: String,
        reason: String,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
}

impl LoadError {
    pub(crate) fn malformed(row: usize, field: &str, reason: impl Into<String>) -> Self {
        LoadError::MalformedRecord {
            row,
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
