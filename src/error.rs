use crate::validation::ValidationReport;

#[derive(thiserror::Error, Debug)]
pub enum SurveyError {
    /// User-correctable; nothing was written.
    #[error("validation failed: {0}")]
    Validation(ValidationReport),
    #[error("storage error: {0}")]
    Storage(#[from] sea_orm::DbErr),
    /// A stored row could not be decoded. Batch reads skip these with a warning.
    #[error("malformed stored record {table}#{id}: {reason}")]
    MalformedStoredData {
        table: &'static str,
        id: i32,
        reason: String,
    },
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SurveyError {
    pub fn malformed(table: &'static str, id: i32, reason: impl Into<String>) -> Self {
        Self::MalformedStoredData {
            table,
            id,
            reason: reason.into(),
        }
    }
}

impl From<ValidationReport> for SurveyError {
    fn from(report: ValidationReport) -> Self {
        Self::Validation(report)
    }
}
