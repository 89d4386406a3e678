use crate::DataIssue;
use thiserror::Error;

/// Per-company failure taxonomy.
///
/// `MissingField` and `InsufficientHistory` are resolved inside the metric
/// normalizer and only surface as [`crate::DataIssue`] markers. The other two
/// exclude the company from scoring and become flagged "no data" rows.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Insufficient history for {metric}: need {needed} periods, have {available}")]
    InsufficientHistory {
        metric: String,
        needed: usize,
        available: usize,
    },

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Retrieval failure: {0}")]
    RetrievalFailure(String),
}

impl ScoringError {
    /// One-line rationale used on flagged rows.
    pub fn rationale(&self) -> String {
        match self {
            ScoringError::InvalidSnapshot(msg) => format!("Incomplete financial statements: {}", msg),
            ScoringError::RetrievalFailure(msg) => format!("Data provider unavailable: {}", msg),
            other => other.to_string(),
        }
    }
}

impl From<DataIssue> for ScoringError {
    fn from(issue: DataIssue) -> Self {
        match issue {
            DataIssue::MissingField { field } => ScoringError::MissingField(field),
            DataIssue::InsufficientHistory {
                metric,
                needed,
                available,
            } => ScoringError::InsufficientHistory {
                metric,
                needed,
                available,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flagged_row_rationale() {
        let err = ScoringError::RetrievalFailure("timeout".to_string());
        assert_eq!(err.rationale(), "Data provider unavailable: timeout");
        let err = ScoringError::InvalidSnapshot("balance sheet is empty".to_string());
        assert_eq!(err.rationale(), "Incomplete financial statements: balance sheet is empty");
    }

    #[test]
    fn test_data_issue_conversion() {
        let err: ScoringError = DataIssue::InsufficientHistory {
            metric: "revenue_cagr".to_string(),
            needed: 4,
            available: 2,
        }
        .into();
        assert_eq!(err.to_string(), "Insufficient history for revenue_cagr: need 4 periods, have 2");

        let err = ScoringError::from(DataIssue::MissingField {
            field: "ebitda".to_string(),
        });
        assert_eq!(err.rationale(), "Missing field: ebitda");
    }
}
