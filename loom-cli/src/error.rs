use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Retrieval error: {0}")]
    Retrieval(#[from] loom_fetch::RetrievalError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Message shown to the user. Retrieval failures stay generic; details go to the log.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Retrieval(loom_fetch::RetrievalError::PayloadTooLarge { limit, .. }) => {
                format!(
                    "Video file too large for inline analysis (max {} MB)",
                    limit / (1024 * 1024)
                )
            }
            AppError::Retrieval(_) => "Failed to retrieve video".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loom_fetch::RetrievalError;

    #[test]
    fn size_errors_name_the_limit() {
        let err = AppError::from(RetrievalError::PayloadTooLarge {
            size: 21 * 1024 * 1024,
            limit: 20 * 1024 * 1024,
        });
        assert_eq!(
            err.user_message(),
            "Video file too large for inline analysis (max 20 MB)"
        );
    }

    #[test]
    fn other_retrieval_errors_are_generic() {
        let err = AppError::from(RetrievalError::malformed("line 3: no URI"));
        assert_eq!(err.user_message(), "Failed to retrieve video");
    }
}
