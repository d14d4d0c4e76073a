use thiserror::Error;

#[derive(Error, Debug)]
pub enum HighlightError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl HighlightError {
    /// Message that can be shown to the user who invoked a command.
    ///
    /// Storage and internal failures are not echoed back verbatim.
    pub fn user_message(&self) -> String {
        match self {
            HighlightError::NotFound(msg) | HighlightError::Validation(msg) => msg.clone(),
            HighlightError::Database(_) | HighlightError::Internal(_) => {
                "Something went wrong while processing that command.".to_string()
            }
        }
    }
}

pub type HighlightResult<T> = Result<T, HighlightError>;
