use thiserror::Error;

#[derive(Debug, Error)]
pub enum PneumoscanError {
    #[error("No file selected")]
    FileMissing,

    #[error("Not an image file (content type: {0})")]
    NotAnImage(String),

    #[error("Question is empty")]
    QuestionEmpty,

    #[error("No diagnosis available to ask about")]
    NoDiagnosis,

    #[error("A request is already in flight")]
    Busy,

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Inference backend returned {status}: {body}")]
    Backend { status: u16, body: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PneumoscanError {
    /// True for failures caused by what the user submitted, as opposed to the backend call.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::FileMissing | Self::NotAnImage(_) | Self::QuestionEmpty | Self::NoDiagnosis
        )
    }
}

pub type Result<T> = std::result::Result<T, PneumoscanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors_are_classified() {
        assert!(PneumoscanError::FileMissing.is_input_error());
        assert!(PneumoscanError::NotAnImage("text/plain".into()).is_input_error());
        assert!(PneumoscanError::QuestionEmpty.is_input_error());
        assert!(!PneumoscanError::Busy.is_input_error());
        assert!(!PneumoscanError::Backend { status: 500, body: String::new() }.is_input_error());
    }

    #[test]
    fn test_backend_error_display() {
        let err = PneumoscanError::Backend { status: 502, body: "bad gateway".into() };
        assert_eq!(err.to_string(), "Inference backend returned 502: bad gateway");
    }

    #[test]
    fn test_undecodable_payload_is_a_serialization_error() {
        let err: PneumoscanError = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();
        assert!(matches!(err, PneumoscanError::Serialization(_)));
        assert!(!err.is_input_error());
    }
}
