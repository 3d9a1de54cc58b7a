pub mod backend;
pub mod controller;
pub mod history;
pub mod speech;
pub mod ui;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum NatterError {
    #[error("Text backend error: {0}")]
    TextBackend(String),

    #[error("Synthesis error: {0}")]
    Synthesis(String),

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("Recognition error: {0}")]
    Recognition(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Channel error: {0}")]
    Channel(String),
}

impl NatterError {
    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Transient network or service errors, the user may retry
            NatterError::TextBackend(_) => true,
            NatterError::Synthesis(_) => true,
            NatterError::Playback(_) => true,
            NatterError::Recognition(_) => true,
            // These require fixing the setup
            NatterError::Config(_) => false,
            NatterError::Channel(_) => false,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            NatterError::TextBackend(_) => "Sorry, there was a connection error.".to_string(),
            NatterError::Synthesis(_) | NatterError::Playback(_) => {
                "Sorry, couldn't play audio.".to_string()
            }
            NatterError::Recognition(_) => {
                "Sorry, I had trouble hearing. Try again.".to_string()
            }
            NatterError::Config(_) => "Configuration error. Please check settings.".to_string(),
            NatterError::Channel(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, NatterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverability_classification() {
        assert!(NatterError::TextBackend("timeout".into()).is_recoverable());
        assert!(NatterError::Synthesis("503".into()).is_recoverable());
        assert!(NatterError::Recognition("no-speech".into()).is_recoverable());
        assert!(!NatterError::Config("bad url".into()).is_recoverable());
        assert!(!NatterError::Channel("disconnected".into()).is_recoverable());
    }

    #[test]
    fn test_user_messages_hide_internals() {
        let message = NatterError::TextBackend("ECONNREFUSED 127.0.0.1:5000".into()).user_message();
        assert_eq!(message, "Sorry, there was a connection error.");
        assert!(!message.contains("ECONNREFUSED"));
    }
}
