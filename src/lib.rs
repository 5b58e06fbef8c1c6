pub mod audio;
pub mod backend;
pub mod config;
pub mod conversation;
pub mod speech;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ParleyError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Recognizer error: {0}")]
    RecognizerError(String),

    #[error("Backend error: {0}")]
    BackendError(String),

    #[error("Backend returned status {0}")]
    BackendStatus(u16),

    #[error("Audio load error: {0}")]
    AudioLoadError(String),

    #[error("Audio playback error: {0}")]
    AudioPlaybackError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Channel error: {0}")]
    ChannelError(String),
}

impl ParleyError {
    /// Check if this error is recoverable within the current session
    pub fn is_recoverable(&self) -> bool {
        match self {
            // The user has to grant access before listening can work
            ParleyError::PermissionDenied(_) => false,
            ParleyError::RecognizerError(_) => true,
            ParleyError::BackendError(_) => true,
            ParleyError::BackendStatus(_) => true,
            ParleyError::AudioLoadError(_) => true,
            ParleyError::AudioPlaybackError(_) => true,
            ParleyError::ConfigError(_) => false,
            ParleyError::ChannelError(_) => false,
        }
    }

    /// Whether this failure is surfaced to the user as a blocking alert.
    ///
    /// Audio failures are logged only; the conversation continues without
    /// playback. Everything else interrupts the user once.
    pub fn should_alert(&self) -> bool {
        !matches!(
            self,
            ParleyError::AudioLoadError(_) | ParleyError::AudioPlaybackError(_)
        )
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            ParleyError::PermissionDenied(_) => {
                "Please grant microphone access to use voice chat functionality.".to_string()
            }
            ParleyError::RecognizerError(_) => {
                "Speech recognition failed. Please try again.".to_string()
            }
            ParleyError::BackendError(_) | ParleyError::BackendStatus(_) => {
                "Failed to reach the chat backend. Please try again.".to_string()
            }
            ParleyError::AudioLoadError(_) => "Failed to load audio response.".to_string(),
            ParleyError::AudioPlaybackError(_) => "Failed to play audio response.".to_string(),
            ParleyError::ConfigError(_) => {
                "Configuration error. Please check settings.".to_string()
            }
            ParleyError::ChannelError(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ParleyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_errors_are_never_alerted() {
        assert!(!ParleyError::AudioLoadError("bad mp3".into()).should_alert());
        assert!(!ParleyError::AudioPlaybackError("sink gone".into()).should_alert());
        assert!(ParleyError::BackendStatus(500).should_alert());
        assert!(ParleyError::PermissionDenied("mic".into()).should_alert());
    }

    #[test]
    fn test_permission_denial_is_terminal() {
        assert!(!ParleyError::PermissionDenied("mic".into()).is_recoverable());
        assert!(ParleyError::BackendError("timeout".into()).is_recoverable());
    }
}
