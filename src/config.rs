//! Configuration for the backend connection and conversation defaults.
//!
//! The backend base URL is a compile-time default that can be overridden when
//! constructing the config (the demo binary takes it from the command line).

/// Default backend base URL.
///
/// Point this at the machine running the chat/TTS backend. Typical values:
/// `http://10.0.2.2:8000` (emulator host), `http://192.168.x.x:8000` (LAN).
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

/// Chat completion endpoint path (form-encoded POST).
pub const CHAT_PATH: &str = "/chat";

/// Text-to-speech endpoint path (GET, synthesis happens server-side when the
/// URL is fetched by the audio player).
pub const TEXT_TO_SPEECH_PATH: &str = "/text-to-speech-get";

/// Greeting spoken and shown when a conversation starts.
pub const GREETING_TEXT: &str = "Hello, how can I help you today?";

/// Configuration for the backend client
#[derive(Clone, Debug)]
pub struct BackendConfig {
    /// Base URL of the chat/TTS backend, without a trailing slash
    pub base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
        }
    }
}

impl BackendConfig {
    /// Create a config for the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// Full URL of the chat endpoint
    pub fn chat_url(&self) -> String {
        format!("{}{}", self.base_url, CHAT_PATH)
    }

    /// Full URL of the text-to-speech endpoint, without the query string
    pub fn text_to_speech_url(&self) -> String {
        format!("{}{}", self.base_url, TEXT_TO_SPEECH_PATH)
    }
}

/// Configuration for the whole session
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Backend connection settings
    pub backend: BackendConfig,

    /// Locale passed to the speech recognizer
    pub locale: String,

    /// Greeting message that opens every conversation
    pub greeting: String,

    /// Channel buffer size for commands and events
    pub channel_buffer_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            locale: "en-US".to_string(),
            greeting: GREETING_TEXT.to_string(),
            channel_buffer_size: 100,
        }
    }
}

impl SessionConfig {
    /// Set the backend configuration
    pub fn with_backend(mut self, backend: BackendConfig) -> Self {
        self.backend = backend;
        self
    }

    /// Set the recognizer locale
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Set the greeting text
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = greeting.into();
        self
    }
}
