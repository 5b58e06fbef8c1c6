//! HTTP implementation of the backend client
//!
//! Speaks the backend's two-endpoint protocol: a form-encoded POST to `/chat`
//! returning JSON `{"response": "..."}`, and a GET text-to-speech endpoint
//! addressed by query-encoding the text into the URL.

use crate::backend::ChatBackend;
use crate::config::BackendConfig;
use crate::{ParleyError, Result};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;
use tracing::debug;

/// JSON body returned by the chat endpoint
#[derive(Clone, Debug, Deserialize)]
pub struct ChatReply {
    /// Reply text from the chat completion
    pub response: String,
}

/// Blocking HTTP client for the chat/TTS backend
pub struct HttpBackend {
    config: BackendConfig,
    client: reqwest::blocking::Client,
}

impl HttpBackend {
    /// Create a client for the configured backend.
    ///
    /// No request timeout is set; a chat call runs to completion or failure.
    pub fn new(config: BackendConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| ParleyError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// The configured base URL
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }
}

impl ChatBackend for HttpBackend {
    fn post_chat(&self, text: &str) -> Result<String> {
        let url = self.config.chat_url();
        debug!("POST {} ({} chars)", url, text.len());

        let response = self
            .client
            .post(&url)
            .form(&[("text", text)])
            .send()
            .map_err(|e| ParleyError::BackendError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ParleyError::BackendStatus(status.as_u16()));
        }

        let reply: ChatReply = response
            .json()
            .map_err(|e| ParleyError::BackendError(format!("Invalid chat response: {}", e)))?;

        Ok(reply.response)
    }

    fn speech_url(&self, text: &str) -> String {
        format!(
            "{}?text={}",
            self.config.text_to_speech_url(),
            encode_query_text(text)
        )
    }
}

/// Percent-encode text for use as a single query parameter value
pub fn encode_query_text(text: &str) -> String {
    utf8_percent_encode(text, NON_ALPHANUMERIC).to_string()
}
