//! Backend client for the remote chat/TTS service
//!
//! This module provides:
//! - The [`ChatBackend`] trait the orchestrator talks through
//! - [`client::HttpBackend`], the HTTP implementation

pub mod client;

pub use client::{ChatReply, HttpBackend};

use crate::Result;

/// Contract for the remote chat/text-to-speech backend.
///
/// Two operations are consumed by the orchestrator: a blocking chat
/// request/response call, and construction of a synthesized-speech URL.
/// The synthesis itself happens server-side when the URL is fetched by the
/// audio player, not here.
pub trait ChatBackend {
    /// Send user text to the chat endpoint and return the reply text.
    ///
    /// Any non-2xx status or transport failure is an error.
    fn post_chat(&self, text: &str) -> Result<String>;

    /// Build the URL that serves synthesized speech for the given text.
    fn speech_url(&self, text: &str) -> String;
}
