//! Transient session state
//!
//! Three pieces of state drive the single-turn flow: whether the recognizer
//! is listening, whether a backend call is in flight, and the transcript of
//! the in-progress utterance. At most one of listening/processing is true in
//! normal operation: listening ends before a backend call begins, and the
//! mic stays disabled while processing (the only backpressure mechanism).

use parking_lot::RwLock;
use std::sync::Arc;

/// Session state mutated by recognizer events and the backend call lifecycle
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    /// Whether the recognizer is listening
    pub is_listening: bool,

    /// Whether a backend call is in flight
    pub is_processing: bool,

    /// Partial or final transcript of the current utterance
    pub transcribed_text: String,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recognition started: listening, transcript cleared
    pub fn begin_listening(&mut self) {
        self.is_listening = true;
        self.transcribed_text.clear();
    }

    /// Recognition ended or was stopped
    pub fn end_listening(&mut self) {
        self.is_listening = false;
    }

    /// Update the in-progress transcript
    pub fn set_transcript(&mut self, text: impl Into<String>) {
        self.transcribed_text = text.into();
    }

    /// Backend call starting; listening always ends first
    pub fn begin_processing(&mut self) {
        self.is_listening = false;
        self.is_processing = true;
        self.transcribed_text.clear();
    }

    /// Backend call finished, success or failure
    pub fn end_processing(&mut self) {
        self.is_processing = false;
    }

    /// Check if the session is idle (ready to listen)
    pub fn is_idle(&self) -> bool {
        !self.is_listening && !self.is_processing
    }
}

/// Immutable copy of the session state for lock-free reads
#[derive(Clone, Debug)]
pub struct SessionStateSnapshot {
    pub is_listening: bool,
    pub is_processing: bool,
    pub transcribed_text: String,
}

/// Thread-safe shared session state
#[derive(Clone, Debug, Default)]
pub struct SharedSessionState {
    inner: Arc<RwLock<SessionState>>,
}

impl SharedSessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self) -> parking_lot::RwLockReadGuard<'_, SessionState> {
        self.inner.read()
    }

    pub fn write(&self) -> parking_lot::RwLockWriteGuard<'_, SessionState> {
        self.inner.write()
    }

    pub fn snapshot(&self) -> SessionStateSnapshot {
        let state = self.inner.read();
        SessionStateSnapshot {
            is_listening: state.is_listening,
            is_processing: state.is_processing,
            transcribed_text: state.transcribed_text.clone(),
        }
    }

    pub fn is_listening(&self) -> bool {
        self.inner.read().is_listening
    }

    pub fn is_processing(&self) -> bool {
        self.inner.read().is_processing
    }

    pub fn is_idle(&self) -> bool {
        self.inner.read().is_idle()
    }

    pub fn transcribed_text(&self) -> String {
        self.inner.read().transcribed_text.clone()
    }
}
