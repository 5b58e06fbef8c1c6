//! Recognizer interface and event stream
//!
//! A recognizer implementation pushes [`RecognizerEvent`]s into a bounded
//! channel that the session subscribes to exactly once at spawn. The final
//! transcript event is the sole trigger into the conversation's
//! `on_final_transcript`.

use crate::Result;
use crossbeam_channel::{bounded, Receiver, Sender};

/// Sender half of the recognizer event channel
pub type RecognizerEventSender = Sender<RecognizerEvent>;

/// Receiver half of the recognizer event channel
pub type RecognizerEventReceiver = Receiver<RecognizerEvent>;

/// Create the recognizer event channel with the given buffer size
pub fn recognizer_channel(buffer_size: usize) -> (RecognizerEventSender, RecognizerEventReceiver) {
    bounded(buffer_size)
}

/// Events emitted by a speech recognizer
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecognizerEvent {
    /// Recognition has started; the session begins listening
    Started,

    /// Speech was detected in the audio stream
    Recognized,

    /// Recognition has ended without a further result
    Ended,

    /// The recognizer failed; `message` is surfaced to the user if present
    Error { message: Option<String> },

    /// Partial transcript of the in-progress utterance
    Partial(String),

    /// Final transcript of a completed utterance
    Final(String),
}

/// Control interface for a speech recognizer.
///
/// Stopping mid-utterance discards any partial transcript; no `Final` event
/// fires after `stop`.
pub trait Recognizer {
    /// Start recognizing speech in the given locale (e.g. "en-US")
    fn start(&mut self, locale: &str) -> Result<()>;

    /// Stop recognizing
    fn stop(&mut self) -> Result<()>;
}

/// Recognizer stand-in for text-only operation.
///
/// `start` always fails, which puts the session into degraded
/// (non-listening) mode; text input still works.
pub struct NullRecognizer;

impl Recognizer for NullRecognizer {
    fn start(&mut self, _locale: &str) -> Result<()> {
        Err(crate::ParleyError::RecognizerError(
            "No speech recognizer is available".to_string(),
        ))
    }

    fn stop(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_recognizer_cannot_start() {
        let mut recognizer = NullRecognizer;
        assert!(recognizer.start("en-US").is_err());
        assert!(recognizer.stop().is_ok());
    }

    #[test]
    fn test_event_channel_delivery() {
        let (tx, rx) = recognizer_channel(10);
        tx.send(RecognizerEvent::Partial("hel".to_string())).unwrap();
        tx.send(RecognizerEvent::Final("hello".to_string())).unwrap();

        assert_eq!(rx.recv().unwrap(), RecognizerEvent::Partial("hel".to_string()));
        assert_eq!(rx.recv().unwrap(), RecognizerEvent::Final("hello".to_string()));
    }
}
