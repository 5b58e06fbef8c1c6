//! Speech recognition adapter contract
//!
//! The on-device recognizer itself is an external collaborator; this module
//! defines the interface the session drives ([`Recognizer`]) and the event
//! stream it consumes ([`RecognizerEvent`]).

pub mod recognizer;

pub use recognizer::{
    recognizer_channel, NullRecognizer, Recognizer, RecognizerEvent, RecognizerEventReceiver,
    RecognizerEventSender,
};
