//! Audio playback adapter
//!
//! Playback is load-by-URL: the backend's text-to-speech endpoint serves the
//! synthesized audio when the URL is fetched, so the player is the component
//! that actually triggers synthesis.

pub mod playback;

pub use playback::{NullPlayback, Playback, PlaybackHandle};

#[cfg(feature = "playback")]
pub use playback::RodioPlayer;
