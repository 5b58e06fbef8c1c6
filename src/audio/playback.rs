//! Playback interface and rodio-backed implementation

use crate::{ParleyError, Result};

/// Loaded audio ready for playback.
///
/// The session releases the handle after playback completes or fails, on
/// every exit path.
pub trait PlaybackHandle {
    /// Play the loaded audio to completion (blocking)
    fn play(&mut self) -> Result<()>;

    /// Release the resources held by this handle
    fn release(self: Box<Self>);
}

/// Audio player that loads content by URL
pub trait Playback {
    /// Fetch and decode the audio at `url`
    fn load(&mut self, url: &str) -> Result<Box<dyn PlaybackHandle>>;
}

/// Playback stand-in when no output device is available.
///
/// Every load fails with an audio error, which the orchestrator swallows;
/// the conversation continues as text only.
pub struct NullPlayback;

impl Playback for NullPlayback {
    fn load(&mut self, _url: &str) -> Result<Box<dyn PlaybackHandle>> {
        Err(ParleyError::AudioLoadError(
            "Audio output is disabled".to_string(),
        ))
    }
}

#[cfg(feature = "playback")]
mod rodio_player {
    use super::{Playback, PlaybackHandle};
    use crate::{ParleyError, Result};
    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
    use std::io::Cursor;
    use tracing::{debug, info};

    /// Playback implementation using rodio on the default output device
    pub struct RodioPlayer {
        // Keeps the output device open for the lifetime of the player
        _stream: OutputStream,
        stream_handle: OutputStreamHandle,
        client: reqwest::blocking::Client,
    }

    impl RodioPlayer {
        /// Open the default audio output device
        pub fn new() -> Result<Self> {
            let (stream, stream_handle) = OutputStream::try_default().map_err(|e| {
                ParleyError::AudioPlaybackError(format!("No output device available: {}", e))
            })?;

            let client = reqwest::blocking::Client::builder().build().map_err(|e| {
                ParleyError::ConfigError(format!("Failed to build HTTP client: {}", e))
            })?;

            Ok(Self {
                _stream: stream,
                stream_handle,
                client,
            })
        }
    }

    impl Playback for RodioPlayer {
        fn load(&mut self, url: &str) -> Result<Box<dyn PlaybackHandle>> {
            debug!("Loading audio from {}", url);

            let response = self
                .client
                .get(url)
                .send()
                .map_err(|e| ParleyError::AudioLoadError(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(ParleyError::AudioLoadError(format!(
                    "Audio fetch returned status {}",
                    status.as_u16()
                )));
            }

            let bytes = response
                .bytes()
                .map_err(|e| ParleyError::AudioLoadError(e.to_string()))?;

            let source = Decoder::new(Cursor::new(bytes.to_vec())).map_err(|e| {
                ParleyError::AudioLoadError(format!("Failed to decode audio: {}", e))
            })?;

            let sink = Sink::try_new(&self.stream_handle)
                .map_err(|e| ParleyError::AudioPlaybackError(e.to_string()))?;

            // Queue the source paused; playback starts in play()
            sink.pause();
            sink.append(source);

            Ok(Box::new(RodioHandle { sink }))
        }
    }

    /// Handle over a rodio sink holding one queued source
    struct RodioHandle {
        sink: Sink,
    }

    impl PlaybackHandle for RodioHandle {
        fn play(&mut self) -> Result<()> {
            self.sink.play();
            self.sink.sleep_until_end();
            info!("Finished playing audio");
            Ok(())
        }

        fn release(self: Box<Self>) {
            self.sink.stop();
        }
    }
}

#[cfg(feature = "playback")]
pub use rodio_player::RodioPlayer;
