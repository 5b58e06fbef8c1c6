//! The conversation orchestrator
//!
//! One conversation turn is a linear sequence: final transcript in, user
//! message appended, blocking chat request, reply (or synthetic error
//! message) appended, reply audio fetched and played. Audio failures are
//! swallowed so the conversation always continues; backend failures are
//! recorded in the log and surfaced as a blocking alert.

use crate::audio::Playback;
use crate::backend::ChatBackend;
use crate::config::SessionConfig;
use crate::conversation::session::SessionEvent;
use crate::conversation::state::SharedSessionState;
use crate::conversation::store::MessageStore;
use crate::conversation::types::Message;
use crate::speech::RecognizerEvent;
use crate::Result;
use crossbeam_channel::Sender;
use tracing::{debug, error, info, warn};

/// Orchestrates recognizer events, backend calls, and playback for one
/// conversation session
pub struct Conversation {
    config: SessionConfig,
    backend: Box<dyn ChatBackend>,
    playback: Box<dyn Playback>,
    messages: MessageStore,
    state: SharedSessionState,
    event_tx: Sender<SessionEvent>,
}

impl Conversation {
    pub fn new(
        config: SessionConfig,
        backend: Box<dyn ChatBackend>,
        playback: Box<dyn Playback>,
        messages: MessageStore,
        state: SharedSessionState,
        event_tx: Sender<SessionEvent>,
    ) -> Self {
        Self {
            config,
            backend,
            playback,
            messages,
            state,
            event_tx,
        }
    }

    /// Reset the log to a single greeting message and speak it.
    ///
    /// A greeting audio failure is logged only; the conversation starts
    /// regardless.
    pub fn start_conversation(&mut self) {
        let greeting = self.config.greeting.clone();
        self.messages.clear();
        self.append(Message::assistant(greeting.clone()));

        if let Err(e) = self.speak(&greeting) {
            warn!("Failed to play greeting audio: {}", e);
        }
    }

    /// Empty the log and restart with a fresh greeting
    pub fn clear_conversation(&mut self) {
        self.messages.clear();
        self.start_conversation();
    }

    /// Process a final transcript through the backend.
    ///
    /// Empty or whitespace-only transcripts are ignored without a network
    /// call. `is_processing` is cleared on every exit path.
    pub fn on_final_transcript(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            debug!("Ignoring empty transcript");
            return;
        }

        self.append(Message::user(text));

        self.state.write().begin_processing();
        self.emit(SessionEvent::StateChanged);

        match self.backend.post_chat(text) {
            Ok(reply) => {
                info!("AI response: {}", reply);
                self.append(Message::assistant(reply.clone()));

                if let Err(e) = self.speak(&reply) {
                    warn!("Text-to-speech error: {}", e);
                }
            }
            Err(e) => {
                error!("Error processing voice chat: {}", e);
                self.emit(SessionEvent::Alert {
                    title: "Error Details".to_string(),
                    message: format!(
                        "Failed to process voice chat: {}\n\nBackend URL: {}",
                        e,
                        self.config.backend.chat_url()
                    ),
                });
                self.append(Message::assistant(format!(
                    "Sorry, I encountered an error: {}",
                    e
                )));
            }
        }

        self.state.write().end_processing();
        self.emit(SessionEvent::StateChanged);
    }

    /// React to a recognizer event.
    ///
    /// The final-results event is the sole trigger into
    /// [`on_final_transcript`](Self::on_final_transcript).
    pub fn on_recognizer_event(&mut self, event: RecognizerEvent) {
        match event {
            RecognizerEvent::Started => {
                debug!("Voice recognition started");
                self.state.write().begin_listening();
                self.emit(SessionEvent::StateChanged);
            }
            RecognizerEvent::Recognized => {
                debug!("Speech recognized");
            }
            RecognizerEvent::Ended => {
                debug!("Voice recognition ended");
                self.state.write().end_listening();
                self.emit(SessionEvent::StateChanged);
            }
            RecognizerEvent::Error { message } => {
                self.state.write().end_listening();
                self.emit(SessionEvent::StateChanged);
                if let Some(message) = message {
                    error!("Voice recognition error: {}", message);
                    self.emit(SessionEvent::Alert {
                        title: "Voice Recognition Error".to_string(),
                        message,
                    });
                }
            }
            RecognizerEvent::Partial(text) => {
                self.state.write().set_transcript(text);
                self.emit(SessionEvent::StateChanged);
            }
            RecognizerEvent::Final(text) => {
                self.state.write().set_transcript(text.clone());
                self.on_final_transcript(&text);
            }
        }
    }

    /// Fetch the synthesized audio for `text` and play it to completion.
    ///
    /// The playback handle is released on every exit path.
    fn speak(&mut self, text: &str) -> Result<()> {
        let url = self.backend.speech_url(text);
        debug!("Playing audio from URL: {}", url);

        let mut handle = self.playback.load(&url)?;
        let result = handle.play();
        handle.release();
        result
    }

    fn append(&mut self, message: Message) {
        self.messages.add(message.clone());
        self.emit(SessionEvent::MessageAppended(message));
    }

    fn emit(&self, event: SessionEvent) {
        let _ = self.event_tx.send(event);
    }
}
