//! Session worker and its command/event surface
//!
//! The session runs on a single worker thread. All turn processing happens
//! in sequence on that thread: recognizer events, backend calls, and
//! playback never overlap, so no utterance is processed in parallel with
//! another. The mic path is ignored while a backend call is in flight.

use crate::audio::{NullPlayback, Playback};
use crate::backend::ChatBackend;
use crate::config::SessionConfig;
use crate::conversation::orchestrator::Conversation;
use crate::conversation::state::SharedSessionState;
use crate::conversation::store::MessageStore;
use crate::conversation::types::Message;
use crate::speech::{recognizer_channel, Recognizer, RecognizerEventSender};
use crate::{ParleyError, Result};
use crossbeam_channel::{bounded, select, Receiver, Sender};
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

/// Commands that can be sent to the session
#[derive(Clone, Debug)]
pub enum SessionCommand {
    /// Start the speech recognizer
    StartListening,

    /// Stop the recognizer, discarding any partial transcript
    StopListening,

    /// Submit text directly, bypassing the recognizer
    SubmitText(String),

    /// Empty the log and restart with a fresh greeting
    ClearConversation,

    /// Shut the session down
    Shutdown,
}

/// Events emitted by the session
#[derive(Clone, Debug)]
pub enum SessionEvent {
    /// Listening/processing/transcript state changed; query the shared state
    StateChanged,

    /// A message was appended to the conversation log
    MessageAppended(Message),

    /// A failure that must interrupt the user once
    Alert { title: String, message: String },

    /// The session has shut down
    Shutdown,
}

/// Builds the playback device inside the worker thread (rodio output
/// streams are not `Send`)
pub type PlaybackFactory = Box<dyn FnOnce() -> Result<Box<dyn Playback>> + Send>;

/// Handle for controlling a running session
pub struct SessionHandle {
    command_tx: Sender<SessionCommand>,
    event_rx: Receiver<SessionEvent>,
    recognizer_tx: RecognizerEventSender,
    state: SharedSessionState,
    messages: MessageStore,
}

impl SessionHandle {
    /// Send a command to the session
    pub fn send_command(&self, cmd: SessionCommand) -> Result<()> {
        self.command_tx
            .send(cmd)
            .map_err(|e| ParleyError::ChannelError(format!("Failed to send command: {}", e)))
    }

    /// Start listening
    pub fn start_listening(&self) -> Result<()> {
        self.send_command(SessionCommand::StartListening)
    }

    /// Stop listening
    pub fn stop_listening(&self) -> Result<()> {
        self.send_command(SessionCommand::StopListening)
    }

    /// Submit text as if it were a final transcript
    pub fn submit_text(&self, text: impl Into<String>) -> Result<()> {
        self.send_command(SessionCommand::SubmitText(text.into()))
    }

    /// Clear the conversation
    pub fn clear_conversation(&self) -> Result<()> {
        self.send_command(SessionCommand::ClearConversation)
    }

    /// Request shutdown
    pub fn shutdown(&self) -> Result<()> {
        self.send_command(SessionCommand::Shutdown)
    }

    /// Try to receive an event (non-blocking)
    pub fn try_recv_event(&self) -> Option<SessionEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Receive an event (blocking)
    pub fn recv_event(&self) -> Result<SessionEvent> {
        self.event_rx
            .recv()
            .map_err(|e| ParleyError::ChannelError(format!("Failed to receive event: {}", e)))
    }

    /// Get a receiver for session events
    pub fn event_receiver(&self) -> Receiver<SessionEvent> {
        self.event_rx.clone()
    }

    /// Get the sender a recognizer implementation pushes its events into
    pub fn recognizer_sender(&self) -> RecognizerEventSender {
        self.recognizer_tx.clone()
    }

    /// Get the shared session state
    pub fn state(&self) -> &SharedSessionState {
        &self.state
    }

    /// Get the conversation log
    pub fn messages(&self) -> &MessageStore {
        &self.messages
    }
}

/// The session worker
pub struct Session;

impl Session {
    /// Spawn a session worker thread.
    ///
    /// The worker greets immediately, then loops over commands and
    /// recognizer events until shutdown. The playback factory runs inside
    /// the worker thread; if it fails the session degrades to text only.
    pub fn spawn(
        config: SessionConfig,
        backend: Box<dyn ChatBackend + Send>,
        mut recognizer: Box<dyn Recognizer + Send>,
        playback_factory: PlaybackFactory,
    ) -> (SessionHandle, JoinHandle<()>) {
        let (command_tx, command_rx) = bounded(config.channel_buffer_size);
        let (event_tx, event_rx) = bounded(config.channel_buffer_size);
        let (recognizer_tx, recognizer_rx) = recognizer_channel(config.channel_buffer_size);

        let messages = MessageStore::new();
        let state = SharedSessionState::new();

        let handle = SessionHandle {
            command_tx,
            event_rx,
            recognizer_tx,
            state: state.clone(),
            messages: messages.clone(),
        };

        let worker = thread::spawn(move || {
            let playback: Box<dyn Playback> = match playback_factory() {
                Ok(playback) => playback,
                Err(e) => {
                    warn!("Audio output unavailable, continuing as text only: {}", e);
                    Box::new(NullPlayback)
                }
            };

            let mut conversation = Conversation::new(
                config.clone(),
                backend,
                playback,
                messages,
                state.clone(),
                event_tx.clone(),
            );
            let mut permission_alerted = false;

            info!("Session started");
            conversation.start_conversation();

            loop {
                select! {
                    recv(command_rx) -> cmd => match cmd {
                        Ok(SessionCommand::StartListening) => {
                            if state.is_processing() {
                                debug!("Ignoring StartListening while processing");
                            } else {
                                state.write().set_transcript("");
                                match recognizer.start(&config.locale) {
                                    Ok(()) => {}
                                    Err(ParleyError::PermissionDenied(reason)) => {
                                        warn!("Microphone permission denied: {}", reason);
                                        if !permission_alerted {
                                            permission_alerted = true;
                                            let _ = event_tx.send(SessionEvent::Alert {
                                                title: "Microphone Permission Required".to_string(),
                                                message: "Please grant microphone access to use voice chat functionality.".to_string(),
                                            });
                                        }
                                    }
                                    Err(e) => {
                                        warn!("Error starting voice recognition: {}", e);
                                        let _ = event_tx.send(SessionEvent::Alert {
                                            title: "Error".to_string(),
                                            message: "Failed to start voice recognition. Please try again.".to_string(),
                                        });
                                    }
                                }
                            }
                        }
                        Ok(SessionCommand::StopListening) => {
                            if let Err(e) = recognizer.stop() {
                                warn!("Error stopping voice recognition: {}", e);
                            }
                            state.write().end_listening();
                            let _ = event_tx.send(SessionEvent::StateChanged);
                        }
                        Ok(SessionCommand::SubmitText(text)) => {
                            if state.is_processing() {
                                debug!("Ignoring SubmitText while processing");
                            } else {
                                conversation.on_final_transcript(&text);
                            }
                        }
                        Ok(SessionCommand::ClearConversation) => {
                            conversation.clear_conversation();
                        }
                        Ok(SessionCommand::Shutdown) | Err(_) => {
                            info!("Session shutdown requested");
                            let _ = recognizer.stop();
                            let _ = event_tx.send(SessionEvent::Shutdown);
                            break;
                        }
                    },
                    recv(recognizer_rx) -> event => {
                        if let Ok(event) = event {
                            conversation.on_recognizer_event(event);
                        }
                    }
                }
            }

            info!("Session stopped");
        });

        (handle, worker)
    }
}
