//! End-to-end tests for the conversation flow
//!
//! The backend and playback adapters are replaced with recording fakes so
//! each turn's call sequence can be asserted without a network or an audio
//! device.

use parking_lot::Mutex;
use parley::audio::{Playback, PlaybackHandle};
use parley::backend::{client::encode_query_text, ChatBackend};
use parley::config::{SessionConfig, GREETING_TEXT};
use parley::conversation::{Session, SessionEvent, SessionHandle, SharedSessionState};
use parley::{ParleyError, Result};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// What the fake backend replies with
#[derive(Clone)]
enum Reply {
    Text(String),
    Status(u16),
}

/// Backend fake that records every chat call and the processing flag at the
/// moment the call happens
#[derive(Clone)]
struct FakeBackend {
    reply: Reply,
    calls: Arc<Mutex<Vec<String>>>,
    // Filled in after spawn so the fake can observe session state mid-call
    state_probe: Arc<Mutex<Option<SharedSessionState>>>,
}

impl FakeBackend {
    fn new(reply: Reply) -> Self {
        Self {
            reply,
            calls: Arc::new(Mutex::new(Vec::new())),
            state_probe: Arc::new(Mutex::new(None)),
        }
    }

    fn attach_state(&self, state: SharedSessionState) {
        *self.state_probe.lock() = Some(state);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

impl ChatBackend for FakeBackend {
    fn post_chat(&self, text: &str) -> Result<String> {
        let processing = self
            .state_probe
            .lock()
            .as_ref()
            .map(|s| s.is_processing())
            .unwrap_or(false);
        self.calls
            .lock()
            .push(format!("chat[processing={}]: {}", processing, text));

        match &self.reply {
            Reply::Text(reply) => Ok(reply.clone()),
            Reply::Status(code) => Err(ParleyError::BackendStatus(*code)),
        }
    }

    fn speech_url(&self, text: &str) -> String {
        format!(
            "http://backend.test/text-to-speech-get?text={}",
            encode_query_text(text)
        )
    }
}

/// Playback fake that records loaded URLs and "plays" instantly
#[derive(Clone)]
struct FakePlayback {
    loaded: Arc<Mutex<Vec<String>>>,
}

impl FakePlayback {
    fn new() -> Self {
        Self {
            loaded: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn loaded(&self) -> Vec<String> {
        self.loaded.lock().clone()
    }
}

struct FakeHandle;

impl PlaybackHandle for FakeHandle {
    fn play(&mut self) -> Result<()> {
        Ok(())
    }

    fn release(self: Box<Self>) {}
}

impl Playback for FakePlayback {
    fn load(&mut self, url: &str) -> Result<Box<dyn PlaybackHandle>> {
        self.loaded.lock().push(url.to_string());
        Ok(Box::new(FakeHandle))
    }
}

struct NoRecognizer;

impl parley::speech::Recognizer for NoRecognizer {
    fn start(&mut self, _locale: &str) -> Result<()> {
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        Ok(())
    }
}

fn spawn_session(
    backend: FakeBackend,
    playback: FakePlayback,
) -> (SessionHandle, JoinHandle<()>) {
    let (handle, worker) = Session::spawn(
        SessionConfig::default(),
        Box::new(backend.clone()),
        Box::new(NoRecognizer),
        Box::new(move || Ok(Box::new(playback) as Box<dyn Playback>)),
    );
    backend.attach_state(handle.state().clone());
    (handle, worker)
}

fn wait_until(mut cond: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !cond() {
        assert!(Instant::now() < deadline, "timed out waiting for condition");
        std::thread::sleep(Duration::from_millis(10));
    }
}

#[test]
fn successful_turn_appends_user_then_reply() {
    let backend = FakeBackend::new(Reply::Text("It is sunny".to_string()));
    let (handle, worker) = spawn_session(backend.clone(), FakePlayback::new());

    handle.submit_text("What is the weather").unwrap();
    wait_until(|| handle.messages().len() == 3);

    let messages = handle.messages().get_all();
    assert_eq!(messages[0].text, GREETING_TEXT);
    assert!(messages[1].is_user());
    assert_eq!(messages[1].text, "What is the weather");
    assert!(!messages[2].is_user());
    assert_eq!(messages[2].text, "It is sunny");

    handle.shutdown().unwrap();
    worker.join().unwrap();
}

#[test]
fn reply_audio_is_fetched_with_percent_encoded_text() {
    let backend = FakeBackend::new(Reply::Text("It is sunny".to_string()));
    let playback = FakePlayback::new();
    let (handle, worker) = spawn_session(backend, playback.clone());

    handle.submit_text("What is the weather").unwrap();
    wait_until(|| playback.loaded().len() == 2);

    let loaded = playback.loaded();
    // Greeting audio first, then the reply
    assert!(loaded[0].contains("text=Hello%2C%20how%20can%20I%20help%20you%20today%3F"));
    assert!(loaded[1].contains("It%20is%20sunny"));

    handle.shutdown().unwrap();
    worker.join().unwrap();
}

#[test]
fn backend_failure_appends_synthetic_error_and_alerts() {
    let backend = FakeBackend::new(Reply::Status(500));
    let (handle, worker) = spawn_session(backend.clone(), FakePlayback::new());
    let events = handle.event_receiver();

    handle.submit_text("What is the weather").unwrap();
    wait_until(|| handle.messages().len() == 3);

    let messages = handle.messages().get_all();
    assert!(messages[1].is_user());
    assert!(!messages[2].is_user());
    assert!(messages[2].text.contains("Sorry, I encountered an error"));

    // A blocking alert was emitted for the failure
    let mut saw_alert = false;
    while let Ok(event) = events.try_recv() {
        if let SessionEvent::Alert { title, message } = event {
            assert_eq!(title, "Error Details");
            assert!(message.contains("Failed to process voice chat"));
            saw_alert = true;
        }
    }
    assert!(saw_alert);

    handle.shutdown().unwrap();
    worker.join().unwrap();
}

#[test]
fn whitespace_transcript_is_ignored_without_a_network_call() {
    let backend = FakeBackend::new(Reply::Text("pong".to_string()));
    let (handle, worker) = spawn_session(backend.clone(), FakePlayback::new());

    handle.submit_text("   ").unwrap();
    handle.submit_text("").unwrap();
    // A real turn afterwards proves the earlier submissions were dropped
    handle.submit_text("ping").unwrap();
    wait_until(|| handle.messages().len() == 3);

    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].ends_with("ping"));

    handle.shutdown().unwrap();
    worker.join().unwrap();
}

#[test]
fn processing_flag_spans_exactly_the_backend_call() {
    let backend = FakeBackend::new(Reply::Text("done".to_string()));
    let (handle, worker) = spawn_session(backend.clone(), FakePlayback::new());

    assert!(!handle.state().is_processing());

    handle.submit_text("work").unwrap();
    wait_until(|| handle.messages().len() == 3 && handle.state().is_idle());

    // The fake saw processing=true at the moment of the call
    assert_eq!(backend.calls(), vec!["chat[processing=true]: work"]);
    // And the flag is cleared once the turn completes
    assert!(!handle.state().is_processing());
    assert!(handle.state().is_idle());

    handle.shutdown().unwrap();
    worker.join().unwrap();
}

#[test]
fn processing_flag_clears_after_backend_failure() {
    let backend = FakeBackend::new(Reply::Status(502));
    let (handle, worker) = spawn_session(backend.clone(), FakePlayback::new());

    handle.submit_text("work").unwrap();
    wait_until(|| handle.messages().len() == 3 && handle.state().is_idle());

    assert_eq!(backend.calls(), vec!["chat[processing=true]: work"]);
    assert!(!handle.state().is_processing());

    handle.shutdown().unwrap();
    worker.join().unwrap();
}

#[test]
fn clear_conversation_leaves_exactly_the_greeting() {
    let backend = FakeBackend::new(Reply::Text("fine, thanks".to_string()));
    let (handle, worker) = spawn_session(backend, FakePlayback::new());

    handle.submit_text("how are you").unwrap();
    wait_until(|| handle.messages().len() == 3);

    handle.clear_conversation().unwrap();
    wait_until(|| handle.messages().len() == 1);

    let messages = handle.messages().get_all();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].text, GREETING_TEXT);
    assert!(!messages[0].is_user());

    handle.shutdown().unwrap();
    worker.join().unwrap();
}
