use anyhow::Result;
use parley::backend::HttpBackend;
use parley::config::{BackendConfig, SessionConfig, DEFAULT_BACKEND_URL};
use parley::conversation::{PlaybackFactory, Session, SessionEvent};
use parley::speech::NullRecognizer;
use std::io::{self, BufRead, Write};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parley=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
    info!("Starting Parley voice chat client against {}", base_url);

    let config = SessionConfig::default().with_backend(BackendConfig::new(base_url));
    let backend = HttpBackend::new(config.backend.clone())?;

    // No on-device recognizer is wired in the demo binary; transcripts are
    // typed. The playback device opens inside the session thread.
    #[cfg(feature = "playback")]
    let playback_factory: PlaybackFactory = Box::new(|| {
        parley::audio::RodioPlayer::new()
            .map(|p| Box::new(p) as Box<dyn parley::audio::Playback>)
    });
    #[cfg(not(feature = "playback"))]
    let playback_factory: PlaybackFactory =
        Box::new(|| Ok(Box::new(parley::audio::NullPlayback) as Box<dyn parley::audio::Playback>));

    let (handle, worker) = Session::spawn(
        config,
        Box::new(backend),
        Box::new(NullRecognizer),
        playback_factory,
    );

    // Print conversation events as they arrive
    let event_rx = handle.event_receiver();
    let printer = std::thread::spawn(move || {
        while let Ok(event) = event_rx.recv() {
            match event {
                SessionEvent::MessageAppended(message) => {
                    let who = if message.is_user() { "you" } else { "ai" };
                    println!("[{}] {}", who, message.text);
                }
                SessionEvent::Alert { title, message } => {
                    println!("!! {}: {}", title, message);
                }
                SessionEvent::Shutdown => break,
                SessionEvent::StateChanged => {}
            }
        }
    });

    println!("Type a message and press enter (/clear resets, /quit exits).");
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let text = line.trim();
        match text {
            "" => {}
            "/quit" => break,
            "/clear" => handle.clear_conversation()?,
            _ => handle.submit_text(text)?,
        }
        io::stdout().flush()?;
    }

    handle.shutdown()?;
    printer
        .join()
        .map_err(|_| anyhow::anyhow!("event printer panicked"))?;
    worker
        .join()
        .map_err(|_| anyhow::anyhow!("session worker panicked"))?;

    info!("Goodbye");
    Ok(())
}
