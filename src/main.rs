use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use jarvis::kernel::presence::{PresenceGraph, PresenceRequest, PresenceState};
use jarvis::kernel::time::{Clock, SystemClock};
use jarvis::outputs::speech::sink_for;
use jarvis::services::launcher::{search_url, Launcher, SystemLauncher};
use jarvis::{Config, Dispatcher, ReplyAction};

const CLEAR_LOG: &str = "clear log";

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never interleave with spoken lines on stdout.
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::from_env()?;
    info!(?config, "Jarvis booting");

    let (announce_tx, mut announce_rx) = mpsc::channel(32);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let launcher: Arc<dyn Launcher> = Arc::new(SystemLauncher);
    let dispatcher = Dispatcher::from_config(&config, clock, Arc::clone(&launcher), announce_tx).await;
    let speech = sink_for(config.speech_command.as_deref());

    // Stand-in for the speech-to-text loop: one transcribed utterance per line.
    let (line_tx, mut line_rx) = mpsc::channel::<String>(100);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if line.trim().is_empty() {
                continue;
            }
            if line_tx.send(line).await.is_err() {
                break;
            }
        }
    });

    let mut presence = PresenceState::default();
    info!("Listening. Type an utterance, or 'quit' to exit.");

    loop {
        tokio::select! {
            Some(announcement) = announce_rx.recv() => {
                speech.speak(&announcement.sentence()).await;
            }
            line = line_rx.recv() => {
                let Some(line) = line else {
                    info!("Input closed");
                    break;
                };
                let utterance = line.trim();

                if let Some(request) = PresenceGraph::request_for(utterance) {
                    if let Some(next) = PresenceGraph::transition(presence, request) {
                        debug!(?presence, ?next, "Presence transition");
                        presence = next;
                    }
                    match request {
                        PresenceRequest::WakeWordDetected => speech.speak("Listening.").await,
                        PresenceRequest::UserSuspend => {
                            speech.speak("Paused. Say 'hey jarvis' when you need me.").await
                        }
                    }
                    continue;
                }

                if presence == PresenceState::Suspended {
                    debug!("Suspended, utterance ignored");
                    continue;
                }

                if utterance.eq_ignore_ascii_case(CLEAR_LOG) {
                    dispatcher.resolver().clear_history();
                    speech.speak("Log cleared.").await;
                    continue;
                }

                let reply = dispatcher.interpret(utterance).await;
                if !reply.text.is_empty() {
                    speech.speak(&reply.text).await;
                }

                match reply.action {
                    ReplyAction::SearchWeb(query) => {
                        if let Err(e) = launcher.open_url(&search_url(&query)).await {
                            warn!(error = %e, "Could not open search page");
                        }
                    }
                    ReplyAction::Terminate => break,
                    ReplyAction::OpenResource(_) | ReplyAction::Speak | ReplyAction::None => {}
                }
            }
        }
    }

    dispatcher.reminders().shutdown().await;
    info!("Jarvis stopped");
    Ok(())
}
