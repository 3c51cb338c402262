use async_trait::async_trait;
use tokio::io::{AsyncWriteExt, Stdout};
use tokio::sync::Mutex;
use tracing::warn;

/// Where replies and announcements end up: a display, a TTS engine, or both.
#[async_trait]
pub trait SpeechSink: Send + Sync {
    async fn speak(&self, text: &str);
}

/// Writes `Jarvis: <text>` lines to stdout.
pub struct ConsoleSpeech {
    out: Mutex<Stdout>,
}

impl ConsoleSpeech {
    pub fn new() -> Self {
        Self {
            out: Mutex::new(tokio::io::stdout()),
        }
    }
}

impl Default for ConsoleSpeech {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechSink for ConsoleSpeech {
    async fn speak(&self, text: &str) {
        let mut out = self.out.lock().await;
        let line = format!("Jarvis: {}\n", text);
        if let Err(e) = out.write_all(line.as_bytes()).await {
            warn!(error = %e, "Console write failed");
        }
        let _ = out.flush().await;
    }
}

/// Prints the text, then pipes it through an external TTS program (`say`, `espeak`, ...).
///
/// Playback is awaited so consecutive replies do not talk over each other.
pub struct CommandSpeech {
    program: String,
    console: ConsoleSpeech,
}

impl CommandSpeech {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            console: ConsoleSpeech::new(),
        }
    }
}

#[async_trait]
impl SpeechSink for CommandSpeech {
    async fn speak(&self, text: &str) {
        self.console.speak(text).await;

        match tokio::process::Command::new(&self.program)
            .arg(text)
            .kill_on_drop(true)
            .spawn()
        {
            Ok(mut child) => {
                if let Err(e) = child.wait().await {
                    warn!(program = %self.program, error = %e, "TTS playback failed");
                }
            }
            Err(e) => warn!(program = %self.program, error = %e, "Failed to spawn TTS"),
        }
    }
}

/// Builds the sink selected by configuration.
pub fn sink_for(command: Option<&str>) -> Box<dyn SpeechSink> {
    match command {
        Some(program) => Box::new(CommandSpeech::new(program)),
        None => Box::new(ConsoleSpeech::new()),
    }
}
