use std::sync::Arc;

use chrono::{NaiveDateTime, Timelike};
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::event::{Announcement, Reply, ReplyAction};
use super::intent::{normalize, strip_wake_word, Intent, IntentArbitrator};
use super::resolver::ResponseResolver;
use super::scheduler::ReminderScheduler;
use super::time::{Clock, CLOCK_FORMAT, SPOKEN_DATE_FORMAT};
use crate::config::Config;
use crate::memory::{KnowledgeStore, ReminderStore};
use crate::services::launcher::Launcher;
use crate::services::llm::LLMService;
use crate::services::search::DuckDuckGoSearch;

pub const GREETINGS: [&str; 4] = [
    "Hello! How can I help you today?",
    "Hi there! What can I do for you?",
    "Greetings! How may I assist you?",
    "Hello! I'm here to help. What do you need?",
];

pub const ACKNOWLEDGEMENTS: [&str; 4] = [
    "You're welcome!",
    "Happy to help!",
    "Anytime!",
    "My pleasure!",
];

pub const CANNOT_HELP: &str = "I'm not sure how to help with that.";
pub const REMINDER_USAGE: &str =
    "Please specify a time for the reminder using 'at' (e.g., 'set reminder buy groceries at 3:00 PM')";

/// Reproducible "random" pick: the current second selects the entry.
pub fn pick<'a>(options: &[&'a str; 4], now: NaiveDateTime) -> &'a str {
    options[now.second() as usize % options.len()]
}

/// Text following the first occurrence of `phrase`, trimmed.
fn after<'a>(text: &'a str, phrase: &str) -> &'a str {
    text.split_once(phrase).map(|(_, rest)| rest.trim()).unwrap_or("")
}

/// Top-level entry point: one utterance in, one reply out.
///
/// Owns every collaborator handle; nothing here is process-global.
pub struct Dispatcher {
    clock: Arc<dyn Clock>,
    resolver: Arc<ResponseResolver>,
    reminders: ReminderScheduler,
    launcher: Arc<dyn Launcher>,
    arbitrator: IntentArbitrator,
    home_page: String,
}

impl Dispatcher {
    pub fn new(
        clock: Arc<dyn Clock>,
        resolver: Arc<ResponseResolver>,
        reminders: ReminderScheduler,
        launcher: Arc<dyn Launcher>,
        home_page: impl Into<String>,
    ) -> Self {
        Self {
            clock,
            resolver,
            reminders,
            launcher,
            arbitrator: IntentArbitrator::new(),
            home_page: home_page.into(),
        }
    }

    /// Wires the production collaborators from `config`. Fired reminders go to `announcements`.
    pub async fn from_config(
        config: &Config,
        clock: Arc<dyn Clock>,
        launcher: Arc<dyn Launcher>,
        announcements: mpsc::Sender<Announcement>,
    ) -> Self {
        let resolver = ResponseResolver::new(
            KnowledgeStore::open(&config.knowledge_path),
            Arc::new(DuckDuckGoSearch::new(&config.search_url, config.search_timeout)),
            Arc::new(LLMService::new(&config.llm_url, config.llm_timeout)),
        );
        let reminders = ReminderScheduler::open(
            ReminderStore::open(&config.reminders_path),
            Arc::clone(&clock),
            announcements,
        )
        .await;

        Self::new(clock, Arc::new(resolver), reminders, launcher, &config.home_page)
    }

    pub fn resolver(&self) -> &Arc<ResponseResolver> {
        &self.resolver
    }

    pub fn reminders(&self) -> &ReminderScheduler {
        &self.reminders
    }

    pub async fn interpret(&self, utterance: &str) -> Reply {
        let text = normalize(utterance);
        if text.is_empty() {
            return Reply::with_action("", ReplyAction::None);
        }

        let intent = self.arbitrator.assess(&text);
        debug!(?intent, "Utterance classified");

        if intent == Intent::WakeQuery {
            let query = strip_wake_word(&text).unwrap_or_default();
            if let Some(answer) = self.resolver.resolve(query).await {
                return Reply::speak(answer);
            }
            // Unanswered: the remainder goes through the ordinary rules. The cascade
            // already ran for this query, so it is not retried.
            return match self.arbitrator.assess_after_wake(query) {
                Intent::Fallback => Reply::speak(CANNOT_HELP),
                intent => self.handle(intent, query).await,
            };
        }

        self.handle(intent, &text).await
    }

    async fn handle(&self, intent: Intent, text: &str) -> Reply {
        match intent {
            Intent::Open => self.open(after(text, "open")).await,
            Intent::Time => {
                let now = self.clock.now();
                Reply::speak(format!("The current time is {}", now.format(CLOCK_FORMAT)))
            }
            Intent::Date => {
                let now = self.clock.now();
                Reply::speak(format!("Today's date is {}", now.format(SPOKEN_DATE_FORMAT)))
            }
            Intent::SetReminder => self.set_reminder(after(text, "set reminder")).await,
            Intent::ListReminders => Reply::speak(self.reminders.list().await.trim_end()),
            Intent::Exit => {
                info!("Session termination requested");
                Reply::with_action("Goodbye.", ReplyAction::Terminate)
            }
            Intent::Greeting => Reply::speak(pick(&GREETINGS, self.clock.now())),
            Intent::Thanks => Reply::speak(pick(&ACKNOWLEDGEMENTS, self.clock.now())),
            Intent::GoogleSearch => {
                let query = after(text, "google search");
                if query.is_empty() {
                    return Reply::speak("What should I search for?");
                }
                Reply::with_action(
                    format!("Searching Google for {}", query),
                    ReplyAction::SearchWeb(query.to_string()),
                )
            }
            Intent::WakeQuery | Intent::Fallback => match self.resolver.resolve(text).await {
                Some(answer) => Reply::speak(answer),
                None => Reply::speak(CANNOT_HELP),
            },
        }
    }

    async fn open(&self, target: &str) -> Reply {
        if target.is_empty() {
            return Reply::speak("What should I open?");
        }

        if target.contains("browser") {
            return match self.launcher.open_url(&self.home_page).await {
                Ok(()) => Reply::with_action(
                    "Opening web browser",
                    ReplyAction::OpenResource(self.home_page.clone()),
                ),
                Err(_) => Reply::speak(format!("Could not open {}", target)),
            };
        }

        match self.launcher.open(target).await {
            Ok(()) => Reply::with_action(
                format!("Opening {}", target),
                ReplyAction::OpenResource(target.to_string()),
            ),
            Err(_) => Reply::speak(format!("Could not open {}", target)),
        }
    }

    async fn set_reminder(&self, request: &str) -> Reply {
        let Some((task, label)) = request.rsplit_once(" at ") else {
            return Reply::speak(REMINDER_USAGE);
        };
        let (task, label) = (task.trim(), label.trim());
        if task.is_empty() || label.is_empty() {
            return Reply::speak(REMINDER_USAGE);
        }

        match self.reminders.schedule(task, label).await {
            Ok(confirmation) => Reply::speak(confirmation),
            Err(e) => Reply::speak(format!("Error setting reminder: {}", e)),
        }
    }
}
