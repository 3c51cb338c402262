use super::types::*;

pub const WAKE_WORD: &str = "jarvis";

/// Lowercases and trims an utterance. All rule predicates see this form.
pub fn normalize(utterance: &str) -> String {
    utterance.trim().to_lowercase()
}

/// Returns the text after a leading wake word, if the utterance starts with one.
pub fn strip_wake_word(text: &str) -> Option<&str> {
    text.strip_prefix(WAKE_WORD)
        .map(|rest| rest.trim_start_matches(|c: char| c == ',' || c.is_whitespace()))
}

/// The dispatch table. First match wins, so the order here is the priority contract.
pub static RULES: &[IntentRule] = &[
    IntentRule { intent: Intent::WakeQuery, matches: |t| t.starts_with(WAKE_WORD) },
    IntentRule { intent: Intent::Open, matches: |t| t.contains("open") },
    IntentRule { intent: Intent::Time, matches: |t| t.contains("time") },
    IntentRule { intent: Intent::Date, matches: |t| t.contains("date") },
    IntentRule { intent: Intent::SetReminder, matches: |t| t.contains("set reminder") },
    IntentRule { intent: Intent::ListReminders, matches: |t| t.contains("list reminders") },
    IntentRule { intent: Intent::Exit, matches: |t| t.contains("exit") || t.contains("quit") },
    IntentRule { intent: Intent::Greeting, matches: |t| t.contains("hello") || t.contains("hi") },
    IntentRule { intent: Intent::Thanks, matches: |t| t.contains("thank") },
    IntentRule { intent: Intent::GoogleSearch, matches: |t| t.contains("google search") },
];

pub struct IntentArbitrator;

impl IntentArbitrator {
    pub fn new() -> Self {
        Self
    }

    /// Classifies normalized text against the full rule table.
    pub fn assess(&self, text: &str) -> Intent {
        Self::first_match(RULES, text)
    }

    /// Classifies the remainder of a wake-word utterance whose query went unanswered.
    /// The wake rule itself is skipped so "jarvis jarvis" cannot loop.
    pub fn assess_after_wake(&self, text: &str) -> Intent {
        Self::first_match(&RULES[1..], text)
    }

    fn first_match(rules: &[IntentRule], text: &str) -> Intent {
        rules
            .iter()
            .find(|rule| (rule.matches)(text))
            .map(|rule| rule.intent)
            .unwrap_or(Intent::Fallback)
    }
}

impl Default for IntentArbitrator {
    fn default() -> Self {
        Self::new()
    }
}
