/// Side action the caller performs alongside speaking a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyAction {
    Speak,
    /// Target has already been launched; carried for display and logging.
    OpenResource(String),
    /// Caller should open a web search for this query.
    SearchWeb(String),
    Terminate,
    None,
}

/// Outcome of interpreting one utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub action: ReplyAction,
}

impl Reply {
    pub fn speak(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: ReplyAction::Speak,
        }
    }

    pub fn with_action(text: impl Into<String>, action: ReplyAction) -> Self {
        Self {
            text: text.into(),
            action,
        }
    }
}

/// A fired reminder, delivered to whoever speaks or displays it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub text: String,
}

impl Announcement {
    pub fn sentence(&self) -> String {
        format!("Reminder: {}", self.text)
    }
}
