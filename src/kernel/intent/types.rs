/// Recognized request categories, in dispatch priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Utterance addressed to the assistant by name; answered by the resolver.
    WakeQuery,
    Open,
    Time,
    Date,
    SetReminder,
    ListReminders,
    Exit,
    Greeting,
    Thanks,
    GoogleSearch,
    /// Nothing matched; the resolver gets the whole utterance.
    Fallback,
}

/// One entry of the ordered rule table: a predicate over normalized text.
#[derive(Clone, Copy)]
pub struct IntentRule {
    pub intent: Intent,
    pub matches: fn(&str) -> bool,
}

impl std::fmt::Debug for IntentRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentRule").field("intent", &self.intent).finish()
    }
}
