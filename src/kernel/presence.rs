/// Whether utterances from the listen loop reach the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PresenceState {
    /// Listening; every utterance is interpreted.
    #[default]
    Attentive,
    /// Paused by the user; only the hotword is honoured.
    Suspended,
}

/// Console-level signals that can change presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceRequest {
    WakeWordDetected,
    UserSuspend,
}

/// The hotword that wakes the assistant. Handled before the dispatcher ever sees input.
pub const HOTWORD: &str = "hey jarvis";
pub const SUSPEND_PHRASE: &str = "stop listening";

pub fn is_hotword(utterance: &str) -> bool {
    utterance.trim().eq_ignore_ascii_case(HOTWORD)
}

pub struct PresenceGraph;

impl PresenceGraph {
    /// Maps a raw line to a presence request, if it is one.
    pub fn request_for(utterance: &str) -> Option<PresenceRequest> {
        if is_hotword(utterance) {
            Some(PresenceRequest::WakeWordDetected)
        } else if utterance.trim().eq_ignore_ascii_case(SUSPEND_PHRASE) {
            Some(PresenceRequest::UserSuspend)
        } else {
            None
        }
    }

    /// Returns the next state, or `None` when the request changes nothing.
    pub fn transition(current: PresenceState, request: PresenceRequest) -> Option<PresenceState> {
        use PresenceRequest::*;
        use PresenceState::*;

        match (current, request) {
            (Suspended, WakeWordDetected) => Some(Attentive),
            (Attentive, UserSuspend) => Some(Suspended),
            _ => None,
        }
    }
}
