pub mod arbitrator;
pub mod types;

pub use arbitrator::{normalize, strip_wake_word, IntentArbitrator, RULES, WAKE_WORD};
pub use types::{Intent, IntentRule};
