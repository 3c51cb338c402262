pub mod knowledge;
pub mod reminders;

pub use knowledge::*;
pub use reminders::*;
