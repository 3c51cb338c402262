pub mod cancel;
pub mod dispatcher;
pub mod event;
pub mod intent;
pub mod presence;
pub mod resolver;
pub mod scheduler;
pub mod time;
