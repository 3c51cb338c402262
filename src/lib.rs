pub mod config;
pub mod error;
pub mod kernel;
pub mod memory;
pub mod outputs;
pub mod services;

pub use config::Config;
pub use kernel::dispatcher::Dispatcher;
pub use kernel::event::{Announcement, Reply, ReplyAction};
