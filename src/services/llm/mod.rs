pub mod client;

pub use client::{Generator, LLMService};
