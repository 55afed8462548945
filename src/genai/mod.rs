pub mod client;
pub mod types;

pub use client::{GeminiClient, GenAiError, GenerativeModel};
pub use types::Schema;
