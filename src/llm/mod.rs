//! LLM domain — prompt catalog and the chat-completion client.
//!
//!   - prompts.rs   — system prompt per AI action + request constants
//!   - client.rs    — one completion per call, normalized result
//!   - transport.rs — HTTP seam (reqwest in production)
//!   - provider.rs  — provider metadata + API key resolution
//!   - types.rs     — wire types and `AiResponse`

pub mod client;
pub mod prompts;
pub mod provider;
pub mod transport;
pub mod types;

pub use client::{AiClient, AiError};
pub use prompts::{prompt_for, system_prompt, PromptParams};
pub use types::AiResponse;
