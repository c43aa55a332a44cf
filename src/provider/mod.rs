//! LLM provider abstraction for llmswitch.
//!
//! Wraps rig-core's provider clients behind an [`LlmClient`] struct with enum
//! dispatch. Supports OpenAI, Groq, Google, Ollama, Anthropic and LM Studio
//! via [`ProviderKind`]; the [`ProviderRegistry`] lists their models.

mod client;
mod create;
mod kind;
mod listing;
mod registry;
mod selector;

pub use client::LlmClient;
pub use kind::ProviderKind;
pub use listing::list_ollama_models;
pub use registry::{ProviderEntry, ProviderRegistry};
pub use selector::{format_selector, Selector};
