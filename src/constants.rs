//! Centralized constants for llmswitch.
//!
//! Default strings, provider parameters, and configuration constants live
//! here so they can be changed in one place.

/// Application name used in CLI output and directory paths.
pub const APP_NAME: &str = "llmswitch";

/// Configuration filename.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Per-project configuration filename.
pub const PROJECT_CONFIG_FILENAME: &str = "llmswitch.toml";

/// Separator between provider name and model in a selector string.
pub const SELECTOR_SEPARATOR: &str = ": ";

/// Sampling temperature used when the caller doesn't pick one.
pub const DEFAULT_TEMPERATURE: f64 = 0.15;

/// Completion token limit for providers that require one.
pub const MAX_TOKENS: u64 = 4095;

/// Public OpenAI endpoint, used when `OPENAI_API_BASE` is unset.
pub const OPENAI_DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/";

// --- Local hosting ---

/// Placeholder API key handed to the OpenAI-compatible client for Ollama.
pub const OLLAMA_SENTINEL_KEY: &str = "ollama";

/// Placeholder API key handed to the OpenAI-compatible client for LM Studio.
pub const LMSTUDIO_SENTINEL_KEY: &str = "lm-studio";

// --- Model list overrides ---

/// Comma-separated model list replacing the OpenAI defaults.
pub const OPENAI_MODELS_ENV: &str = "OPENAI_PROXY_MODELS";

/// Comma-separated model list for the Ollama provider.
pub const OLLAMA_MODELS_ENV: &str = "OLLAMA_MODELS";

// --- Logging ---

/// Default tracing filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "llmswitch=warn";
