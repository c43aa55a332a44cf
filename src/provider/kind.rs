//! Provider kind enumeration and default model lists.
//!
//! Defines [`ProviderKind`], the closed set of supported providers, along
//! with each provider's display name and hard-coded model list.

use std::fmt;

/// Identifies which LLM provider to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// OpenAI, or any OpenAI-compatible proxy behind `OPENAI_API_BASE`.
    OpenAI,
    /// Groq cloud inference.
    Groq,
    /// Google Gemini.
    Google,
    /// Ollama (local models via OpenAI-compatible API).
    Ollama,
    /// Anthropic (Claude models).
    Anthropic,
    /// LM Studio local server (OpenAI-compatible API).
    LmStudio,
}

impl ProviderKind {
    /// Every provider, in registry order.
    pub const ALL: [ProviderKind; 6] = [
        ProviderKind::OpenAI,
        ProviderKind::Groq,
        ProviderKind::Google,
        ProviderKind::Ollama,
        ProviderKind::Anthropic,
        ProviderKind::LmStudio,
    ];

    /// Name used in selector strings, e.g. `"LM Studio"`.
    pub fn name(self) -> &'static str {
        match self {
            Self::OpenAI => "OpenAI",
            Self::Groq => "Groq",
            Self::Google => "Google",
            Self::Ollama => "Ollama",
            Self::Anthropic => "Anthropic",
            Self::LmStudio => "LM Studio",
        }
    }

    /// Looks up a provider by its exact selector name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().find(|k| k.name() == name).copied()
    }

    /// Looks up a provider ignoring ASCII case, as config keys are matched.
    pub fn from_name_ignore_case(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .find(|k| k.name().eq_ignore_ascii_case(name))
            .copied()
    }

    /// Models offered when nothing overrides the list.
    pub fn default_models(self) -> &'static [&'static str] {
        match self {
            Self::OpenAI => &["gpt-4o", "gpt-4o-mini", "gpt-3.5-turbo", "gpt-4-turbo"],
            Self::Groq => &["llama3-8b-8192", "llama3-70b-8192", "mixtral-8x7b-32768"],
            Self::Google => &["gemini-1.5-pro", "gemini-1.5-flash"],
            Self::Ollama => &[],
            Self::Anthropic => &["claude-3-5-sonnet-20240620"],
            Self::LmStudio => &["lms-default"],
        }
    }

    /// Environment variable that replaces the model list, if the provider has one.
    pub fn models_env_var(self) -> Option<&'static str> {
        match self {
            Self::OpenAI => Some(crate::constants::OPENAI_MODELS_ENV),
            Self::Ollama => Some(crate::constants::OLLAMA_MODELS_ENV),
            _ => None,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
