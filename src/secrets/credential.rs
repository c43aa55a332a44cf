//! Recognized credentials and the snapshot of their last-known values.

use std::collections::BTreeMap;
use std::fmt;

use crate::constants::OPENAI_DEFAULT_BASE_URL;
use crate::env::Environment;
use crate::error::{ClientError, Result};

/// One of the environment-backed secrets llmswitch manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Credential {
    OpenAiApiKey,
    OpenAiApiBase,
    GroqApiKey,
    LmStudioApiBase,
    AnthropicApiKey,
    OllamaHost,
    GoogleApiKey,
}

impl Credential {
    /// Every recognized credential, in load order.
    pub const ALL: [Credential; 7] = [
        Credential::OpenAiApiKey,
        Credential::OpenAiApiBase,
        Credential::GroqApiKey,
        Credential::LmStudioApiBase,
        Credential::AnthropicApiKey,
        Credential::OllamaHost,
        Credential::GoogleApiKey,
    ];

    /// Name of the backing environment variable.
    pub fn env_name(self) -> &'static str {
        match self {
            Self::OpenAiApiKey => "OPENAI_API_KEY",
            Self::OpenAiApiBase => "OPENAI_API_BASE",
            Self::GroqApiKey => "GROQ_API_KEY",
            Self::LmStudioApiBase => "LMSTUDIO_API_BASE",
            Self::AnthropicApiKey => "ANTHROPIC_API_KEY",
            Self::OllamaHost => "OLLAMA_HOST",
            Self::GoogleApiKey => "GOOGLE_API_KEY",
        }
    }

    /// Human-readable description used in error messages.
    pub fn description(self) -> &'static str {
        match self {
            Self::OpenAiApiBase | Self::LmStudioApiBase => "API base URL",
            Self::OllamaHost => "Host",
            _ => "API key",
        }
    }

    /// Value used when the variable is unset at load time.
    pub fn default_value(self) -> Option<&'static str> {
        match self {
            Self::OpenAiApiBase => Some(OPENAI_DEFAULT_BASE_URL),
            _ => None,
        }
    }

    /// Whether the value is a secret that must never be logged.
    pub fn is_secret(self) -> bool {
        matches!(
            self,
            Self::OpenAiApiKey | Self::GroqApiKey | Self::AnthropicApiKey | Self::GoogleApiKey
        )
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.env_name())
    }
}

/// Last-known value of every [`Credential`].
///
/// Always holds exactly one entry per credential. `None` means unset, which
/// is distinct from an empty string.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialSnapshot {
    values: BTreeMap<Credential, Option<String>>,
}

impl CredentialSnapshot {
    /// Reads every credential from `env`, applying per-credential defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotUnicode`] if a credential variable is set
    /// but can't be read as a string.
    pub fn from_env(env: &dyn Environment) -> Result<Self> {
        let values = Credential::ALL
            .iter()
            .map(|&c| {
                let name = c.env_name();
                match env.var(name) {
                    Some(value) => Ok((c, Some(value))),
                    None if env.is_set(name) => Err(ClientError::NotUnicode(name)),
                    None => Ok((c, c.default_value().map(String::from))),
                }
            })
            .collect::<Result<_>>()?;
        Ok(Self { values })
    }

    /// Returns the stored value, or `None` if unset.
    pub fn get(&self, credential: Credential) -> Option<&str> {
        self.values.get(&credential).and_then(|v| v.as_deref())
    }

    /// Returns an owned copy of the stored value.
    pub fn value(&self, credential: Credential) -> Option<String> {
        self.get(credential).map(String::from)
    }

    pub fn set(&mut self, credential: Credential, value: Option<String>) {
        self.values.insert(credential, value);
    }

    /// Iterates entries in [`Credential::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Credential, Option<&str>)> {
        self.values.iter().map(|(c, v)| (*c, v.as_deref()))
    }
}

impl Default for CredentialSnapshot {
    /// A snapshot with every credential unset.
    fn default() -> Self {
        Self {
            values: Credential::ALL.iter().map(|&c| (c, None)).collect(),
        }
    }
}

impl fmt::Debug for CredentialSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (credential, value) in self.iter() {
            let shown = match value {
                Some(_) if credential.is_secret() => Some("<redacted>"),
                other => other,
            };
            map.entry(&credential.env_name(), &shown);
        }
        map.finish()
    }
}
