//! Struct definitions and serde defaults for llmswitch configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Root configuration for llmswitch, deserialized from `config.toml`.
///
/// Every field is optional so llmswitch runs with sensible defaults when no
/// config file exists.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    /// Selector used when none is given on the command line
    /// (e.g. `"OpenAI: gpt-4o"`).
    #[serde(default)]
    pub default_llm: Option<String>,
    /// Sampling temperature used when none is given on the command line.
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Dotenv-format file holding API keys and hosts. Defaults to a `.env`
    /// found from the current directory upwards.
    #[serde(default)]
    pub secrets_file: Option<PathBuf>,
    /// Per-provider model lists, keyed by provider name (e.g. `"Ollama"`).
    #[serde(default)]
    pub models: BTreeMap<String, Vec<String>>,
}
