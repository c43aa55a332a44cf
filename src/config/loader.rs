//! File loading and merging for llmswitch configuration.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::types::Config;
use crate::provider::ProviderKind;

/// Written to the global config path the first time llmswitch runs.
const DEFAULT_CONFIG_TOML: &str = r#"# Selector used when none is given, e.g. "OpenAI: gpt-4o"
# default_llm = "OpenAI: gpt-4o"

# temperature = 0.15

# Dotenv file with OPENAI_API_KEY, GROQ_API_KEY, ANTHROPIC_API_KEY, ...
# secrets_file = "{env:HOME}/.config/llmswitch/secrets.env"

[models]
# Ollama = ["llama3", "mistral"]
"#;

impl Config {
    /// Loads the global config from `~/.config/llmswitch/config.toml`.
    ///
    /// If no config file exists, creates one with commented-out defaults and
    /// returns the default config.
    pub(super) fn load_global() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, DEFAULT_CONFIG_TOML)
                .with_context(|| format!("Failed to write default config to {:?}", path))?;
            return Ok(Config::default());
        }
        Self::load_from(&path)
    }

    /// Reads and parses a config file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config at {:?}", path))?;
        config.models = canonical_model_keys(config.models);
        Ok(config)
    }

    /// Look for llmswitch.toml in `start`, then walk up to the git root.
    pub(super) fn find_project(start: &Path) -> Option<PathBuf> {
        let mut dir = start.to_path_buf();
        loop {
            let candidate = dir.join(crate::constants::PROJECT_CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            // Stop at git root or filesystem root
            if dir.join(".git").exists() || !dir.pop() {
                return None;
            }
        }
    }

    /// Merge project config over global config.
    /// Project values win when present; model lists are replaced per provider.
    pub(super) fn merge(global: Config, project: Config) -> Config {
        let mut models = canonical_model_keys(global.models);
        models.extend(canonical_model_keys(project.models));
        Config {
            default_llm: project.default_llm.or(global.default_llm),
            temperature: project.temperature.or(global.temperature),
            secrets_file: project.secrets_file.or(global.secrets_file),
            models,
        }
    }
}

/// Rewrites `[models]` keys to the provider's selector name, so `ollama` and
/// `Ollama` name the same entry. An exactly spelled key beats its case
/// variants. Unknown keys are kept as written.
fn canonical_model_keys(models: BTreeMap<String, Vec<String>>) -> BTreeMap<String, Vec<String>> {
    let mut canonical = BTreeMap::new();
    let mut variants = Vec::new();
    for (key, list) in models {
        match ProviderKind::from_name_ignore_case(&key) {
            Some(kind) if kind.name() != key => variants.push((kind.name().to_string(), list)),
            _ => {
                canonical.insert(key, list);
            }
        }
    }
    for (key, list) in variants {
        canonical.entry(key).or_insert(list);
    }
    canonical
}
