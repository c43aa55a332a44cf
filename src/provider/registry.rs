//! Provider registry: which models each provider offers.
//!
//! Model lists come from, in order of precedence: a comma-separated
//! environment override (`OPENAI_PROXY_MODELS`, `OLLAMA_MODELS`), the config
//! file's `[models]` table, then the hard-coded defaults.

use std::collections::BTreeMap;

use tracing::warn;

use super::client::LlmClient;
use super::kind::ProviderKind;
use super::selector::format_selector;
use crate::env::{EnvScope, Environment};
use crate::error::Result;

/// One registry row: a provider and its selectable models.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderEntry {
    kind: ProviderKind,
    models: Vec<String>,
}

impl ProviderEntry {
    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// Runs this provider's constructor.
    pub fn create_client(
        &self,
        model: &str,
        temperature: f64,
        scope: &mut EnvScope<'_>,
    ) -> Result<LlmClient> {
        self.kind.create_client(model, temperature, scope)
    }
}

/// Every supported provider, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRegistry {
    entries: Vec<ProviderEntry>,
}

impl ProviderRegistry {
    /// Registry with the hard-coded model lists.
    pub fn defaults() -> Self {
        Self::from_sources(None, &BTreeMap::new())
    }

    /// Registry with model lists resolved from `env` and the config overrides.
    ///
    /// Override keys are provider names, matched ignoring case; a key spelled
    /// exactly like the provider wins over case variants. Unknown keys are
    /// logged and ignored.
    pub fn from_sources(
        env: Option<&dyn Environment>,
        overrides: &BTreeMap<String, Vec<String>>,
    ) -> Self {
        for name in overrides.keys() {
            if ProviderKind::from_name_ignore_case(name).is_none() {
                warn!(provider = %name, "ignoring model list for unknown provider");
            }
        }

        let entries = ProviderKind::ALL
            .iter()
            .map(|&kind| ProviderEntry {
                kind,
                models: resolve_models(kind, env, overrides),
            })
            .collect();
        Self { entries }
    }

    /// Looks up a provider by selector name.
    pub fn get(&self, name: &str) -> Option<&ProviderEntry> {
        let kind = ProviderKind::from_name(name)?;
        self.entries.iter().find(|e| e.kind == kind)
    }

    pub fn entries(&self) -> &[ProviderEntry] {
        &self.entries
    }

    /// Every `"<Provider>: <model>"` selector, in registry order.
    pub fn selectors(&self) -> Vec<String> {
        self.entries
            .iter()
            .flat_map(|e| e.models.iter().map(|m| format_selector(e.kind.name(), m)))
            .collect()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::defaults()
    }
}

fn resolve_models(
    kind: ProviderKind,
    env: Option<&dyn Environment>,
    overrides: &BTreeMap<String, Vec<String>>,
) -> Vec<String> {
    let from_env = kind
        .models_env_var()
        .zip(env)
        .and_then(|(var, env)| env.var(var))
        .map(|list| split_model_list(&list))
        .filter(|models| !models.is_empty());
    if let Some(models) = from_env {
        return models;
    }

    let from_config = overrides
        .get(kind.name())
        .or_else(|| {
            overrides
                .iter()
                .find(|(name, _)| ProviderKind::from_name_ignore_case(name) == Some(kind))
                .map(|(_, models)| models)
        })
        .cloned();
    if let Some(models) = from_config {
        return models;
    }

    kind.default_models().iter().map(|m| m.to_string()).collect()
}

/// Splits a comma-separated model list, dropping blank items.
fn split_model_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(String::from)
        .collect()
}
