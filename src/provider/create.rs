//! Per-provider client constructors.
//!
//! Each constructor switches the credentials its provider needs into the
//! environment, reads them back, and builds the rig-core client. They all run
//! inside an [`EnvScope`], which restores the environment afterwards.

use rig::providers::{anthropic, gemini, groq, openai};
use tracing::debug;

use super::client::{ClientKind, LlmClient};
use super::kind::ProviderKind;
use crate::constants::{
    LMSTUDIO_SENTINEL_KEY, MAX_TOKENS, OLLAMA_SENTINEL_KEY, OPENAI_DEFAULT_BASE_URL,
};
use crate::env::EnvScope;
use crate::error::{ClientError, Result};
use crate::secrets::Credential;

impl ProviderKind {
    /// Builds a client for `model` using credentials visible through `scope`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if a required credential is
    /// unset or empty, and [`ClientError::Build`] if rig-core rejects the
    /// client settings.
    pub fn create_client(
        self,
        model: &str,
        temperature: f64,
        scope: &mut EnvScope<'_>,
    ) -> Result<LlmClient> {
        debug!(provider = %self, model, "creating client");
        match self {
            Self::OpenAI => create_openai(model, temperature, scope),
            Self::Groq => create_groq(model, temperature, scope),
            Self::Google => create_google(model, temperature, scope),
            Self::Ollama => create_ollama(model, temperature, scope),
            Self::Anthropic => create_anthropic(model, temperature, scope),
            Self::LmStudio => create_lmstudio(model, temperature, scope),
        }
    }
}

fn create_openai(model: &str, temperature: f64, scope: &mut EnvScope<'_>) -> Result<LlmClient> {
    const PROVIDER: ProviderKind = ProviderKind::OpenAI;
    switch_from_snapshot(scope, &[Credential::OpenAiApiKey, Credential::OpenAiApiBase]);

    let api_key = required(scope, PROVIDER, Credential::OpenAiApiKey)?;
    let base_url = scope
        .var(Credential::OpenAiApiBase)
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| OPENAI_DEFAULT_BASE_URL.to_string());

    let client = openai::Client::builder()
        .api_key(api_key.as_str())
        .base_url(base_url.trim_end_matches('/'))
        .build()
        .map_err(|e| ClientError::build(PROVIDER, e))?;
    Ok(LlmClient::new(PROVIDER, ClientKind::OpenAI(client), model, temperature)
        .with_base_url(base_url))
}

fn create_anthropic(model: &str, temperature: f64, scope: &mut EnvScope<'_>) -> Result<LlmClient> {
    const PROVIDER: ProviderKind = ProviderKind::Anthropic;
    switch_from_snapshot(scope, &[Credential::AnthropicApiKey]);

    let api_key = required(scope, PROVIDER, Credential::AnthropicApiKey)?;
    let client = anthropic::Client::new(api_key.as_str())
        .map_err(|e| ClientError::build(PROVIDER, e))?;
    Ok(
        LlmClient::new(PROVIDER, ClientKind::Anthropic(client), model, temperature)
            .with_max_tokens(MAX_TOKENS),
    )
}

fn create_groq(model: &str, temperature: f64, scope: &mut EnvScope<'_>) -> Result<LlmClient> {
    const PROVIDER: ProviderKind = ProviderKind::Groq;
    switch_from_snapshot(scope, &[Credential::GroqApiKey]);

    let api_key = required(scope, PROVIDER, Credential::GroqApiKey)?;
    let client = groq::Client::new(api_key.as_str())
        .map_err(|e| ClientError::build(PROVIDER, e))?;
    Ok(
        LlmClient::new(PROVIDER, ClientKind::Groq(client), model, temperature)
            .with_max_tokens(MAX_TOKENS),
    )
}

fn create_google(model: &str, temperature: f64, scope: &mut EnvScope<'_>) -> Result<LlmClient> {
    const PROVIDER: ProviderKind = ProviderKind::Google;
    switch_from_snapshot(scope, &[Credential::GoogleApiKey]);

    let api_key = required(scope, PROVIDER, Credential::GoogleApiKey)?;
    let client = gemini::Client::new(api_key.as_str())
        .map_err(|e| ClientError::build(PROVIDER, e))?;
    Ok(
        LlmClient::new(PROVIDER, ClientKind::Gemini(client), model, temperature)
            .with_system_as_user(),
    )
}

fn create_ollama(model: &str, temperature: f64, scope: &mut EnvScope<'_>) -> Result<LlmClient> {
    const PROVIDER: ProviderKind = ProviderKind::Ollama;
    let host = scope.snapshot().value(Credential::OllamaHost);
    scope.switch(&[
        (Credential::OpenAiApiKey, Some(OLLAMA_SENTINEL_KEY.to_string())),
        (Credential::OpenAiApiBase, host),
    ]);

    let host = required(scope, PROVIDER, Credential::OllamaHost)?;
    local_client(PROVIDER, OLLAMA_SENTINEL_KEY, &host, model, temperature)
}

fn create_lmstudio(model: &str, temperature: f64, scope: &mut EnvScope<'_>) -> Result<LlmClient> {
    const PROVIDER: ProviderKind = ProviderKind::LmStudio;
    let api_base = scope.snapshot().value(Credential::LmStudioApiBase);
    scope.switch(&[
        (Credential::OpenAiApiKey, Some(LMSTUDIO_SENTINEL_KEY.to_string())),
        (Credential::OpenAiApiBase, api_base),
    ]);

    let api_base = required(scope, PROVIDER, Credential::LmStudioApiBase)?;
    Ok(
        local_client(PROVIDER, LMSTUDIO_SENTINEL_KEY, &api_base, model, temperature)?
            .with_max_tokens(MAX_TOKENS),
    )
}

/// OpenAI-compatible client for a self-hosted gateway.
fn local_client(
    provider: ProviderKind,
    sentinel_key: &str,
    host: &str,
    model: &str,
    temperature: f64,
) -> Result<LlmClient> {
    let base_url = openai_compatible_base(host);
    let client = openai::Client::builder()
        .api_key(sentinel_key)
        .base_url(&base_url)
        .build()
        .map_err(|e| ClientError::build(provider, e))?;
    Ok(LlmClient::new(provider, ClientKind::OpenAI(client), model, temperature)
        .with_base_url(base_url))
}

/// Switches the given credentials to their current snapshot values.
fn switch_from_snapshot(scope: &mut EnvScope<'_>, credentials: &[Credential]) {
    let overrides: Vec<_> = credentials
        .iter()
        .map(|&c| (c, scope.snapshot().value(c)))
        .collect();
    scope.switch(&overrides);
}

/// Reads a credential that must be set and non-empty.
fn required(
    scope: &EnvScope<'_>,
    provider: ProviderKind,
    credential: Credential,
) -> Result<String> {
    scope
        .var(credential)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ClientError::missing(provider, credential))
}

/// Normalizes a host or base URL to its `/v1` OpenAI-compatible endpoint.
fn openai_compatible_base(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.ends_with("/v1") {
        host.to_string()
    } else {
        format!("{host}/v1")
    }
}
