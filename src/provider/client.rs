//! The configured client handed back to callers.
//!
//! Contains [`LlmClient`], which wraps rig-core provider clients behind enum
//! dispatch together with the model and sampling settings chosen at
//! construction time.

use std::fmt;

use anyhow::{Context, Result};
use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers::{anthropic, gemini, groq, openai};

use super::kind::ProviderKind;

/// Internal enum wrapping provider-specific clients.
pub(super) enum ClientKind {
    /// OpenAI and the OpenAI-compatible local gateways (Ollama, LM Studio).
    OpenAI(openai::Client),
    Groq(groq::Client),
    Gemini(gemini::Client),
    Anthropic(anthropic::Client),
}

/// A language-model client configured for one provider and model.
///
/// Built by [`ClientFactory`](crate::ClientFactory). Agents are constructed
/// on each call since they are cheap to create and may use different system
/// prompts.
pub struct LlmClient {
    provider: ProviderKind,
    client: ClientKind,
    model: String,
    temperature: f64,
    base_url: Option<String>,
    max_tokens: Option<u64>,
    system_as_user: bool,
}

/// Builds an agent from the given client with the client's settings, then
/// executes the provided block with the agent bound to `$agent`.
macro_rules! with_agent {
    ($client:expr, $this:expr, $sys:expr, |$agent:ident| $body:expr) => {{
        let mut builder = $client
            .agent(&$this.model)
            .temperature($this.temperature);
        if let Some(max_tokens) = $this.max_tokens {
            builder = builder.max_tokens(max_tokens);
        }
        if let Some(sys) = $sys {
            builder = builder.preamble(sys);
        }
        let $agent = builder.build();
        $body
    }};
}

/// Dispatches an operation across provider-specific clients.
macro_rules! dispatch {
    ($self:expr, |$client:ident| $body:expr) => {
        match &$self.client {
            ClientKind::OpenAI($client) => $body,
            ClientKind::Groq($client) => $body,
            ClientKind::Gemini($client) => $body,
            ClientKind::Anthropic($client) => $body,
        }
    };
}

impl LlmClient {
    pub(super) fn new(
        provider: ProviderKind,
        client: ClientKind,
        model: &str,
        temperature: f64,
    ) -> Self {
        Self {
            provider,
            client,
            model: model.to_string(),
            temperature,
            base_url: None,
            max_tokens: None,
            system_as_user: false,
        }
    }

    pub(super) fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub(super) fn with_max_tokens(mut self, max_tokens: u64) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub(super) fn with_system_as_user(mut self) -> Self {
        self.system_as_user = true;
        self
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Endpoint the client talks to, when it isn't the vendor's fixed one.
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn max_tokens(&self) -> Option<u64> {
        self.max_tokens
    }

    /// Whether system prompts are folded into the user message.
    pub fn system_as_user(&self) -> bool {
        self.system_as_user
    }

    /// Sends a prompt to the configured model and returns the full response.
    ///
    /// Providers without system-message support get the system prompt
    /// prepended to the user message instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the LLM API call fails (network error,
    /// invalid key, rate limit, etc.).
    pub async fn complete(&self, prompt: &str, system_prompt: Option<&str>) -> Result<String> {
        let (prompt, system_prompt) = self.fold_system_prompt(prompt, system_prompt);
        let response = dispatch!(self, |client| {
            with_agent!(client, self, system_prompt, |agent| {
                agent
                    .prompt(prompt.as_str())
                    .await
                    .with_context(|| format!("{} API call failed", self.provider))?
            })
        });
        Ok(response)
    }

    fn fold_system_prompt<'a>(
        &self,
        prompt: &str,
        system_prompt: Option<&'a str>,
    ) -> (String, Option<&'a str>) {
        match system_prompt {
            Some(sys) if self.system_as_user => (format!("{sys}\n\n{prompt}"), None),
            sys => (prompt.to_string(), sys),
        }
    }
}

impl fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmClient")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("base_url", &self.base_url)
            .field("max_tokens", &self.max_tokens)
            .field("system_as_user", &self.system_as_user)
            .finish_non_exhaustive()
    }
}
