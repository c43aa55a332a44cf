//! Client factory: turns a `"<Provider>: <model>"` selector into an [`LlmClient`].
//!
//! The factory owns the session's [`SecretStore`] and the environment it
//! mirrors. Every construction runs inside an [`EnvScope`], so the
//! environment is back to the snapshot once `create_client` returns, whether
//! construction succeeded or failed.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use tracing::{info, warn};

use crate::config::Config;
use crate::constants::DEFAULT_TEMPERATURE;
use crate::env::{EnvScope, Environment, ProcessEnv};
use crate::error::{ClientError, Result};
use crate::provider::{LlmClient, ProviderRegistry, Selector};
use crate::secrets::{CredentialSnapshot, SecretStore};

struct FactoryState<E> {
    store: SecretStore,
    env: E,
}

/// Builds provider clients from selector strings.
pub struct ClientFactory<E: Environment = ProcessEnv> {
    registry: ProviderRegistry,
    state: Mutex<FactoryState<E>>,
}

impl<E: Environment> ClientFactory<E> {
    /// Loads the secret store and registry for `env` using `config`.
    ///
    /// Applies the configured secrets file (or a `.env` found from the current
    /// directory) before reading credentials, and resolves model lists from
    /// the environment and the config's `[models]` table.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Secrets`] if the secrets file can't be loaded.
    /// - [`ClientError::NotUnicode`] if a credential variable isn't valid
    ///   Unicode.
    pub fn load(mut env: E, config: &Config) -> Result<Self> {
        let mut store = SecretStore::new();
        store.init(&mut env, config.secrets_file.as_deref())?;
        let registry =
            ProviderRegistry::from_sources(Some(&env as &dyn Environment), &config.models);
        Ok(Self::with_parts(registry, store, env))
    }

    /// Builds a factory from `env` alone, without a secrets file or config.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotUnicode`] if a credential variable isn't
    /// valid Unicode. Nothing in `env` is changed in that case.
    pub fn from_env(mut env: E) -> Result<Self> {
        let mut store = SecretStore::new();
        store.init_from_env(&mut env)?;
        let registry =
            ProviderRegistry::from_sources(Some(&env as &dyn Environment), &BTreeMap::new());
        Ok(Self::with_parts(registry, store, env))
    }

    fn with_parts(registry: ProviderRegistry, store: SecretStore, env: E) -> Self {
        Self {
            registry,
            state: Mutex::new(FactoryState { store, env }),
        }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Returns a copy of the current credential snapshot.
    pub fn snapshot(&self) -> CredentialSnapshot {
        self.lock_state().store.snapshot().clone()
    }

    /// Runs `f` against the factory's environment.
    pub fn inspect_env<R>(&self, f: impl FnOnce(&E) -> R) -> R {
        f(&self.lock_state().env)
    }

    /// Creates a client for `selector` at `temperature`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Format`] if `selector` lacks `": "`.
    /// - [`ClientError::UnknownProvider`] if the provider isn't registered.
    /// - [`ClientError::Configuration`] if a required credential is missing.
    /// - [`ClientError::Build`] if rig-core rejects the client settings.
    ///
    /// The first two are detected before the environment is touched.
    pub fn create_client(&self, selector: &str, temperature: f64) -> Result<LlmClient> {
        let Selector { provider, model } = Selector::parse(selector)?;
        let entry = self
            .registry
            .get(provider)
            .ok_or_else(|| ClientError::UnknownProvider(provider.to_string()))?;

        let mut state = self.lock_state();
        let FactoryState { store, env } = &mut *state;
        let result = {
            let mut scope = EnvScope::enter(store, env);
            entry.create_client(model, temperature, &mut scope)
        };

        match &result {
            Ok(client) => {
                info!(provider = %client.provider(), model, temperature, "created client");
            }
            Err(err) => warn!(provider, model, error = %err, "client creation failed"),
        }
        result
    }

    /// Creates a client at the default temperature.
    pub fn create_default(&self, selector: &str) -> Result<LlmClient> {
        self.create_client(selector, DEFAULT_TEMPERATURE)
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, FactoryState<E>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{MAX_TOKENS, OPENAI_DEFAULT_BASE_URL};
    use crate::env::MapEnv;
    use crate::provider::ProviderKind;
    use crate::secrets::Credential;

    fn factory(pairs: &[(&str, &str)]) -> ClientFactory<MapEnv> {
        ClientFactory::from_env(MapEnv::from_pairs(pairs.iter().copied())).unwrap()
    }

    fn env_of(factory: &ClientFactory<MapEnv>) -> MapEnv {
        factory.inspect_env(MapEnv::clone)
    }

    #[test]
    fn test_openai_scenario() {
        let factory = factory(&[("OPENAI_API_KEY", "sk-x")]);
        let llm = factory.create_client("OpenAI: gpt-4o", 0.2).unwrap();
        assert_eq!(llm.provider(), ProviderKind::OpenAI);
        assert_eq!(llm.model(), "gpt-4o");
        assert_eq!(llm.temperature(), 0.2);
        assert_eq!(llm.base_url(), Some(OPENAI_DEFAULT_BASE_URL));
    }

    #[test]
    fn test_missing_anthropic_key_names_provider() {
        let factory = factory(&[("OPENAI_API_KEY", "sk-x")]);
        let err = factory
            .create_client("Anthropic: claude-3-5-sonnet-20240620", 0.15)
            .unwrap_err();
        assert!(matches!(err, ClientError::Configuration { .. }));
        assert!(err.to_string().contains("Anthropic"));
    }

    #[test]
    fn test_default_temperature() {
        let factory = factory(&[("GROQ_API_KEY", "gsk")]);
        let llm = factory.create_default("Groq: llama3-70b-8192").unwrap();
        assert_eq!(llm.temperature(), DEFAULT_TEMPERATURE);
        assert_eq!(llm.max_tokens(), Some(MAX_TOKENS));
    }

    #[test]
    fn test_success_leaves_environment_unchanged() {
        let factory = factory(&[
            ("OPENAI_API_KEY", "sk-x"),
            ("GROQ_API_KEY", "gsk"),
            ("GOOGLE_API_KEY", "g"),
            ("ANTHROPIC_API_KEY", "sk-ant"),
            ("OLLAMA_HOST", "http://localhost:11434"),
            ("LMSTUDIO_API_BASE", "http://localhost:1234/v1"),
        ]);
        let before = env_of(&factory);
        let snapshot = factory.snapshot();

        for selector in [
            "OpenAI: gpt-4o",
            "Groq: llama3-8b-8192",
            "Google: gemini-1.5-pro",
            "Ollama: llama3",
            "Anthropic: claude-3-5-sonnet-20240620",
            "LM Studio: lms-default",
        ] {
            factory.create_client(selector, 0.15).unwrap();
            assert_eq!(env_of(&factory), before, "after {selector}");
            assert_eq!(factory.snapshot(), snapshot, "after {selector}");
        }
    }

    #[test]
    fn test_format_error_does_not_touch_environment() {
        let factory = factory(&[("OPENAI_API_KEY", "sk-x")]);
        let before = env_of(&factory);

        let err = factory.create_client("OpenAI gpt-4o", 0.15).unwrap_err();
        assert!(matches!(err, ClientError::Format(_)));
        assert_eq!(env_of(&factory), before);
    }

    #[test]
    fn test_unknown_provider_does_not_touch_environment() {
        let factory = factory(&[("OPENAI_API_KEY", "sk-x")]);
        let before = env_of(&factory);

        let err = factory.create_client("Mistral: mistral-large", 0.15).unwrap_err();
        assert!(matches!(err, ClientError::UnknownProvider(ref p) if p == "Mistral"));
        assert!(err.to_string().contains("Mistral"));
        assert_eq!(env_of(&factory), before);
    }

    #[test]
    fn test_provider_name_is_case_sensitive() {
        let factory = factory(&[("OPENAI_API_KEY", "sk-x")]);
        let before = env_of(&factory);

        let err = factory.create_client("openai: gpt-4o", 0.15).unwrap_err();
        assert!(matches!(err, ClientError::UnknownProvider(ref p) if p == "openai"));
        assert_eq!(env_of(&factory), before);
    }

    #[test]
    fn test_configuration_error_still_restores_environment() {
        let factory = factory(&[("OPENAI_API_KEY", "sk-real")]);
        let before = env_of(&factory);

        // LM Studio switches its sentinel key before discovering the base is missing.
        let err = factory.create_client("LM Studio: lms-default", 0.15).unwrap_err();
        assert!(matches!(err, ClientError::Configuration { .. }));
        assert_eq!(env_of(&factory), before);
        assert_eq!(
            factory.snapshot().get(Credential::OpenAiApiKey),
            Some("sk-real")
        );
    }

    #[test]
    fn test_switching_providers_leaves_no_transient_values() {
        let factory = factory(&[
            ("OLLAMA_HOST", "http://localhost:11434"),
            ("LMSTUDIO_API_BASE", "http://localhost:1234/v1"),
        ]);
        let before = env_of(&factory);

        factory.create_client("Ollama: llama3", 0.15).unwrap();
        factory.create_client("LM Studio: lms-default", 0.15).unwrap();

        let after = env_of(&factory);
        assert_eq!(after, before);
        assert!(!after.contains("OPENAI_API_KEY"));
        assert_eq!(
            after.var("OPENAI_API_BASE").as_deref(),
            Some(OPENAI_DEFAULT_BASE_URL)
        );
    }

    #[test]
    fn test_openai_after_local_provider_needs_real_key() {
        let factory = factory(&[("OLLAMA_HOST", "http://localhost:11434")]);
        factory.create_client("Ollama: llama3", 0.15).unwrap();

        // The Ollama sentinel key must not leak into the OpenAI selection.
        let err = factory.create_client("OpenAI: gpt-4o", 0.15).unwrap_err();
        assert!(matches!(
            err,
            ClientError::Configuration {
                provider: ProviderKind::OpenAI,
                ..
            }
        ));
    }

    #[test]
    fn test_load_applies_secrets_file_and_model_overrides() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ANTHROPIC_API_KEY=sk-ant-file").unwrap();

        let config = Config {
            secrets_file: Some(file.path().to_path_buf()),
            models: BTreeMap::from([(
                "Anthropic".to_string(),
                vec!["claude-3-opus-20240229".to_string()],
            )]),
            ..Config::default()
        };
        let factory = ClientFactory::load(MapEnv::new(), &config).unwrap();

        assert_eq!(
            factory.registry().get("Anthropic").unwrap().models(),
            ["claude-3-opus-20240229"]
        );
        let llm = factory
            .create_client("Anthropic: claude-3-opus-20240229", 0.15)
            .unwrap();
        assert_eq!(llm.max_tokens(), Some(MAX_TOKENS));
    }

    #[test]
    #[serial_test::serial]
    fn test_process_environment_round_trip() {
        let saved: Vec<_> = Credential::ALL
            .iter()
            .map(|c| (c.env_name(), std::env::var(c.env_name()).ok()))
            .collect();
        for (name, _) in &saved {
            std::env::remove_var(name);
        }
        std::env::set_var("GROQ_API_KEY", "gsk-process");
        std::env::set_var("OLLAMA_HOST", "http://localhost:11434");

        let factory = ClientFactory::from_env(ProcessEnv).unwrap();
        factory.create_client("Groq: llama3-8b-8192", 0.15).unwrap();
        factory.create_client("Ollama: llama3", 0.15).unwrap();
        let err = factory.create_client("Google: gemini-1.5-pro", 0.15);

        let openai_key = std::env::var("OPENAI_API_KEY").ok();
        let groq_key = std::env::var("GROQ_API_KEY").ok();
        let openai_base = std::env::var("OPENAI_API_BASE").ok();

        for (name, value) in saved {
            match value {
                Some(value) => std::env::set_var(name, value),
                None => std::env::remove_var(name),
            }
        }

        assert!(err.is_err());
        assert_eq!(openai_key, None);
        assert_eq!(groq_key.as_deref(), Some("gsk-process"));
        assert_eq!(openai_base.as_deref(), Some(OPENAI_DEFAULT_BASE_URL));
    }

    #[cfg(unix)]
    #[test]
    #[serial_test::serial]
    fn test_non_unicode_credential_fails_load_and_is_kept() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let raw = OsStr::from_bytes(b"http://h\xff:11434");
        let saved = std::env::var_os("OLLAMA_HOST");
        std::env::set_var("OLLAMA_HOST", raw);

        let result = ClientFactory::from_env(ProcessEnv);
        let after = std::env::var_os("OLLAMA_HOST");

        match saved {
            Some(value) => std::env::set_var("OLLAMA_HOST", value),
            None => std::env::remove_var("OLLAMA_HOST"),
        }

        assert!(matches!(result, Err(ClientError::NotUnicode("OLLAMA_HOST"))));
        assert_eq!(after.as_deref(), Some(raw));
    }
}
