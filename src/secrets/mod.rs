//! Session-wide credential store.
//!
//! The [`SecretStore`] holds the last-known value of every recognized
//! [`Credential`]. It is loaded once per session and then kept in step with
//! the environment by [`SecretStore::switch`] and [`SecretStore::restore`].

mod credential;

pub use credential::{Credential, CredentialSnapshot};

use std::path::Path;

use tracing::{debug, info};

use crate::env::{lock_env, Environment};
use crate::error::Result;

/// Last-known credential values for the session.
#[derive(Debug, Default)]
pub struct SecretStore {
    snapshot: CredentialSnapshot,
    loaded: bool,
}

impl SecretStore {
    /// An empty, not yet loaded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the store: applies the secrets file to `env`, then reads every
    /// credential from it.
    ///
    /// With `secrets_file` unset, a `.env` file is searched for from the
    /// current directory upwards. A missing file is not an error. Values from
    /// the file override variables already set, later lines overriding earlier
    /// ones.
    ///
    /// Calling this on a store that is already loaded does nothing.
    ///
    /// # Errors
    ///
    /// - [`crate::ClientError::Secrets`] if the secrets file exists but can't
    ///   be read or parsed.
    /// - [`crate::ClientError::NotUnicode`] if a credential variable holds a
    ///   value that isn't valid Unicode.
    pub fn init(
        &mut self,
        env: &mut dyn Environment,
        secrets_file: Option<&Path>,
    ) -> Result<()> {
        if self.loaded {
            debug!("secret store already loaded");
            return Ok(());
        }
        let _lock = lock_env();
        let applied = load_secrets_file(env, secrets_file)?;
        if applied > 0 {
            info!(count = applied, "applied secrets file");
        }
        self.load(env)
    }

    /// Loads the store from `env` alone, without a secrets file.
    ///
    /// The environment is reconciled with the snapshot afterwards, so
    /// defaulted credentials become visible. Does nothing if already loaded.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ClientError::NotUnicode`] if a credential variable
    /// holds a value that isn't valid Unicode. The environment is left
    /// untouched.
    pub fn init_from_env(&mut self, env: &mut dyn Environment) -> Result<()> {
        if self.loaded {
            return Ok(());
        }
        let _lock = lock_env();
        self.load(env)
    }

    /// Caller holds the environment lock.
    fn load(&mut self, env: &mut dyn Environment) -> Result<()> {
        self.snapshot = CredentialSnapshot::from_env(&*env)?;
        self.loaded = true;
        self.restore(env);
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn snapshot(&self) -> &CredentialSnapshot {
        &self.snapshot
    }

    /// Applies overrides to the environment and mirrors them into the snapshot.
    ///
    /// Pairs whose value is `None` are skipped and leave the variable as is.
    pub fn switch(
        &mut self,
        env: &mut dyn Environment,
        overrides: &[(Credential, Option<String>)],
    ) {
        for (credential, value) in overrides {
            let Some(value) = value else {
                continue;
            };
            debug!(var = credential.env_name(), "switching credential");
            env.set_var(credential.env_name(), value);
            self.snapshot.set(*credential, Some(value.clone()));
        }
    }

    /// Reverts the environment to the snapshot.
    ///
    /// Present values are set; absent ones are removed from the environment.
    pub fn restore(&self, env: &mut dyn Environment) {
        for (credential, value) in self.snapshot.iter() {
            match value {
                Some(value) => env.set_var(credential.env_name(), value),
                None => env.remove_var(credential.env_name()),
            }
        }
        debug!("restored credential environment");
    }

    /// Replaces the snapshot wholesale, e.g. to roll back transient overrides.
    pub(crate) fn reset_snapshot(&mut self, snapshot: CredentialSnapshot) {
        self.snapshot = snapshot;
    }
}

/// Applies every entry of a dotenv-format file to `env`.
///
/// Returns the number of variables applied.
fn load_secrets_file(
    env: &mut dyn Environment,
    path: Option<&Path>,
) -> std::result::Result<usize, dotenvy::Error> {
    let iter = match path {
        Some(path) => dotenvy::from_path_iter(path),
        None => dotenvy::dotenv_iter(),
    };
    let iter = match iter {
        Ok(iter) => iter,
        Err(err) if err.not_found() => {
            debug!("no secrets file found");
            return Ok(0);
        }
        Err(err) => return Err(err),
    };

    let mut applied = 0;
    for item in iter {
        let (name, value) = item?;
        env.set_var(&name, &value);
        applied += 1;
    }
    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::OPENAI_DEFAULT_BASE_URL;
    use crate::env::MapEnv;
    use crate::error::ClientError;
    use std::io::Write;

    fn secrets_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_init_reads_env_and_reconciles_defaults() {
        let mut env = MapEnv::from_pairs([("GROQ_API_KEY", "gsk-1")]);
        let mut store = SecretStore::new();
        store.init_from_env(&mut env).unwrap();

        assert!(store.is_loaded());
        assert_eq!(store.snapshot().get(Credential::GroqApiKey), Some("gsk-1"));
        assert_eq!(
            env.var("OPENAI_API_BASE").as_deref(),
            Some(OPENAI_DEFAULT_BASE_URL)
        );
    }

    #[test]
    fn test_init_is_idempotent() {
        let mut env = MapEnv::from_pairs([("ANTHROPIC_API_KEY", "first")]);
        let mut store = SecretStore::new();
        store.init_from_env(&mut env).unwrap();

        env.set_var("ANTHROPIC_API_KEY", "second");
        let file = secrets_file("ANTHROPIC_API_KEY=third\n");
        store.init(&mut env, Some(file.path())).unwrap();

        assert_eq!(
            store.snapshot().get(Credential::AnthropicApiKey),
            Some("first")
        );
        // The file isn't applied on a repeated init either.
        assert_eq!(env.var("ANTHROPIC_API_KEY").as_deref(), Some("second"));
    }

    #[test]
    fn test_secrets_file_overrides_env_and_earlier_lines() {
        let mut env = MapEnv::from_pairs([("OPENAI_API_KEY", "from-env")]);
        let file = secrets_file(
            "OPENAI_API_KEY=from-file\nOLLAMA_HOST=http://a:11434\nOLLAMA_HOST=http://b:11434\n",
        );
        let mut store = SecretStore::new();
        store.init(&mut env, Some(file.path())).unwrap();

        assert_eq!(
            store.snapshot().get(Credential::OpenAiApiKey),
            Some("from-file")
        );
        assert_eq!(
            store.snapshot().get(Credential::OllamaHost),
            Some("http://b:11434")
        );
    }

    #[test]
    fn test_missing_secrets_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let mut env = MapEnv::new();
        let mut store = SecretStore::new();
        store
            .init(&mut env, Some(dir.path().join("absent.env").as_path()))
            .unwrap();
        assert!(store.is_loaded());
    }

    #[test]
    fn test_malformed_secrets_file_errors() {
        let file = secrets_file("NOT A VALID LINE\n");
        let mut env = MapEnv::new();
        let mut store = SecretStore::new();
        let err = store.init(&mut env, Some(file.path())).unwrap_err();
        assert!(matches!(err, ClientError::Secrets(_)));
        assert!(!store.is_loaded());
    }

    #[test]
    fn test_switch_skips_absent_values() {
        let mut env = MapEnv::from_pairs([("GROQ_API_KEY", "gsk-1")]);
        let mut store = SecretStore::new();
        store.init_from_env(&mut env).unwrap();

        store.switch(
            &mut env,
            &[
                (Credential::GroqApiKey, None),
                (Credential::GoogleApiKey, Some("g-1".into())),
            ],
        );

        assert_eq!(env.var("GROQ_API_KEY").as_deref(), Some("gsk-1"));
        assert_eq!(env.var("GOOGLE_API_KEY").as_deref(), Some("g-1"));
        assert_eq!(store.snapshot().get(Credential::GoogleApiKey), Some("g-1"));
    }

    #[test]
    fn test_restore_removes_unset_credentials() {
        let mut env = MapEnv::new();
        let mut store = SecretStore::new();
        store.init_from_env(&mut env).unwrap();

        env.set_var("LMSTUDIO_API_BASE", "http://stray:1234/v1");
        env.set_var("UNRELATED", "kept");
        store.restore(&mut env);

        assert!(!env.contains("LMSTUDIO_API_BASE"));
        assert_eq!(env.var("UNRELATED").as_deref(), Some("kept"));
    }

    /// Records whether every write happened under the environment lock.
    #[derive(Default)]
    struct RecordingEnv {
        inner: MapEnv,
        unlocked_writes: usize,
    }

    impl Environment for RecordingEnv {
        fn var(&self, name: &str) -> Option<String> {
            self.inner.var(name)
        }
        fn set_var(&mut self, name: &str, value: &str) {
            if !crate::env::env_locked() {
                self.unlocked_writes += 1;
            }
            self.inner.set_var(name, value);
        }
        fn remove_var(&mut self, name: &str) {
            if !crate::env::env_locked() {
                self.unlocked_writes += 1;
            }
            self.inner.remove_var(name);
        }
    }

    #[test]
    fn test_init_writes_under_env_lock() {
        let file = secrets_file("GROQ_API_KEY=gsk-file\n");
        let mut env = RecordingEnv::default();
        let mut store = SecretStore::new();
        store.init(&mut env, Some(file.path())).unwrap();

        assert_eq!(env.inner.var("GROQ_API_KEY").as_deref(), Some("gsk-file"));
        assert_eq!(env.unlocked_writes, 0);

        let mut env = RecordingEnv::default();
        SecretStore::new().init_from_env(&mut env).unwrap();
        assert!(env.inner.contains("OPENAI_API_BASE"));
        assert_eq!(env.unlocked_writes, 0);
    }
}
