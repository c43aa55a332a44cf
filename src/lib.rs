//! llmswitch: resolve `"<Provider>: <model>"` selectors into ready-to-use
//! LLM clients.
//!
//! A [`ClientFactory`] owns the session's credential snapshot. For each
//! selector it switches the provider's API key and base URL into the
//! environment, builds the client, and restores the environment afterwards.
//!
//! ```no_run
//! use llmswitch::{ClientFactory, ProcessEnv};
//!
//! let factory = ClientFactory::from_env(ProcessEnv)?;
//! let llm = factory.create_client("OpenAI: gpt-4o", 0.2)?;
//! assert_eq!(llm.model(), "gpt-4o");
//! # Ok::<(), llmswitch::ClientError>(())
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod env;
pub mod error;
pub mod factory;
pub mod provider;
pub mod secrets;

pub use env::{EnvScope, Environment, MapEnv, ProcessEnv};
pub use error::ClientError;
pub use factory::ClientFactory;
pub use provider::{LlmClient, ProviderKind, ProviderRegistry};
pub use secrets::{Credential, CredentialSnapshot, SecretStore};
