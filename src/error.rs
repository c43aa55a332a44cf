//! Error types surfaced by client construction.

use thiserror::Error;

use crate::provider::ProviderKind;
use crate::secrets::Credential;

/// Errors returned while loading credentials, by
/// [`ClientFactory::create_client`](crate::ClientFactory::create_client), and by
/// the per-provider constructors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The selector string isn't of the form `"<Provider>: <model>"`.
    #[error("Invalid model selector {0:?}: expected \"<Provider>: <model>\"")]
    Format(String),

    /// The selector names a provider that isn't in the registry.
    #[error("LLM provider {0} is not recognized or not supported")]
    UnknownProvider(String),

    /// A credential the chosen provider needs is unset or empty.
    #[error("{what} not set for {provider} (set {var} in the environment or secrets file)")]
    Configuration {
        provider: ProviderKind,
        what: &'static str,
        var: &'static str,
    },

    /// The underlying provider client could not be built.
    #[error("Failed to create {provider} client: {message}")]
    Build {
        provider: ProviderKind,
        message: String,
    },

    /// A credential variable is set to a value that isn't valid Unicode, so
    /// it can't be snapshotted or restored faithfully.
    #[error("Environment variable {0} is set but is not valid Unicode")]
    NotUnicode(&'static str),

    /// The secrets file exists but couldn't be read or parsed.
    #[error("Failed to load secrets file: {0}")]
    Secrets(#[from] dotenvy::Error),
}

impl ClientError {
    /// Configuration error for a missing credential.
    pub(crate) fn missing(provider: ProviderKind, credential: Credential) -> Self {
        Self::Configuration {
            provider,
            what: credential.description(),
            var: credential.env_name(),
        }
    }

    pub(crate) fn build(provider: ProviderKind, err: impl std::fmt::Display) -> Self {
        Self::Build {
            provider,
            message: err.to_string(),
        }
    }
}

/// Result alias for client construction.
pub type Result<T, E = ClientError> = std::result::Result<T, E>;
