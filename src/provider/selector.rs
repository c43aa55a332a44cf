//! Parsing of `"<Provider>: <model>"` selector strings.

use crate::constants::SELECTOR_SEPARATOR;
use crate::error::{ClientError, Result};

/// A selector split into its provider name and model identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selector<'a> {
    pub provider: &'a str,
    pub model: &'a str,
}

impl<'a> Selector<'a> {
    /// Splits `input` on the first `": "`.
    ///
    /// The provider name isn't validated here; that is the registry's job.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Format`] when the separator is missing.
    pub fn parse(input: &'a str) -> Result<Self> {
        let (provider, model) = input
            .split_once(SELECTOR_SEPARATOR)
            .ok_or_else(|| ClientError::Format(input.to_string()))?;
        Ok(Self { provider, model })
    }
}

/// Formats a provider/model pair as a selector string.
pub fn format_selector(provider: &str, model: &str) -> String {
    format!("{provider}{SELECTOR_SEPARATOR}{model}")
}
