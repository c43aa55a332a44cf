//! Environment variable substitution and effective settings.

use std::path::PathBuf;

use super::types::Config;
use crate::constants::DEFAULT_TEMPERATURE;

impl Config {
    /// Resolve {env:VAR_NAME} patterns in string fields.
    pub(super) fn resolve_substitutions(&mut self) {
        if let Some(ref mut llm) = self.default_llm {
            *llm = Self::resolve_str(llm);
        }
        if let Some(ref mut path) = self.secrets_file {
            *path = PathBuf::from(Self::resolve_str(&path.to_string_lossy()));
        }
    }

    /// Replace {env:VAR} with the environment variable value.
    ///
    /// Substituted values are inserted verbatim and never rescanned.
    fn resolve_str(s: &str) -> String {
        let mut result = String::with_capacity(s.len());
        let mut rest = s;
        while let Some(start) = rest.find("{env:") {
            let Some(end) = rest[start..].find('}') else {
                break;
            };
            let var_name = &rest[start + 5..start + end];
            result.push_str(&rest[..start]);
            result.push_str(&std::env::var(var_name).unwrap_or_default());
            rest = &rest[start + end + 1..];
        }
        result.push_str(rest);
        result
    }

    /// Sampling temperature to use when the caller doesn't pick one.
    pub fn temperature(&self) -> f64 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }
}
