//! Configuration types and path resolution for llmswitch.
//!
//! llmswitch stores its settings as TOML at the platform's XDG config path
//! (e.g. `~/.config/llmswitch/config.toml` on Linux). A project-level
//! `llmswitch.toml` overrides it.

mod loader;
mod paths;
mod resolve;
mod types;

pub use types::Config;

use anyhow::Result;

impl Config {
    /// Load config with precedence: project > global > defaults.
    /// Creates default config file if none exists.
    pub fn load() -> Result<Self> {
        let global = Self::load_global()?;
        let project = match Self::find_project(&std::env::current_dir()?) {
            Some(path) => Some(Self::load_from(&path)?),
            None => None,
        };

        let mut config = global;
        if let Some(proj) = project {
            config = Self::merge(config, proj);
        }

        config.resolve_substitutions();
        Ok(config)
    }
}
