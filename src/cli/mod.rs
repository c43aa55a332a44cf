//! Command-line interface definition and dispatch for llmswitch.
//!
//! Uses [`clap`] for argument parsing with derive macros. Each subcommand is
//! routed to its handler; model listing lives in the [`models`] submodule.

mod models;

use crate::{config, ClientFactory, LlmClient, ProcessEnv};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

/// Top-level CLI structure for llmswitch.
#[derive(Parser)]
#[command(
    name = "llmswitch",
    about = "Resolve \"Provider: model\" selectors into LLM clients"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for the llmswitch CLI.
///
/// The `///` doc comments on variants double as `--help` text rendered by clap.
#[derive(Subcommand)]
pub enum Commands {
    /// List every selectable "Provider: model"
    Models {
        /// Also ask the Ollama host which models are installed
        #[arg(long)]
        discover: bool,
    },
    /// Build a client and print its settings without calling the API
    Check {
        /// Selector such as "OpenAI: gpt-4o" (defaults to config's default_llm)
        selector: Option<String>,
        /// Sampling temperature
        #[arg(short, long)]
        temperature: Option<f64>,
    },
    /// Ask a one-shot question
    Ask {
        /// The question to ask
        prompt: Vec<String>,
        /// Selector such as "Anthropic: claude-3-5-sonnet-20240620"
        #[arg(short, long)]
        llm: Option<String>,
        /// Sampling temperature
        #[arg(short, long)]
        temperature: Option<f64>,
        /// System prompt
        #[arg(short, long)]
        system: Option<String>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Subcommands for the `config` command.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current config
    Show,
    /// Print the config file path
    Path,
}

/// Parses command-line arguments into a [`Cli`] struct.
///
/// Delegates to [`clap::Parser::parse`], which exits the process on invalid input.
pub fn parse() -> Cli {
    Cli::parse()
}

/// Dispatches the parsed CLI command to its handler.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Models { discover } => {
            let config = config::Config::load()?;
            let factory = load_factory(&config)?;
            models::list_models(&factory, discover).await
        }
        Commands::Check {
            selector,
            temperature,
        } => {
            let config = config::Config::load()?;
            let factory = load_factory(&config)?;
            let selector = resolve_selector(selector, &config)?;
            let temperature = temperature.unwrap_or(config.temperature());
            let llm = factory.create_client(&selector, temperature)?;
            print_client(&llm);
            Ok(())
        }
        Commands::Ask {
            prompt,
            llm,
            temperature,
            system,
        } => {
            let prompt = prompt.join(" ");
            if prompt.is_empty() {
                anyhow::bail!(
                    "No prompt provided. Usage: llmswitch ask --llm \"OpenAI: gpt-4o\" \"your question\""
                );
            }

            let config = config::Config::load()?;
            let factory = load_factory(&config)?;
            let selector = resolve_selector(llm, &config)?;
            let temperature = temperature.unwrap_or(config.temperature());
            let client = factory.create_client(&selector, temperature)?;

            println!("{} [{}]", "llmswitch".bold().cyan(), selector.yellow());
            println!();
            println!("{} {}", ">".green().bold(), prompt);
            println!();

            let response = client.complete(&prompt, system.as_deref()).await?;
            println!("{}", response);
            Ok(())
        }
        Commands::Config { action } => {
            match action {
                ConfigAction::Show => {
                    let config = config::Config::load()?;
                    let path = config::Config::config_path()?;
                    println!("{} {}", "Config path:".bold(), path.display());
                    println!();
                    let toml_str = toml::to_string_pretty(&config)?;
                    println!("{}", toml_str);
                }
                ConfigAction::Path => {
                    println!("{}", config::Config::config_path()?.display());
                }
            }
            Ok(())
        }
    }
}

fn load_factory(config: &config::Config) -> Result<ClientFactory> {
    ClientFactory::load(ProcessEnv, config).context("Failed to load credentials")
}

/// Picks the selector: command line first, then the config's `default_llm`.
fn resolve_selector(cli_selector: Option<String>, config: &config::Config) -> Result<String> {
    cli_selector
        .or_else(|| config.default_llm.clone())
        .context(
            "No model selected. Pass a selector like \"OpenAI: gpt-4o\" or set default_llm in config.toml",
        )
}

fn print_client(llm: &LlmClient) {
    println!("{} {}", "provider:".bold(), llm.provider());
    println!("{} {}", "model:".bold(), llm.model());
    println!("{} {}", "temperature:".bold(), llm.temperature());
    if let Some(base_url) = llm.base_url() {
        println!("{} {}", "base url:".bold(), base_url);
    }
    if let Some(max_tokens) = llm.max_tokens() {
        println!("{} {}", "max tokens:".bold(), max_tokens);
    }
    if llm.system_as_user() {
        println!("{} sent as user message", "system prompt:".bold());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_selector_prefers_cli() {
        let config = config::Config {
            default_llm: Some("Groq: llama3-8b-8192".into()),
            ..Default::default()
        };
        assert_eq!(
            resolve_selector(Some("OpenAI: gpt-4o".into()), &config).unwrap(),
            "OpenAI: gpt-4o"
        );
        assert_eq!(
            resolve_selector(None, &config).unwrap(),
            "Groq: llama3-8b-8192"
        );
        assert!(resolve_selector(None, &config::Config::default()).is_err());
    }

    #[test]
    fn test_parse_ask_args() {
        let cli = Cli::try_parse_from([
            "llmswitch",
            "ask",
            "--llm",
            "LM Studio: lms-default",
            "-t",
            "0.3",
            "what",
            "is",
            "rust",
        ])
        .unwrap();
        match cli.command {
            Commands::Ask {
                prompt,
                llm,
                temperature,
                system,
            } => {
                assert_eq!(prompt, ["what", "is", "rust"]);
                assert_eq!(llm.as_deref(), Some("LM Studio: lms-default"));
                assert_eq!(temperature, Some(0.3));
                assert_eq!(system, None);
            }
            _ => panic!("expected ask"),
        }
    }
}
