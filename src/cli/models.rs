//! `llmswitch models`: list selectable models grouped by provider.

use anyhow::Result;
use colored::Colorize;

use crate::provider::{format_selector, list_ollama_models};
use crate::secrets::Credential;
use crate::{ClientFactory, ProviderKind};

/// Print every selector, grouped by provider.
///
/// With `discover`, the Ollama host is also queried for installed models.
pub async fn list_models(factory: &ClientFactory, discover: bool) -> Result<()> {
    println!("Available models:\n");

    for entry in factory.registry().entries() {
        println!("  {}:", entry.kind().name().bold());
        if entry.models().is_empty() && entry.kind() != ProviderKind::Ollama {
            println!("    (none configured)");
        }
        for model in entry.models() {
            println!("    {}", format_selector(entry.kind().name(), model));
        }
        if entry.kind() == ProviderKind::Ollama {
            print_ollama(factory, entry.models(), discover).await;
        }
        println!();
    }

    Ok(())
}

async fn print_ollama(factory: &ClientFactory, configured: &[String], discover: bool) {
    if !discover {
        if configured.is_empty() {
            println!("    {}", "(set OLLAMA_MODELS or use --discover)".dimmed());
        }
        return;
    }
    let Some(host) = factory.snapshot().value(Credential::OllamaHost) else {
        println!("    {}", "(OLLAMA_HOST not set)".dimmed());
        return;
    };

    match list_ollama_models(&host).await {
        Ok(models) if models.is_empty() => {
            println!("    {}", "(no models found -- run `ollama pull llama3`)".dimmed());
        }
        Ok(models) => {
            for model in models.iter().filter(|m| !configured.contains(m)) {
                println!(
                    "    {} {}",
                    format_selector(ProviderKind::Ollama.name(), model),
                    "(installed)".dimmed()
                );
            }
        }
        Err(err) => {
            println!("    {}", format!("(ollama not reachable: {err})").dimmed());
        }
    }
}
