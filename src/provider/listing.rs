//! Model discovery for the Ollama provider.
//!
//! Ollama's model list is whatever the host has pulled, so besides the
//! configured list it can be queried from the host's `/api/tags` endpoint.

use anyhow::{Context, Result};

/// Query an Ollama host for its installed models.
pub async fn list_ollama_models(host: &str) -> Result<Vec<String>> {
    let url = tags_url(host);
    let resp: serde_json::Value = reqwest::get(&url)
        .await
        .with_context(|| format!("Failed to reach Ollama at {url}"))?
        .json()
        .await
        .context("Ollama returned an invalid model list")?;

    Ok(model_names(&resp))
}

fn tags_url(host: &str) -> String {
    let host = host.trim_end_matches('/');
    let host = host.strip_suffix("/v1").unwrap_or(host);
    format!("{host}/api/tags")
}

fn model_names(resp: &serde_json::Value) -> Vec<String> {
    resp["models"]
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|m| m["name"].as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}
