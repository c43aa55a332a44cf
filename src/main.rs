//! Entry point for llmswitch.
//!
//! Initializes logging, parses CLI arguments via [`llmswitch::cli`], and
//! dispatches to the appropriate subcommand handler.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use llmswitch::{cli, constants};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(constants::DEFAULT_LOG_FILTER)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::parse();
    cli::run(cli).await
}
