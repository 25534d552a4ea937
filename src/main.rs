// Entrypoint for the harvester.
// - Keeps `main` small: set up logging, read config, build the API client
//   and hand it to the interactive workflow.
// - Diagnostics go to stderr through `tracing`; the workflow talks to the
//   operator on stdout.

use anyhow::{Context, Result};
use groupme_linkedin::{api::ApiClient, config::Config, ui::run};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    init_tracing()?;

    let config = Config::from_env().context("Failed to load configuration")?;
    let api = ApiClient::new(&config).context("Failed to build HTTP client")?;

    // Blocks until the operator presses Enter on the final screen.
    run(api, &config)
}

/// `RUST_LOG` picks the level (default `warn` so the prompts stay readable);
/// `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| matches!(v.to_lowercase().as_str(), "json" | "structured"))
        .unwrap_or(false);

    if use_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    }

    Ok(())
}
