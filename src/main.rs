use anyhow::{Context, Result};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use thread_order_check::config::Config;
use thread_order_check::threads::{check_descending, ThreadFetcher};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    init_tracing()?;

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    let fetcher = ThreadFetcher::new(&config).context("Failed to set up threads fetcher")?;
    info!(
        mode = ?config.api_mode,
        endpoint = %fetcher.endpoint(),
        max_pages = config.max_pages,
        "Configuration loaded"
    );

    let outcome = fetcher
        .fetch_all()
        .await
        .context("Failed to fetch threads")?;

    info!(
        threads = outcome.threads.len(),
        pages = outcome.pages_fetched,
        truncated = outcome.truncated,
        "Fetched threads"
    );
    if outcome.truncated {
        warn!("Only the first {} pages were checked", outcome.pages_fetched);
    }

    let report = check_descending(&outcome.threads);
    for violation in &report.violations {
        warn!(
            index = violation.index,
            previous_index = violation.previous_index,
            "Threads are not in descending order: {violation}"
        );
    }

    if report.is_ordered() {
        info!(checked = report.checked, "Threads are in descending order");
    } else {
        error!(
            checked = report.checked,
            violations = report.violations.len(),
            "Threads are not in descending order"
        );
    }

    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,thread_order_check=debug"));

    // Check if JSON logging is requested
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| matches!(v.to_lowercase().as_str(), "json" | "structured"))
        .unwrap_or(false);

    if use_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    }

    Ok(())
}
