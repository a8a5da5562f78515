use anyhow::{Context, Result};
use candidates::{fetch::SparqlClient, pipeline, Config};
use tokio::time::Instant;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) configuration, read once ─────────────────────────────────
    let config = Config::from_env()
        .inspect_err(|e| error!(error = %e, "invalid configuration"))
        .context("reading configuration")?;
    info!(
        limit = config.limit,
        endpoint = %config.endpoint,
        out = %config.output_path.display(),
        keep_newlines = config.keep_newlines,
        "configured"
    );

    // ─── 3) fetch → transform → write ────────────────────────────────
    let client = SparqlClient::from_config(&config)?;
    let start = Instant::now();
    let report = pipeline::run(&config, &client)
        .await
        .with_context(|| format!("writing {}", config.output_path.display()))?;

    info!(
        rows = report.rows,
        degraded = report.is_degraded(),
        elapsed = ?start.elapsed(),
        "all done"
    );
    Ok(())
}
