use anyhow::{Context, Result};
use clap::Parser;
use hrscraper::config::{Args, Config};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging (stderr; stdout is for the result line) ───────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .init();

    // ─── 2) resolve config ───────────────────────────────────────────
    let args = Args::parse();
    let config = Config::from_args(&args).context("loading configuration")?;
    info!(url = %config.url, output = %config.output.display(), "startup");

    // ─── 3) scrape → csv ─────────────────────────────────────────────
    let client = config.client()?;
    hrscraper::run(&client, &config)
        .await
        .with_context(|| format!("extracting table {} from {}", config.table_index, config.url))?;

    println!("Saved {}", config.output.display());
    Ok(())
}
