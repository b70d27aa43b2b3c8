use std::{net::SocketAddr, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use marquee_banner::{BannerModule, Config};
use tracing_subscriber::EnvFilter;

/// Serve the marquee banner settings and render API
#[derive(Debug, Parser)]
#[command(name = "banner-server", version)]
struct Cli {
    /// YAML configuration file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8087")]
    bind: SocketAddr,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    /// Tracing filter directive, overrides RUST_LOG
    #[arg(long)]
    log_filter: Option<String>,
}

fn init_logging(cli: &Cli) {
    let filter = match &cli.log_filter {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if cli.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let config = Config::load(cli.config.as_deref())?;
    tracing::debug!("Loaded configuration: {:?}", config);

    let module = BannerModule::from_config(config);
    let app = module.router();

    let listener = tokio::net::TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("binding {}", cli.bind))?;
    tracing::info!("Marquee banner listening on {}", cli.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}
