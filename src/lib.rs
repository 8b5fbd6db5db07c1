pub mod api;
pub mod cli;
pub mod clients;
pub mod config;
pub mod constants;
pub mod models;
pub mod services;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
pub use config::Config;
use constants::rate_limit::SWEEP_INTERVAL;
use metrics_exporter_prometheus::PrometheusHandle;
use state::SharedState;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub async fn run(config: Config) -> anyhow::Result<()> {
    let cli = Cli::parse();

    let prometheus_handle = if config.observability.metrics_enabled {
        use metrics_exporter_prometheus::PrometheusBuilder;
        let builder = PrometheusBuilder::new();
        let handle = builder
            .install_recorder()
            .context("Failed to install Prometheus recorder")?;
        Some(handle)
    } else {
        None
    };

    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    // Stdout carries command output.
    let (pretty_layer, json_layer) = if config.general.log_format == "json" {
        let layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr);
        (None, Some(layer))
    } else {
        let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
        (Some(layer), None)
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(pretty_layer)
        .with(json_layer)
        .init();

    config.log_origin();
    if prometheus_handle.is_some() {
        info!("Prometheus metrics recorder initialized");
    }

    let command = cli.command.unwrap_or(Commands::Serve);
    if command.needs_valid_config() {
        config.validate()?;
    }

    match command {
        Commands::Serve => run_server(config, prometheus_handle).await,
        Commands::Search(args) => cli::cmd_search(config, args).await,
        Commands::Health => {
            cli::cmd_health(&config);
            Ok(())
        }
        Commands::Init => {
            if Config::create_default_if_missing()? {
                println!("Created config.toml with default settings");
            } else {
                println!("config.toml already exists");
            }
            Ok(())
        }
    }
}

async fn run_server(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<()> {
    info!("Marquee v{} starting...", env!("CARGO_PKG_VERSION"));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let shared = Arc::new(SharedState::new(config)?);
    let sweeper = shared.rate_limiter.spawn_sweeper(SWEEP_INTERVAL);

    let app = api::router(api::create_app_state(Arc::clone(&shared), prometheus_handle));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("🎬 API running at http://{}/api/v1", addr);

    let served = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await;

    sweeper.shutdown().await;
    info!("Server stopped");

    served.context("Web server error")
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!("Error listening for shutdown: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
