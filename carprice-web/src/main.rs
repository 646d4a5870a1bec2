//! carprice-web - Car price prediction form
//!
//! Loads the model and both encoders once, then serves the prediction page.
//! If any artifact is missing or corrupt the process exits before binding.

use std::path::PathBuf;

use anyhow::{Context, Result};
use carprice_common::config::{
    resolve_config_path, ConfigOverrides, ConfigSource, PredictionSettings, TomlConfig,
    CONFIG_ENV_VAR,
};
use carprice_common::Artifacts;
use carprice_web::{build_router, AppState};
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for carprice-web
#[derive(Parser, Debug)]
#[command(name = "carprice-web")]
#[command(about = "Used car price prediction form")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = CONFIG_ENV_VAR)]
    config: Option<PathBuf>,

    /// Address to listen on, e.g. 127.0.0.1:5780
    #[arg(short, long, env = "CARPRICE_BIND_ADDR")]
    bind: Option<String>,

    /// Directory holding model.json and the encoder files
    #[arg(short, long, env = "CARPRICE_ARTIFACTS_DIR")]
    artifacts_dir: Option<PathBuf>,

    /// Year vehicle age is computed against
    #[arg(long, env = "CARPRICE_REFERENCE_YEAR")]
    reference_year: Option<i32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read before tracing so its log level can seed the filter
    let source = resolve_config_path(args.config.as_deref(), CONFIG_ENV_VAR);
    let mut config = TomlConfig::from_source(&source).context("Failed to load configuration")?;
    config.apply_overrides(&ConfigOverrides {
        bind_addr: args.bind,
        artifacts_dir: args.artifacts_dir,
        reference_year: args.reference_year,
    });

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{},tower_http=info", config.logging.level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Car Price Predictor (carprice-web) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match &source {
        ConfigSource::Explicit(path) => info!("Loaded config from {}", path.display()),
        ConfigSource::Default(path) if path.exists() => {
            info!("Loaded config from {}", path.display())
        }
        ConfigSource::Default(path) => warn!(
            "No config file at {}; using built-in defaults",
            path.display()
        ),
        ConfigSource::None => {
            warn!("Could not determine config directory; using built-in defaults")
        }
    }

    let paths = config.artifacts.paths();
    let artifacts = match Artifacts::load(&paths) {
        Ok(artifacts) => artifacts,
        Err(e) => {
            error!("Failed to load artifacts: {}", e);
            return Err(e).context("Cannot serve predictions without artifacts");
        }
    };

    let settings =
        PredictionSettings::resolve(&config.prediction, artifacts.model().reference_year())
            .context("Invalid prediction settings")?;
    info!(
        "Reference year {}, year range {}..={}",
        settings.reference_year, settings.min_year, settings.max_year
    );

    let state = AppState::new(artifacts, settings);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;
    info!("carprice-web listening on http://{}", config.bind_addr);
    info!("Health check: http://{}/health", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
