//! Nodeboard server entry point.

use anyhow::Context;
use clap::Parser;
use nodeboard_node::observability::{init_logging, LogFormat};
use nodeboard_node::{Config, Site};
use nodeboard_web::spawn_refresh;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tokio::sync::watch;

/// Nodeboard - browse measured proxy nodes
#[derive(Parser, Debug)]
#[command(name = "nodeboard")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "nodeboard.yaml")]
    config: PathBuf,

    /// HTTP listen address
    #[arg(long)]
    listen: Option<SocketAddr>,

    /// Directory holding the pre-built site
    #[arg(long)]
    site_dir: Option<PathBuf>,

    /// Fetch the dataset from this URL instead of the site directory
    #[arg(long)]
    dataset_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Log format (pretty, json)
    #[arg(long)]
    log_format: Option<String>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if let Some(listen) = self.listen {
            config.listen_addr = listen;
        }
        if let Some(site_dir) = &self.site_dir {
            config.site_dir = site_dir.clone();
        }
        if let Some(url) = &self.dataset_url {
            config.dataset.url = Some(url.clone());
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.log_format = LogFormat::parse(format);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::load(Some(&args.config))
        .with_context(|| format!("loading {}", args.config.display()))?;
    args.apply(&mut config);
    config.validate()?;

    if args.print_config {
        print!("{}", config.to_yaml()?);
        return Ok(());
    }

    init_logging(&config.log_level, config.log_format);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting nodeboard");
    tracing::info!(
        listen_addr = %config.listen_addr,
        site_dir = %config.site_dir.display(),
        entry_document = %config.entry_document,
        refresh_interval_secs = config.refresh_interval_secs,
        "Server configuration"
    );

    if !config.site_dir.is_dir() {
        tracing::warn!(site_dir = %config.site_dir.display(), "Site directory does not exist");
    }

    let site = Site::from_config(&config)?;

    let initial = {
        let browser = site.browser.clone();
        tokio::spawn(async move {
            let outcome = browser.load().await;
            tracing::debug!(?outcome, "Initial dataset load finished");
        })
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let refresh = spawn_refresh(
        site.browser.clone(),
        config.refresh_interval(),
        site.activity.clone(),
        shutdown_rx,
    );

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "Listening");

    axum::serve(listener, site.app())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = shutdown_tx.send(true);
    initial.abort();
    refresh.await?;

    tracing::info!("Nodeboard stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
