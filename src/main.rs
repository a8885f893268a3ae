use anyhow::Result;
use clap::Parser;
use gemini_relay::ai::GeminiHttpClient;
use gemini_relay::config::Config;
use gemini_relay::relay::Relay;
use gemini_relay::server::{self, AppState};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "gemini-relay")]
#[command(about = "Relay chat messages to the Gemini API with model fallback")]
struct CliArgs {
    /// Listen address, overriding RELAY_LISTEN_ADDR.
    #[arg(long)]
    addr: Option<IpAddr>,

    /// Listen port, overriding RELAY_LISTEN_PORT.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gemini_relay=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let api_key = config.api_key_source();
    if api_key.resolve().is_none() {
        // Not fatal: each call re-reads the variable and answers 500 while unset.
        error!("{} is not set; relay calls will fail until it is", api_key.variable_name());
    }

    let upstream = GeminiHttpClient::new(config.gemini_base_url.clone());
    info!(base_url = %upstream.base_url(), "Using Gemini API");

    let relay = Relay::new(Arc::new(upstream), api_key);
    let app = server::router(AppState::new(relay));

    let addr = SocketAddr::from((
        args.addr.unwrap_or(config.listen_addr),
        args.port.unwrap_or(config.listen_port),
    ));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server has shut down gracefully.");
    Ok(())
}

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
                error!("Failed to install SIGTERM handler: {}", e);
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
}
