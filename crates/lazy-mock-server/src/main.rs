use clap::Parser;
use lazy_mock_server::config::{LogLevel, ServerConfig, TlsConfig};
use lazy_mock_server::mock::RouteManager;
use lazy_mock_server::server::MockServer;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Configurable HTTP mock server driven by a YAML route file
#[derive(Parser, Debug)]
#[command(name = "lazy-mock-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "MOCK_PORT", default_value = "8080")]
    port: u16,

    /// Path to the YAML route file
    #[arg(short, long, env = "MOCK_CONFIG", default_value = "app/mock_response.yaml")]
    config: PathBuf,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, env = "MOCK_LOG_LEVEL", value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Serve HTTPS
    #[arg(long)]
    tls: bool,

    /// TLS certificate file (PEM)
    #[arg(long, default_value = "server.crt")]
    cert: PathBuf,

    /// TLS private key file (PEM)
    #[arg(long, default_value = "server.key")]
    key: PathBuf,

    /// HTML page served at /_mock/ui
    #[arg(long, default_value = "internal/templates/web_ui.html")]
    ui_template: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();

    let mut config = ServerConfig::new(args.port, &args.config)?
        .with_log_level(args.log_level)
        .with_ui_template(args.ui_template);
    if args.tls {
        config = config.with_tls(TlsConfig {
            cert_path: args.cert,
            key_path: args.key,
        });
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("lazy-mock-server v{} starting", env!("CARGO_PKG_VERSION"));

    let manager = Arc::new(RouteManager::from_file(&config.config_path)?);
    info!(
        "Management API available at {}://{}:{}/_mock/routes",
        config.scheme(),
        config.host,
        config.port
    );

    MockServer::bind(&config, manager).await?.run().await
}
