use anyhow::Result;
use clap::Parser;
use secrecy::SecretString;
use sonnenbatterie_exporter::{config::Config, server};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/Default.toml")]
    config: String,

    /// URL of the sonnenBatterie (overrides config)
    #[arg(long, env = "SONNENBATTERIE_URL")]
    sonnenbatterie_url: Option<String>,

    /// Token for the sonnenBatterie API (overrides config)
    #[arg(long, env = "SONNENBATTERIE_TOKEN", hide_env_values = true)]
    sonnenbatterie_token: Option<String>,

    /// Port to listen on for metrics (overrides config)
    #[arg(short, long, env = "EXPORTER_PORT")]
    port: Option<u16>,

    /// Address to bind to (overrides config)
    #[arg(short, long, env = "EXPORTER_ADDR")]
    addr: Option<String>,

    /// Address and port in `host:port` form, e.g. `:9110` (overrides --addr and --port)
    #[arg(long)]
    listen_address: Option<String>,

    /// Path to expose metrics on (overrides config)
    #[arg(long, env = "EXPORTER_METRICS_PATH")]
    metrics_path: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting sonnenBatterie Prometheus Exporter v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let mut config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    // Override with CLI arguments if provided
    if let Some(url) = args.sonnenbatterie_url {
        config.sonnenbatterie.url = url;
    }
    if let Some(token) = args.sonnenbatterie_token {
        config.sonnenbatterie.token = Some(SecretString::new(token.into()));
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(addr) = args.addr {
        config.server.addr = addr;
    }
    if let Some(listen) = args.listen_address {
        if let Err(e) = config.server.set_listen_address(&listen) {
            error!("{}", e);
            std::process::exit(1);
        }
    }
    if let Some(metrics_path) = args.metrics_path {
        config.server.metrics_path = metrics_path;
    }

    if let Err(e) = config.validate() {
        error!("{}", e);
        std::process::exit(1);
    }

    info!("Configuration loaded successfully");
    info!("sonnenBatterie URL: {}", config.sonnenbatterie.url);

    // Start the metrics server
    if let Err(e) = server::start(config).await {
        error!("Server error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
