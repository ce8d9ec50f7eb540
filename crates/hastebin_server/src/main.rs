//! Headless API server entrypoint.

use hastebin_server::config::{env_flag_enabled, Config};
use hastebin_server::statics::load_static_documents;
use hastebin_server::store::open_store;
use hastebin_server::{serve_router, spawn_expiry_sweeper, AppState, DEFAULT_PORT};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct CliFlags {
    help: bool,
    version: bool,
}

fn parse_cli_flags(args: &[String]) -> anyhow::Result<CliFlags> {
    let mut flags = CliFlags::default();
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => flags.help = true,
            "--version" | "-V" => flags.version = true,
            value if value.starts_with('-') => {
                anyhow::bail!(
                    "Unknown option: '{}'. Use --help to see supported options.",
                    value
                );
            }
            value => {
                anyhow::bail!(
                    "Unexpected positional argument: '{}'. Use --help to see supported options.",
                    value
                );
            }
        }
    }
    Ok(flags)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hastebin=info,hastebin_core=info,hastebin_server=info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let cli_flags = parse_cli_flags(&args)?;

    if cli_flags.help {
        print_help();
        return Ok(());
    }
    if cli_flags.version {
        println!("hastebin {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config = Config::from_env();
    tracing::info!("Path to data: {}", config.data_path);

    let store = open_store(&config)?;
    let loaded = load_static_documents(store.as_ref(), &config.documents);
    tracing::info!(
        "Loaded {}/{} static document(s)",
        loaded,
        config.documents.len()
    );

    let sweeper = config.expire_after_secs.map(|_| {
        spawn_expiry_sweeper(
            store.clone(),
            Duration::from_secs(config.sweep_interval_secs),
        )
    });

    let state = AppState::new(config.clone(), store);

    let allow_public = env_flag_enabled("ALLOW_PUBLIC_ACCESS");
    if allow_public {
        tracing::warn!("Public access enabled - server will accept requests from any origin");
    }

    let bind_override = std::env::var("BIND").ok();
    let bind_addr =
        hastebin_server::resolve_bind_address(&config, bind_override.as_deref(), allow_public);
    if !bind_addr.ip().is_loopback() {
        tracing::warn!(
            "Binding to non-localhost address: {} - ensure proper security measures are in place",
            bind_addr
        );
    }

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let actual_addr = listener.local_addr().unwrap_or(bind_addr);
    tracing::info!("hastebin listening on http://{}", actual_addr);

    let serve_result = serve_router(listener, state, allow_public, shutdown_signal()).await;

    if let Some(sweeper) = sweeper {
        sweeper.abort();
    }
    tracing::info!("Server stopped");

    serve_result?;
    Ok(())
}

fn print_help() {
    println!("hastebin server\n");
    println!("Usage: hastebin [OPTIONS]\n");
    println!("Options:");
    println!("  -h, --help        Show this help message");
    println!("  -V, --version     Show version");
    println!("\nEnvironment variables:");
    println!("  DATA_PATH         Data directory (default: ~/.cache/hastebin/data)");
    println!("  PORT              Server port (default: {})", DEFAULT_PORT);
    println!("  MAX_LENGTH        Maximum document size in bytes (default: 400000)");
    println!("  KEY_LENGTH        Generated key length (default: 10)");
    println!("  MAX_KEY_ATTEMPTS  Key candidates tried per write (default: 32)");
    println!("  STORE_TYPE        redb | memory (default: redb)");
    println!("  KEY_GENERATOR     random | phonetic (default: random)");
    println!("  EXPIRE_SECONDS    Lifetime of user documents (default: never)");
    println!("  SWEEP_INTERVAL_SECONDS  Expiration sweep interval (default: 60)");
    println!("  STATIC_DOCUMENTS  name=path list, e.g. about=./about.md");
    println!("  ALLOW_PUBLIC_ACCESS  Allow CORS from any origin and non-loopback binds");
    println!(
        "  BIND              Override bind address (e.g. 0.0.0.0:{})",
        DEFAULT_PORT
    );
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
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
