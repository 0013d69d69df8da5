//! slayz-relay binary: load config, set up logging, serve.

use clap::Parser;
use slayz_config::load_config;
use slayz_relay::cli::Args;
use slayz_relay::{build_hub, serve};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let mut config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("slayz-relay: {e}");
            std::process::exit(2);
        }
    };
    args.apply_overrides(&mut config);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter.as_str().into()),
        )
        .init();

    let hub = build_hub(&config);
    let addr = config.server.listen_addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(addr = %addr, error = %e, "Failed to bind TCP listener");
            std::process::exit(1);
        }
    };

    tracing::info!(
        backend = ?config.store.backend,
        data_dir = %config.store.data_dir,
        "slayz-relay listening on {}",
        addr
    );
    serve(listener, hub, config.server.outbox_capacity).await;
}
