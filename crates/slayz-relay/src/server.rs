//! Accept loop and hub construction.

use std::sync::Arc;

use slayz_config::{SlayzConfig, StoreBackend};
use slayz_core::{Authenticator, Hub, RecordStore};
use slayz_store::{JsonFileStore, MemoryStore, TokenAuthenticator};
use tokio::net::TcpListener;
use tokio_tungstenite::accept_async;

use crate::connection::handle_connection;

/// Build a hub over the store selected in `config`.
pub fn build_hub(config: &SlayzConfig) -> Hub {
    let store: Arc<dyn RecordStore> = match config.store.backend {
        StoreBackend::Json => Arc::new(JsonFileStore::new(&config.store.data_dir)),
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
    };
    let auth: Arc<dyn Authenticator> = Arc::new(TokenAuthenticator::new(store.clone()));
    Hub::new(store, auth)
}

/// Accept WebSocket clients on `listener` forever.
pub async fn serve(listener: TcpListener, hub: Hub, outbox_capacity: usize) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let hub = hub.clone();
                tokio::spawn(async move {
                    match accept_async(stream).await {
                        Ok(ws) => handle_connection(ws, addr, hub, outbox_capacity).await,
                        Err(e) => {
                            tracing::warn!(peer = %addr, error = %e, "WS handshake failed");
                        }
                    }
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "TCP accept error");
            }
        }
    }
}
