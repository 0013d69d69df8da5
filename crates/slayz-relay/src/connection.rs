//! Per-connection handler: register with the hub, then pump frames both ways.
//!
//! Writing runs in its own task so the outbox keeps draining while the
//! reader waits on the hub (e.g. a `sendMessage` being persisted).

use std::net::SocketAddr;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use slayz_common::HubError;
use slayz_core::{ClientEvent, Hub};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

type WsSink = SplitSink<WebSocketStream<TcpStream>, Message>;

/// Handle a single WebSocket connection until it closes.
pub async fn handle_connection(
    ws: WebSocketStream<TcpStream>,
    addr: SocketAddr,
    hub: Hub,
    outbox_capacity: usize,
) {
    let (sink, mut stream) = ws.split();

    // 1. Register; the hub queues `connected` on our outbox.
    let (tx, rx) = mpsc::channel::<String>(outbox_capacity);
    let conn = hub.connect(tx).await;
    tracing::info!(peer = %addr, connection = %conn, "Client registered");

    let (control_tx, control_rx) = mpsc::unbounded_channel::<Message>();
    let mut writer = tokio::spawn(write_frames(sink, rx, control_rx));
    let mut writer_done = false;

    // 2. Read loop. Ends on close, on a socket error, or when the writer
    //    stops (socket gone, or the hub dropped our outbox).
    loop {
        tokio::select! {
            _ = &mut writer, if !writer_done => {
                writer_done = true;
                break;
            }

            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientEvent>(text.as_str()) {
                            Ok(event) => hub.handle(&conn, event).await,
                            Err(e) => {
                                tracing::debug!(connection = %conn, error = %e, "Malformed event");
                                hub.report(&conn, &HubError::Validation("malformed event".into())).await;
                            }
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = control_tx.send(Message::Pong(data));
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(peer = %addr, error = %e, "WS error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    // 3. Cleanup: same path as an explicit leave, plus unregistration. That
    //    drops the outbox sender, so the writer drains and exits.
    hub.disconnect(&conn).await;
    drop(control_tx);
    if !writer_done {
        let _ = writer.await;
    }
    tracing::info!(peer = %addr, connection = %conn, "Client closed");
}

/// Hub frames and control replies → this client's WebSocket.
async fn write_frames(
    mut sink: WsSink,
    mut rx: mpsc::Receiver<String>,
    mut control_rx: mpsc::UnboundedReceiver<Message>,
) {
    loop {
        let message = tokio::select! {
            frame = rx.recv() => match frame {
                Some(frame) => Message::Text(frame.into()),
                None => break,
            },
            Some(control) = control_rx.recv() => control,
        };
        if sink.send(message).await.is_err() {
            break;
        }
    }
    let _ = sink.close().await;
}
