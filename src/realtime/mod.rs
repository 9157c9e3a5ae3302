//! Realtime connection context.
//!
//! One persistent websocket connection per application session. The handle
//! is passed explicitly through `AppState` rather than fetched from ambient
//! state, so a consumer without a context cannot compile a call to it.
//! Connection liveness is observable through a watch channel; there is no
//! reconnect policy beyond what the transport itself provides.

use futures::{SinkExt, StreamExt};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connected,
    Disconnected,
}

#[derive(Debug, Error)]
pub enum RealtimeError {
    #[error("realtime connection failed: {0}")]
    Connect(String),

    #[error("realtime connection closed")]
    Closed,
}

pub struct RealtimeContext {
    url: String,
    state_rx: watch::Receiver<ConnectionState>,
    outbound: mpsc::UnboundedSender<String>,
    task: JoinHandle<()>,
}

impl RealtimeContext {
    /// Open the connection and spawn the task that owns it. Fails if the
    /// initial handshake cannot complete.
    pub async fn connect(url: impl Into<String>) -> Result<Self, RealtimeError> {
        let url = url.into();
        let (ws, _) = connect_async(url.as_str())
            .await
            .map_err(|e| RealtimeError::Connect(e.to_string()))?;

        let (state_tx, state_rx) = watch::channel(ConnectionState::Connected);
        let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<String>();

        let task_url = url.clone();
        let task = tokio::spawn(async move {
            let (mut sink, mut stream) = ws.split();
            loop {
                tokio::select! {
                    outgoing = outbound_rx.recv() => {
                        match outgoing {
                            Some(text) => {
                                if let Err(e) = sink.send(Message::Text(text)).await {
                                    tracing::warn!("realtime send on {} failed: {}", task_url, e);
                                    break;
                                }
                            }
                            // Context dropped; close the connection.
                            None => break,
                        }
                    }
                    incoming = stream.next() => {
                        match incoming {
                            // No inbound message schemas are defined here;
                            // frames are drained to keep the connection alive.
                            Some(Ok(Message::Close(_))) | None => break,
                            Some(Ok(_)) => {}
                            Some(Err(e)) => {
                                tracing::warn!("realtime connection to {} dropped: {}", task_url, e);
                                break;
                            }
                        }
                    }
                }
            }
            let _ = state_tx.send(ConnectionState::Disconnected);
            let _ = sink.close().await;
        });

        Ok(Self {
            url,
            state_rx,
            outbound,
            task,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    /// Watch handle for consumers that react to state transitions.
    pub fn watch(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    /// Queue an event for delivery. Errors once the connection task is gone.
    pub fn send(&self, event: &Value) -> Result<(), RealtimeError> {
        self.outbound
            .send(event.to_string())
            .map_err(|_| RealtimeError::Closed)
    }
}

impl Drop for RealtimeContext {
    fn drop(&mut self) {
        self.task.abort();
    }
}
