//! Event-stream endpoint with a periodic keep-alive.
//!
//! Each `GET /sse` client receives a `connected` event straight away and a
//! `ping` event every [`KEEP_ALIVE_INTERVAL`] after that. The ping timer
//! runs in its own task, owned by a [`KeepAliveHandle`]. The handle lives
//! inside the response stream, so when the client goes away and axum drops
//! the stream, the handle is dropped exactly once and the timer task is
//! cancelled.

use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, Sse};
use futures::stream::Stream;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant};
use tokio_util::sync::{CancellationToken, DropGuard};
use uuid::Uuid;

use super::router::AppState;

/// Time between `ping` events.
pub const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(30);

/// Counts open event streams.
#[derive(Debug, Clone, Default)]
pub struct StreamRegistry {
    active: Arc<AtomicUsize>,
}

impl StreamRegistry {
    /// Number of clients currently connected.
    #[must_use]
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    fn open(&self) -> StreamSlot {
        self.active.fetch_add(1, Ordering::SeqCst);
        StreamSlot {
            active: Arc::clone(&self.active),
        }
    }
}

/// One counted connection; releases its count on drop.
#[derive(Debug)]
struct StreamSlot {
    active: Arc<AtomicUsize>,
}

impl Drop for StreamSlot {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Owns the keep-alive task of one connection.
///
/// Dropping the handle cancels the task and releases the connection slot.
#[derive(Debug)]
pub struct KeepAliveHandle {
    connection_id: Uuid,
    token: CancellationToken,
    _guard: DropGuard,
    _slot: StreamSlot,
}

impl KeepAliveHandle {
    /// Starts sending `ping` events into `events` every `period`.
    ///
    /// The first ping is sent one full period after this call.
    #[must_use]
    pub fn spawn(
        events: mpsc::Sender<Event>,
        period: Duration,
        registry: &StreamRegistry,
        connection_id: Uuid,
    ) -> Self {
        let token = CancellationToken::new();
        let cancelled = token.clone();

        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            loop {
                tokio::select! {
                    () = cancelled.cancelled() => break,
                    _ = ticker.tick() => {
                        if events.send(ping_event()).await.is_err() {
                            break;
                        }
                    }
                }
            }
            tracing::debug!(%connection_id, "Keep-alive timer stopped");
        });

        Self {
            connection_id,
            token: token.clone(),
            _guard: token.drop_guard(),
            _slot: registry.open(),
        }
    }

    /// Identifier sent to the client in the `connected` event.
    #[must_use]
    pub const fn connection_id(&self) -> Uuid {
        self.connection_id
    }

    /// A token that observes this handle's cancellation.
    #[must_use]
    pub fn cancellation(&self) -> CancellationToken {
        self.token.clone()
    }
}

impl Drop for KeepAliveHandle {
    fn drop(&mut self) {
        tracing::info!(connection_id = %self.connection_id, "Event stream disconnected");
    }
}

/// Payload of the `connected` event.
#[derive(Debug, Serialize)]
struct SseConnectedEvent {
    status: &'static str,
    connection_id: String,
}

/// Payload of the `ping` event.
#[derive(Debug, Serialize)]
struct SsePingEvent {
    timestamp: String,
}

fn connected_event(connection_id: Uuid) -> Event {
    Event::default()
        .event("connected")
        .json_data(SseConnectedEvent {
            status: "connected",
            connection_id: connection_id.to_string(),
        })
        .unwrap_or_else(|_| Event::default().event("connected"))
}

fn ping_event() -> Event {
    Event::default()
        .event("ping")
        .json_data(SsePingEvent {
            timestamp: chrono::Utc::now().to_rfc3339(),
        })
        .unwrap_or_else(|_| Event::default().event("ping"))
}

/// `GET /sse`
pub async fn handle_sse(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let connection_id = Uuid::new_v4();
    let (tx, mut rx) = mpsc::channel(8);
    let handle = KeepAliveHandle::spawn(tx, state.keep_alive, &state.streams, connection_id);
    let shutdown = state.shutdown.clone();

    tracing::info!(
        %connection_id,
        active = state.streams.active(),
        "Event stream connected"
    );

    let stream = async_stream::stream! {
        let handle = handle;
        yield Ok::<_, Infallible>(connected_event(handle.connection_id()));

        loop {
            let next = tokio::select! {
                () = shutdown.cancelled() => None,
                event = rx.recv() => event,
            };
            match next {
                Some(event) => yield Ok::<_, Infallible>(event),
                None => break,
            }
        }
    };

    Sse::new(stream)
}
