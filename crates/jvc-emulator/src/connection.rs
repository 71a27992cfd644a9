//! Per-connection session driver and the registry of open sessions.
//!
//! The driver owns the socket and one [`SessionMachine`]. It feeds the
//! machine socket reads and timer expiries, forwards dispatched packets to
//! the shared request queue, and writes whatever the dispatcher sends back.
//!
//! ```text
//!  socket ──read──> SessionMachine ──Dispatch──> request queue ──> dispatcher
//!    ^                                                                 │
//!    └──────────── write <── SessionCommand::Send(packets) <───────────┘
//! ```

use std::collections::HashMap;
use std::net::SocketAddr;
use std::ops::ControlFlow;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use jvc_protocol::Packet;
use serde::Serialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::mpsc;
use tokio::time::{Sleep, sleep, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::dispatcher::Request;
use crate::session::{SessionAction, SessionMachine, SessionTimer};

pub type SessionId = u64;

/// Snapshot of an open session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionInfo {
    pub id: SessionId,
    pub peer_addr: SocketAddr,
    pub connected_at: DateTime<Utc>,
}

impl SessionInfo {
    /// How long the session has been open.
    #[must_use]
    pub fn uptime(&self) -> chrono::Duration {
        Utc::now() - self.connected_at
    }
}

/// Messages from the dispatcher to a session.
#[derive(Debug)]
pub(crate) enum SessionCommand {
    Send(Vec<Packet>),
    Close,
}

struct SessionHandle {
    info: SessionInfo,
    outbound: mpsc::UnboundedSender<SessionCommand>,
}

/// Open sessions by id.
#[derive(Default)]
pub(crate) struct SessionRegistry {
    sessions: Mutex<HashMap<SessionId, SessionHandle>>,
    next_id: AtomicU64,
}

impl SessionRegistry {
    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, SessionHandle>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new connection and return its id and outbound queue.
    pub(crate) fn open(
        &self,
        peer_addr: SocketAddr,
    ) -> (SessionId, mpsc::UnboundedReceiver<SessionCommand>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let (outbound, rx) = mpsc::unbounded_channel();
        let info = SessionInfo {
            id,
            peer_addr,
            connected_at: Utc::now(),
        };
        self.lock().insert(id, SessionHandle { info, outbound });
        (id, rx)
    }

    pub(crate) fn remove(&self, id: SessionId) {
        self.lock().remove(&id);
    }

    /// Queue packets for a session. Sessions that already closed are skipped.
    pub(crate) fn send(&self, id: SessionId, packets: Vec<Packet>) {
        if let Some(handle) = self.lock().get(&id)
            && handle.outbound.send(SessionCommand::Send(packets)).is_err()
        {
            trace!(session_id = id, "Session gone before response was queued");
        }
    }

    pub(crate) fn close(&self, id: SessionId) {
        if let Some(handle) = self.lock().get(&id) {
            let _ = handle.outbound.send(SessionCommand::Close);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }

    pub(crate) fn snapshot(&self) -> Vec<SessionInfo> {
        let mut sessions: Vec<SessionInfo> =
            self.lock().values().map(|handle| handle.info.clone()).collect();
        sessions.sort_by_key(|info| info.id);
        sessions
    }
}

/// Settings and shared handles every session driver needs.
#[derive(Clone)]
pub(crate) struct SessionContext {
    pub password: Option<String>,
    pub handshake_timeout: Duration,
    pub idle_timeout: Duration,
    pub requests: mpsc::UnboundedSender<Request>,
    pub registry: Arc<SessionRegistry>,
}

struct SessionDriver {
    id: SessionId,
    writer: OwnedWriteHalf,
    timer: Option<(SessionTimer, Pin<Box<Sleep>>)>,
    requests: mpsc::UnboundedSender<Request>,
    handshake_timeout: Duration,
    idle_timeout: Duration,
}

impl SessionDriver {
    async fn apply(&mut self, actions: Vec<SessionAction>) -> ControlFlow<()> {
        for action in actions {
            match action {
                SessionAction::Write(bytes) => self.write(&bytes).await?,
                SessionAction::Dispatch(packet) => {
                    debug!(session_id = self.id, packet = %hex::encode(packet.raw_bytes()), "Queueing command");
                    let request = Request::Packet {
                        session: self.id,
                        packet,
                    };
                    if self.requests.send(request).is_err() {
                        debug!(session_id = self.id, "Dispatcher stopped");
                        return ControlFlow::Break(());
                    }
                }
                SessionAction::ArmTimer(kind) => {
                    let duration = match kind {
                        SessionTimer::Handshake => self.handshake_timeout,
                        SessionTimer::Idle => self.idle_timeout,
                    };
                    self.timer = Some((kind, Box::pin(sleep(duration))));
                }
                SessionAction::CancelTimer => self.timer = None,
                SessionAction::Close => return ControlFlow::Break(()),
            }
        }
        ControlFlow::Continue(())
    }

    async fn write(&mut self, bytes: &[u8]) -> ControlFlow<()> {
        trace!(session_id = self.id, bytes = %hex::encode(bytes), "Writing");
        match timeout(self.idle_timeout, self.writer.write_all(bytes)).await {
            Ok(Ok(())) => ControlFlow::Continue(()),
            Ok(Err(e)) => {
                debug!(session_id = self.id, error = %e, "Write failed");
                ControlFlow::Break(())
            }
            Err(_) => {
                warn!(session_id = self.id, "Write timed out");
                ControlFlow::Break(())
            }
        }
    }

    async fn send_packets(&mut self, packets: Vec<Packet>) -> ControlFlow<()> {
        for packet in packets {
            self.write(packet.raw_bytes()).await?;
        }
        ControlFlow::Continue(())
    }
}

/// Resolves when the armed timer fires; never resolves with none armed.
async fn expired(timer: &mut Option<(SessionTimer, Pin<Box<Sleep>>)>) -> SessionTimer {
    match timer {
        Some((kind, sleep)) => {
            sleep.as_mut().await;
            *kind
        }
        None => std::future::pending().await,
    }
}

/// Run one session until either side closes it or `cancel` fires.
pub(crate) async fn run_session(
    id: SessionId,
    stream: TcpStream,
    ctx: SessionContext,
    mut outbound: mpsc::UnboundedReceiver<SessionCommand>,
    cancel: CancellationToken,
) {
    let (mut reader, writer) = stream.into_split();
    let mut machine = SessionMachine::new(ctx.password.as_deref());
    let mut driver = SessionDriver {
        id,
        writer,
        timer: None,
        requests: ctx.requests,
        handshake_timeout: ctx.handshake_timeout,
        idle_timeout: ctx.idle_timeout,
    };
    let mut buf = [0u8; 256];

    let mut flow = match machine.connect() {
        Ok(actions) => driver.apply(actions).await,
        Err(e) => {
            warn!(session_id = id, error = %e, "Session failed to start");
            ControlFlow::Break(())
        }
    };

    while flow.is_continue() {
        flow = tokio::select! {
            () = cancel.cancelled() => ControlFlow::Break(()),
            read = reader.read(&mut buf) => match read {
                Ok(0) => {
                    debug!(session_id = id, "Peer closed connection");
                    ControlFlow::Break(())
                }
                Ok(n) => match machine.receive(&buf[..n]) {
                    Ok(actions) => driver.apply(actions).await,
                    Err(e) => {
                        warn!(session_id = id, error = %e, "Closing session after bad input");
                        ControlFlow::Break(())
                    }
                },
                Err(e) => {
                    debug!(session_id = id, error = %e, "Read failed");
                    ControlFlow::Break(())
                }
            },
            kind = expired(&mut driver.timer) => {
                driver.timer = None;
                debug!(session_id = id, timer = ?kind, state = %machine.state(), "Session timer fired");
                driver.apply(machine.timer_expired(kind)).await
            }
            command = outbound.recv() => match command {
                Some(SessionCommand::Send(packets)) => driver.send_packets(packets).await,
                Some(SessionCommand::Close) | None => ControlFlow::Break(()),
            },
        };
    }

    if machine.begin_close() {
        let _ = driver.writer.shutdown().await;
    }
    machine.finish_close();
    ctx.registry.remove(id);
    info!(session_id = id, "Session closed");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    #[test]
    fn test_registry_ids_are_unique_and_sorted() {
        let registry = SessionRegistry::default();
        let (a, _rx_a) = registry.open(addr());
        let (b, _rx_b) = registry.open(addr());
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);

        let ids: Vec<_> = registry.snapshot().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![a, b]);

        registry.remove(a);
        let (c, _rx_c) = registry.open(addr());
        assert!(c > b);
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn test_registry_routes_to_session() {
        let registry = SessionRegistry::default();
        let (id, mut rx) = registry.open(addr());
        let packet = Packet::parse(b"\x06\x89\x01PW\n").unwrap();

        registry.send(id, vec![packet.clone()]);
        registry.close(id);
        assert!(matches!(rx.recv().await, Some(SessionCommand::Send(p)) if p == vec![packet]));
        assert!(matches!(rx.recv().await, Some(SessionCommand::Close)));

        // Unknown ids are ignored.
        registry.send(id + 100, Vec::new());
    }
}
