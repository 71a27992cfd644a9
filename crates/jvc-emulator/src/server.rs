//! Emulator server lifecycle.
//!
//! # Architecture
//!
//! ```text
//! client ──> session ┐
//! client ──> session ├──> request queue ──> dispatcher (ProjectorState)
//! client ──> session ┘          ^
//!                               └── Emulator::set_status / status / shutdown
//! ```
//!
//! # Example
//!
//! ```no_run
//! use jvc_core::StatusField;
//! use jvc_emulator::{Emulator, EmulatorConfig};
//!
//! # async fn example() -> jvc_core::Result<()> {
//! let emulator = Emulator::start(EmulatorConfig {
//!     bind_addr: "127.0.0.1:0".parse().unwrap(),
//!     ..Default::default()
//! })
//! .await?;
//! println!("Listening on {}", emulator.local_addr());
//!
//! emulator.set_status(StatusField::Power, "On").await?;
//! emulator.shutdown();
//! emulator.wait().await;
//! # Ok(())
//! # }
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use jvc_core::{Error, Result, StatusField};
use jvc_protocol::JvcModel;
use tokio::net::TcpListener;
use tokio::sync::{Mutex, mpsc, oneshot};
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::EmulatorConfig;
use crate::connection::{SessionContext, SessionInfo, SessionRegistry, run_session};
use crate::dispatcher::{Dispatcher, ProjectorState, Request};

/// A running projector emulator.
///
/// Dropping the emulator shuts it down; call [`Emulator::wait`] to wait for
/// every task to finish.
pub struct Emulator {
    local_addr: SocketAddr,
    model: &'static JvcModel,
    max_sessions: usize,
    requests: mpsc::UnboundedSender<Request>,
    sessions: Arc<SessionRegistry>,
    cancel: CancellationToken,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl Emulator {
    /// Bind the listener and start the dispatcher and accept loop.
    ///
    /// # Errors
    /// Returns `Error::UnknownModel` or `Error::UnknownStatus` for a bad
    /// configuration and `Error::Connect` if the address cannot be bound.
    pub async fn start(config: EmulatorConfig) -> Result<Self> {
        let model = config.resolved_model()?;
        let state = ProjectorState::from_config(&config)?;

        let listener = TcpListener::bind(config.bind_addr)
            .await
            .map_err(|e| Error::Connect {
                addr: config.bind_addr.to_string(),
                reason: e.to_string(),
            })?;
        let local_addr = listener.local_addr()?;

        let (requests, rx) = mpsc::unbounded_channel();
        let sessions = Arc::new(SessionRegistry::default());
        let cancel = CancellationToken::new();

        let dispatcher = Dispatcher::new(
            &config,
            model,
            state,
            requests.downgrade(),
            Arc::clone(&sessions),
        );
        let dispatcher_task = tokio::spawn(dispatcher.run(rx));

        let ctx = SessionContext {
            password: config.password().map(str::to_string),
            handshake_timeout: config.handshake_timeout,
            idle_timeout: config.idle_timeout,
            requests: requests.clone(),
            registry: Arc::clone(&sessions),
        };
        let accept_task = tokio::spawn(accept_loop(
            listener,
            ctx,
            config.max_sessions,
            cancel.clone(),
        ));

        info!(
            addr = %local_addr,
            model = %model,
            max_sessions = config.max_sessions,
            "Emulator listening"
        );

        Ok(Self {
            local_addr,
            model,
            max_sessions: config.max_sessions,
            requests,
            sessions,
            cancel,
            tasks: Mutex::new(vec![accept_task, dispatcher_task]),
        })
    }

    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    #[must_use]
    pub fn model(&self) -> &'static JvcModel {
        self.model
    }

    #[must_use]
    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    /// Force a status field, as if changed on the projector itself.
    ///
    /// Setting power cancels a pending warm-up or cool-down; setting
    /// `Warming` or `Cooling` starts one.
    ///
    /// # Errors
    /// Returns `Error::UnknownStatus` (or `Error::UnexpectedState` for power)
    /// for an unknown value and `Error::ConnectionClosed` after shutdown.
    pub async fn set_status(&self, field: StatusField, value: &str) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.request(Request::SetStatus {
            field,
            value: value.to_string(),
            reply,
        })?;
        rx.await.map_err(|_| stopped())?
    }

    /// Current value of a status field.
    ///
    /// # Errors
    /// Returns `Error::ConnectionClosed` after shutdown.
    pub async fn status(&self, field: StatusField) -> Result<String> {
        let (reply, rx) = oneshot::channel();
        self.request(Request::GetStatus { field, reply })?;
        rx.await.map_err(|_| stopped())?
    }

    fn request(&self, request: Request) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(stopped());
        }
        self.requests.send(request).map_err(|_| stopped())
    }

    /// Open sessions, oldest first.
    #[must_use]
    pub fn sessions(&self) -> Vec<SessionInfo> {
        self.sessions.snapshot()
    }

    /// Stop accepting, close every session and stop the dispatcher.
    /// Calling it again does nothing.
    pub fn shutdown(&self) {
        if self.cancel.is_cancelled() {
            return;
        }
        info!(addr = %self.local_addr, "Emulator shutting down");
        self.cancel.cancel();
        let _ = self.requests.send(Request::Shutdown);
    }

    /// Wait for the accept loop, every session and the dispatcher to finish.
    pub async fn wait(&self) {
        let tasks = std::mem::take(&mut *self.tasks.lock().await);
        for task in tasks {
            if let Err(e) = task.await
                && !e.is_cancelled()
            {
                error!(error = %e, "Emulator task panicked");
            }
        }
    }
}

impl Drop for Emulator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for Emulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emulator")
            .field("local_addr", &self.local_addr)
            .field("model", &self.model.name)
            .field("sessions", &self.sessions.len())
            .finish_non_exhaustive()
    }
}

fn stopped() -> Error {
    Error::ConnectionClosed("emulator is shut down".to_string())
}

async fn accept_loop(
    listener: TcpListener,
    ctx: SessionContext,
    max_sessions: usize,
    cancel: CancellationToken,
) {
    let mut session_tasks = JoinSet::new();

    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            Some(_) = session_tasks.join_next(), if !session_tasks.is_empty() => {}
            accepted = listener.accept() => {
                let (stream, peer_addr) = match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        warn!(error = %e, "Accept failed");
                        continue;
                    }
                };

                if ctx.registry.len() >= max_sessions {
                    error!(
                        addr = %peer_addr,
                        max_sessions,
                        "Connection rejected: maximum sessions reached"
                    );
                    drop(stream);
                    continue;
                }

                if let Err(e) = stream.set_nodelay(true) {
                    warn!("Failed to set TCP_NODELAY for {}: {}", peer_addr, e);
                }

                let (id, outbound) = ctx.registry.open(peer_addr);
                info!(session_id = id, addr = %peer_addr, "Session opened");
                session_tasks.spawn(run_session(
                    id,
                    stream,
                    ctx.clone(),
                    outbound,
                    cancel.child_token(),
                ));
            }
        }
    }

    drop(listener);
    debug!(sessions = session_tasks.len(), "Accept loop stopped, closing sessions");
    while session_tasks.join_next().await.is_some() {}
}
