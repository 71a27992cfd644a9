//! Transport wrapper that reconnects on demand and disconnects when idle.
//!
//! Projectors accept very few simultaneous control connections, so a client
//! that holds one open blocks every other controller. [`ReconnectTransport`]
//! keeps a connection only while it is in use: after `idle_timeout` without
//! a transaction the inner transport is closed, and the next transaction
//! connects a fresh one through its [`Connector`].
//!
//! # Lifecycle
//!
//! ```text
//! transact ──> cancel idle timer
//!          ──> inner live? ──no──> connector.connect()
//!          ──> inner.transact(packet)
//!          ──> arm idle timer (win or lose)
//!
//! idle timer fires ──> inner.shutdown(None)   (wrapper stays usable)
//! wrapper.shutdown ──> cancel timer, inner.shutdown(None), wrapper ends
//! ```
//!
//! An inner transport that fails stays failed; the error goes to the caller
//! of that transaction and the next transaction reconnects. Nothing is
//! retried mid-transaction.

use std::future::Future;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard as StdMutexGuard, PoisonError};
use std::time::Duration;

use jvc_core::{Error, Result};
use jvc_protocol::Packet;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::transport::{ResponsePackets, TerminalStatus, Transport};

/// Produces freshly connected, authenticated transports.
pub trait Connector: Send + Sync + 'static {
    type Transport: Transport + 'static;

    /// Open and authenticate a new transport.
    fn connect(&self) -> impl Future<Output = Result<Self::Transport>> + Send;
}

struct InnerState<T> {
    current: Option<Arc<T>>,
    idle_timer: Option<JoinHandle<()>>,
    /// Bumped whenever the idle timer is cancelled or rearmed, so a timer
    /// that already woke up can tell it is stale.
    epoch: u64,
}

impl<T> InnerState<T> {
    fn cancel_idle_timer(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        if let Some(timer) = self.idle_timer.take() {
            timer.abort();
        }
    }
}

fn lock<T>(state: &StdMutex<T>) -> StdMutexGuard<'_, T> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Reconnect-on-demand transport.
pub struct ReconnectTransport<C: Connector> {
    connector: C,
    idle_timeout: Duration,
    transaction_lock: Mutex<()>,
    state: Arc<StdMutex<InnerState<C::Transport>>>,
    status: TerminalStatus,
}

impl<C: Connector> ReconnectTransport<C> {
    /// Wrap `connector`. No connection is made until the first transaction.
    pub fn new(connector: C, idle_timeout: Duration) -> Self {
        Self {
            connector,
            idle_timeout,
            transaction_lock: Mutex::new(()),
            state: Arc::new(StdMutex::new(InnerState {
                current: None,
                idle_timer: None,
                epoch: 0,
            })),
            status: TerminalStatus::new(),
        }
    }

    #[must_use]
    pub fn connector(&self) -> &C {
        &self.connector
    }

    #[must_use]
    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// True if a live inner transport is currently held.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        lock(&self.state)
            .current
            .as_ref()
            .is_some_and(|t| !t.is_shutting_down())
    }

    /// Return the live inner transport, connecting a new one if needed.
    ///
    /// The caller must hold the transaction lock.
    async fn get_connected_transport(&self) -> Result<Arc<C::Transport>> {
        {
            let mut state = lock(&self.state);
            if let Some(current) = &state.current
                && !current.is_shutting_down()
            {
                return Ok(Arc::clone(current));
            }
            if state.current.take().is_some() {
                debug!("Dropping ended inner transport");
            }
        }

        debug!("Connecting inner transport");
        let transport = Arc::new(self.connector.connect().await?);

        let mut state = lock(&self.state);
        if self.status.is_resolved() {
            transport.shutdown(None);
            return Err(self.status.error());
        }
        state.current = Some(Arc::clone(&transport));
        Ok(transport)
    }

    fn arm_idle_timer(&self) {
        let mut state = lock(&self.state);
        state.cancel_idle_timer();
        if state.current.is_none() {
            return;
        }

        let epoch = state.epoch;
        let idle_timeout = self.idle_timeout;
        let weak = Arc::downgrade(&self.state);
        state.idle_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(idle_timeout).await;
            let Some(state) = weak.upgrade() else {
                return;
            };
            let expired = {
                let mut state = lock(&state);
                if state.epoch != epoch {
                    return;
                }
                state.idle_timer = None;
                state.current.take()
            };
            if let Some(transport) = expired {
                debug!(
                    idle_ms = idle_timeout.as_millis(),
                    "Idle timeout, closing inner transport"
                );
                transport.shutdown(None);
            }
        }));
        trace!(idle_ms = idle_timeout.as_millis(), "Idle timer armed");
    }
}

impl<C: Connector> Transport for ReconnectTransport<C> {
    fn transaction_lock(&self) -> &Mutex<()> {
        &self.transaction_lock
    }

    async fn transact_no_lock(&self, packet: &Packet) -> Result<ResponsePackets> {
        if self.status.is_resolved() {
            return Err(self.status.error());
        }

        lock(&self.state).cancel_idle_timer();
        let result = match self.get_connected_transport().await {
            Ok(inner) => inner.transact(packet).await,
            Err(e) => Err(e),
        };
        if !self.status.is_resolved() {
            self.arm_idle_timer();
        }
        result
    }

    fn shutdown(&self, error: Option<Error>) {
        if !self.status.resolve(error) {
            return;
        }

        debug!("Shutting down reconnecting transport");
        let current = {
            let mut state = lock(&self.state);
            state.cancel_idle_timer();
            state.current.clone()
        };
        if let Some(current) = current {
            current.shutdown(None);
        }
    }

    fn is_shutting_down(&self) -> bool {
        self.status.is_resolved()
    }

    async fn wait(&self) -> Result<()> {
        let outcome = self.status.wait().await;

        let current = lock(&self.state).current.clone();
        if let Some(current) = current
            && let Err(e) = current.wait().await
        {
            debug!(error = %e, "Inner transport ended with error");
        }
        outcome
    }
}

impl<C: Connector> Drop for ReconnectTransport<C> {
    fn drop(&mut self) {
        lock(&self.state).cancel_idle_timer();
    }
}

impl<C: Connector> std::fmt::Debug for ReconnectTransport<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReconnectTransport")
            .field("idle_timeout", &self.idle_timeout)
            .field("connected", &self.is_connected())
            .field("shutting_down", &self.is_shutting_down())
            .finish()
    }
}
