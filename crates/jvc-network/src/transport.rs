//! Transport abstraction shared by the direct and reconnecting transports.
//!
//! A transport moves packets over one logical projector connection. Every
//! command/response exchange runs under the transport's transaction lock, so
//! concurrent callers never interleave bytes on the wire.
//!
//! # Locking
//!
//! ```text
//! transact(packet)                    one exchange, lock taken and released
//! begin_transaction() -> Transaction  lock held until the guard drops
//!     .transact(packet)               ...any number of exchanges
//! ```
//!
//! # Lifecycle
//!
//! A transport ends exactly once, either cleanly ([`Transport::shutdown`]
//! with `None`) or with the error that broke it. [`Transport::wait`] resolves
//! once that has happened and returns the stored outcome.

use std::future::Future;

use jvc_core::{Error, Result};
use jvc_protocol::{Command, Packet, Response};
use tokio::sync::{Mutex, MutexGuard, watch};

/// Packets received in answer to one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponsePackets {
    pub basic: Packet,
    /// Present exactly when the command was an advanced command.
    pub advanced: Option<Packet>,
}

impl ResponsePackets {
    /// Bind the packets to the command they answer.
    ///
    /// # Errors
    /// Returns `Error::ProtocolViolation` if the packets do not form a valid
    /// response to `command`.
    pub fn into_response(self, command: Command) -> Result<Response> {
        Response::from_packets(command, self.basic, self.advanced)
    }
}

/// Outcome a transport settles on exactly once.
#[derive(Debug)]
pub(crate) struct TerminalStatus(watch::Sender<Option<Result<()>>>);

impl TerminalStatus {
    pub(crate) fn new() -> Self {
        Self(watch::Sender::new(None))
    }

    /// Record the outcome. Returns false if one was already recorded.
    pub(crate) fn resolve(&self, error: Option<Error>) -> bool {
        let outcome = match error {
            Some(e) => Err(e),
            None => Ok(()),
        };
        self.0.send_if_modified(|status| {
            if status.is_some() {
                return false;
            }
            *status = Some(outcome);
            true
        })
    }

    pub(crate) fn is_resolved(&self) -> bool {
        self.0.borrow().is_some()
    }

    /// Error to hand callers of an ended transport.
    pub(crate) fn error(&self) -> Error {
        match &*self.0.borrow() {
            Some(Err(e)) => e.clone(),
            _ => Error::TransportClosed,
        }
    }

    pub(crate) async fn wait(&self) -> Result<()> {
        let mut rx = self.0.subscribe();
        let status = rx
            .wait_for(Option::is_some)
            .await
            .map_err(|_| Error::TransportClosed)?
            .clone();
        status.unwrap_or(Ok(()))
    }
}

/// Packet-level connection to a projector.
pub trait Transport: Send + Sync {
    /// Lock serializing exchanges on this transport.
    fn transaction_lock(&self) -> &Mutex<()>;

    /// Send one command packet and read its response packets.
    ///
    /// The caller must hold the transaction lock. Any failure shuts the
    /// transport down before the error is returned.
    fn transact_no_lock(
        &self,
        packet: &Packet,
    ) -> impl Future<Output = Result<ResponsePackets>> + Send;

    /// End the transport, recording `error` as its outcome. Idempotent and
    /// non-blocking; pending operations fail promptly.
    fn shutdown(&self, error: Option<jvc_core::Error>);

    /// True once the transport has ended or begun ending.
    fn is_shutting_down(&self) -> bool;

    /// Wait for the transport to end, returning the stored error if it
    /// failed.
    fn wait(&self) -> impl Future<Output = Result<()>> + Send;

    /// Acquire the transaction lock for a sequence of exchanges.
    fn begin_transaction(&self) -> impl Future<Output = Transaction<'_, Self>> + Send
    where
        Self: Sized,
    {
        async move {
            Transaction {
                transport: self,
                _guard: self.transaction_lock().lock().await,
            }
        }
    }

    /// Run a single exchange under the transaction lock.
    fn transact(&self, packet: &Packet) -> impl Future<Output = Result<ResponsePackets>> + Send {
        async move {
            let _guard = self.transaction_lock().lock().await;
            self.transact_no_lock(packet).await
        }
    }
}

/// Holds a transport's transaction lock until dropped.
pub struct Transaction<'a, T: Transport> {
    transport: &'a T,
    _guard: MutexGuard<'a, ()>,
}

impl<T: Transport> Transaction<'_, T> {
    /// Exchange one packet without releasing the lock.
    ///
    /// # Errors
    /// As [`Transport::transact_no_lock`].
    pub async fn transact(&self, packet: &Packet) -> Result<ResponsePackets> {
        self.transport.transact_no_lock(packet).await
    }

    /// Exchange one command and assemble its response.
    ///
    /// # Errors
    /// As [`Transport::transact_no_lock`], plus `Error::ProtocolViolation`
    /// for responses that do not fit the command.
    pub async fn transact_command(&self, command: &Command) -> Result<Response> {
        let packets = self.transport.transact_no_lock(command.packet()).await?;
        packets.into_response(command.clone())
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        self.transport
    }
}

impl<T: Transport> std::fmt::Debug for Transaction<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transaction")
            .field("shutting_down", &self.transport.is_shutting_down())
            .finish()
    }
}
