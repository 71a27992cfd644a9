//! Command-level projector client.
//!
//! [`ProjectorClient`] turns command names into packets, runs them over a
//! [`Transport`] and decodes the responses. It also carries the power
//! sequencing that real projectors require.
//!
//! # Power sequencing
//!
//! Projectors only honour `power.on` from `Standby` and `power.off` from
//! `On`; a command sent while the lamp is cooling down or warming up is
//! acknowledged and then silently dropped. [`ProjectorClient::power_on`] and
//! [`ProjectorClient::power_off`] therefore wait out the transitional state
//! before sending:
//!
//! ```text
//! power_on:   Cooling ──wait──> Standby ──power.on──> Warming ──wait──> On
//! power_off:  Warming ──wait──> On ──power.off──> Cooling ──wait──> Standby
//! ```
//!
//! # Example
//!
//! ```no_run
//! use jvc_network::{ClientConfig, ProjectorClient};
//!
//! # async fn example() -> jvc_core::Result<()> {
//! let config = ClientConfig {
//!     host: Some("192.168.1.50".into()),
//!     ..ClientConfig::from_env()?
//! };
//! let client = ProjectorClient::connect(&config).await?;
//!
//! let state = client.power_on(true, None).await?;
//! println!("Projector is {state}");
//! println!("Input: {}", client.input_status().await?);
//!
//! client.shutdown();
//! client.wait().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use jvc_core::constants::{POWER_POLL_INTERVAL, STABLE_POWER_TIMEOUT};
use jvc_core::{Error, PowerState, Result, StatusField};
use jvc_protocol::{Command, JvcModel, Response, model_from_status_payload};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::connector::ClientTransport;
use crate::resolve::Discovery;
use crate::transport::Transport;

const MODEL_STATUS_QUERY: &str = "model_status.query";

/// Client for one projector.
#[derive(Debug)]
pub struct ProjectorClient<T: Transport = ClientTransport> {
    transport: T,
    model: OnceLock<&'static JvcModel>,
    stable_power_timeout: Duration,
}

impl ProjectorClient<ClientTransport> {
    /// Connect using `config`.
    ///
    /// With `auto_reconnect` the first connection is made lazily by the
    /// first command.
    ///
    /// # Errors
    /// - `Error::InvalidHost` / `Error::UnknownModel` for bad settings
    /// - any connect or handshake error when `auto_reconnect` is off
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        Self::connect_with_discovery(config, None).await
    }

    /// Like [`connect`](Self::connect), resolving `sddp://` hosts through
    /// `discovery`.
    ///
    /// # Errors
    /// As [`connect`](Self::connect).
    pub async fn connect_with_discovery(
        config: &ClientConfig,
        discovery: Option<Arc<dyn Discovery>>,
    ) -> Result<Self> {
        let model = config.resolved_model()?;
        let transport = ClientTransport::from_config(config, discovery).await?;
        let client = Self::new(transport).with_stable_power_timeout(config.stable_power_timeout);
        if let Some(model) = model {
            let _ = client.model.set(model);
        }
        Ok(client)
    }
}

impl<T: Transport> ProjectorClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            model: OnceLock::new(),
            stable_power_timeout: STABLE_POWER_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_stable_power_timeout(mut self, timeout: Duration) -> Self {
        self.stable_power_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_model(self, model: &'static JvcModel) -> Self {
        let _ = self.model.set(model);
        self
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Projector model, if configured or learned from `model_status.query`.
    #[must_use]
    pub fn model(&self) -> Option<&'static JvcModel> {
        self.model.get().copied()
    }

    /// Run one command and assemble its response.
    ///
    /// # Errors
    /// Any transport error, or `Error::ProtocolViolation` if the response does
    /// not fit the command.
    pub async fn transact(&self, command: &Command) -> Result<Response> {
        debug!(command = command.name(), "Sending command");
        let packets = self.transport.transact(command.packet()).await?;
        let response = packets.into_response(command.clone())?;

        if command.name() == MODEL_STATUS_QUERY
            && self.model.get().is_none()
            && let Some(model) = model_from_status_payload(response.payload())
        {
            debug!(model = model.name, "Learned projector model");
            let _ = self.model.set(model);
        }
        Ok(response)
    }

    /// Build the named command and run it.
    ///
    /// # Errors
    /// `Error::UnknownCommand` for an unknown name,
    /// `Error::MalformedCommand` for a payload of the wrong length, plus
    /// everything [`transact`](Self::transact) returns.
    pub async fn transact_by_name(&self, name: &str, payload: &[u8]) -> Result<Response> {
        let command = Command::from_name(name, payload)?;
        self.transact(&command).await
    }

    /// Send the null command, which only checks that the projector answers.
    ///
    /// # Errors
    /// As [`transact`](Self::transact).
    pub async fn null_command(&self) -> Result<()> {
        self.transact_by_name("test_command.null_command", b"").await?;
        Ok(())
    }

    /// Current power state.
    ///
    /// # Errors
    /// `Error::UnexpectedState` if the projector reports an unknown payload.
    pub async fn power_status(&self) -> Result<PowerState> {
        let response = self
            .transact_by_name(StatusField::Power.query_command(), b"")
            .await?;
        match response.response_str() {
            Some(status) => status.parse(),
            None => Err(Error::UnexpectedState(format!(
                "unknown power status payload {}",
                hex::encode(response.payload())
            ))),
        }
    }

    /// Poll the power state until it is neither `Warming` nor `Cooling`.
    ///
    /// `timeout` defaults to the client's stable power timeout.
    ///
    /// # Errors
    /// `Error::Timeout` if the state is still transitional when `timeout`
    /// has elapsed.
    pub async fn wait_for_stable_power(&self, timeout: Option<Duration>) -> Result<PowerState> {
        let timeout = timeout.unwrap_or(self.stable_power_timeout);
        let deadline = Instant::now() + timeout;

        loop {
            let state = self.power_status().await?;
            if !state.is_transitional() {
                return Ok(state);
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(Error::Timeout {
                    operation: "wait for stable power",
                    timeout,
                });
            }
            debug!(%state, "Waiting for power state to settle");
            tokio::time::sleep(POWER_POLL_INTERVAL.min(deadline - now)).await;
        }
    }

    /// Turn the projector on.
    ///
    /// Waits out a cool-down first, since `power.on` is ignored until the
    /// projector is back in `Standby`. With `wait_for_final` the call also
    /// waits out the warm-up and returns `On`; otherwise it returns the state
    /// right after the command, normally `Warming`.
    ///
    /// # Errors
    /// - `Error::EmergencyState` if the projector reports an emergency
    /// - `Error::UnexpectedState` if it does not end up on or warming
    /// - `Error::Timeout` if a wait exceeds `timeout`
    pub async fn power_on(&self, wait_for_final: bool, timeout: Option<Duration>) -> Result<PowerState> {
        let mut state = self.power_status().await?;
        if state == PowerState::Cooling || (state == PowerState::Warming && wait_for_final) {
            state = self.wait_for_stable_power(timeout).await?;
        }

        if state == PowerState::Standby {
            info!("Powering projector on");
            self.transact_by_name("power.on", b"").await?;
            state = if wait_for_final {
                self.wait_for_stable_power(timeout).await?
            } else {
                self.power_status().await?
            };
        }

        match state {
            PowerState::Emergency => Err(Error::EmergencyState),
            PowerState::On | PowerState::Warming => Ok(state),
            other => Err(Error::UnexpectedState(format!(
                "projector is {other} after power on"
            ))),
        }
    }

    /// Turn the projector off. The mirror image of [`power_on`](Self::power_on).
    ///
    /// # Errors
    /// - `Error::EmergencyState` if the projector reports an emergency
    /// - `Error::UnexpectedState` if it does not end up in standby or cooling
    /// - `Error::Timeout` if a wait exceeds `timeout`
    pub async fn power_off(&self, wait_for_final: bool, timeout: Option<Duration>) -> Result<PowerState> {
        let mut state = self.power_status().await?;
        if state == PowerState::Warming || (state == PowerState::Cooling && wait_for_final) {
            state = self.wait_for_stable_power(timeout).await?;
        }

        if state == PowerState::On {
            info!("Powering projector off");
            self.transact_by_name("power.off", b"").await?;
            state = if wait_for_final {
                self.wait_for_stable_power(timeout).await?
            } else {
                self.power_status().await?
            };
        }

        match state {
            PowerState::Emergency => Err(Error::EmergencyState),
            PowerState::Standby | PowerState::Cooling => Ok(state),
            other => Err(Error::UnexpectedState(format!(
                "projector is {other} after power off"
            ))),
        }
    }

    /// Query the model code and map it to a known model.
    ///
    /// # Errors
    /// `Error::UnknownStatus` if no known model reports the returned code.
    pub async fn model_status(&self) -> Result<&'static JvcModel> {
        let response = self.transact_by_name(MODEL_STATUS_QUERY, b"").await?;
        model_from_status_payload(response.payload()).ok_or_else(|| Error::UnknownStatus {
            field: "model",
            value: hex::encode(response.payload()),
        })
    }

    /// Friendly string for a status field, e.g. `"HDMI 1"` for the input.
    ///
    /// # Errors
    /// `Error::UnknownStatus` if the payload is not in the field's response
    /// map.
    pub async fn status(&self, field: StatusField) -> Result<String> {
        let response = self.transact_by_name(field.query_command(), b"").await?;
        response
            .response_str()
            .map(str::to_string)
            .ok_or_else(|| Error::UnknownStatus {
                field: field.as_str(),
                value: hex::encode(response.payload()),
            })
    }

    /// # Errors
    /// As [`status`](Self::status).
    pub async fn input_status(&self) -> Result<String> {
        self.status(StatusField::Input).await
    }

    /// # Errors
    /// As [`status`](Self::status).
    pub async fn gamma_table_status(&self) -> Result<String> {
        self.status(StatusField::GammaTable).await
    }

    /// # Errors
    /// As [`status`](Self::status).
    pub async fn gamma_value_status(&self) -> Result<String> {
        self.status(StatusField::GammaValue).await
    }

    /// # Errors
    /// As [`status`](Self::status).
    pub async fn source_status(&self) -> Result<String> {
        self.status(StatusField::Source).await
    }

    /// Close the underlying transport.
    pub fn shutdown(&self) {
        self.transport.shutdown(None);
    }

    /// Wait for the transport to end.
    ///
    /// # Errors
    /// The error the transport failed with, if any.
    pub async fn wait(&self) -> Result<()> {
        self.transport.wait().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{ResponsePackets, TerminalStatus};
    use jvc_protocol::Packet;
    use std::sync::Mutex as StdMutex;
    use tokio::sync::Mutex;

    struct FakeState {
        power: PowerState,
        /// Status polls left before a transitional state settles.
        polls_left: u32,
        settle_polls: u32,
        sent: Vec<&'static str>,
    }

    impl FakeState {
        fn tick(&mut self) {
            if !self.power.is_transitional() {
                return;
            }
            if self.polls_left == 0 {
                self.power = match self.power {
                    PowerState::Warming => PowerState::On,
                    _ => PowerState::Standby,
                };
            } else {
                self.polls_left -= 1;
            }
        }
    }

    /// In-memory projector with a poll-driven power cycle.
    struct FakeProjector {
        lock: Mutex<()>,
        state: StdMutex<FakeState>,
        status: TerminalStatus,
    }

    impl FakeProjector {
        fn new(power: PowerState, settle_polls: u32) -> Self {
            Self {
                lock: Mutex::new(()),
                state: StdMutex::new(FakeState {
                    power,
                    polls_left: settle_polls,
                    settle_polls,
                    sent: Vec::new(),
                }),
                status: TerminalStatus::new(),
            }
        }

        fn sent(&self) -> Vec<&'static str> {
            self.state.lock().unwrap().sent.clone()
        }

        fn count(&self, name: &str) -> usize {
            self.sent().iter().filter(|n| **n == name).count()
        }
    }

    impl Transport for FakeProjector {
        fn transaction_lock(&self) -> &Mutex<()> {
            &self.lock
        }

        async fn transact_no_lock(&self, packet: &Packet) -> Result<ResponsePackets> {
            let command = Command::from_wire_packet(packet.clone(), None)?;
            let mut state = self.state.lock().unwrap();
            state.sent.push(command.name());

            let payload: Option<Vec<u8>> = match command.name() {
                "power_status.query" => {
                    state.tick();
                    let map = command.response_map().unwrap();
                    Some(map.payload_for(state.power.as_str()).unwrap().to_vec())
                }
                "power.on" => {
                    if state.power == PowerState::Standby {
                        state.power = PowerState::Warming;
                        state.polls_left = state.settle_polls;
                    }
                    None
                }
                "power.off" => {
                    if state.power == PowerState::On {
                        state.power = PowerState::Cooling;
                        state.polls_left = state.settle_polls;
                    }
                    None
                }
                "model_status.query" => Some(b"ILAFPJ -- B5A2".to_vec()),
                "input_status.query" => Some(b"\x36".to_vec()),
                "source_status.query" => Some(b"\x39".to_vec()),
                _ => None,
            };

            Ok(ResponsePackets {
                basic: command.basic_response_packet()?,
                advanced: payload
                    .map(|p| command.advanced_response_packet(&p))
                    .transpose()?,
            })
        }

        fn shutdown(&self, error: Option<Error>) {
            self.status.resolve(error);
        }

        fn is_shutting_down(&self) -> bool {
            self.status.is_resolved()
        }

        async fn wait(&self) -> Result<()> {
            self.status.wait().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_power_on_from_cooling_waits_for_standby() {
        let client = ProjectorClient::new(FakeProjector::new(PowerState::Cooling, 2));

        let state = client.power_on(true, None).await.unwrap();
        assert_eq!(state, PowerState::On);

        let sent = client.transport().sent();
        assert_eq!(client.transport().count("power.on"), 1);
        let on_at = sent.iter().position(|n| *n == "power.on").unwrap();
        // Cooling, Cooling, Standby before the command.
        assert_eq!(on_at, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_power_on_without_wait_returns_warming() {
        let client = ProjectorClient::new(FakeProjector::new(PowerState::Standby, 5));
        let state = client.power_on(false, None).await.unwrap();
        assert_eq!(state, PowerState::Warming);
        assert_eq!(
            client.transport().sent(),
            ["power_status.query", "power.on", "power_status.query"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_power_on_when_already_on_sends_nothing() {
        let client = ProjectorClient::new(FakeProjector::new(PowerState::On, 0));
        assert_eq!(client.power_on(true, None).await.unwrap(), PowerState::On);
        assert_eq!(client.transport().count("power.on"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_power_on_emergency() {
        let client = ProjectorClient::new(FakeProjector::new(PowerState::Emergency, 0));
        let err = client.power_on(true, None).await.unwrap_err();
        assert!(matches!(err, Error::EmergencyState));
    }

    #[tokio::test(start_paused = true)]
    async fn test_power_off_from_warming_waits_for_on() {
        let client = ProjectorClient::new(FakeProjector::new(PowerState::Warming, 1));

        let state = client.power_off(true, None).await.unwrap();
        assert_eq!(state, PowerState::Standby);
        assert_eq!(client.transport().count("power.off"), 1);
        assert_eq!(client.transport().count("power.on"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_power_off_from_standby_is_noop() {
        let client = ProjectorClient::new(FakeProjector::new(PowerState::Standby, 0));
        assert_eq!(client.power_off(false, None).await.unwrap(), PowerState::Standby);
        assert_eq!(client.transport().sent(), ["power_status.query"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_stable_power_times_out() {
        let client = ProjectorClient::new(FakeProjector::new(PowerState::Warming, 1_000));
        let started = Instant::now();

        let err = client
            .wait_for_stable_power(Some(Duration::from_secs(2)))
            .await
            .unwrap_err();
        assert!(err.is_timeout());
        assert!(started.elapsed() >= Duration::from_secs(2));
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_stable_power_polls_every_half_second() {
        let client = ProjectorClient::new(FakeProjector::new(PowerState::Warming, 3));
        let started = Instant::now();

        assert_eq!(client.wait_for_stable_power(None).await.unwrap(), PowerState::On);
        assert_eq!(client.transport().count("power_status.query"), 4);
        assert!(started.elapsed() >= Duration::from_millis(1500));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_model_learned_from_model_status() {
        let client = ProjectorClient::new(FakeProjector::new(PowerState::Standby, 0));
        assert!(client.model().is_none());

        let model = client.model_status().await.unwrap();
        assert_eq!(model.name, "DLA-NZ8");
        assert_eq!(client.model().unwrap().status_payload, b"ILAFPJ -- B5A2");
    }

    #[tokio::test]
    async fn test_configured_model_is_not_replaced() {
        let nz7 = jvc_protocol::model("DLA-NZ7").unwrap();
        let client = ProjectorClient::new(FakeProjector::new(PowerState::Standby, 0)).with_model(nz7);
        client.model_status().await.unwrap();
        assert_eq!(client.model().unwrap().name, "DLA-NZ7");
    }

    #[tokio::test]
    async fn test_status_strings() {
        let client = ProjectorClient::new(FakeProjector::new(PowerState::Standby, 0));
        assert_eq!(client.input_status().await.unwrap(), "HDMI 1");

        let err = client.source_status().await.unwrap_err();
        assert!(matches!(err, Error::UnknownStatus { field: "source", .. }));
    }

    #[tokio::test]
    async fn test_unknown_command_name() {
        let client = ProjectorClient::new(FakeProjector::new(PowerState::Standby, 0));
        let err = client.transact_by_name("power.sideways", b"").await.unwrap_err();
        assert!(matches!(err, Error::UnknownCommand(_)));
        assert!(client.transport().sent().is_empty());
    }
}
