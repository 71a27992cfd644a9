//! Command dispatcher and emulated projector state.
//!
//! Every session pushes its decoded packets onto one unbounded queue. A
//! single dispatcher task drains it in FIFO order and is the only code that
//! touches [`ProjectorState`], so no locking is needed around it. Control
//! requests from [`Emulator`](crate::Emulator) and power timer expiries travel
//! through the same queue.
//!
//! # Power cycle
//!
//! ```text
//! Standby ──power.on──> Warming ──warmup_time──> On
//!    ^                                            │
//!    └──── cooldown_time ──── Cooling <─power.off─┘
//! ```
//!
//! Power commands sent in any other state get no response at all, as on
//! real hardware.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use jvc_core::{Error, PowerState, Result, StatusField};
use jvc_protocol::{Command, JvcModel, Packet, Response, ResponseMap, registry};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::config::EmulatorConfig;
use crate::connection::{SessionId, SessionRegistry};

/// Work for the dispatcher task.
#[derive(Debug)]
pub(crate) enum Request {
    /// A command packet received on a session.
    Packet { session: SessionId, packet: Packet },
    /// A warm-up or cool-down timer fired.
    PowerTimer { generation: u64 },
    SetStatus {
        field: StatusField,
        value: String,
        reply: oneshot::Sender<Result<()>>,
    },
    GetStatus {
        field: StatusField,
        reply: oneshot::Sender<Result<String>>,
    },
    /// No more requests will be handled.
    Shutdown,
}

/// What the emulator does in response to a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Acknowledge with a basic response only.
    Ack,
    /// Send nothing.
    NoResponse,
    /// Acknowledge, then reply with this payload.
    RawPayload(Vec<u8>),
    /// Acknowledge, then reply with the payload mapped to this name.
    NamedPayload(String),
    /// Send this response as is.
    CustomResponse(Response),
}

fn status_map(field: StatusField) -> Result<&'static ResponseMap> {
    registry()
        .get(field.query_command())?
        .response_map()
        .ok_or_else(|| Error::UnknownCommand(format!("{} has no response map", field.query_command())))
}

/// Emulated projector status, held as response map names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectorState {
    fields: HashMap<StatusField, String>,
}

impl ProjectorState {
    /// Initial state from the configured status strings.
    ///
    /// # Errors
    /// Returns `Error::UnknownStatus` for a value not in the field's map.
    pub fn from_config(config: &EmulatorConfig) -> Result<Self> {
        let mut state = Self {
            fields: HashMap::new(),
        };
        for field in StatusField::ALL {
            state.set(field, config.initial_status(field))?;
        }
        Ok(state)
    }

    #[must_use]
    pub fn get(&self, field: StatusField) -> &str {
        self.fields.get(&field).map_or("", String::as_str)
    }

    /// Current power state.
    ///
    /// # Errors
    /// Returns `Error::UnexpectedState` if the stored name is not a power state.
    pub fn power(&self) -> Result<PowerState> {
        self.get(StatusField::Power).parse()
    }

    /// Set a field to a name from its status query's response map.
    ///
    /// # Errors
    /// Returns `Error::UnknownStatus` for a value not in the map.
    pub fn set(&mut self, field: StatusField, value: &str) -> Result<()> {
        if status_map(field)?.payload_for(value).is_none() {
            return Err(Error::UnknownStatus {
                field: field.as_str(),
                value: value.to_string(),
            });
        }
        self.fields.insert(field, value.to_string());
        Ok(())
    }
}

/// Turn an outcome into the packets to send, or `None` for no response.
///
/// # Errors
/// Returns `Error::ProtocolViolation` if the outcome does not fit the command
/// (a payload for a basic command, a name missing from the response map).
pub fn response_packets(command: &Command, outcome: CommandOutcome) -> Result<Option<Vec<Packet>>> {
    let response = match outcome {
        CommandOutcome::NoResponse => return Ok(None),
        CommandOutcome::Ack => command.response(b"")?,
        CommandOutcome::RawPayload(payload) => command.response(&payload)?,
        CommandOutcome::NamedPayload(name) => {
            let payload = command
                .response_map()
                .and_then(|map| map.payload_for(&name))
                .ok_or_else(|| {
                    Error::ProtocolViolation(format!("{} has no response named {name:?}", command.name()))
                })?;
            command.response(payload)?
        }
        CommandOutcome::CustomResponse(response) => response,
    };
    Ok(Some(response.packets().cloned().collect()))
}

pub(crate) struct Dispatcher {
    model: &'static JvcModel,
    state: ProjectorState,
    warmup_time: Duration,
    cooldown_time: Duration,
    power_generation: u64,
    power_timer: Option<JoinHandle<()>>,
    requests: mpsc::WeakUnboundedSender<Request>,
    sessions: Arc<SessionRegistry>,
}

impl Dispatcher {
    pub(crate) fn new(
        config: &EmulatorConfig,
        model: &'static JvcModel,
        state: ProjectorState,
        requests: mpsc::WeakUnboundedSender<Request>,
        sessions: Arc<SessionRegistry>,
    ) -> Self {
        Self {
            model,
            state,
            warmup_time: config.warmup_time,
            cooldown_time: config.cooldown_time(),
            power_generation: 0,
            power_timer: None,
            requests,
            sessions,
        }
    }

    /// Drain the queue until `Request::Shutdown` or every sender is gone.
    pub(crate) async fn run(mut self, mut requests: mpsc::UnboundedReceiver<Request>) {
        while let Some(request) = requests.recv().await {
            match request {
                Request::Packet { session, packet } => self.handle_packet(session, packet),
                Request::PowerTimer { generation } => self.power_timer_fired(generation),
                Request::SetStatus { field, value, reply } => {
                    let _ = reply.send(self.set_status(field, &value));
                }
                Request::GetStatus { field, reply } => {
                    let _ = reply.send(Ok(self.state.get(field).to_string()));
                }
                Request::Shutdown => break,
            }
        }
        self.cancel_power_timer();
        debug!("Dispatcher stopped");
    }

    fn handle_packet(&mut self, session: SessionId, packet: Packet) {
        match self.dispatch(packet) {
            Ok(Some(packets)) => self.sessions.send(session, packets),
            Ok(None) => debug!(session_id = session, "No response"),
            Err(e) => {
                warn!(session_id = session, error = %e, "Dispatch failed, closing session");
                self.sessions.close(session);
            }
        }
    }

    pub(crate) fn dispatch(&mut self, packet: Packet) -> Result<Option<Vec<Packet>>> {
        if !packet.is_command() {
            return Err(Error::ProtocolViolation(format!(
                "expected a command packet, got {packet}"
            )));
        }
        let command = Command::from_wire_packet(packet, Some(self.model))?;
        let outcome = self.handle_command(&command)?;
        trace!(command = %command.name(), outcome = ?outcome, "Handled command");
        response_packets(&command, outcome)
    }

    pub(crate) fn handle_command(&mut self, command: &Command) -> Result<CommandOutcome> {
        match command.name() {
            "model_status.query" => {
                Ok(CommandOutcome::CustomResponse(command.response(self.model.status_payload)?))
            }
            "power.on" => self.power_command(PowerState::Standby, PowerState::Warming),
            "power.off" => self.power_command(PowerState::On, PowerState::Cooling),
            name => {
                if let Some(field) = StatusField::ALL.into_iter().find(|f| f.query_command() == name) {
                    return Ok(CommandOutcome::NamedPayload(self.state.get(field).to_string()));
                }
                if !command.is_advanced() {
                    return Ok(CommandOutcome::Ack);
                }
                let (payload, _) = command.response_map().and_then(ResponseMap::first).ok_or_else(|| {
                    Error::ProtocolViolation(format!("no emulated response for {name}"))
                })?;
                Ok(CommandOutcome::RawPayload(payload.to_vec()))
            }
        }
    }

    fn power_command(&mut self, required: PowerState, next: PowerState) -> Result<CommandOutcome> {
        let current = self.state.power()?;
        if current != required {
            debug!(power = %current, required = %required, "Ignoring power command");
            return Ok(CommandOutcome::NoResponse);
        }
        self.set_power(next)?;
        Ok(CommandOutcome::Ack)
    }

    pub(crate) fn set_status(&mut self, field: StatusField, value: &str) -> Result<()> {
        if field == StatusField::Power {
            self.set_power(value.parse()?)
        } else {
            self.state.set(field, value)
        }
    }

    /// Force the power state. Any pending timer is cancelled; `Warming` and
    /// `Cooling` start a new one.
    fn set_power(&mut self, power: PowerState) -> Result<()> {
        self.state.set(StatusField::Power, power.as_str())?;
        self.cancel_power_timer();
        info!(power = %power, "Power state changed");

        let delay = match power {
            PowerState::Warming => self.warmup_time,
            PowerState::Cooling => self.cooldown_time,
            _ => return Ok(()),
        };
        let generation = self.power_generation;
        let requests = self.requests.clone();
        self.power_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(requests) = requests.upgrade() {
                let _ = requests.send(Request::PowerTimer { generation });
            }
        }));
        Ok(())
    }

    fn cancel_power_timer(&mut self) {
        self.power_generation += 1;
        if let Some(timer) = self.power_timer.take() {
            timer.abort();
        }
    }

    fn power_timer_fired(&mut self, generation: u64) {
        if generation != self.power_generation {
            trace!(generation, current = self.power_generation, "Stale power timer");
            return;
        }
        self.power_timer = None;
        let next = match self.state.power() {
            Ok(PowerState::Warming) => PowerState::On,
            Ok(PowerState::Cooling) => PowerState::Standby,
            _ => return,
        };
        if let Err(e) = self.set_power(next) {
            warn!(error = %e, "Failed to finish power transition");
        }
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> &ProjectorState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    struct Harness {
        dispatcher: Dispatcher,
        tx: mpsc::UnboundedSender<Request>,
        rx: mpsc::UnboundedReceiver<Request>,
    }

    fn harness(config: EmulatorConfig) -> Harness {
        let (tx, rx) = mpsc::unbounded_channel();
        let model = config.resolved_model().unwrap();
        let state = ProjectorState::from_config(&config).unwrap();
        let dispatcher = Dispatcher::new(
            &config,
            model,
            state,
            tx.downgrade(),
            Arc::new(SessionRegistry::default()),
        );
        Harness { dispatcher, tx, rx }
    }

    fn packet(raw: &[u8]) -> Packet {
        Packet::parse(raw).unwrap()
    }

    fn raw(packets: Option<Vec<Packet>>) -> Vec<Vec<u8>> {
        packets
            .unwrap_or_default()
            .iter()
            .map(|p| p.raw_bytes().to_vec())
            .collect()
    }

    impl Harness {
        async fn fire_next_timer(&mut self) {
            match self.rx.recv().await {
                Some(Request::PowerTimer { generation }) => {
                    self.dispatcher.power_timer_fired(generation)
                }
                other => panic!("expected a power timer, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_state_rejects_unknown_values() {
        let config = EmulatorConfig {
            input: "HDMI 9".into(),
            ..Default::default()
        };
        let err = ProjectorState::from_config(&config).unwrap_err();
        assert!(matches!(err, Error::UnknownStatus { field: "input", value } if value == "HDMI 9"));
    }

    #[tokio::test]
    async fn test_power_query_reports_state() {
        let mut h = harness(EmulatorConfig::default());
        let packets = h.dispatcher.dispatch(packet(b"\x3F\x89\x01PW\n")).unwrap();
        assert_eq!(
            raw(packets),
            vec![b"\x06\x89\x01PW\n".to_vec(), b"\x40\x89\x01PW0\n".to_vec()]
        );
    }

    #[tokio::test]
    async fn test_model_query_returns_model_payload() {
        let mut h = harness(EmulatorConfig::default());
        let packets = h.dispatcher.dispatch(packet(b"\x3F\x89\x01MD\n")).unwrap();
        assert_eq!(raw(packets)[1], b"\x40\x89\x01MDILAFPJ -- B5A2\n".to_vec());
    }

    #[rstest]
    #[case(b"\x3F\x89\x01IP\n".as_slice(), b"\x40\x89\x01IP6\n".as_slice())]
    #[case(b"\x3F\x89\x01GT\n".as_slice(), b"\x40\x89\x01GT0\n".as_slice())]
    #[case(b"\x3F\x89\x01GP\n".as_slice(), b"\x40\x89\x01GP4\n".as_slice())]
    #[case(b"\x3F\x89\x01SC\n".as_slice(), b"\x40\x89\x01SC1\n".as_slice())]
    #[tokio::test]
    async fn test_status_queries(#[case] query: &[u8], #[case] reply: &[u8]) {
        let mut h = harness(EmulatorConfig::default());
        let packets = raw(h.dispatcher.dispatch(packet(query)).unwrap());
        assert_eq!(packets.len(), 2);
        assert_eq!(packets[1], reply);
    }

    #[tokio::test]
    async fn test_other_basic_commands_are_acked() {
        let mut h = harness(EmulatorConfig::default());
        let packets = h.dispatcher.dispatch(packet(b"\x21\x89\x01\x01\x00\x00\n")).unwrap();
        assert_eq!(raw(packets), vec![b"\x06\x89\x01\x01\x00\n".to_vec()]);
    }

    #[tokio::test]
    async fn test_response_packets_rejects_payload_for_basic_command() {
        let command = Command::from_name("power.on", b"").unwrap();
        assert!(response_packets(&command, CommandOutcome::RawPayload(b"1".to_vec())).is_err());
        assert_eq!(response_packets(&command, CommandOutcome::NoResponse).unwrap(), None);
    }

    #[tokio::test]
    async fn test_response_packets_unknown_name() {
        let command = Command::from_name("power_status.query", b"").unwrap();
        let outcome = CommandOutcome::NamedPayload("Exploded".into());
        assert!(matches!(
            response_packets(&command, outcome),
            Err(Error::ProtocolViolation(_))
        ));
    }

    #[tokio::test]
    async fn test_response_packets_named_payload() {
        let command = Command::from_name("power_status.query", b"").unwrap();
        let outcome = CommandOutcome::NamedPayload("Cooling".into());
        let packets = raw(response_packets(&command, outcome).unwrap());
        assert_eq!(packets[1], b"\x40\x89\x01PW2\n".to_vec());
    }

    #[tokio::test]
    async fn test_response_packet_is_rejected() {
        let mut h = harness(EmulatorConfig::default());
        let err = h.dispatcher.dispatch(packet(b"\x06\x89\x01PW\n")).unwrap_err();
        assert!(matches!(err, Error::ProtocolViolation(_)));
    }

    #[tokio::test]
    async fn test_unrecognized_command() {
        let mut h = harness(EmulatorConfig::default());
        let err = h.dispatcher.dispatch(packet(b"\x21\x89\x01ZZ\n")).unwrap_err();
        assert!(matches!(err, Error::UnrecognizedCommand(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_power_on_warms_up_then_turns_on() {
        let mut h = harness(EmulatorConfig::default());

        let packets = h.dispatcher.dispatch(packet(b"\x21\x89\x01PW1\n")).unwrap();
        assert_eq!(raw(packets), vec![b"\x06\x89\x01PW\n".to_vec()]);
        assert_eq!(h.dispatcher.state().power().unwrap(), PowerState::Warming);

        // Ignored while warming: no ack at all.
        assert_eq!(h.dispatcher.dispatch(packet(b"\x21\x89\x01PW1\n")).unwrap(), None);

        h.fire_next_timer().await;
        assert_eq!(h.dispatcher.state().power().unwrap(), PowerState::On);
    }

    #[tokio::test(start_paused = true)]
    async fn test_power_off_cools_down_to_standby() {
        let config = EmulatorConfig {
            power: "On".into(),
            cooldown_time: Some(Duration::from_secs(3)),
            ..Default::default()
        };
        let mut h = harness(config);

        assert!(h.dispatcher.dispatch(packet(b"\x21\x89\x01PW0\n")).unwrap().is_some());
        assert_eq!(h.dispatcher.state().power().unwrap(), PowerState::Cooling);

        let start = tokio::time::Instant::now();
        h.fire_next_timer().await;
        assert!(start.elapsed() >= Duration::from_secs(3));
        assert_eq!(h.dispatcher.state().power().unwrap(), PowerState::Standby);
    }

    #[tokio::test]
    async fn test_power_off_in_standby_is_silent() {
        let mut h = harness(EmulatorConfig::default());
        assert_eq!(h.dispatcher.dispatch(packet(b"\x21\x89\x01PW0\n")).unwrap(), None);
        assert_eq!(h.dispatcher.state().power().unwrap(), PowerState::Standby);
    }

    #[tokio::test(start_paused = true)]
    async fn test_forcing_power_cancels_pending_timer() {
        let mut h = harness(EmulatorConfig::default());
        h.dispatcher.dispatch(packet(b"\x21\x89\x01PW1\n")).unwrap();
        let stale = h.dispatcher.power_generation;

        h.dispatcher.set_status(StatusField::Power, "Emergency").unwrap();
        h.dispatcher.power_timer_fired(stale);
        assert_eq!(h.dispatcher.state().power().unwrap(), PowerState::Emergency);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(h.rx.try_recv().is_err());
        drop(h.tx);
    }

    #[tokio::test]
    async fn test_set_status_validates() {
        let mut h = harness(EmulatorConfig::default());
        h.dispatcher.set_status(StatusField::GammaValue, "2.4").unwrap();
        assert_eq!(h.dispatcher.state().get(StatusField::GammaValue), "2.4");

        assert!(matches!(
            h.dispatcher.set_status(StatusField::Power, "Exploded"),
            Err(Error::UnexpectedState(_))
        ));
        assert!(matches!(
            h.dispatcher.set_status(StatusField::Source, "Maybe"),
            Err(Error::UnknownStatus { field: "source", .. })
        ));
    }
}
