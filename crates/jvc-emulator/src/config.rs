//! Emulator configuration.

use std::net::SocketAddr;
use std::time::Duration;

use jvc_core::constants::{
    DEFAULT_PORT, EMULATOR_DEFAULT_MODEL, EMULATOR_HANDSHAKE_TIMEOUT, EMULATOR_IDLE_TIMEOUT,
    EMULATOR_MAX_SESSIONS, EMULATOR_WARMUP_TIME,
};
use jvc_core::{Result, StatusField};
use jvc_protocol::JvcModel;
use serde::{Deserialize, Serialize};

/// Settings for [`Emulator::start`](crate::Emulator::start).
///
/// Initial status values are friendly strings from the matching status
/// query's response map (`"Standby"`, `"HDMI 1"`, ...).
///
/// # Example
///
/// ```
/// use jvc_emulator::EmulatorConfig;
/// use std::time::Duration;
///
/// let config = EmulatorConfig {
///     bind_addr: "127.0.0.1:0".parse().unwrap(),
///     password: Some("secret".into()),
///     warmup_time: Duration::from_secs(1),
///     ..Default::default()
/// };
/// assert_eq!(config.model, "DLA-NZ8");
/// assert_eq!(config.cooldown_time(), Duration::from_secs(1));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmulatorConfig {
    pub bind_addr: SocketAddr,
    /// Emulated model name.
    pub model: String,
    /// Required password; `None` or empty accepts a bare `PJREQ`.
    pub password: Option<String>,
    pub power: String,
    pub input: String,
    pub gamma_table: String,
    pub gamma_value: String,
    pub source: String,
    /// Time spent in `Warming` after `power.on`.
    pub warmup_time: Duration,
    /// Time spent in `Cooling` after `power.off`; defaults to `warmup_time`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooldown_time: Option<Duration>,
    /// Time a client has to authenticate before it gets `PJNAK`.
    ///
    /// A bare `PJREQ` sent to a password-protected emulator is a valid prefix
    /// of the expected request, so it gets no reply until this fires. Keep it
    /// below the client timeout in tests that exercise that case.
    pub handshake_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_sessions: usize,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            model: EMULATOR_DEFAULT_MODEL.to_string(),
            password: None,
            power: "Standby".to_string(),
            input: "HDMI 1".to_string(),
            gamma_table: "Normal".to_string(),
            gamma_value: "2.2".to_string(),
            source: "Signal OK".to_string(),
            warmup_time: EMULATOR_WARMUP_TIME,
            cooldown_time: None,
            handshake_timeout: EMULATOR_HANDSHAKE_TIMEOUT,
            idle_timeout: EMULATOR_IDLE_TIMEOUT,
            max_sessions: EMULATOR_MAX_SESSIONS,
        }
    }
}

impl EmulatorConfig {
    #[must_use]
    pub fn cooldown_time(&self) -> Duration {
        self.cooldown_time.unwrap_or(self.warmup_time)
    }

    /// Configured initial value for a status field.
    #[must_use]
    pub fn initial_status(&self, field: StatusField) -> &str {
        match field {
            StatusField::Power => &self.power,
            StatusField::Input => &self.input,
            StatusField::GammaTable => &self.gamma_table,
            StatusField::GammaValue => &self.gamma_value,
            StatusField::Source => &self.source,
        }
    }

    /// Password the session must present, if any.
    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }

    /// Look up the configured model.
    ///
    /// # Errors
    /// Returns `Error::UnknownModel` for a name not in the model list.
    pub fn resolved_model(&self) -> Result<&'static JvcModel> {
        jvc_protocol::model(&self.model)
    }
}
