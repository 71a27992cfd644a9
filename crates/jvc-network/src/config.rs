//! Client configuration.
//!
//! Defaults come from the environment:
//!
//! | Variable                 | Field      | Format              |
//! |--------------------------|------------|---------------------|
//! | `JVC_PROJECTOR_HOST`     | `host`     | host specifier      |
//! | `JVC_PROJECTOR_PORT`     | `port`     | integer             |
//! | `JVC_PROJECTOR_PASSWORD` | `password` | string, empty = none |
//! | `JVC_PROJECTOR_TIMEOUT`  | `timeout`  | seconds, may be fractional |

use std::time::Duration;

use jvc_core::constants::{
    DEFAULT_IDLE_DISCONNECT, DEFAULT_PORT, DEFAULT_TIMEOUT, ENV_HOST, ENV_PASSWORD, ENV_PORT,
    ENV_TIMEOUT, STABLE_POWER_TIMEOUT,
};
use jvc_core::{Error, Result};
use jvc_protocol::JvcModel;
use serde::{Deserialize, Serialize};

use crate::resolve::HostSpec;

/// Settings for [`ProjectorClient::connect`](crate::ProjectorClient::connect).
///
/// # Example
///
/// ```
/// use jvc_network::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig {
///     host: Some("192.168.1.50".into()),
///     password: Some("secret".into()),
///     ..Default::default()
/// };
/// assert_eq!(config.port, 20554);
/// assert_eq!(config.timeout, Duration::from_secs(2));
/// ```
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Host specifier; `None` means SDDP discovery.
    pub host: Option<String>,
    /// Port used when the host specifier carries none.
    pub port: u16,
    pub password: Option<String>,
    /// Connect, read and write timeout.
    pub timeout: Duration,
    /// Projector model name, if known in advance.
    pub model: Option<String>,
    /// Default limit for waiting out warm-up or cool-down.
    pub stable_power_timeout: Duration,
    /// Idle time before a reconnecting client drops its connection.
    pub idle_disconnect: Duration,
    /// Reconnect on demand instead of holding one connection.
    pub auto_reconnect: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: DEFAULT_PORT,
            password: None,
            timeout: DEFAULT_TIMEOUT,
            model: None,
            stable_power_timeout: STABLE_POWER_TIMEOUT,
            idle_disconnect: DEFAULT_IDLE_DISCONNECT,
            auto_reconnect: true,
        }
    }
}

impl ClientConfig {
    /// Defaults overlaid with the `JVC_PROJECTOR_*` environment variables.
    ///
    /// # Errors
    /// Returns `Error::Config` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    ///
    /// # Errors
    /// Returns `Error::Config` if a variable is set to an unparseable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(host) = var(ENV_HOST) {
            config.host = Some(host);
        }
        if let Some(port) = var(ENV_PORT) {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("{ENV_PORT}: invalid port {port:?}")))?;
        }
        if let Some(password) = var(ENV_PASSWORD) {
            config.password = Some(password);
        }
        if let Some(timeout) = var(ENV_TIMEOUT) {
            config.timeout = parse_seconds(&timeout)
                .ok_or_else(|| Error::Config(format!("{ENV_TIMEOUT}: invalid timeout {timeout:?}")))?;
        }
        Ok(config)
    }

    /// The configured host as a parsed specifier.
    ///
    /// # Errors
    /// Returns `Error::InvalidHost` if the host does not parse.
    pub fn host_spec(&self) -> Result<HostSpec> {
        HostSpec::parse(self.host.as_deref().unwrap_or(""), self.port)
    }

    /// Password to send, with an empty string treated as none.
    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }

    /// The configured model, looked up by name.
    ///
    /// # Errors
    /// Returns `Error::UnknownModel` for an unrecognized name.
    pub fn resolved_model(&self) -> Result<Option<&'static JvcModel>> {
        self.model.as_deref().map(jvc_protocol::model).transpose()
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("model", &self.model)
            .field("stable_power_timeout", &self.stable_power_timeout)
            .field("idle_disconnect", &self.idle_disconnect)
            .field("auto_reconnect", &self.auto_reconnect)
            .finish()
    }
}

fn parse_seconds(s: &str) -> Option<Duration> {
    let secs: f64 = s.trim().parse().ok()?;
    if secs <= 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(secs).ok()
}
