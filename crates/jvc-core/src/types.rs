use crate::{Result, error::Error};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Projector power state as reported by `power_status.query`.
///
/// The string forms match the friendly names of the power status response
/// map, so a decoded response string can be parsed straight into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerState {
    Standby,
    On,
    Cooling,
    Warming,
    Emergency,
}

impl PowerState {
    /// All power states, in wire-payload order.
    pub const ALL: [PowerState; 5] = [
        PowerState::Standby,
        PowerState::On,
        PowerState::Cooling,
        PowerState::Warming,
        PowerState::Emergency,
    ];

    /// Friendly name used on the wire response map.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerState::Standby => "Standby",
            PowerState::On => "On",
            PowerState::Cooling => "Cooling",
            PowerState::Warming => "Warming",
            PowerState::Emergency => "Emergency",
        }
    }

    /// True while the lamp is warming up or cooling down.
    ///
    /// Projectors ignore power commands in these states.
    #[must_use]
    pub fn is_transitional(&self) -> bool {
        matches!(self, PowerState::Warming | PowerState::Cooling)
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PowerState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        PowerState::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| Error::UnexpectedState(s.to_string()))
    }
}

/// Projector status field that can be queried and, on the emulator, forced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusField {
    Power,
    Input,
    GammaTable,
    GammaValue,
    Source,
}

impl StatusField {
    pub const ALL: [StatusField; 5] = [
        StatusField::Power,
        StatusField::Input,
        StatusField::GammaTable,
        StatusField::GammaValue,
        StatusField::Source,
    ];

    /// Name of the status query command group for this field.
    #[must_use]
    pub fn group_name(&self) -> &'static str {
        match self {
            StatusField::Power => "power_status",
            StatusField::Input => "input_status",
            StatusField::GammaTable => "gamma_table_status",
            StatusField::GammaValue => "gamma_value_status",
            StatusField::Source => "source_status",
        }
    }

    /// Full name of the query command for this field.
    #[must_use]
    pub fn query_command(&self) -> &'static str {
        match self {
            StatusField::Power => "power_status.query",
            StatusField::Input => "input_status.query",
            StatusField::GammaTable => "gamma_table_status.query",
            StatusField::GammaValue => "gamma_value_status.query",
            StatusField::Source => "source_status.query",
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusField::Power => "power",
            StatusField::Input => "input",
            StatusField::GammaTable => "gamma_table",
            StatusField::GammaValue => "gamma_value",
            StatusField::Source => "source",
        }
    }
}

impl fmt::Display for StatusField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StatusField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        StatusField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| Error::Config(format!("Unknown status field: {s}")))
    }
}
