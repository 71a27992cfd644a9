//! Command metadata registry.
//!
//! Maps symbolic command names (`"power.on"`, `"power_status.query"`) to the
//! bytes that go on the wire, and raw command packets back to the metadata
//! that could have produced them.
//!
//! # Naming
//!
//! A command's full name is `<group>.<command>`. Groups share a two-byte
//! command code and an optional group prefix; each command in a group adds a
//! fixed-length command prefix:
//!
//! ```text
//! 21 89 01 | 50 4D | 50 4D | 30 30 | 0A     picture_mode_v1.film
//!          | code  | group | cmd   |
//! ```
//!
//! # Ambiguity
//!
//! Some groups produce identical bytes (the picture mode groups for different
//! projector generations, and aliases inside the remote control group).
//! [`CommandRegistry::resolve`] returns every candidate in table order; a
//! projector model, when known, drops candidates meant for other models.
//!
//! # Example
//!
//! ```
//! use jvc_protocol::registry;
//!
//! let meta = registry().get("power_status.query").unwrap();
//! assert!(meta.is_advanced());
//! assert_eq!(meta.response_str(b"\x31"), Some("On"));
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::LazyLock;

use jvc_core::constants::{BASIC_COMMAND_BYTE, ADVANCED_COMMAND_BYTE, PACKET_MAGIC};
use jvc_core::{Error, Result};
use tracing::trace;

use crate::command_table::{GROUPS, GroupDef, ResponseSource};
use crate::model::{JvcModel, models_by_status_payload};
use crate::packet::{CommandCode, Packet};

/// Payload to friendly string lookup for an advanced command's response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseMap {
    forward: BTreeMap<Vec<u8>, String>,
    reverse: BTreeMap<String, Vec<u8>>,
}

impl ResponseMap {
    fn from_entries<I, P, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (P, S)>,
        P: Into<Vec<u8>>,
        S: Into<String>,
    {
        let mut map = ResponseMap::default();
        for (payload, name) in entries {
            let payload = payload.into();
            let name = name.into();
            map.reverse.entry(name.clone()).or_insert_with(|| payload.clone());
            map.forward.insert(payload, name);
        }
        map
    }

    /// Friendly string for a response payload.
    #[must_use]
    pub fn get(&self, payload: &[u8]) -> Option<&str> {
        self.forward.get(payload).map(String::as_str)
    }

    /// Payload for a friendly string.
    #[must_use]
    pub fn payload_for(&self, name: &str) -> Option<&[u8]> {
        self.reverse.get(name).map(Vec::as_slice)
    }

    /// Entry with the lexicographically smallest payload.
    #[must_use]
    pub fn first(&self) -> Option<(&[u8], &str)> {
        self.forward
            .first_key_value()
            .map(|(payload, name)| (payload.as_slice(), name.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &str)> {
        self.forward
            .iter()
            .map(|(payload, name)| (payload.as_slice(), name.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

/// Attributes shared by every command in a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandGroup {
    pub name: &'static str,
    pub command_code: CommandCode,
    /// Bytes following the command code that are common to the whole group.
    pub group_prefix: &'static [u8],
    /// Advanced groups expect a second response packet carrying a payload.
    pub is_advanced: bool,
    pub command_prefix_length: usize,
    /// Length of the caller-supplied payload after the command prefix, when fixed.
    pub payload_length: Option<usize>,
    /// Length of the advanced response payload, when fixed. Zero for basic groups.
    pub response_payload_length: Option<usize>,
    /// Models this group applies to. Empty means every model.
    pub models: &'static [&'static str],
}

impl CommandGroup {
    fn from_def(def: &GroupDef) -> Self {
        let command_prefix_length = def.commands.first().map_or(0, |c| c.prefix.len());
        assert!(
            def.commands
                .iter()
                .all(|c| c.prefix.len() == command_prefix_length),
            "command prefixes in group {} differ in length",
            def.name
        );
        assert!(def.code_and_prefix.len() >= 2, "group {} has no command code", def.name);
        let is_advanced = def.response_payload_length != Some(0);
        CommandGroup {
            name: def.name,
            command_code: CommandCode::new([def.code_and_prefix[0], def.code_and_prefix[1]]),
            group_prefix: &def.code_and_prefix[2..],
            is_advanced,
            command_prefix_length,
            payload_length: def.payload_length,
            response_payload_length: def.response_payload_length,
            models: def.models,
        }
    }

    /// True if this group is usable on `model`.
    #[must_use]
    pub fn applies_to(&self, model: &JvcModel) -> bool {
        self.models.is_empty() || self.models.contains(&model.name)
    }
}

/// Static description of a single command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandMeta {
    name: String,
    command_name: &'static str,
    group: CommandGroup,
    command_prefix: &'static [u8],
    description: &'static str,
    /// Packet bytes every instance of this command starts with.
    packet_prefix: Vec<u8>,
    response_map: Option<ResponseMap>,
}

impl CommandMeta {
    /// Full dotted name, e.g. `power.on`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name within the group, e.g. `on`.
    #[must_use]
    pub fn command_name(&self) -> &'static str {
        self.command_name
    }

    #[must_use]
    pub fn group(&self) -> &CommandGroup {
        &self.group
    }

    #[must_use]
    pub fn command_code(&self) -> CommandCode {
        self.group.command_code
    }

    #[must_use]
    pub fn command_prefix(&self) -> &'static [u8] {
        self.command_prefix
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        self.description
    }

    #[must_use]
    pub fn is_advanced(&self) -> bool {
        self.group.is_advanced
    }

    /// Fixed length of the caller-supplied payload, if any.
    #[must_use]
    pub fn payload_length(&self) -> Option<usize> {
        self.group.payload_length
    }

    #[must_use]
    pub fn response_payload_length(&self) -> Option<usize> {
        self.group.response_payload_length
    }

    #[must_use]
    pub fn response_map(&self) -> Option<&ResponseMap> {
        self.response_map.as_ref()
    }

    /// Friendly string for a response payload of this command.
    #[must_use]
    pub fn response_str(&self, payload: &[u8]) -> Option<&str> {
        self.response_map.as_ref().and_then(|map| map.get(payload))
    }

    /// Bytes every packet of this command starts with: type byte, magic,
    /// command code, group prefix and command prefix.
    #[must_use]
    pub fn packet_prefix(&self) -> &[u8] {
        &self.packet_prefix
    }

    /// Bytes placed in the packet payload ahead of the caller's payload.
    #[must_use]
    pub fn payload_prefix(&self) -> Vec<u8> {
        [self.group.group_prefix, self.command_prefix].concat()
    }

    /// Packet payload length implied by a fixed `payload_length`.
    #[must_use]
    pub fn packet_payload_length(&self) -> Option<usize> {
        self.group
            .payload_length
            .map(|len| self.group.group_prefix.len() + self.command_prefix.len() + len)
    }

    /// True if `packet` carries exactly this command's prefix and, when
    /// fixed, its payload length.
    #[must_use]
    pub fn matches(&self, packet: &Packet) -> bool {
        packet.raw_bytes().starts_with(&self.packet_prefix)
            && self
                .packet_payload_length()
                .is_none_or(|len| packet.payload().len() == len)
    }
}

impl fmt::Display for CommandMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Immutable set of all known commands.
#[derive(Debug)]
pub struct CommandRegistry {
    commands: Vec<CommandMeta>,
    by_name: HashMap<String, usize>,
    by_code: HashMap<(bool, CommandCode), Vec<usize>>,
}

static REGISTRY: LazyLock<CommandRegistry> = LazyLock::new(|| CommandRegistry::build(GROUPS));

/// Process-wide command registry, built on first use.
pub fn registry() -> &'static CommandRegistry {
    &REGISTRY
}

impl CommandRegistry {
    fn build(groups: &[GroupDef]) -> Self {
        let model_map = ResponseMap::from_entries(
            models_by_status_payload()
                .into_iter()
                .map(|(payload, names)| (payload.to_vec(), names.join(","))),
        );

        let mut commands = Vec::new();
        let mut by_name = HashMap::new();
        let mut by_code: HashMap<(bool, CommandCode), Vec<usize>> = HashMap::new();

        for def in groups {
            let group = CommandGroup::from_def(def);
            let type_byte = if group.is_advanced {
                ADVANCED_COMMAND_BYTE
            } else {
                BASIC_COMMAND_BYTE
            };
            for cmd in def.commands {
                let name = format!("{}.{}", group.name, cmd.name);
                let parts: [&[u8]; 4] = [&[type_byte], &PACKET_MAGIC, def.code_and_prefix, cmd.prefix];
                let packet_prefix = parts.concat();
                let response_map = match cmd.response {
                    ResponseSource::None => None,
                    ResponseSource::Table(entries) => {
                        Some(ResponseMap::from_entries(entries.iter().copied()))
                    }
                    ResponseSource::ModelStatus => Some(model_map.clone()),
                };

                let index = commands.len();
                let previous = by_name.insert(name.clone(), index);
                assert!(previous.is_none(), "duplicate command name {name}");
                by_code
                    .entry((group.is_advanced, group.command_code))
                    .or_default()
                    .push(index);

                commands.push(CommandMeta {
                    name,
                    command_name: cmd.name,
                    group,
                    command_prefix: cmd.prefix,
                    description: cmd.description,
                    packet_prefix,
                    response_map,
                });
            }
        }

        CommandRegistry {
            commands,
            by_name,
            by_code,
        }
    }

    /// Look up a command by its full dotted name.
    ///
    /// # Errors
    /// Returns `Error::UnknownCommand` if the name is not registered.
    pub fn get(&self, name: &str) -> Result<&CommandMeta> {
        self.by_name
            .get(name)
            .map(|&index| &self.commands[index])
            .ok_or_else(|| Error::UnknownCommand(name.to_string()))
    }

    /// All commands, in table order.
    pub fn iter(&self) -> impl Iterator<Item = &CommandMeta> {
        self.commands.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Every command that could have produced `packet`, in table order.
    ///
    /// Only command packets resolve. With a `model`, candidates from groups
    /// restricted to other models are dropped unless that would leave none.
    #[must_use]
    pub fn resolve(&self, packet: &Packet, model: Option<&JvcModel>) -> Vec<&CommandMeta> {
        if !packet.is_command() {
            return Vec::new();
        }
        let key = (packet.is_advanced_command(), packet.command_code());
        let mut candidates: Vec<&CommandMeta> = self
            .by_code
            .get(&key)
            .into_iter()
            .flatten()
            .map(|&index| &self.commands[index])
            .filter(|meta| meta.matches(packet))
            .collect();

        if let Some(model) = model
            && candidates.len() > 1
            && candidates.iter().any(|meta| meta.group.applies_to(model))
        {
            candidates.retain(|meta| meta.group.applies_to(model));
        }

        trace!(
            packet = %hex::encode(packet.raw_bytes()),
            candidates = candidates.len(),
            "Resolved command packet"
        );
        candidates
    }

    /// Friendly string for a response payload of the named command.
    ///
    /// # Errors
    /// Returns `Error::UnknownCommand` if the name is not registered.
    pub fn response_str(&self, name: &str, payload: &[u8]) -> Result<Option<&str>> {
        Ok(self.get(name)?.response_str(payload))
    }
}
