//! System State Mapping
//!
//! Reduces the host lifecycle state reported by the system manager to the
//! three power states clients see.

use crate::config::ObjectTarget;
use crate::domain::ports::BusClient;
use crate::domain::value::BusValue;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Fine-grained lifecycle state of the BMC and host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HostState {
    BaseApps,
    BmcStarting,
    BmcReady,
    HostPoweringOn,
    HostPoweredOn,
    HostBooting,
    HostBooted,
    HostPoweredOff,
}

impl HostState {
    pub const ALL: [HostState; 8] = [
        HostState::BaseApps,
        HostState::BmcStarting,
        HostState::BmcReady,
        HostState::HostPoweringOn,
        HostState::HostPoweredOn,
        HostState::HostBooting,
        HostState::HostBooted,
        HostState::HostPoweredOff,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HostState::BaseApps => "BASE_APPS",
            HostState::BmcStarting => "BMC_STARTING",
            HostState::BmcReady => "BMC_READY",
            HostState::HostPoweringOn => "HOST_POWERING_ON",
            HostState::HostPoweredOn => "HOST_POWERED_ON",
            HostState::HostBooting => "HOST_BOOTING",
            HostState::HostBooted => "HOST_BOOTED",
            HostState::HostPoweredOff => "HOST_POWERED_OFF",
        }
    }

    /// Coarse power state for this lifecycle state
    pub fn power_state(&self) -> PowerState {
        match self {
            HostState::BaseApps
            | HostState::BmcStarting
            | HostState::BmcReady
            | HostState::HostPoweredOff => PowerState::Off,
            HostState::HostPoweringOn | HostState::HostPoweredOn | HostState::HostBooting => {
                PowerState::PoweringOn
            }
            HostState::HostBooted => PowerState::On,
        }
    }
}

impl fmt::Display for HostState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HostState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        HostState::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| Error::unknown_key("system state", s))
    }
}

/// Externally visible power state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerState {
    Off,
    PoweringOn,
    On,
}

impl PowerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerState::Off => "Off",
            PowerState::PoweringOn => "PoweringOn",
            PowerState::On => "On",
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Query the system manager and map its state
pub async fn system_state(bus: &dyn BusClient, manager: &ObjectTarget) -> Result<PowerState> {
    let reply = bus
        .call_method(
            &manager.service,
            &manager.path,
            &manager.interface,
            "getSystemState",
            &[],
        )
        .await?;

    let host_state: HostState = match &reply {
        Some(BusValue::Str(state)) => state.parse()?,
        other => {
            return Err(Error::UnexpectedReply {
                method: "getSystemState".to_string(),
                value: other
                    .as_ref()
                    .map_or_else(|| "no value".to_string(), ToString::to_string),
            })
        }
    };

    let power_state = host_state.power_state();
    debug!("System state {} maps to {}", host_state, power_state);
    Ok(power_state)
}
