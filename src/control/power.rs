//! Chassis Power Control
//!
//! Power transitions and identity of the chassis control object.

use crate::config::ObjectTarget;
use crate::domain::ports::{interfaces, BusClient};
use crate::domain::value::BusValue;
use crate::error::{Error, Result};
use crate::normalize::coerce;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// Power actions accepted by the chassis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerAction {
    On,
    ForceOff,
    GracefulShutDown,
    ForceRestart,
    GracefulRestart,
    /// Query the current power state
    #[serde(rename = "state")]
    State,
}

impl PowerAction {
    pub const ALL: [PowerAction; 6] = [
        PowerAction::On,
        PowerAction::ForceOff,
        PowerAction::GracefulShutDown,
        PowerAction::ForceRestart,
        PowerAction::GracefulRestart,
        PowerAction::State,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerAction::On => "On",
            PowerAction::ForceOff => "ForceOff",
            PowerAction::GracefulShutDown => "GracefulShutDown",
            PowerAction::ForceRestart => "ForceRestart",
            PowerAction::GracefulRestart => "GracefulRestart",
            PowerAction::State => "state",
        }
    }

    /// Chassis method implementing the action
    pub fn method_name(&self) -> &'static str {
        match self {
            PowerAction::On => "powerOn",
            PowerAction::ForceOff => "powerOff",
            PowerAction::GracefulShutDown => "softPowerOff",
            PowerAction::ForceRestart => "reboot",
            PowerAction::GracefulRestart => "softReboot",
            PowerAction::State => "getPowerState",
        }
    }
}

impl fmt::Display for PowerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PowerAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        PowerAction::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| Error::unknown_key("power action", s))
    }
}

/// Run `action` on the chassis and return its reply with wrappers coerced
///
/// `None` when the chassis method returns nothing.
pub async fn power_control(
    bus: &dyn BusClient,
    chassis: &ObjectTarget,
    action: PowerAction,
) -> Result<Option<BusValue>> {
    info!("Power action {} via {}", action, action.method_name());
    let mut reply = bus
        .call_method(
            &chassis.service,
            &chassis.path,
            &chassis.interface,
            action.method_name(),
            &[],
        )
        .await?;

    if let Some(value) = reply.as_mut() {
        coerce(value);
    }
    Ok(reply)
}

/// UUID property of the chassis control object, if it reports one
pub async fn chassis_uuid(bus: &dyn BusClient, chassis: &ObjectTarget) -> Result<Option<String>> {
    let mut reply = bus
        .call_method(
            &chassis.service,
            &chassis.path,
            interfaces::PROPERTIES,
            "GetAll",
            &[BusValue::Str(chassis.interface.clone())],
        )
        .await?;
    if let Some(value) = reply.as_mut() {
        coerce(value);
    }

    let props = match reply {
        Some(BusValue::Dict(props)) => props,
        other => {
            return Err(Error::UnexpectedReply {
                method: "GetAll".to_string(),
                value: other.map_or_else(|| "no value".to_string(), |v| v.to_string()),
            })
        }
    };

    let uuid = props.get("uuid").map(ToString::to_string);
    debug!("Chassis uuid: {:?}", uuid);
    Ok(uuid)
}
