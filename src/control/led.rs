//! LED Control
//!
//! Dispatches LED commands to the per-type LED objects and interprets the
//! state replies.

use crate::config::ObjectTarget;
use crate::domain::ports::BusClient;
use crate::domain::value::BusValue;
use crate::error::{Error, Result};
use crate::normalize::coerce;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;

// =============================================================================
// Tables
// =============================================================================

/// LEDs exposed by the LED controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedType {
    Identify,
    Power,
    Heartbeat,
}

impl LedType {
    pub const ALL: [LedType; 3] = [LedType::Identify, LedType::Power, LedType::Heartbeat];

    pub fn as_str(&self) -> &'static str {
        match self {
            LedType::Identify => "identify",
            LedType::Power => "power",
            LedType::Heartbeat => "heartbeat",
        }
    }
}

impl fmt::Display for LedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LedType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        LedType::ALL
            .into_iter()
            .find(|led| led.as_str() == s)
            .ok_or_else(|| Error::unknown_key("LED type", s))
    }
}

/// LED commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LedOp {
    On,
    Off,
    BlinkFast,
    BlinkSlow,
    /// Query the current LED state
    #[serde(rename = "state")]
    State,
}

impl LedOp {
    pub const ALL: [LedOp; 5] = [
        LedOp::On,
        LedOp::Off,
        LedOp::BlinkFast,
        LedOp::BlinkSlow,
        LedOp::State,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LedOp::On => "On",
            LedOp::Off => "Off",
            LedOp::BlinkFast => "BlinkFast",
            LedOp::BlinkSlow => "BlinkSlow",
            LedOp::State => "state",
        }
    }

    /// LED method implementing the command
    pub fn method_name(&self) -> &'static str {
        match self {
            LedOp::On => "setOn",
            LedOp::Off => "setOff",
            LedOp::BlinkFast => "setBlinkFast",
            LedOp::BlinkSlow => "setBlinkSlow",
            LedOp::State => "GetLedState",
        }
    }
}

impl fmt::Display for LedOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LedOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        LedOp::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| Error::unknown_key("LED operation", s))
    }
}

// =============================================================================
// Replies
// =============================================================================

/// Binary LED indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedIndicator {
    Lit,
    Off,
}

/// Outcome of an LED command
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LedResponse {
    /// A `(code, state)` reply reduced to lit/off
    Indicator(LedIndicator),
    /// Any other reply, with wrappers coerced
    Raw(BusValue),
}

/// Reduce a two-element `(code, state)` reply to an indicator
pub fn interpret_reply(reply: BusValue) -> LedResponse {
    let lit = match reply.as_array() {
        Some([_, state]) => state.to_string() == "On",
        _ => return LedResponse::Raw(reply),
    };

    if lit {
        LedResponse::Indicator(LedIndicator::Lit)
    } else {
        LedResponse::Indicator(LedIndicator::Off)
    }
}

/// Run `op` on the `led` child of the LED controller
///
/// `None` when the LED method returns nothing.
pub async fn led_operation(
    bus: &dyn BusClient,
    controller: &ObjectTarget,
    op: LedOp,
    led: LedType,
) -> Result<Option<LedResponse>> {
    let target = controller.child(led.as_str());
    info!("LED {} {} via {}", led, op, op.method_name());

    let reply = bus
        .call_method(&target.service, &target.path, &target.interface, op.method_name(), &[])
        .await?;

    Ok(reply.map(|mut reply| {
        coerce(&mut reply);
        interpret_reply(reply)
    }))
}
