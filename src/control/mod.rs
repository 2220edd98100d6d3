//! Action Dispatch
//!
//! Power and LED actuators and the system state query. Every operation is a
//! single method call on a well-known control object.

pub mod led;
pub mod power;
pub mod state;

pub use led::{interpret_reply, led_operation, LedIndicator, LedOp, LedResponse, LedType};
pub use power::{chassis_uuid, power_control, PowerAction};
pub use state::{system_state, HostState, PowerState};
