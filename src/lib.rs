//! OpenBMC Redfish Provider
//!
//! Translates OpenBMC bus objects into Redfish-shaped records: hardware
//! inventory, sensor readings, power and LED control, and system state.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                RedfishProvider / ProviderSession                    │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────┐  │
//! │  │  Entity Mappers │  │ Sensor Resolver │  │  Action Dispatch    │  │
//! │  │ (CPU/DIMM/PCIe) │  │                 │  │ (power/LED/state)   │  │
//! │  └────────┬────────┘  └────────┬────────┘  └──────────┬──────────┘  │
//! │  ┌────────┴────────┐           │                      │             │
//! │  │ InventoryContext│           │                      │             │
//! │  │ (per request)   │           │                      │             │
//! │  └────────┬────────┘           │                      │             │
//! │  ┌────────┴────────────────────┴──────┐               │             │
//! │  │  ObjectGraph + Scalar Coercer      │               │             │
//! │  └────────────────┬───────────────────┘               │             │
//! ├───────────────────┴───────────────────────────────────┴─────────────┤
//! │                     BusClient (port)                                │
//! │          GetManagedObjects            method call                   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`provider`]: Request entry points
//! - [`inventory`]: Inventory mappers and the request-scoped cache
//! - [`sensors`]: Sensor name table and reading extraction
//! - [`control`]: Power, LED and system state
//! - [`normalize`]: Scalar coercion and object graph lookups
//! - [`bus`]: Snapshot-backed bus client
//! - [`domain`]: Bus value model and the bus port
//! - [`config`]: Bus object layout
//! - [`error`]: Error types and handling

pub mod bus;
pub mod config;
pub mod control;
pub mod domain;
pub mod error;
pub mod inventory;
pub mod normalize;
pub mod provider;
pub mod sensors;

// Re-export commonly used types
pub use bus::{Snapshot, SnapshotBus};

pub use config::{ObjectTarget, ProviderConfig};

pub use control::{HostState, LedIndicator, LedOp, LedResponse, LedType, PowerAction, PowerState};

pub use domain::ports::{BusClient, BusClientRef};
pub use domain::value::{BusValue, FixedWidth, ManagedObjects, PropertyMap};

pub use error::{Error, ErrorScope, Result};

pub use inventory::{
    ChassisRecord, CpuRecord, DimmRecord, EntityClass, EntityCollection, EntityMapper,
    InventoryContext, PcieRecord, Status, SystemRecord,
};

pub use normalize::ObjectGraph;

pub use provider::{ProviderSession, RedfishProvider};

pub use sensors::{SensorName, SensorRecord};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
