//! Inventory Module
//!
//! Maps inventory items from the bus into Redfish entity records, one mapper
//! per inventory class, served from a request-scoped inventory context.

pub mod cache;
pub mod chassis;
pub mod cpu;
pub mod dimm;
pub mod pcie;
pub mod record;
pub mod system;

pub use cache::InventoryContext;
pub use chassis::{chassis_summary, ChassisMapper};
pub use cpu::{core_count, CpuMapper};
pub use dimm::DimmMapper;
pub use pcie::PcieMapper;
pub use record::*;
pub use system::{bios_version, SYSTEM_TYPE};
