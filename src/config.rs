//! Provider Configuration
//!
//! Names the bus objects the provider talks to. Defaults match the OpenBMC
//! object layout; a YAML file can override any subset of them.

use crate::domain::ports::interfaces;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

// =============================================================================
// Object Target
// =============================================================================

/// A bus object: owning service, object path and interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectTarget {
    pub service: String,
    pub path: String,
    pub interface: String,
}

impl ObjectTarget {
    pub fn new(service: &str, path: &str, interface: &str) -> Self {
        Self {
            service: service.to_string(),
            path: path.to_string(),
            interface: interface.to_string(),
        }
    }

    /// Target for a child object `<path>/<leaf>` on the same service
    pub fn child(&self, leaf: &str) -> Self {
        Self {
            service: self.service.clone(),
            path: format!("{}/{}", self.path.trim_end_matches('/'), leaf),
            interface: self.interface.clone(),
        }
    }

    fn validate(&self, name: &str) -> Result<()> {
        if self.service.is_empty() || self.interface.is_empty() {
            return Err(Error::Configuration(format!(
                "{}: service and interface must be set",
                name
            )));
        }
        if !self.path.starts_with('/') {
            return Err(Error::Configuration(format!(
                "{}: object path must be absolute, got {:?}",
                name, self.path
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Provider Configuration
// =============================================================================

/// Configuration for the Redfish provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Inventory object manager
    pub inventory: ObjectTarget,
    /// Sensor object manager
    pub sensors: ObjectTarget,
    /// System state manager
    pub system_manager: ObjectTarget,
    /// Chassis power control
    pub chassis_control: ObjectTarget,
    /// LED control; each LED type is a child object of this path
    pub led: ObjectTarget,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            inventory: ObjectTarget::new(
                "org.openbmc.Inventory",
                "/org/openbmc/inventory",
                interfaces::OBJECT_MANAGER,
            ),
            sensors: ObjectTarget::new(
                "org.openbmc.Sensors",
                "/org/openbmc/sensors",
                interfaces::OBJECT_MANAGER,
            ),
            system_manager: ObjectTarget::new(
                "org.openbmc.managers.System",
                "/org/openbmc/managers/System",
                "org.openbmc.managers.System",
            ),
            chassis_control: ObjectTarget::new(
                "org.openbmc.control.Chassis",
                "/org/openbmc/control/chassis0",
                "org.openbmc.control.Chassis",
            ),
            led: ObjectTarget::new(
                "org.openbmc.control.led",
                "/org/openbmc/control/led",
                "org.openbmc.Led",
            ),
        }
    }
}

impl ProviderConfig {
    /// Load configuration from a YAML file; absent keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ProviderConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        info!("Loaded provider configuration from {}", path.display());
        Ok(config)
    }

    /// Check that every target is usable
    pub fn validate(&self) -> Result<()> {
        self.inventory.validate("inventory")?;
        self.sensors.validate("sensors")?;
        self.system_manager.validate("system_manager")?;
        self.chassis_control.validate("chassis_control")?;
        self.led.validate("led")?;
        Ok(())
    }
}
