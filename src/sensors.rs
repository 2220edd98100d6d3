//! Sensor Resolver
//!
//! Resolves logical sensor names to bus objects and extracts the reading
//! fields. Sensor data is always fetched fresh; it never goes through the
//! inventory cache.

use crate::config::ObjectTarget;
use crate::domain::ports::BusClient;
use crate::domain::value::BusValue;
use crate::error::{Error, Result};
use crate::normalize::graph::ObjectGraph;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

// =============================================================================
// Sensor Names
// =============================================================================

/// Logical sensor names exposed to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SensorName {
    Ambient,
    BootProgress,
    SystemPower,
    OccStatus,
    CurrPowerCap,
    OpSysStat,
    PowerCap,
    PowerMinCap,
    PowerMaxCap,
    PowerNormalCap,
    PowerUserCap,
    BootCount,
}

impl SensorName {
    pub const ALL: [SensorName; 12] = [
        SensorName::Ambient,
        SensorName::BootProgress,
        SensorName::SystemPower,
        SensorName::OccStatus,
        SensorName::CurrPowerCap,
        SensorName::OpSysStat,
        SensorName::PowerCap,
        SensorName::PowerMinCap,
        SensorName::PowerMaxCap,
        SensorName::PowerNormalCap,
        SensorName::PowerUserCap,
        SensorName::BootCount,
    ];

    /// Logical name as clients spell it
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorName::Ambient => "AMBIENT",
            SensorName::BootProgress => "BOOT_PROGRESS",
            SensorName::SystemPower => "SYSTEM_POWER",
            SensorName::OccStatus => "OCC_STATUS",
            SensorName::CurrPowerCap => "CURR_POWER_CAP",
            SensorName::OpSysStat => "OP_SYS_STAT",
            SensorName::PowerCap => "POWER_CAP",
            SensorName::PowerMinCap => "POWER_MIN_CAP",
            SensorName::PowerMaxCap => "POWER_MAX_CAP",
            SensorName::PowerNormalCap => "POWER_NORMAL_CAP",
            SensorName::PowerUserCap => "POWER_USER_CAP",
            SensorName::BootCount => "BOOT_COUNT",
        }
    }

    /// Last path segment of the sensor object on the bus
    pub fn bus_key(&self) -> &'static str {
        match self {
            SensorName::Ambient => "ambient",
            SensorName::BootProgress => "BootProgress",
            SensorName::SystemPower => "system_power",
            SensorName::OccStatus => "OccStatus",
            SensorName::CurrPowerCap => "curr_cap",
            SensorName::OpSysStat => "OperatingSystemStatus",
            SensorName::PowerCap => "PowerCap",
            SensorName::PowerMinCap => "min_cap",
            SensorName::PowerMaxCap => "max_cap",
            SensorName::PowerNormalCap => "n_cap",
            SensorName::PowerUserCap => "user_cap",
            SensorName::BootCount => "BootCount",
        }
    }
}

impl fmt::Display for SensorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SensorName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        SensorName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| Error::unknown_key("sensor", s))
    }
}

// =============================================================================
// Sensor Record
// =============================================================================

/// Reading of one sensor; fields the bus did not report are omitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorRecord {
    #[serde(rename = "type")]
    pub sensor_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<BusValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<BusValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<BusValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<BusValue>,
}

impl SensorRecord {
    fn empty(name: SensorName) -> Self {
        Self {
            sensor_type: name.as_str().to_string(),
            value: None,
            units: None,
            filename: None,
            error: None,
        }
    }

    /// Whether the bus reported anything beyond the sensor type
    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.units.is_none() && self.filename.is_none() && self.error.is_none()
    }
}

/// Read `name` from a freshly fetched sensor graph
pub async fn read_sensor(
    bus: &dyn BusClient,
    target: &ObjectTarget,
    name: SensorName,
) -> Result<SensorRecord> {
    let graph = ObjectGraph::fetch(bus, target).await?;
    Ok(extract_sensor(&graph, name))
}

/// Extract the reading fields of `name` from a sensor graph
pub fn extract_sensor(graph: &ObjectGraph, name: SensorName) -> SensorRecord {
    let mut record = SensorRecord::empty(name);

    let Some(mut bag) = graph.find_by_leaf(name.bus_key()) else {
        debug!("Sensor {} ({}) not present on the bus", name, name.bus_key());
        return record;
    };

    record.value = bag.remove("value");
    record.units = bag.remove("units");
    record.filename = bag.remove("filename");
    record.error = bag.remove("error");
    record
}
