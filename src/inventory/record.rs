//! Entity Records
//!
//! Output records for each inventory class, plus the collection type the
//! mappers return. All optional fields are omitted when serialized, so a
//! property missing on the bus is missing in the record.

use crate::domain::value::{BusValue, PropertyMap};
use crate::error::{Error, ErrorScope, Result};
use crate::normalize::graph::ObjectGraph;
use crate::normalize::instance_id;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

/// Bus encoding of a true boolean-like property
pub const BUS_TRUE: &str = "True";

// =============================================================================
// Inventory Classes
// =============================================================================

/// Inventory classes reported through `fru_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityClass {
    System,
    MainPlanar,
    Fan,
    Bmc,
    Cpu,
    Core,
    Dimm,
    PcieCard,
    SystemEvent,
    MemoryBuffer,
}

impl EntityClass {
    /// Every known class, in inventory order
    pub const ALL: [EntityClass; 10] = [
        EntityClass::System,
        EntityClass::MainPlanar,
        EntityClass::Fan,
        EntityClass::Bmc,
        EntityClass::Cpu,
        EntityClass::Core,
        EntityClass::Dimm,
        EntityClass::PcieCard,
        EntityClass::SystemEvent,
        EntityClass::MemoryBuffer,
    ];

    /// Tag as it appears in `fru_type`
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityClass::System => "SYSTEM",
            EntityClass::MainPlanar => "MAIN_PLANAR",
            EntityClass::Fan => "FAN",
            EntityClass::Bmc => "BMC",
            EntityClass::Cpu => "CPU",
            EntityClass::Core => "CORE",
            EntityClass::Dimm => "DIMM",
            EntityClass::PcieCard => "PCIE_CARD",
            EntityClass::SystemEvent => "SYSTEM_EVENT",
            EntityClass::MemoryBuffer => "MEMORY_BUFFER",
        }
    }
}

impl fmt::Display for EntityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Records
// =============================================================================

/// Redfish `Status` sub-object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Status {
    pub state: String,
    pub health: String,
}

impl Status {
    /// Status reported for a present device
    pub fn enabled() -> Self {
        Self {
            state: "Enabled".to_string(),
            health: "Ok".to_string(),
        }
    }
}

/// Processor record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CpuRecord {
    pub total_cores: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processor_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_number: Option<String>,
    #[serde(rename = "UUID", skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "FRU", skip_serializing_if = "Option::is_none")]
    pub fru: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

/// Memory module record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DimmRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

/// PCIe device record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PcieRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

/// Chassis identity, built from memory-buffer inventory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChassisRecord {
    #[serde(rename = "UUID", skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
}

/// Computer system summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SystemRecord {
    pub system_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bios_version: Option<String>,
    #[serde(rename = "UUID", skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_state: Option<String>,
}

// =============================================================================
// Entity Collection
// =============================================================================

/// An instance that could not be mapped
#[derive(Debug)]
pub struct EntityFailure {
    pub instance: String,
    pub error: Error,
}

/// Mapped records keyed by instance id, with per-instance failures kept
/// apart so one bad entity never hides its siblings
#[derive(Debug)]
pub struct EntityCollection<T> {
    records: BTreeMap<String, T>,
    failures: Vec<EntityFailure>,
}

impl<T> Default for EntityCollection<T> {
    fn default() -> Self {
        Self {
            records: BTreeMap::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> EntityCollection<T> {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of mapping one instance
    ///
    /// Entity-scoped errors are kept as failures of that instance. Any other
    /// error is returned so the caller aborts the request.
    pub fn push(&mut self, instance: String, outcome: Result<T>) -> Result<()> {
        match outcome {
            Ok(record) => {
                self.records.insert(instance, record);
            }
            Err(error) if error.scope() == ErrorScope::Entity => {
                warn!("Failed to map {}: {}", instance, error);
                self.failures.push(EntityFailure { instance, error });
            }
            Err(error) => return Err(error),
        }
        Ok(())
    }

    pub fn records(&self) -> &BTreeMap<String, T> {
        &self.records
    }

    pub fn get(&self, instance: &str) -> Option<&T> {
        self.records.get(instance)
    }

    pub fn failures(&self) -> &[EntityFailure] {
        &self.failures
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Take the records, dropping failures
    pub fn into_records(self) -> BTreeMap<String, T> {
        self.records
    }
}

// =============================================================================
// Entity Mapper
// =============================================================================

/// Projects raw property bags of one inventory class into records
pub trait EntityMapper {
    /// Class this mapper consumes
    const CLASS: EntityClass;

    /// Output record
    type Record;

    /// Map a single entity; `graph` is available for cross-references
    fn map_bag(path: &str, bag: &PropertyMap, graph: &ObjectGraph) -> Result<Self::Record>;

    /// Map every entity of [`Self::CLASS`] in the graph
    fn map_entities(graph: &ObjectGraph) -> Result<EntityCollection<Self::Record>> {
        let mut collection = EntityCollection::new();
        for (path, bag) in graph.find_by_class(Self::CLASS.as_str()) {
            collection.push(instance_id(path), Self::map_bag(path, bag, graph))?;
        }
        Ok(collection)
    }
}

/// Status derived from a `present` property
pub fn presence_status(value: &str) -> Option<Status> {
    (value == BUS_TRUE).then(Status::enabled)
}

/// Whether a bag reports `present == "True"`
pub fn is_present(bag: &PropertyMap) -> bool {
    bag.get("present")
        .map(BusValue::to_string)
        .is_some_and(|value| value == BUS_TRUE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn test_entity_class_tags() {
        assert_eq!(EntityClass::PcieCard.as_str(), "PCIE_CARD");
        assert_eq!(EntityClass::MemoryBuffer.to_string(), "MEMORY_BUFFER");
        assert_eq!(
            serde_json::to_value(EntityClass::MainPlanar).unwrap(),
            json!("MAIN_PLANAR")
        );
    }

    #[test]
    fn test_sparse_records_serialize_without_placeholders() {
        let record = DimmRecord {
            name: Some("DIMM0".into()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&record).unwrap(), json!({"Name": "DIMM0"}));

        let cpu = CpuRecord {
            uuid: Some("abc".into()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&cpu).unwrap(),
            json!({"TotalCores": 0, "UUID": "abc"})
        );
    }

    /// Maps `broken` to a decode error and `offline` to a bus error
    struct FlakyMapper;

    impl EntityMapper for FlakyMapper {
        const CLASS: EntityClass = EntityClass::PcieCard;
        type Record = PcieRecord;

        fn map_bag(path: &str, _bag: &PropertyMap, _graph: &ObjectGraph) -> Result<PcieRecord> {
            match crate::normalize::leaf_segment(path) {
                "broken" => Err(Error::MalformedCompoundField {
                    field: "Custom Field 2".into(),
                    value: "no-delimiter".into(),
                }),
                "offline" => Err(Error::BusUnavailable {
                    service: "org.openbmc.Inventory".into(),
                    reason: "connection reset".into(),
                }),
                _ => Ok(PcieRecord::default()),
            }
        }
    }

    fn pcie_graph(leaves: &[&str]) -> ObjectGraph {
        let objects = leaves
            .iter()
            .map(|leaf| {
                (
                    format!("/org/openbmc/inventory/system/chassis/io_board/{}", leaf),
                    json!({"org.openbmc.InventoryItem": {"fru_type": "PCIE_CARD"}}),
                )
            })
            .collect::<serde_json::Map<_, _>>();
        ObjectGraph::from_raw(serde_json::from_value(serde_json::Value::Object(objects)).unwrap())
    }

    #[test]
    fn test_collection_keeps_failures_apart() {
        let collection = FlakyMapper::map_entities(&pcie_graph(&["pcie0", "broken"])).unwrap();

        assert_eq!(collection.len(), 1);
        assert!(collection.get("PCIE0").is_some());
        assert_eq!(collection.failures().len(), 1);
        assert_eq!(collection.failures()[0].instance, "BROKEN");
    }

    #[test]
    fn test_request_scoped_error_aborts_mapping() {
        let outcome = FlakyMapper::map_entities(&pcie_graph(&["pcie0", "broken", "offline"]));
        assert_matches!(outcome, Err(Error::BusUnavailable { .. }));

        let mut collection: EntityCollection<PcieRecord> = EntityCollection::new();
        let pushed = collection.push(
            "PCIE1".into(),
            Err(Error::Configuration("bad layout".into())),
        );
        assert_matches!(pushed, Err(Error::Configuration(_)));
        assert!(collection.failures().is_empty());
    }

    #[test]
    fn test_presence_matches_bus_literal_only() {
        assert_eq!(presence_status("True"), Some(Status::enabled()));
        assert_eq!(presence_status("true"), None);
        assert_eq!(presence_status("False"), None);

        let mut bag = PropertyMap::new();
        bag.insert("present".into(), BusValue::Bool(true));
        assert!(is_present(&bag));
        bag.insert("present".into(), "False".into());
        assert!(!is_present(&bag));
    }
}
