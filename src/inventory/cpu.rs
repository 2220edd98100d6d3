//! CPU Mapper
//!
//! Projects `CPU` inventory items into Redfish processor records. Core
//! counts come from `CORE` items nested under each processor's path.

use super::record::{is_present, presence_status, CpuRecord, EntityClass, EntityMapper};
use crate::domain::value::PropertyMap;
use crate::error::{Error, Result};
use crate::normalize::graph::{instance_id, parent_id, ObjectGraph};

/// Compound field carrying the processor UUID as `<label>:<uuid>`
pub const UUID_FIELD: &str = "Custom Field 2";

pub struct CpuMapper;

impl EntityMapper for CpuMapper {
    const CLASS: EntityClass = EntityClass::Cpu;
    type Record = CpuRecord;

    fn map_bag(path: &str, bag: &PropertyMap, graph: &ObjectGraph) -> Result<CpuRecord> {
        let mut record = CpuRecord {
            total_cores: core_count(graph, &instance_id(path)),
            ..Default::default()
        };

        for (key, value) in bag {
            let value = value.to_string();
            match key.as_str() {
                "Manufacturer" => record.manufacturer = Some(value),
                "fru_type" => record.processor_type = Some(value),
                "Serial Number" => record.serial_number = Some(value),
                "Part Number" => record.part_number = Some(value),
                UUID_FIELD => record.uuid = Some(decode_uuid(&value)?),
                "Name" => record.name = Some(value),
                "FRU File ID" => record.fru = Some(value),
                "present" => record.status = presence_status(&value),
                _ => {}
            }
        }

        Ok(record)
    }
}

/// Count present `CORE` items whose parent segment is `cpu_id`
pub fn core_count(graph: &ObjectGraph, cpu_id: &str) -> u32 {
    graph
        .find_by_class(EntityClass::Core.as_str())
        .into_iter()
        .filter(|(path, bag)| parent_id(path).as_deref() == Some(cpu_id) && is_present(bag))
        .count() as u32
}

/// Second `:`-delimited field of the UUID compound value
fn decode_uuid(value: &str) -> Result<String> {
    value
        .split(':')
        .nth(1)
        .map(str::to_string)
        .ok_or_else(|| Error::MalformedCompoundField {
            field: UUID_FIELD.to_string(),
            value: value.to_string(),
        })
}
