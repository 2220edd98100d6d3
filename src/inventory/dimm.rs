//! DIMM Mapper
//!
//! Projects `DIMM` inventory items into Redfish memory records.

use super::record::{presence_status, DimmRecord, EntityClass, EntityMapper};
use crate::domain::value::PropertyMap;
use crate::error::Result;
use crate::normalize::graph::ObjectGraph;

/// Memory type reported for every DIMM
pub const MEMORY_TYPE: &str = "DRAM";

pub struct DimmMapper;

impl EntityMapper for DimmMapper {
    const CLASS: EntityClass = EntityClass::Dimm;
    type Record = DimmRecord;

    fn map_bag(_path: &str, bag: &PropertyMap, _graph: &ObjectGraph) -> Result<DimmRecord> {
        let mut record = DimmRecord::default();

        for (key, value) in bag {
            let value = value.to_string();
            match key.as_str() {
                "Manufacturer" => record.manufacturer = Some(value),
                "fru_type" => record.memory_type = Some(MEMORY_TYPE.to_string()),
                "Serial Number" => record.serial_number = Some(value),
                "Part Number" => record.part_number = Some(value),
                "Name" => record.name = Some(value),
                "present" => record.status = presence_status(&value),
                _ => {}
            }
        }

        Ok(record)
    }
}
