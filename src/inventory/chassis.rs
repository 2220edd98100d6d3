//! Chassis Mapper
//!
//! The chassis identity is read from `MEMORY_BUFFER` inventory items. Each
//! item maps to its own record; [`chassis_summary`] folds them into the
//! single record the chassis resource exposes.

use super::record::{ChassisRecord, EntityClass, EntityMapper};
use crate::domain::value::PropertyMap;
use crate::error::Result;
use crate::normalize::graph::ObjectGraph;

pub struct ChassisMapper;

impl EntityMapper for ChassisMapper {
    const CLASS: EntityClass = EntityClass::MemoryBuffer;
    type Record = ChassisRecord;

    fn map_bag(_path: &str, bag: &PropertyMap, _graph: &ObjectGraph) -> Result<ChassisRecord> {
        let mut record = ChassisRecord::default();

        for (key, value) in bag {
            let value = value.to_string();
            match key.as_str() {
                "Custom Field 1" => record.uuid = Some(value),
                "Manufacturer" => record.manufacturer = Some(value),
                "Name" => record.model = Some(value),
                "Part Number" => record.part_number = Some(value),
                "Serial Number" => record.serial_number = Some(value),
                _ => {}
            }
        }

        Ok(record)
    }
}

/// Fold every memory-buffer record into one, in path order
///
/// A field set by a later item overwrites the same field of an earlier one;
/// fields an item lacks keep their earlier value.
pub fn chassis_summary(graph: &ObjectGraph) -> Result<ChassisRecord> {
    let summary = ChassisMapper::map_entities(graph)?
        .into_records()
        .into_values()
        .fold(ChassisRecord::default(), |acc, next| ChassisRecord {
            uuid: next.uuid.or(acc.uuid),
            manufacturer: next.manufacturer.or(acc.manufacturer),
            model: next.model.or(acc.model),
            part_number: next.part_number.or(acc.part_number),
            serial_number: next.serial_number.or(acc.serial_number),
        });
    Ok(summary)
}
