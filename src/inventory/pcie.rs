//! PCIe Mapper

use super::record::{presence_status, EntityClass, EntityMapper, PcieRecord};
use crate::domain::value::PropertyMap;
use crate::error::Result;
use crate::normalize::graph::ObjectGraph;

pub struct PcieMapper;

impl EntityMapper for PcieMapper {
    const CLASS: EntityClass = EntityClass::PcieCard;
    type Record = PcieRecord;

    fn map_bag(_path: &str, bag: &PropertyMap, _graph: &ObjectGraph) -> Result<PcieRecord> {
        let status = bag
            .get("present")
            .and_then(|value| presence_status(&value.to_string()));

        Ok(PcieRecord { status })
    }
}
