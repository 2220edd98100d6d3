//! System / BIOS Lookup

use super::record::EntityClass;
use crate::normalize::graph::{instance_id, ObjectGraph};

/// System type reported for every managed system
pub const SYSTEM_TYPE: &str = "Physical";

/// BIOS version of the top-level `SYSTEM` item
///
/// Only an item whose own path ends in `system` (any case) qualifies.
pub fn bios_version(graph: &ObjectGraph) -> Option<String> {
    let class = EntityClass::System.as_str();
    graph
        .find_by_class(class)
        .into_iter()
        .filter(|(path, _)| instance_id(path) == class)
        .find_map(|(_, bag)| bag.get("Version").map(ToString::to_string))
}
