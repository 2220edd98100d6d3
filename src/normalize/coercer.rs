//! Scalar Coercer
//!
//! Rewrites bus-native fixed-width wrappers into plain numbers, in place,
//! anywhere inside a value tree.

use crate::domain::value::{BusValue, ManagedObjects};

/// Coerce every wrapper below (and including) `value`
///
/// Sequences are walked by index and mappings by key. Nodes of any other
/// kind are left untouched. Returns the number of nodes rewritten, so a
/// second pass over the same tree always returns 0.
pub fn coerce(value: &mut BusValue) -> usize {
    match value {
        BusValue::Fixed(fixed) => {
            let plain = fixed.to_plain();
            *value = plain;
            1
        }
        BusValue::Array(items) => items.iter_mut().map(coerce).sum(),
        BusValue::Dict(map) => map.values_mut().map(coerce).sum(),
        BusValue::Bool(_) | BusValue::Int(_) | BusValue::Float(_) | BusValue::Str(_) => 0,
    }
}

/// Coerce every property of every object in a managed-object response
pub fn coerce_objects(objects: &mut ManagedObjects) -> usize {
    objects
        .values_mut()
        .flat_map(|groups| groups.values_mut())
        .map(coerce)
        .sum()
}
