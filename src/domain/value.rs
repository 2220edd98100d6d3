//! Bus Value Model
//!
//! A closed value tree for everything the bus hands back: plain scalars,
//! sequences, mappings and the bus-native fixed-width number wrappers that
//! the coercer rewrites into plain numbers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Property bag: property name to value
pub type PropertyMap = BTreeMap<String, BusValue>;

/// Managed-object response: object path to its bag of property groups
pub type ManagedObjects = BTreeMap<String, PropertyMap>;

// =============================================================================
// Fixed-Width Wrappers
// =============================================================================

/// Bus-native fixed-width number wrappers
///
/// Serialized as a single-key map, e.g. `{"dbus.Byte": 3}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FixedWidth {
    #[serde(rename = "dbus.Byte")]
    Byte(u8),
    #[serde(rename = "dbus.Int16")]
    Int16(i16),
    #[serde(rename = "dbus.UInt16")]
    UInt16(u16),
    #[serde(rename = "dbus.Int32")]
    Int32(i32),
    #[serde(rename = "dbus.UInt32")]
    UInt32(u32),
    #[serde(rename = "dbus.Int64")]
    Int64(i64),
    #[serde(rename = "dbus.UInt64")]
    UInt64(u64),
    #[serde(rename = "dbus.Double")]
    Double(f64),
}

impl FixedWidth {
    /// Convert the wrapper into the equivalent plain value
    pub fn to_plain(self) -> BusValue {
        match self {
            FixedWidth::Byte(v) => BusValue::Int(v.into()),
            FixedWidth::Int16(v) => BusValue::Int(v.into()),
            FixedWidth::UInt16(v) => BusValue::Int(v.into()),
            FixedWidth::Int32(v) => BusValue::Int(v.into()),
            FixedWidth::UInt32(v) => BusValue::Int(v.into()),
            FixedWidth::Int64(v) => BusValue::Int(v),
            // Out-of-range values keep their magnitude as a float
            FixedWidth::UInt64(v) => match i64::try_from(v) {
                Ok(v) => BusValue::Int(v),
                Err(_) => BusValue::Float(v as f64),
            },
            FixedWidth::Double(v) => BusValue::Float(v),
        }
    }
}

// =============================================================================
// Bus Value
// =============================================================================

/// A value as returned by the bus
///
/// Variant order matters for deserialization: plain numbers are tried before
/// wrapper maps, and wrapper maps before ordinary mappings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BusValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Array(Vec<BusValue>),
    Fixed(FixedWidth),
    Dict(PropertyMap),
}

impl BusValue {
    /// Borrow the string content, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            BusValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the mapping, if this is a mapping
    pub fn as_dict(&self) -> Option<&PropertyMap> {
        match self {
            BusValue::Dict(map) => Some(map),
            _ => None,
        }
    }

    /// Borrow the elements, if this is a sequence
    pub fn as_array(&self) -> Option<&[BusValue]> {
        match self {
            BusValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Whether this node is a fixed-width wrapper
    pub fn is_fixed(&self) -> bool {
        matches!(self, BusValue::Fixed(_))
    }

    /// Check whether any wrapper remains anywhere in the tree
    pub fn contains_fixed(&self) -> bool {
        match self {
            BusValue::Fixed(_) => true,
            BusValue::Array(items) => items.iter().any(BusValue::contains_fixed),
            BusValue::Dict(map) => map.values().any(BusValue::contains_fixed),
            _ => false,
        }
    }

    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusValue::Str(s) => write!(f, "'{}'", s),
            other => write!(f, "{}", other),
        }
    }
}

/// Bus-style rendering: booleans print as `True`/`False`, whole floats keep
/// a trailing `.0`, nested strings are quoted.
impl fmt::Display for BusValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusValue::Bool(true) => write!(f, "True"),
            BusValue::Bool(false) => write!(f, "False"),
            BusValue::Int(v) => write!(f, "{}", v),
            BusValue::Float(v) => {
                if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 {
                    write!(f, "{:.1}", v)
                } else {
                    write!(f, "{}", v)
                }
            }
            BusValue::Str(s) => write!(f, "{}", s),
            BusValue::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    item.fmt_nested(f)?;
                }
                write!(f, "]")
            }
            BusValue::Fixed(fixed) => write!(f, "{}", fixed.to_plain()),
            BusValue::Dict(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "'{}': ", key)?;
                    value.fmt_nested(f)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<&str> for BusValue {
    fn from(value: &str) -> Self {
        BusValue::Str(value.to_string())
    }
}

impl From<String> for BusValue {
    fn from(value: String) -> Self {
        BusValue::Str(value)
    }
}

impl From<bool> for BusValue {
    fn from(value: bool) -> Self {
        BusValue::Bool(value)
    }
}

impl From<i64> for BusValue {
    fn from(value: i64) -> Self {
        BusValue::Int(value)
    }
}

impl From<f64> for BusValue {
    fn from(value: f64) -> Self {
        BusValue::Float(value)
    }
}

impl From<FixedWidth> for BusValue {
    fn from(value: FixedWidth) -> Self {
        BusValue::Fixed(value)
    }
}

impl From<PropertyMap> for BusValue {
    fn from(value: PropertyMap) -> Self {
        BusValue::Dict(value)
    }
}

impl From<Vec<BusValue>> for BusValue {
    fn from(value: Vec<BusValue>) -> Self {
        BusValue::Array(value)
    }
}
