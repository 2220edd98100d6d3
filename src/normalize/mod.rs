//! Normalization Module
//!
//! Turns raw bus responses into coerced, indexed object graphs.

pub mod coercer;
pub mod graph;

pub use coercer::{coerce, coerce_objects};
pub use graph::{instance_id, leaf_segment, parent_id, ObjectGraph, FRU_TYPE};
