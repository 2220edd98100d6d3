//! Bus Adapters
//!
//! Implementations of the [`BusClient`](crate::domain::ports::BusClient)
//! port. The snapshot adapter serves recorded bus state from a file.

pub mod snapshot;

pub use snapshot::*;
