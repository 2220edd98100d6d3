//! Domain layer - Bus value model and port definitions
//!
//! This module defines the value tree the bus speaks and the trait (port)
//! that bus adapters implement, following hexagonal architecture principles.

pub mod ports;
pub mod value;

pub use ports::*;
pub use value::*;
