//! Domain Ports - The bus boundary
//!
//! The provider talks to the system bus only through [`BusClient`].
//! Connection setup, service discovery, timeouts and retries belong to the
//! adapter that implements it.

use crate::domain::value::{BusValue, ManagedObjects};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Well-known bus interface names
pub mod interfaces {
    /// Object manager interface answering `GetManagedObjects`
    pub const OBJECT_MANAGER: &str = "org.freedesktop.DBus.ObjectManager";
    /// Standard properties interface answering `GetAll`
    pub const PROPERTIES: &str = "org.freedesktop.DBus.Properties";
}

// =============================================================================
// Bus Client Port
// =============================================================================

/// Port for system bus access
#[async_trait]
pub trait BusClient: Send + Sync {
    /// Enumerate every object below `root_path` owned by `service`
    ///
    /// Fails with `Error::BusUnavailable` when the service cannot be reached.
    async fn managed_objects(&self, service: &str, root_path: &str) -> Result<ManagedObjects>;

    /// Invoke `interface.method` on `object_path` and return its raw reply
    ///
    /// `None` means the method completed without returning a value.
    async fn call_method(
        &self,
        service: &str,
        object_path: &str,
        interface: &str,
        method: &str,
        args: &[BusValue],
    ) -> Result<Option<BusValue>>;
}

// =============================================================================
// Type Aliases for Arc'd Traits
// =============================================================================

pub type BusClientRef = Arc<dyn BusClient>;
