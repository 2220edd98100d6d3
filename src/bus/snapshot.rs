//! Snapshot Bus Adapter
//!
//! Serves managed objects and method replies from a recorded snapshot
//! document, and keeps a log of every call it answers.
//!
//! ```yaml
//! objects:
//!   org.openbmc.Inventory:
//!     /org/openbmc/inventory/system/chassis/motherboard/dimm0:
//!       org.openbmc.InventoryItem:
//!         fru_type: DIMM
//!         present: "True"
//! replies:
//!   - service: org.openbmc.managers.System
//!     path: /org/openbmc/managers/System
//!     interface: org.openbmc.managers.System
//!     method: getSystemState
//!     reply: HOST_BOOTED
//! ```

use crate::domain::ports::{interfaces, BusClient};
use crate::domain::value::{BusValue, ManagedObjects};
use crate::error::{Error, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

// =============================================================================
// Snapshot Document
// =============================================================================

/// Recorded bus state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Managed objects per service
    #[serde(default)]
    pub objects: BTreeMap<String, ManagedObjects>,
    /// Method replies
    #[serde(default)]
    pub replies: Vec<MethodReply>,
}

impl Snapshot {
    /// Check that every recorded object and reply has an absolute path
    pub fn validate(&self) -> Result<()> {
        let object_paths = self.objects.values().flat_map(|objects| objects.keys());
        let reply_paths = self.replies.iter().map(|reply| &reply.path);

        match object_paths.chain(reply_paths).find(|path| !path.starts_with('/')) {
            Some(path) => Err(Error::Snapshot(format!(
                "object path must be absolute, got {:?}",
                path
            ))),
            None => Ok(()),
        }
    }
}

/// Recorded outcome of one method call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodReply {
    pub service: String,
    pub path: String,
    pub interface: String,
    pub method: String,
    /// Reply value; absent means the method returns nothing
    #[serde(default)]
    pub reply: Option<BusValue>,
    /// Failure reason; takes precedence over `reply`
    #[serde(default)]
    pub error: Option<String>,
}

impl MethodReply {
    fn matches(&self, service: &str, path: &str, interface: &str, method: &str) -> bool {
        self.service == service
            && self.path == path
            && self.interface == interface
            && self.method == method
    }
}

/// A call answered by the snapshot bus
#[derive(Debug, Clone, PartialEq)]
pub struct BusCallRecord {
    pub service: String,
    pub path: String,
    pub interface: String,
    pub method: String,
    pub args: Vec<BusValue>,
}

// =============================================================================
// Snapshot Bus
// =============================================================================

/// Bus adapter backed by a [`Snapshot`]
#[derive(Debug)]
pub struct SnapshotBus {
    snapshot: Snapshot,
    calls: Mutex<Vec<BusCallRecord>>,
}

impl SnapshotBus {
    /// Create a bus serving `snapshot`
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Create a bus with nothing recorded
    pub fn empty() -> Self {
        Self::new(Snapshot::default())
    }

    /// Load a snapshot from a YAML or JSON (`.json`) file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let snapshot: Snapshot = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            _ => serde_yaml::from_str(&content)?,
        };
        snapshot.validate()?;

        info!(
            "Loaded bus snapshot from {}: {} services, {} replies",
            path.display(),
            snapshot.objects.len(),
            snapshot.replies.len()
        );
        Ok(Self::new(snapshot))
    }

    /// Add managed objects for a service
    pub fn with_objects(mut self, service: &str, objects: ManagedObjects) -> Self {
        self.snapshot
            .objects
            .entry(service.to_string())
            .or_default()
            .extend(objects);
        self
    }

    /// Add a successful method reply
    pub fn with_reply(
        mut self,
        service: &str,
        path: &str,
        interface: &str,
        method: &str,
        reply: BusValue,
    ) -> Self {
        self.snapshot.replies.push(MethodReply {
            service: service.to_string(),
            path: path.to_string(),
            interface: interface.to_string(),
            method: method.to_string(),
            reply: Some(reply),
            error: None,
        });
        self
    }

    /// Add a failing method reply
    pub fn with_failure(
        mut self,
        service: &str,
        path: &str,
        interface: &str,
        method: &str,
        reason: &str,
    ) -> Self {
        self.snapshot.replies.push(MethodReply {
            service: service.to_string(),
            path: path.to_string(),
            interface: interface.to_string(),
            method: method.to_string(),
            reply: None,
            error: Some(reason.to_string()),
        });
        self
    }

    /// The recorded snapshot
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Every call answered so far, in order
    pub fn calls(&self) -> Vec<BusCallRecord> {
        self.calls.lock().clone()
    }

    /// Number of answered calls of `method`
    pub fn call_count(&self, method: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.method == method)
            .count()
    }

    fn record(&self, service: &str, path: &str, interface: &str, method: &str, args: &[BusValue]) {
        self.calls.lock().push(BusCallRecord {
            service: service.to_string(),
            path: path.to_string(),
            interface: interface.to_string(),
            method: method.to_string(),
            args: args.to_vec(),
        });
    }

    fn knows_service(&self, service: &str) -> bool {
        self.snapshot.objects.contains_key(service)
            || self.snapshot.replies.iter().any(|r| r.service == service)
    }
}

fn under_root(path: &str, root: &str) -> bool {
    let root = root.trim_end_matches('/');
    root.is_empty()
        || path == root
        || path
            .strip_prefix(root)
            .is_some_and(|rest| rest.starts_with('/'))
}

#[async_trait]
impl BusClient for SnapshotBus {
    async fn managed_objects(&self, service: &str, root_path: &str) -> Result<ManagedObjects> {
        self.record(service, root_path, interfaces::OBJECT_MANAGER, "GetManagedObjects", &[]);

        let objects = self
            .snapshot
            .objects
            .get(service)
            .ok_or_else(|| Error::BusUnavailable {
                service: service.to_string(),
                reason: "service not present in snapshot".to_string(),
            })?;

        let selected: ManagedObjects = objects
            .iter()
            .filter(|(path, _)| under_root(path, root_path))
            .map(|(path, groups)| (path.clone(), groups.clone()))
            .collect();

        debug!(
            "Snapshot served {} objects for {} under {}",
            selected.len(),
            service,
            root_path
        );
        Ok(selected)
    }

    async fn call_method(
        &self,
        service: &str,
        object_path: &str,
        interface: &str,
        method: &str,
        args: &[BusValue],
    ) -> Result<Option<BusValue>> {
        self.record(service, object_path, interface, method, args);

        if !self.knows_service(service) {
            return Err(Error::BusUnavailable {
                service: service.to_string(),
                reason: "service not present in snapshot".to_string(),
            });
        }

        let reply = self
            .snapshot
            .replies
            .iter()
            .find(|reply| reply.matches(service, object_path, interface, method))
            .ok_or_else(|| Error::BusCall {
                service: service.to_string(),
                method: format!("{}.{}", interface, method),
                reason: format!("no reply recorded for {}", object_path),
            })?;

        match (&reply.error, &reply.reply) {
            (Some(reason), _) => Err(Error::BusCall {
                service: service.to_string(),
                method: format!("{}.{}", interface, method),
                reason: reason.clone(),
            }),
            (None, reply) => Ok(reply.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_under_root() {
        assert!(under_root("/org/openbmc/inventory/system", "/org/openbmc/inventory"));
        assert!(under_root("/org/openbmc/inventory", "/org/openbmc/inventory/"));
        assert!(!under_root("/org/openbmc/inventory2/x", "/org/openbmc/inventory"));
        assert!(under_root("/anything", "/"));
    }

    #[tokio::test]
    async fn test_managed_objects_filtered_by_root() {
        let objects: ManagedObjects = serde_json::from_value(json!({
            "/org/openbmc/sensors/temperature/ambient": {"org.openbmc.SensorValue": {"value": 21}},
            "/org/openbmc/other/x": {"org.openbmc.SensorValue": {"value": 1}}
        }))
        .unwrap();
        let bus = SnapshotBus::empty().with_objects("org.openbmc.Sensors", objects);

        let served = bus
            .managed_objects("org.openbmc.Sensors", "/org/openbmc/sensors")
            .await
            .unwrap();
        assert_eq!(served.len(), 1);
        assert_eq!(bus.call_count("GetManagedObjects"), 1);

        let missing = bus.managed_objects("org.openbmc.Inventory", "/").await;
        assert_matches!(missing, Err(Error::BusUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_method_replies() {
        let bus = SnapshotBus::empty()
            .with_reply("svc", "/obj", "iface", "ok", "value".into())
            .with_failure("svc", "/obj", "iface", "broken", "access denied");

        let value = bus.call_method("svc", "/obj", "iface", "ok", &[]).await.unwrap();
        assert_eq!(value, Some(BusValue::Str("value".into())));

        assert_matches!(
            bus.call_method("svc", "/obj", "iface", "broken", &[]).await,
            Err(Error::BusCall { .. })
        );
        assert_matches!(
            bus.call_method("svc", "/obj", "iface", "unknown", &[]).await,
            Err(Error::BusCall { .. })
        );
        assert_matches!(
            bus.call_method("gone", "/obj", "iface", "ok", &[]).await,
            Err(Error::BusUnavailable { .. })
        );

        let calls = bus.calls();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[0].method, "ok");
    }

    #[tokio::test]
    async fn test_reply_without_value() {
        let snapshot: Snapshot = serde_yaml::from_str(
            r#"
replies:
  - service: org.openbmc.control.led
    path: /org/openbmc/control/led/identify
    interface: org.openbmc.Led
    method: setOn
"#,
        )
        .unwrap();
        let bus = SnapshotBus::new(snapshot);

        let reply = bus
            .call_method(
                "org.openbmc.control.led",
                "/org/openbmc/control/led/identify",
                "org.openbmc.Led",
                "setOn",
                &[],
            )
            .await
            .unwrap();
        assert_eq!(reply, None);
    }

    #[test]
    fn test_load_yaml_snapshot() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(
            file,
            r#"
objects:
  org.openbmc.Inventory:
    /org/openbmc/inventory/system/chassis/motherboard/dimm0:
      org.openbmc.InventoryItem:
        fru_type: DIMM
        present: "True"
        size:
          dbus.UInt32: 16384
replies:
  - service: org.openbmc.managers.System
    path: /org/openbmc/managers/System
    interface: org.openbmc.managers.System
    method: getSystemState
    reply: HOST_BOOTED
"#
        )
        .unwrap();

        let bus = SnapshotBus::from_file(file.path()).unwrap();
        let snapshot = bus.snapshot();
        assert_eq!(snapshot.replies.len(), 1);

        let inventory = &snapshot.objects["org.openbmc.Inventory"];
        let item = inventory["/org/openbmc/inventory/system/chassis/motherboard/dimm0"]
            ["org.openbmc.InventoryItem"]
            .as_dict()
            .unwrap();
        assert!(item["size"].is_fixed());
        assert_eq!(item["present"], BusValue::Str("True".into()));
    }

    #[test]
    fn test_relative_path_rejected() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"objects": {{"svc": {{"inventory/cpu0": {{}}}}}}}}"#).unwrap();

        assert_matches!(SnapshotBus::from_file(file.path()), Err(Error::Snapshot(_)));
    }

    #[test]
    fn test_bundled_fixture_parses() {
        let snapshot: Snapshot =
            serde_yaml::from_str(include_str!("../../fixtures/openbmc-snapshot.yaml")).unwrap();
        assert!(snapshot.objects.contains_key("org.openbmc.Inventory"));
        assert!(snapshot.objects.contains_key("org.openbmc.Sensors"));
        assert!(!snapshot.replies.is_empty());
    }
}
