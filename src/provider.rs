//! Redfish Provider
//!
//! Entry point for the HTTP front end. [`RedfishProvider`] holds the bus
//! handle and object layout; each request opens a [`ProviderSession`] whose
//! inventory lookups share one fetch.

use crate::config::ProviderConfig;
use crate::control::{self, LedOp, LedResponse, LedType, PowerAction, PowerState};
use crate::domain::ports::BusClientRef;
use crate::domain::value::BusValue;
use crate::error::Result;
use crate::inventory::{
    self, ChassisRecord, CpuMapper, CpuRecord, DimmMapper, DimmRecord, EntityClass,
    EntityCollection, InventoryContext, PcieMapper, PcieRecord, SystemRecord, SYSTEM_TYPE,
};
use crate::sensors::{self, SensorName, SensorRecord};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Translates bus state into Redfish records
#[derive(Clone)]
pub struct RedfishProvider {
    bus: BusClientRef,
    config: ProviderConfig,
}

impl RedfishProvider {
    pub fn new(bus: BusClientRef, config: ProviderConfig) -> Self {
        Self { bus, config }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Open a request session with an empty inventory context
    pub fn session(&self) -> ProviderSession<'_> {
        ProviderSession {
            provider: self,
            inventory: InventoryContext::new(self.bus.clone(), self.config.inventory.clone()),
        }
    }

    // =========================================================================
    // Uncached operations
    // =========================================================================

    /// Current reading of a sensor
    #[instrument(skip(self))]
    pub async fn sensor(&self, name: SensorName) -> Result<SensorRecord> {
        sensors::read_sensor(self.bus.as_ref(), &self.config.sensors, name).await
    }

    /// Run a chassis power action
    #[instrument(skip(self))]
    pub async fn power_control(&self, action: PowerAction) -> Result<Option<BusValue>> {
        control::power_control(self.bus.as_ref(), &self.config.chassis_control, action).await
    }

    /// Run an LED command
    #[instrument(skip(self))]
    pub async fn led_operation(&self, op: LedOp, led: LedType) -> Result<Option<LedResponse>> {
        control::led_operation(self.bus.as_ref(), &self.config.led, op, led).await
    }

    /// Coarse power state of the host
    pub async fn system_state(&self) -> Result<PowerState> {
        control::system_state(self.bus.as_ref(), &self.config.system_manager).await
    }

    /// UUID of the managed system
    pub async fn system_id(&self) -> Result<Option<String>> {
        control::chassis_uuid(self.bus.as_ref(), &self.config.chassis_control).await
    }

    pub fn system_type(&self) -> &'static str {
        SYSTEM_TYPE
    }
}

/// One request's view of the provider
pub struct ProviderSession<'a> {
    provider: &'a RedfishProvider,
    inventory: InventoryContext,
}

impl ProviderSession<'_> {
    pub fn provider(&self) -> &RedfishProvider {
        self.provider
    }

    pub async fn cpu_info(&self) -> Result<EntityCollection<CpuRecord>> {
        self.inventory.map::<CpuMapper>().await
    }

    pub async fn dimm_info(&self) -> Result<EntityCollection<DimmRecord>> {
        self.inventory.map::<DimmMapper>().await
    }

    pub async fn pcie_info(&self) -> Result<EntityCollection<PcieRecord>> {
        self.inventory.map::<PcieMapper>().await
    }

    pub async fn chassis_info(&self) -> Result<ChassisRecord> {
        inventory::chassis_summary(self.inventory.inventory().await?)
    }

    pub async fn bios_version(&self) -> Result<Option<String>> {
        Ok(inventory::bios_version(self.inventory.inventory().await?))
    }

    /// Computer system summary; any failing lookup fails the whole record
    pub async fn system_info(&self) -> Result<SystemRecord> {
        let (bios_version, uuid, power_state) = tokio::try_join!(
            self.bios_version(),
            self.provider.system_id(),
            self.provider.system_state(),
        )?;

        Ok(SystemRecord {
            system_type: SYSTEM_TYPE.to_string(),
            bios_version,
            uuid,
            power_state: Some(power_state.to_string()),
        })
    }

    /// Number of inventory items per class
    pub async fn inventory_items(&self) -> Result<BTreeMap<EntityClass, usize>> {
        let mut counts = BTreeMap::new();
        for class in EntityClass::ALL {
            counts.insert(class, self.inventory.find(class).await?.len());
        }
        debug!("Inventory counts: {:?}", counts);
        Ok(counts)
    }

    /// Drop the session's inventory so the next lookup refetches
    pub fn refresh(&mut self) {
        self.inventory.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::{Snapshot, SnapshotBus};
    use crate::control::LedIndicator;
    use crate::error::Error;
    use assert_matches::assert_matches;
    use serde_json::json;
    use std::sync::Arc;

    fn fixture_bus() -> Arc<SnapshotBus> {
        let snapshot: Snapshot =
            serde_yaml::from_str(include_str!("../fixtures/openbmc-snapshot.yaml")).unwrap();
        Arc::new(SnapshotBus::new(snapshot))
    }

    fn provider(bus: Arc<SnapshotBus>) -> RedfishProvider {
        RedfishProvider::new(bus, ProviderConfig::default())
    }

    #[tokio::test]
    async fn test_session_lookups_share_one_fetch() {
        let bus = fixture_bus();
        let provider = provider(bus.clone());
        let session = provider.session();

        let cpus = session.cpu_info().await.unwrap();
        let dimms = session.dimm_info().await.unwrap();
        let pcie = session.pcie_info().await.unwrap();
        session.chassis_info().await.unwrap();

        assert_eq!(cpus.len(), 2);
        assert_eq!(dimms.len(), 2);
        assert_eq!(pcie.len(), 2);
        assert_eq!(bus.call_count("GetManagedObjects"), 1);

        // A second request starts from scratch
        provider.session().cpu_info().await.unwrap();
        assert_eq!(bus.call_count("GetManagedObjects"), 2);
    }

    #[tokio::test]
    async fn test_cpu_records_from_fixture() {
        let provider = provider(fixture_bus());
        let cpus = provider.session().cpu_info().await.unwrap();

        assert_eq!(
            serde_json::to_value(cpus.get("CPU0").unwrap()).unwrap(),
            json!({
                "TotalCores": 2,
                "Manufacturer": "IBM",
                "ProcessorType": "CPU",
                "SerialNumber": "YA1934302447",
                "PartNumber": "00UL865",
                "UUID": "7c4d0fa8-4e4e-4fb0-b2e4-1f1a2a93f6c1",
                "Name": "POWER8 Processor",
                "FRU": "1",
                "Status": {"State": "Enabled", "Health": "Ok"}
            })
        );
        assert_eq!(cpus.get("CPU1").unwrap().total_cores, 1);
        assert!(cpus.failures().is_empty());
    }

    #[tokio::test]
    async fn test_absent_devices_have_no_status() {
        let provider = provider(fixture_bus());
        let session = provider.session();

        let dimms = session.dimm_info().await.unwrap();
        assert!(dimms.get("DIMM0").unwrap().status.is_some());
        assert_eq!(
            serde_json::to_value(dimms.get("DIMM1").unwrap()).unwrap(),
            json!({"MemoryType": "DRAM"})
        );

        let pcie = session.pcie_info().await.unwrap();
        assert!(pcie.get("PCIE_SLOT0_RISER").unwrap().status.is_some());
        assert!(pcie.get("PCIE_SLOT1").unwrap().status.is_none());
    }

    #[tokio::test]
    async fn test_system_info() {
        let provider = provider(fixture_bus());
        let system = provider.session().system_info().await.unwrap();

        assert_eq!(
            serde_json::to_value(&system).unwrap(),
            json!({
                "SystemType": "Physical",
                "BiosVersion": "open-power-firestone-v1.7-5",
                "UUID": "24340d83aa784d858468993286b390a5",
                "PowerState": "On"
            })
        );
    }

    #[tokio::test]
    async fn test_system_info_fails_with_its_parts() {
        let bus = Arc::new(SnapshotBus::empty());
        let provider = provider(bus);

        assert_matches!(
            provider.session().system_info().await,
            Err(Error::BusUnavailable { .. })
        );
    }

    #[tokio::test]
    async fn test_inventory_items() {
        let provider = provider(fixture_bus());
        let counts = provider.session().inventory_items().await.unwrap();

        assert_eq!(counts.len(), EntityClass::ALL.len());
        assert_eq!(counts[&EntityClass::Core], 4);
        assert_eq!(counts[&EntityClass::System], 2);
        assert_eq!(counts[&EntityClass::SystemEvent], 0);
    }

    #[tokio::test]
    async fn test_refresh_refetches() {
        let bus = fixture_bus();
        let provider = provider(bus.clone());
        let mut session = provider.session();

        session.bios_version().await.unwrap();
        session.refresh();
        session.bios_version().await.unwrap();
        assert_eq!(bus.call_count("GetManagedObjects"), 2);
    }

    #[tokio::test]
    async fn test_uncached_operations() {
        let bus = fixture_bus();
        let provider = provider(bus.clone());

        let ambient = provider.sensor(SensorName::Ambient).await.unwrap();
        assert_eq!(ambient.value, Some(BusValue::Int(24)));

        assert_eq!(
            provider.led_operation(LedOp::State, LedType::Power).await.unwrap(),
            Some(LedResponse::Indicator(LedIndicator::Lit))
        );
        assert_matches!(
            provider.led_operation(LedOp::State, LedType::Heartbeat).await,
            Err(Error::BusCall { .. })
        );

        assert_eq!(
            provider.power_control(PowerAction::State).await.unwrap(),
            Some(BusValue::Int(1))
        );
        assert_eq!(provider.power_control(PowerAction::On).await.unwrap(), None);
        assert_eq!(provider.system_state().await.unwrap(), PowerState::On);
        assert_eq!(provider.system_type(), "Physical");
    }
}
