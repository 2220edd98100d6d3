//! Inventory Cache
//!
//! A request-scoped context that fetches the inventory object graph once and
//! serves every entity lookup of that request from it. A new request gets a
//! new context; there is no process-wide cache.

use super::record::{EntityClass, EntityCollection, EntityMapper};
use crate::config::ObjectTarget;
use crate::domain::ports::BusClientRef;
use crate::domain::value::PropertyMap;
use crate::error::{Error, Result};
use crate::normalize::graph::ObjectGraph;
use std::collections::BTreeMap;
use tokio::sync::OnceCell;
use tracing::debug;

/// Per-request inventory snapshot
pub struct InventoryContext {
    bus: BusClientRef,
    target: ObjectTarget,
    graph: OnceCell<ObjectGraph>,
}

impl InventoryContext {
    /// Create an empty context; nothing is fetched until first use
    pub fn new(bus: BusClientRef, target: ObjectTarget) -> Self {
        Self {
            bus,
            target,
            graph: OnceCell::new(),
        }
    }

    /// The inventory graph, fetched on first call and reused afterwards
    pub async fn inventory(&self) -> Result<&ObjectGraph> {
        if let Some(graph) = self.graph.get() {
            debug!(
                "Reusing inventory graph fetched {} ms ago",
                graph.age().num_milliseconds()
            );
            return Ok(graph);
        }

        self.graph
            .get_or_try_init(|| async {
                let graph = ObjectGraph::fetch(self.bus.as_ref(), &self.target).await?;
                debug!("Cached inventory graph with {} objects", graph.len());
                Ok::<_, Error>(graph)
            })
            .await
    }

    /// All inventory items of `class`, keyed by path
    pub async fn find(&self, class: EntityClass) -> Result<BTreeMap<&str, &PropertyMap>> {
        Ok(self.inventory().await?.find_by_class(class.as_str()))
    }

    /// Map every item of the mapper's class
    pub async fn map<M: EntityMapper>(&self) -> Result<EntityCollection<M::Record>> {
        M::map_entities(self.inventory().await?)
    }

    /// Whether the graph has been fetched
    pub fn is_loaded(&self) -> bool {
        self.graph.initialized()
    }

    /// Drop the cached graph; the next lookup fetches again
    pub fn invalidate(&mut self) {
        if self.graph.take().is_some() {
            debug!("Invalidated inventory graph");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::SnapshotBus;
    use crate::config::ProviderConfig;
    use crate::domain::value::ManagedObjects;
    use crate::inventory::dimm::DimmMapper;
    use assert_matches::assert_matches;
    use serde_json::json;
    use std::sync::Arc;

    fn bus() -> Arc<SnapshotBus> {
        let objects: ManagedObjects = serde_json::from_value(json!({
            "/org/openbmc/inventory/system/chassis/motherboard/dimm0": {
                "org.openbmc.InventoryItem": {"fru_type": "DIMM", "present": "True"}
            },
            "/org/openbmc/inventory/system/chassis/motherboard/cpu0": {
                "org.openbmc.InventoryItem": {"fru_type": "CPU"}
            }
        }))
        .unwrap();
        Arc::new(SnapshotBus::empty().with_objects("org.openbmc.Inventory", objects))
    }

    #[tokio::test]
    async fn test_single_fetch_per_context() {
        let bus = bus();
        let ctx = InventoryContext::new(bus.clone(), ProviderConfig::default().inventory);
        assert!(!ctx.is_loaded());

        assert_eq!(ctx.find(EntityClass::Dimm).await.unwrap().len(), 1);
        assert_eq!(ctx.find(EntityClass::Cpu).await.unwrap().len(), 1);
        assert_eq!(ctx.map::<DimmMapper>().await.unwrap().len(), 1);

        assert!(ctx.is_loaded());
        assert_eq!(bus.call_count("GetManagedObjects"), 1);
    }

    #[tokio::test]
    async fn test_reused_graph_keeps_fetch_time() {
        let ctx = InventoryContext::new(bus(), ProviderConfig::default().inventory);

        let first = ctx.inventory().await.unwrap().fetched_at();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = ctx.inventory().await.unwrap();

        assert_eq!(second.fetched_at(), first);
        assert!(second.age().num_milliseconds() >= 5);
    }

    #[tokio::test]
    async fn test_invalidate_refetches() {
        let bus = bus();
        let mut ctx = InventoryContext::new(bus.clone(), ProviderConfig::default().inventory);

        ctx.inventory().await.unwrap();
        ctx.invalidate();
        assert!(!ctx.is_loaded());
        ctx.inventory().await.unwrap();

        assert_eq!(bus.call_count("GetManagedObjects"), 2);
    }

    #[tokio::test]
    async fn test_separate_contexts_do_not_share() {
        let bus = bus();
        let target = ProviderConfig::default().inventory;

        let first = InventoryContext::new(bus.clone(), target.clone());
        let second = InventoryContext::new(bus.clone(), target);
        first.inventory().await.unwrap();
        second.inventory().await.unwrap();

        assert_eq!(bus.call_count("GetManagedObjects"), 2);
    }

    #[tokio::test]
    async fn test_bus_failure_is_not_cached() {
        let bus = Arc::new(SnapshotBus::empty());
        let ctx = InventoryContext::new(bus.clone(), ProviderConfig::default().inventory);

        assert_matches!(ctx.inventory().await, Err(Error::BusUnavailable { .. }));
        assert!(!ctx.is_loaded());
    }
}
