//! Object Graph Index
//!
//! Lookups over a coerced managed-object response: entities by class tag,
//! and a single object by the last segment of its path.

use crate::config::ObjectTarget;
use crate::domain::ports::BusClient;
use crate::domain::value::{BusValue, ManagedObjects, PropertyMap};
use crate::error::Result;
use crate::normalize::coercer::coerce_objects;
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Property holding the inventory class tag
pub const FRU_TYPE: &str = "fru_type";

// =============================================================================
// Path Helpers
// =============================================================================

/// Last `/`-delimited segment of an object path
pub fn leaf_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Instance identifier of an object: its last path segment, upper-cased
pub fn instance_id(path: &str) -> String {
    leaf_segment(path).to_uppercase()
}

/// Upper-cased second-to-last path segment, if the path has one
pub fn parent_id(path: &str) -> Option<String> {
    let mut segments = path.rsplit('/');
    segments.next()?;
    segments.next().map(str::to_uppercase)
}

// =============================================================================
// Object Graph
// =============================================================================

/// A decoded managed-object response with all wrappers coerced away
#[derive(Debug, Clone)]
pub struct ObjectGraph {
    objects: ManagedObjects,
    fetched_at: DateTime<Utc>,
}

impl ObjectGraph {
    /// Build a graph from a raw response, coercing it in place
    pub fn from_raw(mut objects: ManagedObjects) -> Self {
        let rewritten = coerce_objects(&mut objects);
        debug!(
            "Decoded object graph: {} objects, {} values coerced",
            objects.len(),
            rewritten
        );

        Self {
            objects,
            fetched_at: Utc::now(),
        }
    }

    /// Fetch a fresh managed-object response for `target` and decode it
    pub async fn fetch(bus: &dyn BusClient, target: &ObjectTarget) -> Result<Self> {
        debug!("Fetching managed objects from {} at {}", target.service, target.path);
        let objects = bus.managed_objects(&target.service, &target.path).await?;
        Ok(Self::from_raw(objects))
    }

    /// Number of objects in the graph
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the graph has no objects
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// When the underlying response was fetched
    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Time elapsed since the response was fetched
    pub fn age(&self) -> Duration {
        Utc::now() - self.fetched_at
    }

    /// All objects, keyed by path
    pub fn objects(&self) -> &ManagedObjects {
        &self.objects
    }

    /// Find every entity tagged with `class`
    ///
    /// A property group matches when its `fru_type` equals `class`, or when
    /// it nests the entity bag under a key equal to `class`. Groups without
    /// a tag are skipped. The first matching group of each path is returned.
    pub fn find_by_class(&self, class: &str) -> BTreeMap<&str, &PropertyMap> {
        let mut found = BTreeMap::new();

        for (path, groups) in &self.objects {
            let matched = groups
                .values()
                .filter_map(BusValue::as_dict)
                .find_map(|bag| match_class(bag, class));

            if let Some(bag) = matched {
                found.insert(path.as_str(), bag);
            }
        }

        trace!("Class {} matched {} objects", class, found.len());
        found
    }

    /// Find the object whose last path segment equals `leaf`
    ///
    /// All property groups of the first matching object are merged into one
    /// bag; on key collisions the later group wins.
    pub fn find_by_leaf(&self, leaf: &str) -> Option<PropertyMap> {
        let (path, groups) = self
            .objects
            .iter()
            .find(|(path, _)| leaf_segment(path) == leaf)?;

        let mut merged = PropertyMap::new();
        for bag in groups.values().filter_map(BusValue::as_dict) {
            merged.extend(bag.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        trace!("Leaf {} resolved to {}", leaf, path);
        Some(merged)
    }
}

fn match_class<'a>(bag: &'a PropertyMap, class: &str) -> Option<&'a PropertyMap> {
    match bag.get(FRU_TYPE) {
        Some(tag) if tag.to_string() == class => Some(bag),
        Some(_) => None,
        None => bag.get(class).and_then(BusValue::as_dict),
    }
}
