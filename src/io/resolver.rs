//! Name resolution for regions and state datasets.
//!
//! Regions are found by their `name` attribute, state datasets by the pair
//! (`region`, `quantity`). Both indices are built by one scan on first use
//! and kept until the container closes. When names repeat in the source the
//! first entry in store order wins.

use crate::io::tdr::TdrFile;
use crate::io::{
    ATTR_NAME, ATTR_QUANTITY, ATTR_REGION, DATASET_ELEMENTS, DATASET_VALUES, GROUP_GEOMETRY,
    GROUP_STATE, HierarchicalStore, REGION_PREFIX, join,
};
use crate::mesh_error::TcadMeshError;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// A region group located in the store.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct RegionHandle {
    /// Numeric key from the group name `region_<key>`.
    pub key: usize,
    pub name: String,
    /// Store path of the region group.
    pub path: String,
}

impl RegionHandle {
    pub fn elements_path(&self) -> String {
        join(&self.path, DATASET_ELEMENTS)
    }
}

/// A state dataset located in the store.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct FieldHandle {
    pub region_key: usize,
    pub quantity: String,
    /// Store path of the dataset group.
    pub path: String,
}

impl FieldHandle {
    pub fn values_path(&self) -> String {
        join(&self.path, DATASET_VALUES)
    }
}

/// Read an attribute during an index scan.
///
/// An undecodable value only costs the entry it belongs to: it is logged and
/// read as absent. A closed store still fails the scan.
fn indexed_attr(
    store: &dyn HierarchicalStore,
    path: &str,
    name: &str,
) -> Result<Option<String>, TcadMeshError> {
    match store.attr(path, name) {
        Ok(value) => Ok(value),
        Err(TcadMeshError::ClosedResource) => Err(TcadMeshError::ClosedResource),
        Err(err) => {
            log::warn!("ignoring attribute `{name}` on {path}: {err}");
            Ok(None)
        }
    }
}

impl TdrFile {
    /// Region name → handle, scanned once.
    pub(crate) fn regions(&self) -> Result<&BTreeMap<String, RegionHandle>, TcadMeshError> {
        let store = self.store()?;
        self.region_index.get_or_try_init(|| {
            let mut index = BTreeMap::new();
            for member in store.members(GROUP_GEOMETRY)? {
                let Some(suffix) = member.strip_prefix(REGION_PREFIX) else {
                    continue;
                };
                let Ok(key) = suffix.parse::<usize>() else {
                    log::warn!("skipping region group with non-numeric key: {member}");
                    continue;
                };
                let path = join(GROUP_GEOMETRY, &member);
                let Some(name) = indexed_attr(store, &path, ATTR_NAME)? else {
                    log::warn!("skipping region group without a usable name: {path}");
                    continue;
                };
                index
                    .entry(name.clone())
                    .or_insert(RegionHandle { key, name, path });
            }
            log::debug!("indexed {} regions", index.len());
            Ok(index)
        })
    }

    /// (region key, quantity) → handle, scanned once.
    pub(crate) fn fields(
        &self,
    ) -> Result<&HashMap<(usize, String), FieldHandle>, TcadMeshError> {
        let store = self.store()?;
        self.field_index.get_or_try_init(|| {
            let mut index = HashMap::new();
            for member in store.members(GROUP_STATE)? {
                let path = join(GROUP_STATE, &member);
                let (Some(region), Some(quantity)) = (
                    indexed_attr(store, &path, ATTR_REGION)?,
                    indexed_attr(store, &path, ATTR_QUANTITY)?,
                ) else {
                    continue;
                };
                let Ok(region_key) = region.trim().parse::<usize>() else {
                    log::warn!("skipping state dataset {path} with region `{region}`");
                    continue;
                };
                index
                    .entry((region_key, quantity.clone()))
                    .or_insert(FieldHandle {
                        region_key,
                        quantity,
                        path,
                    });
            }
            log::debug!("indexed {} state datasets", index.len());
            Ok(index)
        })
    }

    /// Look up a region by exact, case-sensitive name.
    ///
    /// `Ok(None)` when no region carries that name.
    pub fn resolve_region(&self, name: &str) -> Result<Option<RegionHandle>, TcadMeshError> {
        Ok(self.regions()?.get(name).cloned())
    }

    /// Look up the dataset of `field_name` on the region with `region_key`.
    ///
    /// `Ok(None)` (with a warning) when the region does not carry the field.
    pub fn resolve_field_for_region(
        &self,
        region_key: usize,
        field_name: &str,
    ) -> Result<Option<FieldHandle>, TcadMeshError> {
        let found = self
            .fields()?
            .get(&(region_key, field_name.to_string()))
            .cloned();
        if found.is_none() {
            log::warn!("Unable to match field name {field_name} for region key {region_key}");
        }
        Ok(found)
    }

    /// Quantities available on the named region; empty if it is unknown.
    pub fn region_field_names(&self, region_name: &str) -> Result<BTreeSet<String>, TcadMeshError> {
        let Some(region) = self.resolve_region(region_name)? else {
            return Ok(BTreeSet::new());
        };
        Ok(self
            .fields()?
            .keys()
            .filter(|(key, _)| *key == region.key)
            .map(|(_, quantity)| quantity.clone())
            .collect())
    }
}
