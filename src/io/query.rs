//! Per-region, per-field extraction with memoization.

use crate::algs::reindex::reindex;
use crate::data::mesh::{FieldValues, ReducedMesh, RegionFieldData};
use crate::io::resolver::{FieldHandle, RegionHandle};
use crate::io::tdr::{FieldAlignment, TdrFile};
use crate::mesh_error::TcadMeshError;
use crate::topology::elements::decode_elements;
use std::collections::BTreeMap;
use std::sync::Arc;

/// `region name → field name → data`, as returned by [`TdrFile::get_all`].
pub type RegionFieldMap = BTreeMap<String, BTreeMap<String, Arc<RegionFieldData>>>;

impl TdrFile {
    /// Mesh (and, if `field_name` is given, field samples) of one region.
    ///
    /// Returns `Ok(None)` if the region does not exist. If the field does not
    /// exist on the region the result carries the mesh only. Decoding and
    /// indexing errors are returned to the caller. Results are cached per
    /// `(region_name, field_name)` until the container closes.
    pub fn get(
        &mut self,
        region_name: &str,
        field_name: Option<&str>,
    ) -> Result<Option<Arc<RegionFieldData>>, TcadMeshError> {
        let cache_key = (region_name.to_string(), field_name.map(str::to_string));
        if let Some(hit) = self.results.get(&cache_key) {
            log::debug!("cache hit for {region_name}/{field_name:?}");
            return Ok(Some(Arc::clone(hit)));
        }

        let Some(region) = self.resolve_region(region_name)? else {
            return Ok(None);
        };
        let mesh = self.region_mesh(&region)?;

        let field = match field_name {
            Some(name) => match self.resolve_field_for_region(region.key, name)? {
                Some(handle) => Some(self.field_values(&region, &handle, &mesh)?),
                None => None,
            },
            None => None,
        };

        let data = Arc::new(RegionFieldData {
            region: region.name,
            mesh,
            field,
        });
        self.results.insert(cache_key, Arc::clone(&data));
        Ok(Some(data))
    }

    /// Mesh and samples for every requested (region, field) pair that exists.
    ///
    /// `None` filters mean all known names. Pairs whose field is absent are
    /// dropped silently; pairs that fail to decode or index are logged and
    /// dropped. Regions left without any field are omitted.
    pub fn get_all(
        &mut self,
        region_names: Option<&[&str]>,
        field_names: Option<&[&str]>,
    ) -> Result<RegionFieldMap, TcadMeshError> {
        let regions: Vec<String> = match region_names {
            Some(names) => names.iter().map(|s| s.to_string()).collect(),
            None => self.region_names()?.iter().cloned().collect(),
        };
        let fields: Vec<String> = match field_names {
            Some(names) => names.iter().map(|s| s.to_string()).collect(),
            None => self.field_names()?.iter().cloned().collect(),
        };

        let mut out = RegionFieldMap::new();
        for region_name in &regions {
            let Some(region) = self.resolve_region(region_name)? else {
                continue;
            };
            if let Err(err) = self.region_mesh(&region) {
                log::warn!("skipping region {region_name}: {err}");
                continue;
            }

            let mut per_field = BTreeMap::new();
            for field_name in &fields {
                match self.get(region_name, Some(field_name.as_str())) {
                    Ok(Some(data)) if data.field.is_some() => {
                        per_field.insert(field_name.clone(), data);
                    }
                    Ok(_) => {}
                    Err(TcadMeshError::ClosedResource) => {
                        return Err(TcadMeshError::ClosedResource);
                    }
                    Err(err) => {
                        log::warn!("skipping {region_name}/{field_name}: {err}");
                    }
                }
            }
            if !per_field.is_empty() {
                out.insert(region_name.clone(), per_field);
            }
        }
        Ok(out)
    }

    /// Decoded and reindexed mesh of a region, shared across its fields.
    fn region_mesh(&mut self, region: &RegionHandle) -> Result<Arc<ReducedMesh>, TcadMeshError> {
        if let Some(mesh) = self.meshes.get(&region.name) {
            return Ok(Arc::clone(mesh));
        }
        let raw = self.store()?.read_ints(&region.elements_path())?;
        let triangles = decode_elements(&raw)?;
        let mesh = Arc::new(reindex(&triangles, self.vertices()?)?);
        log::debug!(
            "region {}: {} triangles over {} vertices",
            region.name,
            mesh.triangle_count(),
            mesh.vertex_count()
        );
        self.meshes.insert(region.name.clone(), Arc::clone(&mesh));
        Ok(mesh)
    }

    /// Field samples, returned in stored order after the alignment check.
    fn field_values(
        &self,
        region: &RegionHandle,
        handle: &FieldHandle,
        mesh: &ReducedMesh,
    ) -> Result<FieldValues, TcadMeshError> {
        let values = self.store()?.read_floats(&handle.values_path())?;
        if values.len() != mesh.vertex_count() {
            let mismatch = TcadMeshError::FieldLengthMismatch {
                region: region.name.clone(),
                field: handle.quantity.clone(),
                vertices: mesh.vertex_count(),
                values: values.len(),
            };
            match self.options().field_alignment {
                FieldAlignment::Error => return Err(mismatch),
                FieldAlignment::Warn => log::warn!("{mismatch}"),
                FieldAlignment::Ignore => {}
            }
        }
        let field = FieldValues::new(handle.quantity.clone(), values);
        Ok(if self.options().checksum {
            field.with_checksum()
        } else {
            field
        })
    }
}
