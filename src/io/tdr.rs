//! The TDR container: lifecycle, lazily loaded geometry, and memo tables.
//!
//! A [`TdrFile`] owns one open [`HierarchicalStore`]. Everything derived from
//! it (vertex table, name sets, region/field indices, reduced meshes, query
//! results) is computed on first use and dropped on [`TdrFile::close`].
//! Dropping the container closes it, so a file opened inside a scope is
//! released on every exit path.
//!
//! The container is single-threaded; open one per thread for parallel
//! extraction.

use crate::data::mesh::{ReducedMesh, RegionFieldData};
use crate::geometry::bounds::Dimensions;
use crate::io::memory::MemoryStore;
use crate::io::resolver::{FieldHandle, RegionHandle};
use crate::io::{DATASET_VERTEX, GROUP_GEOMETRY, GROUP_STATE, HierarchicalStore};
use crate::mesh_error::TcadMeshError;
use crate::topology::cache::InvalidateCache;
use once_cell::unsync::OnceCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// What to do when a field's sample count differs from the reduced vertex
/// count of its region. Samples are never reordered or truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldAlignment {
    /// Return the samples unchecked.
    Ignore,
    /// Log a warning and return the samples.
    Warn,
    /// Fail with [`TcadMeshError::FieldLengthMismatch`].
    #[default]
    Error,
}

/// Options applied to every query on a container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Length check between field samples and reduced vertices.
    pub field_alignment: FieldAlignment,
    /// Attach a SHA-256 of the samples to every field result.
    pub checksum: bool,
}

impl ReadOptions {
    /// Strictest settings: length mismatches fail and checksums are attached.
    pub fn strict() -> Self {
        Self {
            field_alignment: FieldAlignment::Error,
            checksum: true,
        }
    }
}

/// An open (or closed) TDR collection.
pub struct TdrFile {
    path: PathBuf,
    options: ReadOptions,
    store: Option<Box<dyn HierarchicalStore>>,
    vertices: OnceCell<Arc<Vec<[f64; 2]>>>,
    pub(crate) region_index: OnceCell<BTreeMap<String, RegionHandle>>,
    pub(crate) field_index: OnceCell<HashMap<(usize, String), FieldHandle>>,
    region_names: OnceCell<BTreeSet<String>>,
    field_names: OnceCell<BTreeSet<String>>,
    pub(crate) meshes: HashMap<String, Arc<ReducedMesh>>,
    pub(crate) results: HashMap<(String, Option<String>), Arc<RegionFieldData>>,
}

impl TdrFile {
    /// Open `path` with default [`ReadOptions`].
    ///
    /// `.json` paths are read as [`MemoryStore`] snapshots; anything else
    /// goes through the HDF5 backend.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, TcadMeshError> {
        Self::open_with_options(path, ReadOptions::default())
    }

    pub fn open_with_options<P: AsRef<Path>>(
        path: P,
        options: ReadOptions,
    ) -> Result<Self, TcadMeshError> {
        let path = path.as_ref().to_path_buf();
        let store = open_backend(&path)?;
        Self::with_store(path, store, options)
    }

    /// Wrap an already opened store. `label` is reported by [`TdrFile::path`]
    /// and used by [`TdrFile::load`] after a close.
    pub fn from_store<S>(
        label: impl Into<PathBuf>,
        store: S,
        options: ReadOptions,
    ) -> Result<Self, TcadMeshError>
    where
        S: HierarchicalStore + 'static,
    {
        Self::with_store(label.into(), Box::new(store), options)
    }

    fn with_store(
        path: PathBuf,
        mut store: Box<dyn HierarchicalStore>,
        options: ReadOptions,
    ) -> Result<Self, TcadMeshError> {
        if let Err(err) = check_layout(store.as_ref()) {
            store.close();
            return Err(err);
        }
        log::info!("opened TDR collection {}", path.display());
        Ok(Self {
            path,
            options,
            store: Some(store),
            vertices: OnceCell::new(),
            region_index: OnceCell::new(),
            field_index: OnceCell::new(),
            region_names: OnceCell::new(),
            field_names: OnceCell::new(),
            meshes: HashMap::new(),
            results: HashMap::new(),
        })
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn options(&self) -> ReadOptions {
        self.options
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.store.is_some()
    }

    /// Reopen at the current path if closed; no-op when open.
    pub fn load(&mut self) -> Result<(), TcadMeshError> {
        if self.store.is_some() {
            return Ok(());
        }
        let mut store = open_backend(&self.path)?;
        if let Err(err) = check_layout(store.as_ref()) {
            store.close();
            return Err(err);
        }
        log::info!("reopened TDR collection {}", self.path.display());
        self.store = Some(store);
        Ok(())
    }

    /// Close, then open `path` afresh.
    pub fn set_path<P: AsRef<Path>>(&mut self, path: P) -> Result<(), TcadMeshError> {
        self.close();
        self.path = path.as_ref().to_path_buf();
        self.load()
    }

    /// Release the store and every cached result. Idempotent.
    pub fn close(&mut self) {
        if let Some(mut store) = self.store.take() {
            store.close();
            log::info!("closed TDR collection {}", self.path.display());
        }
        self.invalidate_cache();
    }

    pub(crate) fn store(&self) -> Result<&dyn HierarchicalStore, TcadMeshError> {
        self.store.as_deref().ok_or(TcadMeshError::ClosedResource)
    }

    /// Global vertex table, loaded on first access.
    pub fn vertices(&self) -> Result<&Arc<Vec<[f64; 2]>>, TcadMeshError> {
        let store = self.store()?;
        self.vertices.get_or_try_init(|| {
            let points = store.read_vertices(DATASET_VERTEX)?;
            log::debug!("loaded {} global vertices", points.len());
            Ok(Arc::new(points))
        })
    }

    /// Per-axis `(min, max)` over the global vertex table; `None` when the
    /// table is empty.
    pub fn dimensions(&self) -> Result<Option<Dimensions>, TcadMeshError> {
        Ok(Dimensions::from_points(self.vertices()?))
    }

    /// Distinct region names.
    pub fn region_names(&self) -> Result<&BTreeSet<String>, TcadMeshError> {
        self.region_names
            .get_or_try_init(|| Ok(self.regions()?.keys().cloned().collect()))
    }

    /// Distinct quantity names over all state datasets.
    pub fn field_names(&self) -> Result<&BTreeSet<String>, TcadMeshError> {
        self.field_names.get_or_try_init(|| {
            Ok(self
                .fields()?
                .keys()
                .map(|(_, quantity)| quantity.clone())
                .collect())
        })
    }
}

impl InvalidateCache for TdrFile {
    fn invalidate_cache(&mut self) {
        self.vertices.take();
        self.region_index.take();
        self.field_index.take();
        self.region_names.take();
        self.field_names.take();
        self.meshes.clear();
        self.results.clear();
    }
}

impl Drop for TdrFile {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for TdrFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TdrFile")
            .field("path", &self.path)
            .field("open", &self.is_open())
            .field("options", &self.options)
            .field("cached_results", &self.results.len())
            .finish()
    }
}

fn check_layout(store: &dyn HierarchicalStore) -> Result<(), TcadMeshError> {
    for marker in [GROUP_GEOMETRY, DATASET_VERTEX, GROUP_STATE] {
        if !store.exists(marker) {
            return Err(TcadMeshError::NotFound(format!(
                "required TDR entry `{marker}`"
            )));
        }
    }
    Ok(())
}

fn open_backend(path: &Path) -> Result<Box<dyn HierarchicalStore>, TcadMeshError> {
    if !path.exists() {
        return Err(TcadMeshError::NotFound(path.display().to_string()));
    }
    let is_snapshot = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_snapshot {
        return Ok(Box::new(MemoryStore::load(path)?));
    }
    open_hdf5(path)
}

#[cfg(feature = "hdf5")]
fn open_hdf5(path: &Path) -> Result<Box<dyn HierarchicalStore>, TcadMeshError> {
    Ok(Box::new(crate::io::hdf5::Hdf5Store::open(path)?))
}

#[cfg(not(feature = "hdf5"))]
fn open_hdf5(path: &Path) -> Result<Box<dyn HierarchicalStore>, TcadMeshError> {
    Err(TcadMeshError::BackendUnavailable(path.display().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryStore {
        MemoryStore::tdr(vec![[0.0, 0.0], [2.0, -1.0], [1.0, 3.0]])
    }

    #[test]
    fn default_options_fail_on_mismatch_without_checksum() {
        let opts = ReadOptions::default();
        assert_eq!(opts.field_alignment, FieldAlignment::Error);
        assert!(!opts.checksum);
        assert!(ReadOptions::strict().checksum);
    }

    #[test]
    fn missing_markers_are_not_found() {
        let mut s = store();
        s.remove(GROUP_STATE);
        let err = TdrFile::from_store("mem", s, ReadOptions::default()).unwrap_err();
        assert!(matches!(err, TcadMeshError::NotFound(msg) if msg.contains("state_0")));
    }

    #[test]
    fn close_clears_lazy_state() {
        let mut file = TdrFile::from_store("mem", store(), ReadOptions::default()).unwrap();
        assert_eq!(file.vertices().unwrap().len(), 3);
        file.close();
        assert!(file.vertices.get().is_none());
        assert!(!file.is_open());
        assert_eq!(file.vertices().unwrap_err(), TcadMeshError::ClosedResource);
    }
}
