#![allow(dead_code)]
use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;
use tcad_mesh::io::HierarchicalStore;
use tcad_mesh::io::memory::MemoryStore;
use tcad_mesh::io::tdr::{ReadOptions, TdrFile};
use tcad_mesh::mesh_error::TcadMeshError;

/// Global vertex table shared by every region of the test device.
pub fn device_vertices() -> Vec<[f64; 2]> {
    vec![
        [0.0, 0.0],
        [1.0, 0.0],
        [1.0, 1.0],
        [0.0, 1.0],
        [5.0, 5.0],
        [2.0, 0.0],
        [2.0, 1.0],
    ]
}

/// A small device:
/// - `Silicon` (region_0): two triangles over vertices 0..=3, two fields.
/// - `Oxide` (region_1): two triangles over {1, 2, 5, 6}; its `eDensity`
///   has one sample too few.
/// - `Contact` (region_2): a rectangle record, which is not decodable.
/// - region_3 repeats the name `Oxide`.
pub fn device_store() -> MemoryStore {
    let mut store = MemoryStore::tdr(device_vertices());
    store
        .add_region(0, "Silicon", vec![2, 0, 1, 2, 2, 0, 2, 3])
        .add_region(1, "Oxide", vec![2, 1, 5, 6, 2, 1, 6, 2])
        .add_region(2, "Contact", vec![3, 2, 6, 4])
        .add_region(3, "Oxide", vec![2, 2, 4, 1])
        .add_field(0, "ElectrostaticPotential", vec![0.0, 0.1, 0.2, 0.3])
        .add_field(0, "eDensity", vec![1e10, 2e10, 3e10, 4e10])
        .add_field(1, "ElectrostaticPotential", vec![0.5, 0.6, 0.7, 0.8])
        .add_field(1, "eDensity", vec![1.0, 2.0, 3.0])
        .add_field(2, "ElectrostaticPotential", vec![9.0, 9.0, 9.0]);
    // a state dataset without a quantity is ignored by the resolver
    store
        .insert_group("collection/geometry_0/state_0/orphan")
        .set_attr("collection/geometry_0/state_0/orphan", "region", "0")
        .unwrap();
    store
}

pub fn open_device() -> TdrFile {
    open_device_with(ReadOptions::default())
}

pub fn open_device_with(options: ReadOptions) -> TdrFile {
    TdrFile::from_store("device.mem", device_store(), options).unwrap()
}

/// Unique path under the system temp dir.
pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("tcad_mesh_{}_{name}", std::process::id()))
}

/// Wraps a [`MemoryStore`], counting `close` calls and optionally failing
/// to decode one attribute.
pub struct TrackedStore {
    inner: MemoryStore,
    closes: Rc<Cell<usize>>,
    broken_attr: Option<(String, String)>,
}

impl TrackedStore {
    pub fn new(inner: MemoryStore) -> (Self, Rc<Cell<usize>>) {
        let closes = Rc::new(Cell::new(0));
        let store = Self {
            inner,
            closes: Rc::clone(&closes),
            broken_attr: None,
        };
        (store, closes)
    }

    /// Make `attr(path, name)` fail with `InvalidAttribute`.
    pub fn break_attr(mut self, path: &str, name: &str) -> Self {
        self.broken_attr = Some((path.to_string(), name.to_string()));
        self
    }
}

impl HierarchicalStore for TrackedStore {
    fn exists(&self, path: &str) -> bool {
        self.inner.exists(path)
    }

    fn members(&self, group: &str) -> Result<Vec<String>, TcadMeshError> {
        self.inner.members(group)
    }

    fn attr(&self, path: &str, name: &str) -> Result<Option<String>, TcadMeshError> {
        if let Some((bad_path, bad_name)) = &self.broken_attr {
            if bad_path == path && bad_name == name {
                return Err(TcadMeshError::InvalidAttribute {
                    path: path.to_string(),
                    attr: name.to_string(),
                    value: "unsupported attribute type".to_string(),
                });
            }
        }
        self.inner.attr(path, name)
    }

    fn read_ints(&self, dataset: &str) -> Result<Vec<i64>, TcadMeshError> {
        self.inner.read_ints(dataset)
    }

    fn read_floats(&self, dataset: &str) -> Result<Vec<f64>, TcadMeshError> {
        self.inner.read_floats(dataset)
    }

    fn read_vertices(&self, dataset: &str) -> Result<Vec<[f64; 2]>, TcadMeshError> {
        self.inner.read_vertices(dataset)
    }

    fn close(&mut self) {
        self.closes.set(self.closes.get() + 1);
    }
}
