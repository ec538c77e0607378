//! In-memory hierarchical store with a JSON snapshot format.
//!
//! `MemoryStore` mirrors the subset of HDF5 a TDR collection uses: groups,
//! integer/float datasets, a compound vertex table, and text attributes.
//! It doubles as a fixture builder and, through `serde_json`, as a second
//! openable file format (`.json` snapshots).

use crate::io::{
    ATTR_NAME, ATTR_QUANTITY, ATTR_REGION, DATASET_ELEMENTS, DATASET_VALUES, DATASET_VERTEX,
    GROUP_GEOMETRY, GROUP_STATE, HierarchicalStore, REGION_PREFIX, join,
};
use crate::mesh_error::TcadMeshError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Payload of a node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum NodeData {
    Group,
    Ints(Vec<i64>),
    Floats(Vec<f64>),
    Vertices(Vec<[f64; 2]>),
}

/// A group or dataset together with its attributes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemoryNode {
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    pub data: NodeData,
}

impl MemoryNode {
    fn group() -> Self {
        Self {
            attrs: BTreeMap::new(),
            data: NodeData::Group,
        }
    }
}

/// Path-keyed tree of nodes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryStore {
    nodes: BTreeMap<String, MemoryNode>,
}

impl MemoryStore {
    /// An empty store (no TDR layout markers).
    pub fn new() -> Self {
        Self::default()
    }

    /// A store with the TDR skeleton (geometry root, vertex table, state
    /// root) and the given global vertex table.
    pub fn tdr(vertices: Vec<[f64; 2]>) -> Self {
        let mut store = Self::new();
        store.insert_group(GROUP_GEOMETRY);
        store.insert_group(GROUP_STATE);
        store.insert_dataset(DATASET_VERTEX, NodeData::Vertices(vertices));
        store
    }

    /// Insert (or keep) a group, creating missing parents.
    pub fn insert_group(&mut self, path: &str) -> &mut Self {
        self.ensure_parents(path);
        self.nodes
            .entry(path.to_string())
            .or_insert_with(MemoryNode::group);
        self
    }

    /// Insert or replace a dataset, creating missing parents.
    pub fn insert_dataset(&mut self, path: &str, data: NodeData) -> &mut Self {
        self.ensure_parents(path);
        self.nodes.insert(
            path.to_string(),
            MemoryNode {
                attrs: BTreeMap::new(),
                data,
            },
        );
        self
    }

    /// Set a text attribute on an existing node.
    pub fn set_attr(
        &mut self,
        path: &str,
        name: &str,
        value: impl Into<String>,
    ) -> Result<&mut Self, TcadMeshError> {
        let node = self
            .nodes
            .get_mut(path)
            .ok_or_else(|| TcadMeshError::NotFound(path.to_string()))?;
        node.attrs.insert(name.to_string(), value.into());
        Ok(self)
    }

    /// Remove a node and everything below it.
    pub fn remove(&mut self, path: &str) -> &mut Self {
        let prefix = format!("{path}/");
        self.nodes
            .retain(|key, _| key != path && !key.starts_with(&prefix));
        self
    }

    /// Add `region_<key>` with a `name` attribute and a raw connectivity block.
    pub fn add_region(&mut self, key: usize, name: &str, elements: Vec<i64>) -> &mut Self {
        let group = join(GROUP_GEOMETRY, &format!("{REGION_PREFIX}{key}"));
        self.insert_group(&group);
        self.attrs_mut(&group)
            .insert(ATTR_NAME.to_string(), name.to_string());
        self.insert_dataset(&join(&group, DATASET_ELEMENTS), NodeData::Ints(elements));
        self
    }

    /// Add a state dataset for region `region_key` carrying `quantity`.
    ///
    /// Datasets are named `dataset_<k>` in insertion order.
    pub fn add_field(&mut self, region_key: usize, quantity: &str, values: Vec<f64>) -> &mut Self {
        let index = self.children(GROUP_STATE).count();
        let group = join(GROUP_STATE, &format!("dataset_{index}"));
        self.insert_group(&group);
        let attrs = self.attrs_mut(&group);
        attrs.insert(ATTR_REGION.to_string(), region_key.to_string());
        attrs.insert(ATTR_QUANTITY.to_string(), quantity.to_string());
        attrs.insert(ATTR_NAME.to_string(), quantity.to_string());
        self.insert_dataset(&join(&group, DATASET_VALUES), NodeData::Floats(values));
        self
    }

    /// Encode as a JSON snapshot.
    pub fn to_json(&self) -> Result<String, TcadMeshError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a JSON snapshot.
    pub fn from_json(text: &str) -> Result<Self, TcadMeshError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Write a JSON snapshot to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), TcadMeshError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Read a JSON snapshot from `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TcadMeshError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => TcadMeshError::NotFound(path.display().to_string()),
            _ => err.into(),
        })?;
        Self::from_json(&text)
    }

    fn ensure_parents(&mut self, path: &str) {
        let mut end = 0;
        while let Some(offset) = path[end..].find('/') {
            end += offset;
            self.nodes
                .entry(path[..end].to_string())
                .or_insert_with(MemoryNode::group);
            end += 1;
        }
    }

    fn attrs_mut(&mut self, path: &str) -> &mut BTreeMap<String, String> {
        &mut self
            .nodes
            .entry(path.to_string())
            .or_insert_with(MemoryNode::group)
            .attrs
    }

    fn children<'a>(&'a self, group: &str) -> impl Iterator<Item = &'a str> + 'a {
        let prefix = format!("{group}/");
        self.nodes
            .range(prefix.clone()..)
            .map(|(key, _)| key.as_str())
            .take_while(move |key| key.starts_with(&prefix))
            .filter_map({
                let skip = group.len() + 1;
                move |key| {
                    let rest = &key[skip..];
                    (!rest.contains('/')).then_some(rest)
                }
            })
    }

    fn node(&self, path: &str) -> Result<&MemoryNode, TcadMeshError> {
        self.nodes
            .get(path)
            .ok_or_else(|| TcadMeshError::NotFound(path.to_string()))
    }
}

impl HierarchicalStore for MemoryStore {
    fn exists(&self, path: &str) -> bool {
        self.nodes.contains_key(path)
    }

    fn members(&self, group: &str) -> Result<Vec<String>, TcadMeshError> {
        match &self.node(group)?.data {
            NodeData::Group => Ok(self.children(group).map(str::to_string).collect()),
            _ => Err(TcadMeshError::Store(format!("`{group}` is not a group"))),
        }
    }

    fn attr(&self, path: &str, name: &str) -> Result<Option<String>, TcadMeshError> {
        Ok(self.node(path)?.attrs.get(name).cloned())
    }

    fn read_ints(&self, dataset: &str) -> Result<Vec<i64>, TcadMeshError> {
        match &self.node(dataset)?.data {
            NodeData::Ints(values) => Ok(values.clone()),
            _ => Err(TcadMeshError::Store(format!(
                "`{dataset}` is not an integer dataset"
            ))),
        }
    }

    fn read_floats(&self, dataset: &str) -> Result<Vec<f64>, TcadMeshError> {
        match &self.node(dataset)?.data {
            NodeData::Floats(values) => Ok(values.clone()),
            NodeData::Ints(values) => Ok(values.iter().map(|&v| v as f64).collect()),
            _ => Err(TcadMeshError::Store(format!(
                "`{dataset}` is not a numeric dataset"
            ))),
        }
    }

    fn read_vertices(&self, dataset: &str) -> Result<Vec<[f64; 2]>, TcadMeshError> {
        match &self.node(dataset)?.data {
            NodeData::Vertices(points) => Ok(points.clone()),
            _ => Err(TcadMeshError::Store(format!(
                "`{dataset}` is not a vertex table"
            ))),
        }
    }
}
