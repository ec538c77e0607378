//! HDF5-backed store for `.tdr` files (feature `hdf5`).

use crate::io::HierarchicalStore;
use crate::mesh_error::TcadMeshError;
use hdf5::types::{FixedAscii, FixedUnicode, TypeDescriptor, VarLenAscii, VarLenUnicode};
use hdf5::{File, H5Type, Location};
use std::path::Path;

/// Longest fixed-length string attribute read without truncation.
const MAX_ATTR_LEN: usize = 1024;

#[derive(H5Type, Clone, Copy, Debug)]
#[repr(C)]
struct VertexRecord {
    x: f64,
    y: f64,
}

/// Read-only view of an HDF5 file.
#[derive(Debug)]
pub struct Hdf5Store {
    file: Option<File>,
}

impl Hdf5Store {
    /// Open `path` read-only.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, TcadMeshError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| {
            TcadMeshError::NotFound(format!("{}: {err}", path.display()))
        })?;
        log::debug!("opened HDF5 file {}", path.display());
        Ok(Self { file: Some(file) })
    }

    fn file(&self) -> Result<&File, TcadMeshError> {
        self.file.as_ref().ok_or(TcadMeshError::ClosedResource)
    }
}

fn read_text_attr(loc: &Location, path: &str, name: &str) -> Result<Option<String>, TcadMeshError> {
    if !loc.attr_names()?.iter().any(|n| n == name) {
        return Ok(None);
    }
    let attr = loc.attr(name)?;
    let text = match attr.dtype()?.to_descriptor()? {
        TypeDescriptor::FixedAscii(_) => attr
            .read_scalar::<FixedAscii<MAX_ATTR_LEN>>()?
            .as_str()
            .to_string(),
        TypeDescriptor::FixedUnicode(_) => attr
            .read_scalar::<FixedUnicode<MAX_ATTR_LEN>>()?
            .as_str()
            .to_string(),
        TypeDescriptor::VarLenAscii => attr.read_scalar::<VarLenAscii>()?.as_str().to_string(),
        TypeDescriptor::VarLenUnicode => attr.read_scalar::<VarLenUnicode>()?.as_str().to_string(),
        TypeDescriptor::Integer(_) => attr.read_scalar::<i64>()?.to_string(),
        TypeDescriptor::Unsigned(_) => attr.read_scalar::<u64>()?.to_string(),
        other => {
            return Err(TcadMeshError::InvalidAttribute {
                path: path.to_string(),
                attr: name.to_string(),
                value: format!("unsupported attribute type {other:?}"),
            });
        }
    };
    Ok(Some(text.trim_end_matches('\0').to_string()))
}

impl HierarchicalStore for Hdf5Store {
    fn exists(&self, path: &str) -> bool {
        let Ok(file) = self.file() else {
            return false;
        };
        // H5Lexists needs every intermediate link to exist
        let mut end = 0;
        loop {
            let next = path[end..].find('/').map(|offset| end + offset);
            let prefix = &path[..next.unwrap_or(path.len())];
            if !file.link_exists(prefix) {
                return false;
            }
            match next {
                Some(slash) => end = slash + 1,
                None => return true,
            }
        }
    }

    fn members(&self, group: &str) -> Result<Vec<String>, TcadMeshError> {
        Ok(self.file()?.group(group)?.member_names()?)
    }

    fn attr(&self, path: &str, name: &str) -> Result<Option<String>, TcadMeshError> {
        let file = self.file()?;
        match file.group(path) {
            Ok(group) => read_text_attr(&group, path, name),
            Err(_) => {
                let dataset = file.dataset(path)?;
                read_text_attr(&dataset, path, name)
            }
        }
    }

    fn read_ints(&self, dataset: &str) -> Result<Vec<i64>, TcadMeshError> {
        Ok(self.file()?.dataset(dataset)?.read_raw::<i64>()?)
    }

    fn read_floats(&self, dataset: &str) -> Result<Vec<f64>, TcadMeshError> {
        Ok(self.file()?.dataset(dataset)?.read_raw::<f64>()?)
    }

    fn read_vertices(&self, dataset: &str) -> Result<Vec<[f64; 2]>, TcadMeshError> {
        let rows = self.file()?.dataset(dataset)?.read_raw::<VertexRecord>()?;
        Ok(rows.into_iter().map(|r| [r.x, r.y]).collect())
    }

    fn close(&mut self) {
        if let Some(file) = self.file.take() {
            if let Err(err) = file.close() {
                log::warn!("error while closing HDF5 file: {err}");
            }
        }
    }
}
