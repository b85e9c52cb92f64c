//! HDF5 backend for [`crate::tree::Node`] (cargo feature `hdf5`).
//!
//! Without the feature `open_output` fails with `BackendUnavailable`, and
//! `H5Node` has no values.

use std::path::Path;

use anyhow::Result;

/// Open a simulation output read-only and return its root group. The file is
/// closed once the returned node and everything derived from it are dropped.
pub fn open_output(path: &Path) -> Result<H5Node> {
    imp::open(path)
}

pub use imp::H5Node;

#[cfg(feature = "hdf5")]
mod imp {
    use std::path::Path;

    use std::ffi::CStr;
    use std::os::raw::c_uint;

    use anyhow::{bail, Context, Result};
    use hdf5::types::{
        FixedAscii, FixedUnicode, TypeDescriptor, VarLenAscii, VarLenUnicode,
    };
    use hdf5::{Container, Dataset, Datatype, Group, Location};
    use hdf5_sys::h5::{hsize_t, H5free_memory};
    use hdf5_sys::h5i::hid_t;
    use hdf5_sys::h5t::{
        H5T_class_t, H5Tget_array_dims2, H5Tget_array_ndims, H5Tget_class, H5Tget_member_name,
        H5Tget_member_type, H5Tget_nmembers, H5Tget_super,
    };
    use log::debug;

    use crate::tree::{AttrValue, DType, Field, Node, NodeKind};

    pub enum H5Node {
        Group(Group),
        Dataset(Dataset),
    }

    pub fn open(path: &Path) -> Result<H5Node> {
        let file = hdf5::File::open(path)
            .with_context(|| format!("open HDF5 file {}", path.display()))?;
        debug!("opened {}", path.display());
        Ok(H5Node::Group(file.group("/")?))
    }

    impl H5Node {
        fn location(&self) -> &Location {
            match self {
                Self::Group(g) => g,
                Self::Dataset(d) => d,
            }
        }
    }

    impl Node for H5Node {
        fn name(&self) -> String {
            let full = self.location().name();
            full.rsplit('/').next().unwrap_or("").to_string()
        }

        fn kind(&self) -> NodeKind {
            match self {
                Self::Group(_) => NodeKind::Group,
                Self::Dataset(_) => NodeKind::Dataset,
            }
        }

        fn children(&self) -> Result<Vec<Self>> {
            let Self::Group(g) = self else {
                return Ok(Vec::new());
            };
            let mut out: Vec<Self> = g.groups()?.into_iter().map(Self::Group).collect();
            out.extend(g.datasets()?.into_iter().map(Self::Dataset));
            // HDF5 iterates links by name; keep that order across both kinds.
            out.sort_by_key(|n| n.name());
            Ok(out)
        }

        fn child(&self, name: &str) -> Result<Option<Self>> {
            let Self::Group(g) = self else {
                return Ok(None);
            };
            if !g.link_exists(name) {
                return Ok(None);
            }
            if let Ok(sub) = g.group(name) {
                return Ok(Some(Self::Group(sub)));
            }
            match g.dataset(name) {
                Ok(ds) => Ok(Some(Self::Dataset(ds))),
                Err(_) => Ok(None),
            }
        }

        fn attr_names(&self) -> Result<Vec<String>> {
            Ok(self.location().attr_names()?)
        }

        fn attr(&self, name: &str) -> Result<Option<AttrValue>> {
            let loc = self.location();
            if !loc.attr_names()?.iter().any(|n| n == name) {
                return Ok(None);
            }
            let attr = loc.attr(name)?;
            let value = match attr.dtype()?.to_descriptor()? {
                TypeDescriptor::Integer(_) | TypeDescriptor::Unsigned(_) => {
                    AttrValue::Int(attr.read_raw::<i64>()?)
                }
                // HDF5 stores bools as an enum; no conversion to integers.
                TypeDescriptor::Boolean => AttrValue::Int(
                    attr.read_raw::<bool>()?.into_iter().map(i64::from).collect(),
                ),
                TypeDescriptor::Float(_) => AttrValue::Float(attr.read_raw::<f64>()?),
                td => AttrValue::Text(read_string(&attr, &td)?),
            };
            Ok(Some(value))
        }

        fn dtype(&self) -> Result<Option<DType>> {
            match self {
                Self::Group(_) => Ok(None),
                Self::Dataset(d) => Ok(Some(dtype_of(&d.dtype()?)?)),
            }
        }

        fn read_text(&self) -> Result<Option<String>> {
            let Self::Dataset(d) = self else {
                return Ok(None);
            };
            let td = d.dtype()?.to_descriptor()?;
            match td {
                TypeDescriptor::FixedAscii(_)
                | TypeDescriptor::FixedUnicode(_)
                | TypeDescriptor::VarLenAscii
                | TypeDescriptor::VarLenUnicode => Ok(Some(read_string(d, &td)?)),
                _ => Ok(None),
            }
        }
    }

    fn read_string(c: &Container, td: &TypeDescriptor) -> Result<String> {
        let s = match *td {
            TypeDescriptor::VarLenUnicode => first(c.read_raw::<VarLenUnicode>()?)?.as_str().to_owned(),
            TypeDescriptor::VarLenAscii => first(c.read_raw::<VarLenAscii>()?)?.as_str().to_owned(),
            TypeDescriptor::FixedAscii(n) => match n {
                0..=256 => fixed_ascii::<256>(c)?,
                257..=4096 => fixed_ascii::<4096>(c)?,
                4097..=65536 => fixed_ascii::<65536>(c)?,
                65537..=1048576 => fixed_ascii::<1048576>(c)?,
                _ => bail!("string of {n} bytes is too long"),
            },
            TypeDescriptor::FixedUnicode(n) => match n {
                0..=256 => fixed_unicode::<256>(c)?,
                257..=4096 => fixed_unicode::<4096>(c)?,
                4097..=65536 => fixed_unicode::<65536>(c)?,
                65537..=1048576 => fixed_unicode::<1048576>(c)?,
                _ => bail!("string of {n} bytes is too long"),
            },
            ref other => bail!("unsupported attribute type {other}"),
        };
        Ok(s.trim_end_matches('\0').to_string())
    }

    fn first<T>(v: Vec<T>) -> Result<T> {
        match v.into_iter().next() {
            Some(x) => Ok(x),
            None => bail!("empty string value"),
        }
    }

    fn fixed_ascii<const N: usize>(c: &Container) -> Result<String> {
        Ok(first(c.read_raw::<FixedAscii<N>>()?)?.as_str().to_owned())
    }

    fn fixed_unicode<const N: usize>(c: &Container) -> Result<String> {
        Ok(first(c.read_raw::<FixedUnicode<N>>()?)?.as_str().to_owned())
    }

    /// Like `to_dtype(&dt.to_descriptor()?)`, but types the descriptor
    /// cannot express (multi-dimensional array members) are walked by hand,
    /// so one such field does not hide the rest of a compound type.
    fn dtype_of(dt: &Datatype) -> Result<DType> {
        let err = match dt.to_descriptor() {
            Ok(td) => return Ok(to_dtype(&td)),
            Err(e) => e,
        };
        let id = dt.id();
        match hdf5::sync::sync(|| unsafe { H5Tget_class(id) }) {
            H5T_class_t::H5T_COMPOUND => Ok(DType::Compound(compound_fields(id)?)),
            H5T_class_t::H5T_ARRAY => array_dtype(id),
            _ => Ok(DType::Other(err.to_string())),
        }
    }

    fn compound_fields(id: hid_t) -> Result<Vec<Field>> {
        let n = hdf5::sync::sync(|| unsafe { H5Tget_nmembers(id) });
        if n < 0 {
            bail!("cannot count compound members");
        }
        let mut fields = Vec::with_capacity(n as usize);
        for idx in 0..n as c_uint {
            let name = hdf5::sync::sync(|| unsafe {
                let ptr = H5Tget_member_name(id, idx);
                if ptr.is_null() {
                    return None;
                }
                let name = CStr::from_ptr(ptr).to_string_lossy().into_owned();
                H5free_memory(ptr.cast());
                Some(name)
            });
            let Some(name) = name else {
                bail!("cannot read name of compound member {idx}");
            };
            let member = owned_type(hdf5::sync::sync(|| unsafe { H5Tget_member_type(id, idx) }))?;
            fields.push(Field::new(&name, dtype_of(&member)?));
        }
        Ok(fields)
    }

    fn array_dtype(id: hid_t) -> Result<DType> {
        let ndims = hdf5::sync::sync(|| unsafe { H5Tget_array_ndims(id) });
        if ndims < 0 {
            bail!("cannot read array rank");
        }
        let mut dims: Vec<hsize_t> = vec![0; ndims as usize];
        if hdf5::sync::sync(|| unsafe { H5Tget_array_dims2(id, dims.as_mut_ptr()) }) < 0 {
            bail!("cannot read array dimensions");
        }
        let base = owned_type(hdf5::sync::sync(|| unsafe { H5Tget_super(id) }))?;
        Ok(DType::Array(
            Box::new(dtype_of(&base)?),
            dims.into_iter().map(|d| d as usize).collect(),
        ))
    }

    // Takes ownership of a datatype id returned by the C API.
    fn owned_type(id: hid_t) -> Result<Datatype> {
        if id < 0 {
            bail!("invalid datatype id");
        }
        Ok(unsafe { hdf5::from_id::<Datatype>(id) }?)
    }

    fn to_dtype(td: &TypeDescriptor) -> DType {
        match td {
            TypeDescriptor::Integer(sz) => DType::Int(*sz as usize),
            TypeDescriptor::Unsigned(sz) => DType::UInt(*sz as usize),
            TypeDescriptor::Float(sz) => DType::Float(*sz as usize),
            TypeDescriptor::Boolean => DType::Bool,
            TypeDescriptor::FixedAscii(n) | TypeDescriptor::FixedUnicode(n) => DType::FixedString(*n),
            TypeDescriptor::VarLenAscii | TypeDescriptor::VarLenUnicode => DType::VarString,
            TypeDescriptor::FixedArray(inner, n) => DType::Array(Box::new(to_dtype(inner)), vec![*n]),
            TypeDescriptor::Compound(ct) => DType::Compound(
                ct.fields
                    .iter()
                    .map(|f| Field::new(&f.name, to_dtype(&f.ty)))
                    .collect(),
            ),
            other => DType::Other(other.to_string()),
        }
    }
}

#[cfg(not(feature = "hdf5"))]
mod imp {
    use std::path::Path;

    use anyhow::Result;

    use crate::error::KomodoError;
    use crate::tree::{AttrValue, DType, Node, NodeKind};

    /// Uninhabited: no file can be opened in this build.
    pub enum H5Node {}

    pub fn open(path: &Path) -> Result<H5Node> {
        Err(KomodoError::BackendUnavailable {
            path: path.to_path_buf(),
        }
        .into())
    }

    impl Node for H5Node {
        fn name(&self) -> String {
            match *self {}
        }

        fn kind(&self) -> NodeKind {
            match *self {}
        }

        fn children(&self) -> Result<Vec<Self>> {
            match *self {}
        }

        fn attr_names(&self) -> Result<Vec<String>> {
            match *self {}
        }

        fn attr(&self, _name: &str) -> Result<Option<AttrValue>> {
            match *self {}
        }

        fn dtype(&self) -> Result<Option<DType>> {
            match *self {}
        }

        fn read_text(&self) -> Result<Option<String>> {
            match *self {}
        }
    }
}

#[cfg(all(test, not(feature = "hdf5")))]
mod tests {
    use super::*;
    use crate::error::KomodoError;

    #[test]
    fn open_without_backend_fails_typed() {
        let err = match open_output(Path::new("/nonexistent/meraxes.hdf5")) {
            Ok(_) => panic!("open must fail without hdf5 feature"),
            Err(e) => e,
        };
        assert!(matches!(
            err.downcast_ref::<KomodoError>(),
            Some(KomodoError::BackendUnavailable { .. })
        ));
    }
}
