//! Hierarchical-file capability: named nodes with attributes and children.
//!
//! Meraxes readers in [`crate::meraxes`] are written against [`Node`] only, so
//! they run unchanged over an HDF5 file ([`crate::h5`]) or an in-memory
//! [`MemNode`] tree.

use std::fmt;

use anyhow::Result;

use crate::table::fmt_float;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Group,
    Dataset,
}

/// Attribute payload. Numeric attributes are stored as arrays (usually length 1).
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Float(Vec<f64>),
    Int(Vec<i64>),
    Text(String),
}

impl AttrValue {
    /// First numeric element.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => v.first().copied(),
            Self::Int(v) => v.first().map(|&i| i as f64),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list<T>(f: &mut fmt::Formatter<'_>, v: &[T], one: impl Fn(&T) -> String) -> fmt::Result {
            if v.len() == 1 {
                return write!(f, "{}", one(&v[0]));
            }
            let items: Vec<String> = v.iter().map(one).collect();
            write!(f, "[{}]", items.join(", "))
        }
        match self {
            Self::Float(v) => list(f, v, |x| fmt_float(*x)),
            Self::Int(v) => list(f, v, |x| x.to_string()),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        Self::Float(vec![v])
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        Self::Int(vec![v])
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

/// Element type of a dataset. Sizes are in bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum DType {
    Int(usize),
    UInt(usize),
    Float(usize),
    Bool,
    FixedString(usize),
    VarString,
    Array(Box<DType>, Vec<usize>),
    Compound(Vec<Field>),
    Other(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: DType,
}

impl Field {
    pub fn new(name: &str, ty: DType) -> Self {
        Self {
            name: name.to_string(),
            ty,
        }
    }
}

impl DType {
    /// numpy-style type string: `<f4`, `|b1`, `|S16`, `<f4 (3,)`.
    /// Multi-byte numbers are reported little-endian.
    pub fn numpy_str(&self) -> String {
        fn order(size: usize) -> char {
            if size == 1 {
                '|'
            } else {
                '<'
            }
        }
        match self {
            Self::Int(n) => format!("{}i{n}", order(*n)),
            Self::UInt(n) => format!("{}u{n}", order(*n)),
            Self::Float(n) => format!("{}f{n}", order(*n)),
            Self::Bool => "|b1".to_string(),
            Self::FixedString(n) => format!("|S{n}"),
            Self::VarString => "|O".to_string(),
            Self::Array(inner, shape) => format!("{} {}", inner.numpy_str(), shape_tuple(shape)),
            Self::Compound(_) => "|V".to_string(),
            Self::Other(s) => s.clone(),
        }
    }

    pub fn fields(&self) -> Option<&[Field]> {
        match self {
            Self::Compound(f) => Some(f),
            _ => None,
        }
    }
}

// Python tuple repr: (3,) / (3, 4)
fn shape_tuple(shape: &[usize]) -> String {
    match shape {
        [n] => format!("({n},)"),
        _ => format!(
            "({})",
            shape.iter().map(|n| n.to_string()).collect::<Vec<_>>().join(", ")
        ),
    }
}

/// Read-only view of one node of a hierarchical file.
pub trait Node: Sized {
    /// Last path component.
    fn name(&self) -> String;

    fn kind(&self) -> NodeKind;

    /// Direct children in backend order (empty for datasets).
    fn children(&self) -> Result<Vec<Self>>;

    fn child(&self, name: &str) -> Result<Option<Self>> {
        Ok(self.children()?.into_iter().find(|c| c.name() == name))
    }

    fn attr_names(&self) -> Result<Vec<String>>;

    fn attr(&self, name: &str) -> Result<Option<AttrValue>>;

    /// Element type; None for groups.
    fn dtype(&self) -> Result<Option<DType>>;

    /// Scalar text content of a dataset; None if not a text dataset.
    fn read_text(&self) -> Result<Option<String>>;
}

/// Depth-first, pre-order walk over every descendant of `root` (root itself
/// excluded). Returns the first `Some` produced by `visit`.
pub fn visit_items<N, T, F>(root: &N, mut visit: F) -> Result<Option<T>>
where
    N: Node,
    F: FnMut(&N) -> Result<Option<T>>,
{
    let mut stack: Vec<N> = root.children()?.into_iter().rev().collect();
    while let Some(node) = stack.pop() {
        if let Some(found) = visit(&node)? {
            return Ok(Some(found));
        }
        if node.kind() == NodeKind::Group {
            stack.extend(node.children()?.into_iter().rev());
        }
    }
    Ok(None)
}

/// Owned in-memory tree.
#[derive(Debug, Clone)]
pub struct MemNode {
    name: String,
    kind: NodeKind,
    attrs: Vec<(String, AttrValue)>,
    children: Vec<MemNode>,
    dtype: Option<DType>,
    text: Option<String>,
}

impl MemNode {
    pub fn group(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: NodeKind::Group,
            attrs: Vec::new(),
            children: Vec::new(),
            dtype: None,
            text: None,
        }
    }

    pub fn dataset(name: &str, dtype: DType) -> Self {
        Self {
            kind: NodeKind::Dataset,
            dtype: Some(dtype),
            ..Self::group(name)
        }
    }

    pub fn text_dataset(name: &str, text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            ..Self::dataset(name, DType::VarString)
        }
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<AttrValue>) -> Self {
        self.attrs.push((name.to_string(), value.into()));
        self
    }

    pub fn with_child(mut self, child: MemNode) -> Self {
        self.children.push(child);
        self
    }
}

impl<'a> Node for &'a MemNode {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn kind(&self) -> NodeKind {
        self.kind
    }

    fn children(&self) -> Result<Vec<Self>> {
        let node: &'a MemNode = *self;
        Ok(node.children.iter().collect())
    }

    fn attr_names(&self) -> Result<Vec<String>> {
        Ok(self.attrs.iter().map(|(k, _)| k.clone()).collect())
    }

    fn attr(&self, name: &str) -> Result<Option<AttrValue>> {
        Ok(self
            .attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone()))
    }

    fn dtype(&self) -> Result<Option<DType>> {
        Ok(self.dtype.clone())
    }

    fn read_text(&self) -> Result<Option<String>> {
        Ok(self.text.clone())
    }
}
