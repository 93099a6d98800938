//! The tagged-variant attribute record (`spec.md` §3/§9): a named,
//! typed, fixed-width array of per-entity data.

use crate::error::MeshError;

/// The element kind of a tag's backing array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    U32,
    F64,
}

/// A tag's backing storage, owned by the tag.
#[derive(Debug, Clone, PartialEq)]
pub enum TagData {
    U32(Vec<u32>),
    F64(Vec<f64>),
}

impl TagData {
    pub fn kind(&self) -> TagKind {
        match self {
            TagData::U32(_) => TagKind::U32,
            TagData::F64(_) => TagKind::F64,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            TagData::U32(v) => v.len(),
            TagData::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_u32(&self) -> Option<&[u32]> {
        match self {
            TagData::U32(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<&[f64]> {
        match self {
            TagData::F64(v) => Some(v),
            _ => None,
        }
    }
}

/// A single named attribute on one entity dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    name: String,
    ncomps: usize,
    data: TagData,
}

impl Tag {
    pub fn new(name: impl Into<String>, ncomps: usize, data: TagData) -> Self {
        Self {
            name: name.into(),
            ncomps,
            data,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ncomps(&self) -> usize {
        self.ncomps
    }

    pub fn kind(&self) -> TagKind {
        self.data.kind()
    }

    pub fn data(&self) -> &TagData {
        &self.data
    }
}

/// The name reserved for the vertex position tag. Always present
/// (float, width 3) on a constructed mesh.
pub const COORDINATES: &str = "coordinates";
/// Geometric-model dimension a vertex is classified on (unsigned, width 1).
pub const CLASS_DIM: &str = "class_dim";
/// Geometric-model entity id a vertex is classified on (unsigned, width 1).
pub const CLASS_ID: &str = "class_id";
/// Desired edge length at a vertex, required as input to `adapt` (float, width 1).
pub const ADAPT_SIZE: &str = "adapt_size";

/// An ordered, name-unique collection of tags for one entity dimension.
#[derive(Debug, Clone, Default)]
pub struct TagSet {
    tags: Vec<Tag>,
}

impl TagSet {
    pub fn new() -> Self {
        Self { tags: Vec::new() }
    }

    pub fn add(&mut self, dim: usize, tag: Tag) -> Result<(), MeshError> {
        if self.tags.iter().any(|t| t.name() == tag.name()) {
            return Err(MeshError::TagAlreadyExists {
                dim,
                name: tag.name().to_string(),
            });
        }
        self.tags.push(tag);
        Ok(())
    }

    pub fn remove(&mut self, dim: usize, name: &str) -> Result<Tag, MeshError> {
        let pos = self
            .tags
            .iter()
            .position(|t| t.name() == name)
            .ok_or_else(|| MeshError::TagNotFound {
                dim,
                name: name.to_string(),
            })?;
        Ok(self.tags.remove(pos))
    }

    pub fn find(&self, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.name() == name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Tag> {
        self.tags.iter_mut().find(|t| t.name() == name)
    }

    pub fn count(&self) -> usize {
        self.tags.len()
    }

    pub fn get(&self, i: usize) -> Option<&Tag> {
        self.tags.get(i)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter()
    }
}

#[cfg(test)]
#[path = "tag_test.rs"]
mod tag_test;
