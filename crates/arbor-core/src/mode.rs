//! Addressing-mode resolution and the hierarchy entry point.

use crate::accessor::{Accessor, ChildrenAccessor, Comparator};
use crate::error::{Error, Result};
use crate::hierarchy::Hierarchy;
use crate::{nested, stratify};
use serde_json::Value;
use tracing::debug;

/// How records are addressed. Exactly one mode is used per build.
#[derive(Debug, Clone, Copy)]
pub enum AddressingMode<'o> {
    /// Flat rows, each carrying a slash-delimited path.
    Path(&'o Accessor),
    /// Flat rows, each carrying an id and (except the root) a parent id.
    IdParent {
        id: &'o Accessor,
        parent_id: &'o Accessor,
    },
    /// A nested record; children are read through the accessor.
    Nested(&'o ChildrenAccessor),
}

impl<'o> AddressingMode<'o> {
    /// Precedence: path, then id + parentId, then nested children.
    pub fn resolve(options: &'o HierarchyOptions) -> Result<Self> {
        if let Some(path) = &options.path {
            return Ok(Self::Path(path));
        }
        match (&options.id, &options.parent_id) {
            (Some(id), Some(parent_id)) => Ok(Self::IdParent { id, parent_id }),
            (Some(_), None) => Err(Error::config("`id` accessor requires a `parentId` accessor")),
            (None, Some(_)) => Err(Error::config("`parentId` accessor requires an `id` accessor")),
            (None, None) => Ok(Self::Nested(&options.children)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Path(_) => "path",
            Self::IdParent { .. } => "id-parent",
            Self::Nested(_) => "nested",
        }
    }
}

#[derive(Debug, Clone)]
pub struct HierarchyOptions {
    pub path: Option<Accessor>,
    pub id: Option<Accessor>,
    pub parent_id: Option<Accessor>,
    /// Used in nested mode; defaults to the `children` field.
    pub children: ChildrenAccessor,
    pub sort: Option<Comparator>,
    /// Path mode only: impute missing ancestors instead of failing.
    pub impute_missing: bool,
}

impl Default for HierarchyOptions {
    fn default() -> Self {
        Self {
            path: None,
            id: None,
            parent_id: None,
            children: ChildrenAccessor::default(),
            sort: None,
            impute_missing: true,
        }
    }
}

impl HierarchyOptions {
    pub fn path(mut self, path: Accessor) -> Self {
        self.path = Some(path);
        self
    }

    pub fn id_parent(mut self, id: Accessor, parent_id: Accessor) -> Self {
        self.id = Some(id);
        self.parent_id = Some(parent_id);
        self
    }

    pub fn children(mut self, children: ChildrenAccessor) -> Self {
        self.children = children;
        self
    }

    pub fn sort(mut self, sort: Comparator) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn impute_missing(mut self, impute: bool) -> Self {
        self.impute_missing = impute;
        self
    }
}

fn rows<'a>(data: &'a Value, mode: &AddressingMode<'_>) -> Result<&'a [Value]> {
    match data {
        Value::Array(rows) if rows.is_empty() => Err(Error::EmptyInput),
        Value::Array(rows) => Ok(rows.as_slice()),
        Value::Null => Err(Error::EmptyInput),
        _ => Err(Error::config(format!(
            "{} addressing requires an array of rows",
            mode.name()
        ))),
    }
}

/// Normalizes `data` into a single rooted tree and applies the optional sibling sort.
pub fn build_hierarchy<'a>(data: &'a Value, options: &HierarchyOptions) -> Result<Hierarchy<'a>> {
    let mode = AddressingMode::resolve(options)?;
    debug!(mode = mode.name(), "building hierarchy");

    let mut hierarchy = match mode {
        AddressingMode::Path(path) => {
            stratify::stratify_paths(rows(data, &mode)?, path, options.impute_missing)?
        }
        AddressingMode::IdParent { id, parent_id } => {
            stratify::stratify(rows(data, &mode)?, id, parent_id)?
        }
        AddressingMode::Nested(children) => nested::hierarchy(data, children)?,
    };

    if let Some(sort) = &options.sort {
        hierarchy.sort_by(|a, b| sort.compare(a, b));
    }

    Ok(hierarchy)
}
