#![forbid(unsafe_code)]

//! Hierarchy model + builders (headless).
//!
//! `arbor-core` turns JSON input into one canonical rooted tree:
//! - nested objects whose children are reached through a [`ChildrenAccessor`]
//! - flat rows addressed by an `id` / `parentId` pair
//! - flat rows addressed by a slash-delimited materialized path
//!
//! The builder never copies or mutates the input; every [`HierarchyNode`] borrows its record.

pub mod accessor;
pub mod error;
pub mod hierarchy;
pub mod mode;
mod nested;
mod stratify;

pub use accessor::{Accessor, ChildrenAccessor, Comparator, NodeAccessor};
pub use error::{Error, ErrorKind, Result};
pub use hierarchy::{Hierarchy, HierarchyNode, HierarchySnapshot, Link, NodeId, Point, SnapshotNode};
pub use mode::{AddressingMode, HierarchyOptions, build_hierarchy};
