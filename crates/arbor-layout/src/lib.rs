#![forbid(unsafe_code)]

//! Headless tree layout algorithms.
//!
//! Layouts assign every [`arbor_core::HierarchyNode`] a position in an abstract top-to-bottom
//! frame: `x` separates siblings, `y` grows with depth. Renderers are free to transpose the
//! frame (the tree chart draws left-to-right).

pub mod cluster;
pub mod error;
pub mod tidy;

use arbor_core::{Hierarchy, HierarchyNode};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub use cluster::Cluster;
pub use error::{Error, Result};
pub use tidy::Tidy;

/// Spacing of one layout unit: `dx` between adjacent siblings, `dy` between depth levels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeSize {
    pub dx: f64,
    pub dy: f64,
}

impl NodeSize {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    pub fn validate(self) -> Result<Self> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if ok(self.dx) && ok(self.dy) {
            Ok(self)
        } else {
            Err(Error::InvalidNodeSize {
                dx: self.dx,
                dy: self.dy,
            })
        }
    }
}

type SeparationFn = dyn Fn(&HierarchyNode<'_>, &HierarchyNode<'_>) -> f64 + Send + Sync;

/// Distance, in `dx` units, between two horizontally adjacent nodes.
#[derive(Clone)]
pub struct Separation(Arc<SeparationFn>);

impl Separation {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&HierarchyNode<'_>, &HierarchyNode<'_>) -> f64 + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Every pair of neighbours is one unit apart.
    pub fn uniform() -> Self {
        Self::new(|_, _| 1.0)
    }

    pub fn between(&self, a: &HierarchyNode<'_>, b: &HierarchyNode<'_>) -> f64 {
        (self.0)(a, b)
    }
}

impl Default for Separation {
    /// Siblings are one unit apart, cousins two.
    fn default() -> Self {
        Self::new(|a, b| if a.parent() == b.parent() { 1.0 } else { 2.0 })
    }
}

impl fmt::Debug for Separation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Separation(..)")
    }
}

/// A tree layout algorithm.
///
/// Implementations must assign a position to every node of the hierarchy.
pub trait TreeLayout: Send + Sync {
    fn name(&self) -> &'static str;

    fn assign_coordinates(&self, hierarchy: &mut Hierarchy<'_>, node_size: NodeSize) -> Result<()>;
}

impl fmt::Debug for dyn TreeLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TreeLayout({})", self.name())
    }
}

/// Built-in layouts, selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    /// Reingold–Tilford tidy tree (Buchheim et al. linear-time variant).
    #[default]
    Tidy,
    /// Dendrogram: all leaves on the deepest level.
    Cluster,
}

impl Algorithm {
    pub fn build(self) -> Arc<dyn TreeLayout> {
        match self {
            Algorithm::Tidy => Arc::new(Tidy::default()),
            Algorithm::Cluster => Arc::new(Cluster::default()),
        }
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tidy" | "tree" => Ok(Self::Tidy),
            "cluster" | "dendrogram" => Ok(Self::Cluster),
            other => Err(Error::UnknownAlgorithm {
                name: other.to_string(),
            }),
        }
    }
}

/// Headless layout entry point.
pub fn layout(hierarchy: &mut Hierarchy<'_>, algorithm: Algorithm, node_size: NodeSize) -> Result<()> {
    match algorithm {
        Algorithm::Tidy => Tidy::default().assign_coordinates(hierarchy, node_size),
        Algorithm::Cluster => Cluster::default().assign_coordinates(hierarchy, node_size),
    }
}
