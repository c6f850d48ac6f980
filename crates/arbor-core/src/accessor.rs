//! Caller-supplied accessors.
//!
//! Accessors are cheap to clone (`Arc`) and `Send + Sync`, so one set of options can drive many
//! render passes. Field-based constructors accept either an object key (`"name"`) or a JSON
//! pointer (`"/meta/name"`).

use crate::hierarchy::HierarchyNode;
use crate::stratify::is_slash;
use serde_json::{Number, Value};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

fn lookup<'v>(value: &'v Value, key: &str) -> Option<&'v Value> {
    if key.starts_with('/') {
        value.pointer(key)
    } else {
        value.get(key)
    }
}

/// Converts a scalar JSON value into a key string. `null`, empty strings, arrays, and objects
/// have no key.
pub fn value_to_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(number_key(n)),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Integral floats drop their fraction (`1.0` -> `1`) so they match integer keys.
fn number_key(n: &Number) -> String {
    if let Some(f) = n.as_f64().filter(|_| n.is_f64()) {
        if f == 0.0 {
            return "0".to_string();
        }
        if (1e-6..1e21).contains(&f.abs()) {
            return f.to_string();
        }
    }
    n.to_string()
}

type KeyFn = dyn Fn(&Value) -> Option<String> + Send + Sync;

/// Reads a string key (id, parent id, or path) from a record.
#[derive(Clone)]
pub struct Accessor(Arc<KeyFn>);

impl Accessor {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Option<String> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn field(key: impl Into<String>) -> Self {
        let key = key.into();
        Self::new(move |v| lookup(v, &key).and_then(value_to_key))
    }

    pub fn get(&self, record: &Value) -> Option<String> {
        (self.0)(record)
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Accessor(..)")
    }
}

type ChildrenFn = dyn for<'v> Fn(&'v Value) -> Vec<&'v Value> + Send + Sync;

/// Returns the children embedded in a nested record.
#[derive(Clone)]
pub struct ChildrenAccessor(Arc<ChildrenFn>);

impl ChildrenAccessor {
    pub fn new<F>(f: F) -> Self
    where
        F: for<'v> Fn(&'v Value) -> Vec<&'v Value> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Children are the elements of the array stored under `key`; anything else means "leaf".
    pub fn field(key: impl Into<String>) -> Self {
        let key = key.into();
        Self::new(move |v| match lookup(v, &key) {
            Some(Value::Array(items)) => items.iter().collect(),
            _ => Vec::new(),
        })
    }

    pub fn get<'v>(&self, record: &'v Value) -> Vec<&'v Value> {
        (self.0)(record)
    }
}

impl Default for ChildrenAccessor {
    fn default() -> Self {
        Self::field("children")
    }
}

impl fmt::Debug for ChildrenAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ChildrenAccessor(..)")
    }
}

type NodeFn = dyn Fn(Option<&Value>, &HierarchyNode<'_>) -> Option<String> + Send + Sync;

/// Presentation accessor: `(record, node) -> text`. Used for labels, titles, and link URLs.
#[derive(Clone)]
pub struct NodeAccessor(Arc<NodeFn>);

impl NodeAccessor {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Option<&Value>, &HierarchyNode<'_>) -> Option<String> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn field(key: impl Into<String>) -> Self {
        let key = key.into();
        Self::new(move |data, _| data.and_then(|d| lookup(d, &key)).and_then(value_to_key))
    }

    /// The node's resolved id.
    pub fn id() -> Self {
        Self::new(|_, node| node.id().map(str::to_string))
    }

    /// Last segment of the node's path id (`/a/b/c` -> `c`), with `\/` unescaped.
    pub fn basename() -> Self {
        Self::new(|_, node| node.id().map(path_basename))
    }

    pub fn get(&self, node: &HierarchyNode<'_>) -> Option<String> {
        (self.0)(node.data(), node)
    }
}

impl fmt::Debug for NodeAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NodeAccessor(..)")
    }
}

fn path_basename(path: &str) -> String {
    let bytes = path.as_bytes();
    let start = (0..bytes.len())
        .rev()
        .find(|&i| is_slash(bytes, i))
        .map_or(0, |i| i + 1);
    path[start..].replace("\\/", "/")
}

type CompareFn = dyn Fn(&HierarchyNode<'_>, &HierarchyNode<'_>) -> Ordering + Send + Sync;

/// Orders siblings. Applied per sibling group with a stable sort.
#[derive(Clone)]
pub struct Comparator(Arc<CompareFn>);

impl Comparator {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&HierarchyNode<'_>, &HierarchyNode<'_>) -> Ordering + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Ascending by a record field. Numbers compare numerically, strings lexicographically;
    /// records without the field sort last.
    pub fn by_field(key: impl Into<String>) -> Self {
        let key = key.into();
        Self::new(move |a, b| {
            let va = a.data().and_then(|d| lookup(d, &key));
            let vb = b.data().and_then(|d| lookup(d, &key));
            compare_values(va, vb)
        })
    }

    /// Ascending by subtree height.
    pub fn by_height() -> Self {
        Self::new(|a, b| a.height().cmp(&b.height()))
    }

    pub fn reverse(self) -> Self {
        Self::new(move |a, b| (self.0)(a, b).reverse())
    }

    /// Breaks ties of `self` with `next`.
    pub fn then(self, next: Comparator) -> Self {
        Self::new(move |a, b| (self.0)(a, b).then_with(|| (next.0)(a, b)))
    }

    pub fn compare(&self, a: &HierarchyNode<'_>, b: &HierarchyNode<'_>) -> Ordering {
        (self.0)(a, b)
    }
}

impl fmt::Debug for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Comparator(..)")
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(x), Some(y)) => value_to_key(x)
            .unwrap_or_default()
            .cmp(&value_to_key(y).unwrap_or_default()),
    }
}
