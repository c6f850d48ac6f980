use crate::accessor::ChildrenAccessor;
use crate::error::{Error, Result};
use crate::hierarchy::{Hierarchy, PendingNode};
use serde_json::Value;
use tracing::debug;

/// Builds a hierarchy from an already-nested record; `data` itself becomes the root.
pub(crate) fn hierarchy<'a>(data: &'a Value, children: &ChildrenAccessor) -> Result<Hierarchy<'a>> {
    match data {
        Value::Null => return Err(Error::EmptyInput),
        Value::Array(_) => {
            return Err(Error::config(
                "tabular (array) data requires a path or id/parentId accessor",
            ));
        }
        _ => {}
    }

    let mut pending: Vec<PendingNode<'a>> = vec![PendingNode {
        data: Some(data),
        id: None,
        children: Vec::new(),
    }];
    let mut stack = vec![0usize];
    while let Some(index) = stack.pop() {
        let Some(record) = pending[index].data else {
            continue;
        };
        for child in children.get(record) {
            let child_index = pending.len();
            pending.push(PendingNode {
                data: Some(child),
                id: None,
                children: Vec::new(),
            });
            pending[index].children.push(child_index);
            stack.push(child_index);
        }
    }

    let (hierarchy, _) = Hierarchy::assemble(pending, 0);
    debug!(
        nodes = hierarchy.len(),
        height = hierarchy.height(),
        "built nested hierarchy"
    );
    Ok(hierarchy)
}
