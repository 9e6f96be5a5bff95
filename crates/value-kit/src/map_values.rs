use log::trace;

use crate::node::Node;
use crate::path::PropertyPath;

/// Map every leaf of a tree, keeping its shape
///
/// Arrays and objects are rebuilt level by level (same indices, same keys,
/// same key order) and every leaf is replaced by `callback(leaf, path)`.
/// The callback runs exactly once per leaf, in pre-order. Dates, patterns
/// and callables count as leaves.
///
/// There is no cycle detection: a self-referencing input never returns.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use value_kit::{deep_map_values, Node};
///
/// let tree = Node::from(json!({"a": {"b": [1, 2]}}));
/// let paths = deep_map_values(&tree, |_, path| Node::from(path.to_string()));
/// assert_eq!(paths.to_json().unwrap(), json!({"a": {"b": ["a.b.0", "a.b.1"]}}));
/// ```
pub fn deep_map_values<F>(node: &Node, mut callback: F) -> Node
where
    F: FnMut(&Node, &PropertyPath) -> Node,
{
    let mut path = PropertyPath::root();
    map_node(node, &mut callback, &mut path)
}

fn map_node<F>(node: &Node, callback: &mut F, path: &mut PropertyPath) -> Node
where
    F: FnMut(&Node, &PropertyPath) -> Node,
{
    match node {
        Node::Array(items) => {
            trace!("Mapping array at '{}'", path);
            // Snapshot the handles so the callback may touch the input freely
            let items = items.borrow().clone();
            let mut mapped = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                path.push(index);
                mapped.push(map_node(item, callback, path));
                path.pop();
            }
            Node::array(mapped)
        }
        Node::Object(map) => {
            trace!("Mapping object at '{}'", path);
            let entries: Vec<(String, Node)> = map
                .borrow()
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            let mut mapped = Vec::with_capacity(entries.len());
            for (key, value) in entries {
                path.push(key.as_str());
                let value = map_node(&value, callback, path);
                path.pop();
                mapped.push((key, value));
            }
            Node::object(mapped)
        }
        leaf => callback(leaf, path),
    }
}
