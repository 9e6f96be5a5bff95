use log::trace;

use crate::node::{ArrayRef, Node, ObjectRef};

/// Merge `dest` into a copy of `src`, leaving both inputs untouched
///
/// Objects are merged key by key and arrays index by index, recursively.
/// When both sides hold something else (a leaf, or containers of different
/// kinds) the value from `dest` wins. The result shares no container with
/// either input.
///
/// ```
/// use serde_json::json;
/// use value_kit::{immutable_merge, Node};
///
/// let src = Node::from(json!({"a": 1, "b": 2}));
/// let dest = Node::from(json!({"c": 3, "d": 4}));
/// let merged = immutable_merge(&src, &dest);
/// assert_eq!(merged.to_json().unwrap(), json!({"a": 1, "b": 2, "c": 3, "d": 4}));
/// ```
pub fn immutable_merge(src: &Node, dest: &Node) -> Node {
    merge_into(src.deep_clone(), dest)
}

/// Merge `source` into `target`, which must be exclusively owned
fn merge_into(target: Node, source: &Node) -> Node {
    match (&target, source) {
        (Node::Object(target_map), Node::Object(source_map)) => {
            merge_objects(target_map, source_map)
        }
        (Node::Array(target_items), Node::Array(source_items)) => {
            merge_arrays(target_items, source_items)
        }
        _ => {
            if target.is_container() || source.is_container() {
                trace!("Replacing {} with {}", target.kind(), source.kind());
            }
            return source.deep_clone();
        }
    }
    target
}

fn merge_objects(target: &ObjectRef, source: &ObjectRef) {
    for (key, value) in source.borrow().iter() {
        let existing = target.borrow().get(key).cloned();
        let merged = match existing {
            Some(existing) => merge_into(existing, value),
            None => value.deep_clone(),
        };
        target.borrow_mut().insert(key.clone(), merged);
    }
}

fn merge_arrays(target: &ArrayRef, source: &ArrayRef) {
    for (index, value) in source.borrow().iter().enumerate() {
        let existing = target.borrow().get(index).cloned();
        match existing {
            Some(existing) => {
                let merged = merge_into(existing, value);
                target.borrow_mut()[index] = merged;
            }
            None => target.borrow_mut().push(value.deep_clone()),
        }
    }
}
