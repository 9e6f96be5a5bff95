//! Removal of falsy properties from a copy of a tree

use log::trace;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::node::Node;

/// Controls how [`compact_object_with`] prunes a tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CompactOptions {
    /// Descend into nested containers instead of only pruning the top level.
    pub deep: bool,

    /// Also drop containers that are empty once compacted.
    /// Empty containers are truthy, so they are kept by default.
    pub drop_empty_containers: bool,
}

impl CompactOptions {
    /// Create options with default values (shallow, keep empty containers).
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable recursive compaction.
    pub fn deep(mut self, deep: bool) -> Self {
        self.deep = deep;
        self
    }

    /// Enable or disable dropping of emptied containers.
    pub fn drop_empty_containers(mut self, drop: bool) -> Self {
        self.drop_empty_containers = drop;
        self
    }
}

/// Copy a tree without its falsy properties
///
/// The input is deep-cloned first and never modified. Shallow mode prunes
/// the top-level container only; deep mode compacts nested containers
/// first and then prunes each level. Array elements are pruned the same
/// way as object properties. A leaf input is returned as is.
///
/// The input must be acyclic.
pub fn compact_object(node: &Node, deep: bool) -> Node {
    compact_object_with(node, &CompactOptions::new().deep(deep))
}

/// [`compact_object`] with explicit options
pub fn compact_object_with(node: &Node, options: &CompactOptions) -> Node {
    let clone = node.deep_clone();
    compact_in_place(&clone, options);
    clone
}

fn compact_in_place(node: &Node, options: &CompactOptions) {
    match node {
        Node::Array(items) => {
            let mut items = items.borrow_mut();
            if options.deep {
                for item in items.iter() {
                    compact_in_place(item, options);
                }
            }
            let before = items.len();
            items.retain(|item| keep(item, options));
            if items.len() != before {
                trace!("Dropped {} array elements", before - items.len());
            }
        }
        Node::Object(map) => {
            let mut map = map.borrow_mut();
            if options.deep {
                for value in map.values() {
                    compact_in_place(value, options);
                }
            }
            map.retain(|key, value| {
                let kept = keep(value, options);
                if !kept {
                    trace!("Dropped property '{}'", key);
                }
                kept
            });
        }
        _ => {}
    }
}

fn keep(value: &Node, options: &CompactOptions) -> bool {
    if value.is_falsy() {
        return false;
    }
    !(options.drop_empty_containers && value.is_container() && value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_options_builder() {
        let options = CompactOptions::new().deep(true).drop_empty_containers(true);
        assert!(options.deep);
        assert!(options.drop_empty_containers);
        assert_eq!(CompactOptions::default(), CompactOptions::new());
    }

    #[test]
    fn test_leaf_root() {
        assert_eq!(compact_object(&Node::from(0), true), Node::from(0));
    }

    #[test]
    fn test_keep_rules() {
        let options = CompactOptions::new().drop_empty_containers(true);
        assert!(!keep(&Node::from(json!([])), &options));
        assert!(keep(&Node::from(json!([0])), &options));
        assert!(keep(&Node::from(json!([])), &CompactOptions::new()));
    }
}
