//! Value Kit
//!
//! Helpers for nested values: structural traversal plus a handful of small
//! string and number utilities.
//!
//! # Core Concepts
//!
//! - **Node**: tagged value, either a leaf or a shared array/object container
//! - **PropertyPath**: dot-joined location of a node below a traversal root
//! - **deep_map_values** / **filter_deep** / **compact_object**: the
//!   recursive traversals
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use value_kit::{compact_object, filter_deep_with, Node};
//!
//! let tree = Node::from(json!({"a": false, "b": {"c": 1, "d": ""}}));
//!
//! let ones = filter_deep_with(&tree, |v| *v == Node::from(1));
//! assert_eq!(ones, vec![Node::from(1)]);
//!
//! let compacted = compact_object(&tree, true);
//! assert_eq!(compacted.to_json().unwrap(), json!({"b": {"c": 1}}));
//! ```

mod compact;
mod filter;
mod format;
mod ids;
mod map_values;
mod merge;
mod node;
mod ordinal;
mod path;
mod slug;
mod upsert;

pub use compact::{compact_object, compact_object_with, CompactOptions};
pub use filter::{filter_deep, filter_deep_strict, filter_deep_with};
pub use format::{format, format_strict, FormatArgs};
pub use ids::{is_uuid, uuid};
pub use map_values::deep_map_values;
pub use merge::immutable_merge;
pub use node::{ArrayRef, ContainerId, Node, NodeFn, NodeKind, ObjectRef};
pub use ordinal::ordinal;
pub use path::{PathSegment, PropertyPath};
pub use slug::slugify;
pub use upsert::{upsert, Matcher};
