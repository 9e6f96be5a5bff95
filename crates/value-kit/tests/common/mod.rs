#![allow(dead_code)]

use serde_json::Value;
use value_kit::Node;

/// Route library logs through the test harness
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Build a node from a JSON literal
pub fn node(value: Value) -> Node {
    Node::from(value)
}

/// Convert a node back to JSON for assertions
pub fn json_of(node: &Node) -> Value {
    node.to_json().unwrap()
}
