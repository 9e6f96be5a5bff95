mod common;

use pretty_assertions::assert_eq;
use serde_json::json;
use value_kit::{compact_object, compact_object_with, CompactOptions, Node};

use common::{init_logging, json_of, node};

#[test]
fn test_shallow_removes_falsy_properties() {
    init_logging();
    let input = node(json!({"a": false, "b": 3, "c": ""}));

    let compacted = compact_object(&input, false);

    assert_eq!(json_of(&compacted), json!({"b": 3}));
}

#[test]
fn test_shallow_leaves_nested_values_alone() {
    let input = node(json!({"a": {"b": 0, "c": null}, "d": 0}));

    let compacted = compact_object(&input, false);

    assert_eq!(json_of(&compacted), json!({"a": {"b": 0, "c": null}}));
}

#[test]
fn test_every_falsy_kind_is_removed() {
    let input = Node::object([
        ("zero", Node::from(0)),
        ("nan", Node::from(f64::NAN)),
        ("null", Node::Null),
        ("false", Node::from(false)),
        ("empty", Node::from("")),
        ("kept", Node::from("0")),
    ]);

    let compacted = compact_object(&input, false);

    assert_eq!(json_of(&compacted), json!({"kept": "0"}));
}

#[test]
fn test_deep_compacts_nested_objects_and_arrays() {
    let input = node(json!({
        "a": {"b": 0, "c": {"d": "", "e": "x"}},
        "list": [0, 1, null, {"f": false, "g": 2}],
        "h": null
    }));

    let compacted = compact_object(&input, true);

    assert_eq!(
        json_of(&compacted),
        json!({
            "a": {"c": {"e": "x"}},
            "list": [1, {"g": 2}]
        })
    );
}

#[test]
fn test_deep_keeps_emptied_containers_by_default() {
    let input = node(json!({"a": {"b": 0}, "c": [null, ""], "d": 1}));

    let compacted = compact_object(&input, true);

    assert_eq!(json_of(&compacted), json!({"a": {}, "c": [], "d": 1}));
}

#[test]
fn test_drop_empty_containers_option() {
    let input = node(json!({"a": {"b": {"c": 0}}, "d": [[], [1]], "e": 1}));

    let options = CompactOptions::new().deep(true).drop_empty_containers(true);
    let compacted = compact_object_with(&input, &options);

    // Emptied levels disappear bottom-up
    assert_eq!(json_of(&compacted), json!({"d": [[1]], "e": 1}));
}

#[test]
fn test_root_is_never_dropped() {
    let input = node(json!({"a": null}));

    let options = CompactOptions::new().deep(true).drop_empty_containers(true);
    let compacted = compact_object_with(&input, &options);

    assert_eq!(json_of(&compacted), json!({}));
}

#[test]
fn test_array_root() {
    let input = node(json!([0, "a", false, [null]]));

    assert_eq!(json_of(&compact_object(&input, false)), json!(["a", [null]]));
    assert_eq!(json_of(&compact_object(&input, true)), json!(["a", []]));
}

#[test]
fn test_input_is_not_mutated() {
    let input = node(json!({"a": {"b": 0}, "c": ""}));
    let before = json_of(&input);

    let compacted = compact_object(&input, true);

    assert_eq!(json_of(&input), before);
    assert!(!compacted.ptr_eq(&input));
}

#[test]
fn test_shared_subtrees_are_compacted_independently() {
    let shared = node(json!({"x": 0, "y": 1}));
    let input = Node::object([("l", shared.clone()), ("r", shared.clone())]);

    let compacted = compact_object(&input, true);

    assert_eq!(json_of(&compacted), json!({"l": {"y": 1}, "r": {"y": 1}}));
    assert_eq!(json_of(&shared), json!({"x": 0, "y": 1}));
    assert!(!compacted.get("l").unwrap().ptr_eq(&compacted.get("r").unwrap()));
}
