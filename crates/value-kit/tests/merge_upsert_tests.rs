mod common;

use pretty_assertions::assert_eq;
use serde_json::json;
use value_kit::{immutable_merge, upsert, Matcher, Node};

use common::{json_of, node};

#[test]
fn test_merge_disjoint_objects() {
    let src = node(json!({"a": 1, "b": 2}));
    let dest = node(json!({"c": 3, "d": 4}));

    let merged = immutable_merge(&src, &dest);

    assert_eq!(json_of(&merged), json!({"a": 1, "b": 2, "c": 3, "d": 4}));
    assert_eq!(json_of(&src), json!({"a": 1, "b": 2}));
    assert_eq!(json_of(&dest), json!({"c": 3, "d": 4}));
}

#[test]
fn test_merge_dest_wins_on_conflict() {
    let src = node(json!({"a": 1, "b": {"x": 1, "y": 2}, "c": "keep"}));
    let dest = node(json!({"a": 9, "b": {"y": 3, "z": 4}, "c": null}));

    let merged = immutable_merge(&src, &dest);

    assert_eq!(
        json_of(&merged),
        json!({"a": 9, "b": {"x": 1, "y": 3, "z": 4}, "c": null})
    );
}

#[test]
fn test_merge_arrays_by_index() {
    let src = node(json!({"list": [{"a": 1}, 2, 3]}));
    let dest = node(json!({"list": [{"b": 2}, 5]}));

    let merged = immutable_merge(&src, &dest);

    assert_eq!(json_of(&merged), json!({"list": [{"a": 1, "b": 2}, 5, 3]}));
}

#[test]
fn test_merge_longer_dest_array_appends() {
    let src = node(json!([1]));
    let dest = node(json!([7, 8, 9]));

    assert_eq!(json_of(&immutable_merge(&src, &dest)), json!([7, 8, 9]));
}

#[test]
fn test_merge_result_shares_nothing() {
    let src = node(json!({"a": {"x": 1}}));
    let dest = node(json!({"b": {"y": 2}}));

    let merged = immutable_merge(&src, &dest);
    merged.get("a").unwrap().set("x", Node::from(100));
    merged.get("b").unwrap().set("y", Node::from(200));

    assert_eq!(json_of(&src), json!({"a": {"x": 1}}));
    assert_eq!(json_of(&dest), json!({"b": {"y": 2}}));
}

fn records() -> Vec<Node> {
    node(json!([{"id": 1}, {"id": 2}, {"id": 3, "data": {"n": 4}}])).values()
}

#[test]
fn test_upsert_replaces_match() {
    let base = records();

    let result = upsert(
        &base,
        &Matcher::properties(json!({"id": 3, "data": {"n": 4}})),
        node(json!({"id": 3, "data": 5})),
    );

    assert_eq!(result.len(), base.len());
    assert_eq!(
        json_of(&Node::array(result)),
        json!([{"id": 1}, {"id": 2}, {"id": 3, "data": 5}])
    );
}

#[test]
fn test_upsert_keeps_untouched_elements_shared() {
    let base = records();

    let result = upsert(&base, &Matcher::property_value("id", 3), Node::Null);

    assert!(result[0].ptr_eq(&base[0]));
    assert!(result[1].ptr_eq(&base[1]));
}

#[test]
fn test_upsert_inserts_without_match() {
    let base = records();

    let result = upsert(&base, &Matcher::properties(json!({"id": 42})), node(json!({"id": 42})));

    assert_eq!(result.len(), base.len() + 1);
    assert_eq!(json_of(&result[3]), json!({"id": 42}));
}

#[test]
fn test_upsert_removes_every_match() {
    let base = node(json!([{"kind": "a"}, {"kind": "b"}, {"kind": "a"}])).values();

    let result = upsert(
        &base,
        &Matcher::predicate(|v| v.get("kind") == Some(Node::from("a"))),
        node(json!({"kind": "c"})),
    );

    assert_eq!(
        json_of(&Node::array(result)),
        json!([{"kind": "b"}, {"kind": "c"}])
    );
}

#[test]
fn test_upsert_property_matcher_uses_truthiness() {
    let base = node(json!([{"on": true}, {"on": 0}, {"off": 1}])).values();

    let result = upsert(&base, &Matcher::property("on"), Node::from("new"));

    assert_eq!(
        json_of(&Node::array(result)),
        json!([{"on": 0}, {"off": 1}, "new"])
    );
}
