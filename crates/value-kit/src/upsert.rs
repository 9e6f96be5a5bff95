use std::fmt;

use crate::node::Node;

/// Selects the elements that [`upsert`] replaces
pub enum Matcher {
    /// Partial deep match against a pattern value
    ///
    /// Every key of a pattern object must be present and match, every
    /// element of a pattern array must match some element of the candidate
    /// array, and leaves compare by equality.
    Properties(Node),

    /// The named property of the candidate is truthy
    Property(String),

    /// The named property of the candidate partially matches the value
    PropertyValue(String, Node),

    /// Arbitrary test
    Predicate(Box<dyn Fn(&Node) -> bool>),
}

impl Matcher {
    /// Match by partial deep comparison with `pattern`
    pub fn properties(pattern: impl Into<Node>) -> Self {
        Matcher::Properties(pattern.into())
    }

    /// Match when property `key` is truthy
    pub fn property(key: impl Into<String>) -> Self {
        Matcher::Property(key.into())
    }

    /// Match when property `key` partially matches `value`
    pub fn property_value(key: impl Into<String>, value: impl Into<Node>) -> Self {
        Matcher::PropertyValue(key.into(), value.into())
    }

    /// Match with a closure
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Node) -> bool + 'static,
    {
        Matcher::Predicate(Box::new(f))
    }

    /// Test a candidate element
    pub fn matches(&self, candidate: &Node) -> bool {
        match self {
            Matcher::Properties(pattern) => is_partial_match(candidate, pattern),
            Matcher::Property(key) => candidate.get(key).is_some_and(|v| v.is_truthy()),
            Matcher::PropertyValue(key, value) => candidate
                .get(key)
                .is_some_and(|v| is_partial_match(&v, value)),
            Matcher::Predicate(f) => f(candidate),
        }
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Properties(pattern) => f.debug_tuple("Properties").field(pattern).finish(),
            Matcher::Property(key) => f.debug_tuple("Property").field(key).finish(),
            Matcher::PropertyValue(key, value) => f
                .debug_tuple("PropertyValue")
                .field(key)
                .field(value)
                .finish(),
            Matcher::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

fn is_partial_match(candidate: &Node, pattern: &Node) -> bool {
    if candidate.ptr_eq(pattern) {
        return true;
    }
    match (candidate, pattern) {
        (Node::Object(candidate_map), Node::Object(pattern_map)) => {
            let candidate_map = candidate_map.borrow();
            pattern_map.borrow().iter().all(|(key, expected)| {
                candidate_map
                    .get(key)
                    .is_some_and(|actual| is_partial_match(actual, expected))
            })
        }
        (Node::Array(candidate_items), Node::Array(pattern_items)) => {
            let candidate_items = candidate_items.borrow();
            pattern_items.borrow().iter().all(|expected| {
                candidate_items
                    .iter()
                    .any(|actual| is_partial_match(actual, expected))
            })
        }
        _ => candidate == pattern,
    }
}

/// Replace the elements selected by `matcher` with `replacement`
///
/// Every matching element is removed and `replacement` is appended once,
/// so the result grows by one when nothing matched. `base` is not
/// modified; the kept elements are shared with it.
pub fn upsert(base: &[Node], matcher: &Matcher, replacement: Node) -> Vec<Node> {
    let mut result: Vec<Node> = base
        .iter()
        .filter(|element| !matcher.matches(element))
        .cloned()
        .collect();
    result.push(replacement);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_partial_object_match() {
        let candidate = Node::from(json!({"id": 3, "data": {"n": 4, "m": 5}}));
        assert!(is_partial_match(&candidate, &Node::from(json!({"id": 3}))));
        assert!(is_partial_match(&candidate, &Node::from(json!({"data": {"n": 4}}))));
        assert!(!is_partial_match(&candidate, &Node::from(json!({"id": 4}))));
        assert!(is_partial_match(&candidate, &Node::from(json!({}))));
    }

    #[test]
    fn test_partial_array_match() {
        let candidate = Node::from(json!({"tags": ["a", "b", "c"]}));
        assert!(is_partial_match(&candidate, &Node::from(json!({"tags": ["c", "a"]}))));
        assert!(!is_partial_match(&candidate, &Node::from(json!({"tags": ["d"]}))));
    }

    #[test]
    fn test_debug() {
        let matcher = Matcher::predicate(|_| true);
        assert_eq!(format!("{:?}", matcher), "Predicate(..)");
    }
}
