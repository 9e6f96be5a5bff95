use anyhow::{Context, Result};
use log::trace;

use crate::node::{ContainerId, Node};

/// Key of the synthetic root wrapped around the input
const ROOT_KEY: &str = "parent";

/// Collect every value in a tree that satisfies a predicate
///
/// The input is wrapped in a one-entry root object so that it is tested
/// like any other value. For each container the predicate is run on each
/// immediate child (containers included); the matches of a container come
/// before the matches found inside its children, and siblings are visited
/// in iteration order.
///
/// A child container is not expanded when it is already on the chain of
/// containers currently being expanded, which makes self-references and
/// cycles terminate. A container reached through two unrelated paths is
/// expanded once per path.
///
/// `None` as predicate matches every value. The returned nodes are
/// handles into the input, not copies.
pub fn filter_deep(
    collection: &Node,
    predicate: Option<&mut dyn FnMut(&Node) -> bool>,
) -> Vec<Node> {
    match predicate {
        Some(predicate) => collect(collection, predicate),
        None => collect(collection, &mut |_: &Node| true),
    }
}

/// [`filter_deep`] with a required predicate
pub fn filter_deep_with<P>(collection: &Node, mut predicate: P) -> Vec<Node>
where
    P: FnMut(&Node) -> bool,
{
    collect(collection, &mut predicate)
}

/// [`filter_deep_with`] that rejects a leaf input instead of testing it
pub fn filter_deep_strict<P>(collection: &Node, predicate: P) -> Result<Vec<Node>>
where
    P: FnMut(&Node) -> bool,
{
    let collection = collection
        .expect_container()
        .context("Deep filtering needs an array or an object")?;
    Ok(filter_deep_with(collection, predicate))
}

fn collect(collection: &Node, predicate: &mut dyn FnMut(&Node) -> bool) -> Vec<Node> {
    let root = Node::object([(ROOT_KEY, collection.clone())]);
    let mut filter = DeepFilter {
        predicate,
        ancestors: Vec::new(),
        matches: Vec::new(),
    };
    filter.visit(&root);
    filter.matches
}

/// Traversal state shared across the recursion
struct DeepFilter<'p> {
    predicate: &'p mut dyn FnMut(&Node) -> bool,

    /// Containers currently being expanded, outermost first
    ancestors: Vec<ContainerId>,

    /// Output accumulator, in visit order
    matches: Vec<Node>,
}

impl DeepFilter<'_> {
    fn visit(&mut self, container: &Node) {
        let Some(id) = container.container_id() else {
            return;
        };
        let children = container.values();

        for child in &children {
            if (self.predicate)(child) {
                self.matches.push(child.clone());
            }
        }

        self.ancestors.push(id);
        for child in &children {
            match child.container_id() {
                Some(child_id) if self.ancestors.contains(&child_id) => {
                    trace!(
                        "Skipping {} already under expansion at depth {}",
                        child.kind(),
                        self.ancestors.len()
                    );
                }
                Some(_) => self.visit(child),
                None => {}
            }
        }
        self.ancestors.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_root_is_tested() {
        let input = Node::from(json!([1, 2]));
        let all = filter_deep(&input, None);
        assert_eq!(all.len(), 3);
        assert!(all[0].ptr_eq(&input));
    }

    #[test]
    fn test_leaf_input() {
        let matches = filter_deep_with(&Node::from(5), |v| *v == Node::from(5));
        assert_eq!(matches, vec![Node::from(5)]);
    }

    #[test]
    fn test_ancestors_are_restored() {
        let shared = Node::from(json!({"v": 1}));
        let input = Node::object([("l", shared.clone()), ("r", shared.clone())]);
        let ones = filter_deep_with(&input, |v| *v == Node::from(1));
        // Reached through two paths, expanded twice
        assert_eq!(ones.len(), 2);
    }
}
