//! Tagged value model shared by every helper in the crate
//!
//! A [`Node`] is classified once, when it is built: it is either a leaf
//! (primitives, dates, patterns, callables) or one of the two container
//! variants. Containers are reference-counted handles, so a structure can
//! share a sub-tree between several parents or even point back at itself.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use derive_more::Display;
use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;

/// Shared handle to the elements of an array container
pub type ArrayRef = Rc<RefCell<Vec<Node>>>;

/// Shared handle to the entries of an object container
pub type ObjectRef = Rc<RefCell<IndexMap<String, Node>>>;

/// A callable leaf value
#[derive(Clone)]
pub struct NodeFn(Rc<dyn Fn(&[Node]) -> Node>);

impl NodeFn {
    /// Wrap a closure as a callable value
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Node]) -> Node + 'static,
    {
        Self(Rc::new(f))
    }

    /// Check whether both handles point at the same callable
    pub fn ptr_eq(&self, other: &NodeFn) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for NodeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[Function]")
    }
}

/// Reference identity of a container
///
/// Two ids are equal exactly when they were taken from handles to the same
/// container. Ids are only meaningful while the container is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContainerId(usize);

/// How a node is treated by the traversal helpers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum NodeKind {
    /// Not decomposed any further
    #[display(fmt = "leaf")]
    Leaf,

    /// Ordered sequence of nodes
    #[display(fmt = "array")]
    Array,

    /// String-keyed mapping of nodes, in insertion order
    #[display(fmt = "object")]
    Object,
}

impl NodeKind {
    /// Check if this kind can hold child nodes
    pub fn is_container(&self) -> bool {
        !matches!(self, NodeKind::Leaf)
    }
}

/// A value that the structural helpers operate on
///
/// Cloning a `Node` is cheap: leaves are copied and containers share the
/// underlying storage. Use [`Node::deep_clone`] for an independent copy.
#[derive(Clone)]
pub enum Node {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Date(DateTime<Utc>),
    Pattern(Regex),
    Function(NodeFn),
    Array(ArrayRef),
    Object(ObjectRef),
}

impl Node {
    /// Create an array container from a sequence of nodes
    pub fn array<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Node>,
    {
        Node::Array(Rc::new(RefCell::new(items.into_iter().collect())))
    }

    /// Create an object container from key/value pairs
    pub fn object<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Node)>,
        K: Into<String>,
    {
        Node::Object(Rc::new(RefCell::new(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        )))
    }

    /// Create a date leaf
    pub fn date(at: DateTime<Utc>) -> Self {
        Node::Date(at)
    }

    /// Compile a pattern leaf
    pub fn pattern(source: &str) -> Result<Self> {
        let regex =
            Regex::new(source).with_context(|| format!("Invalid pattern {:?}", source))?;
        Ok(Node::Pattern(regex))
    }

    /// Create a callable leaf
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&[Node]) -> Node + 'static,
    {
        Node::Function(NodeFn::new(f))
    }

    /// Get the traversal kind of this node
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Array(_) => NodeKind::Array,
            Node::Object(_) => NodeKind::Object,
            _ => NodeKind::Leaf,
        }
    }

    /// Check if this node is an array or an object
    pub fn is_container(&self) -> bool {
        self.kind().is_container()
    }

    /// Check if this node is a leaf
    pub fn is_leaf(&self) -> bool {
        !self.is_container()
    }

    /// Get the reference identity of a container
    ///
    /// Returns `None` for leaves.
    pub fn container_id(&self) -> Option<ContainerId> {
        match self {
            Node::Array(items) => Some(ContainerId(Rc::as_ptr(items) as *const () as usize)),
            Node::Object(map) => Some(ContainerId(Rc::as_ptr(map) as *const () as usize)),
            _ => None,
        }
    }

    /// Check whether both nodes are handles to the same container
    pub fn ptr_eq(&self, other: &Node) -> bool {
        match (self.container_id(), other.container_id()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Require this node to be a container
    pub fn expect_container(&self) -> Result<&Node> {
        if self.is_leaf() {
            bail!("Expected an array or an object, found {}", self.describe());
        }
        Ok(self)
    }

    /// Truthiness under the usual dynamic-language rules
    ///
    /// `null`, `false`, `0`, `-0`, `NaN` and the empty string are falsy.
    /// Everything else is truthy, empty containers included.
    pub fn is_truthy(&self) -> bool {
        match self {
            Node::Null => false,
            Node::Bool(b) => *b,
            Node::Number(n) => *n != 0.0 && !n.is_nan(),
            Node::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// Negation of [`Node::is_truthy`]
    pub fn is_falsy(&self) -> bool {
        !self.is_truthy()
    }

    /// Number of children of a container (0 for leaves)
    pub fn len(&self) -> usize {
        match self {
            Node::Array(items) => items.borrow().len(),
            Node::Object(map) => map.borrow().len(),
            _ => 0,
        }
    }

    /// Check if this node has no children
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the value stored under `key` of an object
    pub fn get(&self, key: &str) -> Option<Node> {
        match self {
            Node::Object(map) => map.borrow().get(key).cloned(),
            _ => None,
        }
    }

    /// Get the element at `index` of an array
    pub fn index(&self, index: usize) -> Option<Node> {
        match self {
            Node::Array(items) => items.borrow().get(index).cloned(),
            _ => None,
        }
    }

    /// Immediate child values of a container, in iteration order
    ///
    /// Returns an empty vector for leaves.
    pub fn values(&self) -> Vec<Node> {
        match self {
            Node::Array(items) => items.borrow().clone(),
            Node::Object(map) => map.borrow().values().cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// Insert or replace a property of an object
    ///
    /// Returns false (and does nothing) when this node is not an object.
    pub fn set(&self, key: impl Into<String>, value: Node) -> bool {
        match self {
            Node::Object(map) => {
                map.borrow_mut().insert(key.into(), value);
                true
            }
            _ => false,
        }
    }

    /// Append an element to an array
    ///
    /// Returns false (and does nothing) when this node is not an array.
    pub fn push(&self, value: Node) -> bool {
        match self {
            Node::Array(items) => {
                items.borrow_mut().push(value);
                true
            }
            _ => false,
        }
    }

    /// Copy this node with fresh containers all the way down
    ///
    /// Shared sub-trees are copied once per reference. The input must be
    /// acyclic.
    pub fn deep_clone(&self) -> Node {
        match self {
            Node::Array(items) => Node::array(items.borrow().iter().map(Node::deep_clone)),
            Node::Object(map) => Node::object(
                map.borrow()
                    .iter()
                    .map(|(key, value)| (key.clone(), value.deep_clone())),
            ),
            leaf => leaf.clone(),
        }
    }

    /// Convert back to JSON
    ///
    /// Dates become RFC 3339 strings, patterns their source, and
    /// non-finite numbers `null`. Callables and cyclic references fail.
    pub fn to_json(&self) -> Result<Value> {
        self.to_json_inner(&mut Vec::new())
    }

    fn to_json_inner(&self, ancestors: &mut Vec<ContainerId>) -> Result<Value> {
        match self {
            Node::Null => Ok(Value::Null),
            Node::Bool(b) => Ok(Value::Bool(*b)),
            Node::Number(n) => Ok(number_to_json(*n)),
            Node::String(s) => Ok(Value::String(s.clone())),
            Node::Date(at) => Ok(Value::String(
                at.to_rfc3339_opts(SecondsFormat::Millis, true),
            )),
            Node::Pattern(regex) => Ok(Value::String(regex.as_str().to_string())),
            Node::Function(_) => Err(anyhow!("Callable values have no JSON representation")),
            Node::Array(items) => {
                self.enter(ancestors)?;
                let mut out = Vec::new();
                for (index, item) in items.borrow().iter().enumerate() {
                    out.push(
                        item.to_json_inner(ancestors)
                            .with_context(|| format!("at index {}", index))?,
                    );
                }
                ancestors.pop();
                Ok(Value::Array(out))
            }
            Node::Object(map) => {
                self.enter(ancestors)?;
                let mut out = serde_json::Map::new();
                for (key, value) in map.borrow().iter() {
                    let converted = value
                        .to_json_inner(ancestors)
                        .with_context(|| format!("at key {:?}", key))?;
                    out.insert(key.clone(), converted);
                }
                ancestors.pop();
                Ok(Value::Object(out))
            }
        }
    }

    /// Push this container onto the ancestry chain, failing on a cycle
    fn enter(&self, ancestors: &mut Vec<ContainerId>) -> Result<()> {
        let id = self
            .container_id()
            .ok_or_else(|| anyhow!("Leaf values have no identity"))?;
        if ancestors.contains(&id) {
            bail!("Cyclic reference to an enclosing {}", self.kind());
        }
        ancestors.push(id);
        Ok(())
    }

    /// Short description used in error messages
    fn describe(&self) -> String {
        match self {
            Node::Null => "null".to_string(),
            Node::Bool(_) => "a boolean".to_string(),
            Node::Number(_) => "a number".to_string(),
            Node::String(_) => "a string".to_string(),
            Node::Date(_) => "a date".to_string(),
            Node::Pattern(_) => "a pattern".to_string(),
            Node::Function(_) => "a function".to_string(),
            Node::Array(_) | Node::Object(_) => format!("an {}", self.kind()),
        }
    }

    fn write_display(
        &self,
        f: &mut fmt::Formatter<'_>,
        ancestors: &mut Vec<ContainerId>,
    ) -> fmt::Result {
        match self {
            Node::Null => f.write_str("null"),
            Node::Bool(b) => write!(f, "{}", b),
            Node::Number(n) => write_number(f, *n),
            Node::String(s) => f.write_str(s),
            Node::Date(at) => f.write_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Node::Pattern(regex) => write!(f, "/{}/", regex.as_str()),
            Node::Function(_) => f.write_str("[Function]"),
            Node::Object(_) => f.write_str("[object Object]"),
            Node::Array(items) => {
                // Joined like a dynamic-language array; a back-reference renders empty
                let Some(id) = self.container_id() else {
                    return Ok(());
                };
                if ancestors.contains(&id) {
                    return Ok(());
                }
                ancestors.push(id);
                for (index, item) in items.borrow().iter().enumerate() {
                    if index > 0 {
                        f.write_str(",")?;
                    }
                    if !matches!(item, Node::Null) {
                        item.write_display(f, ancestors)?;
                    }
                }
                ancestors.pop();
                Ok(())
            }
        }
    }
}

fn number_to_json(n: f64) -> Value {
    // Integral values keep an integer representation so they compare equal to json!(1)
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        return Value::from(n as i64);
    }
    serde_json::Number::from_f64(n)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_nan() {
        f.write_str("NaN")
    } else if n.is_infinite() {
        f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        write!(f, "{:.0}", n + 0.0)
    } else {
        write!(f, "{}", n)
    }
}

impl Default for Node {
    fn default() -> Self {
        Node::Null
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_display(f, &mut Vec::new())
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ancestors = RefCell::new(Vec::new());
        fmt::Debug::fmt(
            &GuardedDebug {
                node: self,
                ancestors: &ancestors,
            },
            f,
        )
    }
}

/// Debug view of a node that prints `<cycle>` for a back-edge
struct GuardedDebug<'a> {
    node: &'a Node,
    ancestors: &'a RefCell<Vec<ContainerId>>,
}

impl GuardedDebug<'_> {
    fn child<'b>(&'b self, node: &'b Node) -> GuardedDebug<'b> {
        GuardedDebug {
            node,
            ancestors: self.ancestors,
        }
    }
}

impl fmt::Debug for GuardedDebug<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = match self.node {
            Node::Null => return f.write_str("Null"),
            Node::Bool(b) => return f.debug_tuple("Bool").field(b).finish(),
            Node::Number(n) => return f.debug_tuple("Number").field(n).finish(),
            Node::String(s) => return f.debug_tuple("String").field(s).finish(),
            Node::Date(at) => return f.debug_tuple("Date").field(at).finish(),
            Node::Pattern(regex) => {
                return f.debug_tuple("Pattern").field(&regex.as_str()).finish()
            }
            Node::Function(func) => return fmt::Debug::fmt(func, f),
            Node::Array(_) | Node::Object(_) => self.node.container_id(),
        };
        let Some(id) = id else {
            return Ok(());
        };
        if self.ancestors.borrow().contains(&id) {
            return f.write_str("<cycle>");
        }

        self.ancestors.borrow_mut().push(id);
        let result = match self.node {
            Node::Array(items) => match items.try_borrow() {
                Ok(items) => f
                    .debug_list()
                    .entries(items.iter().map(|item| self.child(item)))
                    .finish(),
                Err(_) => f.write_str("[<borrowed>]"),
            },
            Node::Object(map) => match map.try_borrow() {
                Ok(map) => f
                    .debug_map()
                    .entries(map.iter().map(|(key, value)| (key, self.child(value))))
                    .finish(),
                Err(_) => f.write_str("{<borrowed>}"),
            },
            _ => Ok(()),
        };
        self.ancestors.borrow_mut().pop();
        result
    }
}

impl PartialEq for Node {
    /// Structural equality, short-circuiting on container identity
    ///
    /// A pair of containers met again while it is still being compared
    /// counts as equal, so cyclic structures compare without recursing
    /// forever.
    fn eq(&self, other: &Self) -> bool {
        structural_eq(self, other, &mut Vec::new())
    }
}

fn structural_eq(
    a: &Node,
    b: &Node,
    in_progress: &mut Vec<(ContainerId, ContainerId)>,
) -> bool {
    match (a, b) {
        (Node::Null, Node::Null) => true,
        (Node::Bool(x), Node::Bool(y)) => x == y,
        (Node::Number(x), Node::Number(y)) => x == y,
        (Node::String(x), Node::String(y)) => x == y,
        (Node::Date(x), Node::Date(y)) => x == y,
        (Node::Pattern(x), Node::Pattern(y)) => x.as_str() == y.as_str(),
        (Node::Function(x), Node::Function(y)) => x.ptr_eq(y),
        (Node::Array(x), Node::Array(y)) => {
            if Rc::ptr_eq(x, y) {
                return true;
            }
            let (x, y) = (x.borrow(), y.borrow());
            x.len() == y.len()
                && guarded(a, b, in_progress, |in_progress| {
                    x.iter()
                        .zip(y.iter())
                        .all(|(l, r)| structural_eq(l, r, in_progress))
                })
        }
        (Node::Object(x), Node::Object(y)) => {
            if Rc::ptr_eq(x, y) {
                return true;
            }
            let (x, y) = (x.borrow(), y.borrow());
            x.len() == y.len()
                && guarded(a, b, in_progress, |in_progress| {
                    x.iter().all(|(key, l)| {
                        y.get(key)
                            .is_some_and(|r| structural_eq(l, r, in_progress))
                    })
                })
        }
        _ => false,
    }
}

/// Run `compare` with the container pair marked as in progress
fn guarded<F>(
    a: &Node,
    b: &Node,
    in_progress: &mut Vec<(ContainerId, ContainerId)>,
    compare: F,
) -> bool
where
    F: FnOnce(&mut Vec<(ContainerId, ContainerId)>) -> bool,
{
    let (Some(left), Some(right)) = (a.container_id(), b.container_id()) else {
        return false;
    };
    if in_progress.contains(&(left, right)) {
        return true;
    }
    in_progress.push((left, right));
    let equal = compare(in_progress);
    in_progress.pop();
    equal
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Node {
                fn from(n: $ty) -> Self {
                    Node::Number(n as f64)
                }
            }
        )*
    };
}

impl_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Node::Bool(b)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::String(s.to_string())
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::String(s)
    }
}

impl From<Vec<Node>> for Node {
    fn from(items: Vec<Node>) -> Self {
        Node::array(items)
    }
}

impl From<DateTime<Utc>> for Node {
    fn from(at: DateTime<Utc>) -> Self {
        Node::Date(at)
    }
}

impl From<Regex> for Node {
    fn from(regex: Regex) -> Self {
        Node::Pattern(regex)
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(b),
            Value::Number(n) => Node::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => Node::String(s),
            Value::Array(items) => Node::array(items.into_iter().map(Node::from)),
            Value::Object(map) => Node::object(map.into_iter().map(|(k, v)| (k, Node::from(v)))),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let value = self.to_json().map_err(serde::ser::Error::custom)?;
        serde::Serialize::serialize(&value, serializer)
    }
}
