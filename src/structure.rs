//! Nested containers with reference semantics, and their structural clones.
//!
//! A [`Node`] is a shared handle to a [`Container`], either a sequence or a
//! string-keyed record. Cloning the handle (Rust `Clone`) aliases the same
//! container, so a [`Value::Node`] behaves like a reference to a nested
//! object. Two copy operations are built on top of this:
//!
//! - [`deep_clone`]: every nested container is copied, at any depth.
//! - [`shallow_clone`]: only the top-level container is new; nested
//!   containers are shared with the original.
//!
//! # Cycles
//!
//! Handles can form cycles (a container reachable from itself). The deep
//! clone tracks the containers on the current copy path and reports
//! [`CloneError::Cycle`] instead of recursing forever. Containers reachable
//! through several parents without a cycle are copied once per reference.
//! Equality walks the same way and treats a pair of containers met again
//! on the current comparison path as equal, so two cyclic graphs of the
//! same shape compare equal instead of recursing forever.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::rc::Rc;

use crate::error::CloneError;

/// Keyed entries of a record container.
pub type Record = BTreeMap<String, Value>;

/// A single value: a scalar or a handle to a nested container.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absence of a value.
    #[default]
    Null,
    /// A boolean scalar.
    Bool(bool),
    /// A numeric scalar.
    Number(f64),
    /// A string scalar.
    Text(String),
    /// A shared handle to a nested container.
    Node(Node),
}

/// Which kind of container a [`Node`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Ordered, index-addressed values.
    Sequence,
    /// String-keyed values.
    Record,
}

/// The contents of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum Container {
    /// Ordered, index-addressed values.
    Sequence(Vec<Value>),
    /// String-keyed values.
    Record(Record),
}

impl Container {
    /// The kind of this container.
    pub fn kind(&self) -> Kind {
        match self {
            Container::Sequence(_) => Kind::Sequence,
            Container::Record(_) => Kind::Record,
        }
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        match self {
            Container::Sequence(items) => items.len(),
            Container::Record(entries) => entries.len(),
        }
    }

    /// Returns `true` if there are no top-level entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Shared, mutable handle to a [`Container`].
///
/// Equality compares contents, not identity; use [`Node::ptr_eq`] for
/// identity. Comparing cyclic graphs terminates.
#[derive(Clone)]
pub struct Node(Rc<RefCell<Container>>);

impl Node {
    /// Wraps a container in a fresh handle.
    pub fn new(container: Container) -> Self {
        Node(Rc::new(RefCell::new(container)))
    }

    /// A new empty record.
    pub fn record() -> Self {
        Self::new(Container::Record(Record::new()))
    }

    /// A new empty sequence.
    pub fn sequence() -> Self {
        Self::new(Container::Sequence(Vec::new()))
    }

    /// The kind of the referenced container.
    pub fn kind(&self) -> Kind {
        self.0.borrow().kind()
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Returns `true` if there are no top-level entries.
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Returns `true` if both handles refer to the same container.
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Immutably borrows the container.
    ///
    /// # Panics
    /// Panics if the container is currently mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, Container> {
        self.0.borrow()
    }

    /// Mutably borrows the container.
    ///
    /// # Panics
    /// Panics if the container is currently borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, Container> {
        self.0.borrow_mut()
    }

    /// Value stored under `key`, or `None` for a missing key or a sequence.
    ///
    /// Nested containers come back as shared handles.
    pub fn get(&self, key: &str) -> Option<Value> {
        match &*self.0.borrow() {
            Container::Record(entries) => entries.get(key).cloned(),
            Container::Sequence(_) => None,
        }
    }

    /// Value at `index`, or `None` if out of bounds or a record.
    pub fn at(&self, index: usize) -> Option<Value> {
        match &*self.0.borrow() {
            Container::Sequence(items) => items.get(index).cloned(),
            Container::Record(_) => None,
        }
    }

    /// Stores `value` under `key`, returning the previous value.
    ///
    /// Returns `None` and stores nothing if this node is a sequence.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        match &mut *self.0.borrow_mut() {
            Container::Record(entries) => entries.insert(key.into(), value.into()),
            Container::Sequence(_) => None,
        }
    }

    /// Replaces the value at `index`, returning the previous value.
    ///
    /// Returns `None` and stores nothing if out of bounds or a record.
    pub fn set(&self, index: usize, value: impl Into<Value>) -> Option<Value> {
        match &mut *self.0.borrow_mut() {
            Container::Sequence(items) => items
                .get_mut(index)
                .map(|slot| std::mem::replace(slot, value.into())),
            Container::Record(_) => None,
        }
    }

    /// Appends `value` to a sequence. Returns `false` for a record.
    pub fn push(&self, value: impl Into<Value>) -> bool {
        match &mut *self.0.borrow_mut() {
            Container::Sequence(items) => {
                items.push(value.into());
                true
            }
            Container::Record(_) => false,
        }
    }

    fn addr(&self) -> Addr {
        Rc::as_ptr(&self.0)
    }
}

type Addr = *const RefCell<Container>;

/// Containers on the current recursion path.
///
/// Membership checks are O(1), so a walk over the whole graph stays linear
/// in its size.
struct Path<K> {
    on_path: HashSet<K>,
}

impl<K> Default for Path<K> {
    fn default() -> Self {
        Self {
            on_path: HashSet::new(),
        }
    }
}

impl<K: std::hash::Hash + Eq + Copy> Path<K> {
    /// Marks `key` as entered; `false` if it is already on the path.
    fn enter(&mut self, key: K) -> bool {
        self.on_path.insert(key)
    }

    fn leave(&mut self, key: K) {
        self.on_path.remove(&key);
    }

    fn depth(&self) -> usize {
        self.on_path.len()
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        let mut path = Path::default();
        eq_nodes(self, other, &mut path)
    }
}

fn eq_nodes(a: &Node, b: &Node, path: &mut Path<(Addr, Addr)>) -> bool {
    if a.ptr_eq(b) {
        return true;
    }
    let pair = (a.addr(), b.addr());
    if !path.enter(pair) {
        // Already comparing this pair further up; any difference shows there.
        return true;
    }

    let equal = match (&*a.borrow(), &*b.borrow()) {
        (Container::Sequence(xs), Container::Sequence(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| eq_values(x, y, path))
        }
        (Container::Record(xs), Container::Record(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .zip(ys)
                    .all(|((kx, x), (ky, y))| kx == ky && eq_values(x, y, path))
        }
        _ => false,
    };

    path.leave(pair);
    equal
}

fn eq_values(a: &Value, b: &Value, path: &mut Path<(Addr, Addr)>) -> bool {
    match (a, b) {
        (Value::Node(x), Value::Node(y)) => eq_nodes(x, y, path),
        (Value::Node(_), _) | (_, Value::Node(_)) => false,
        (x, y) => x == y,
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Printing through a cycle would not terminate.
        match self.0.try_borrow() {
            Ok(container) => f
                .debug_tuple("Node")
                .field(&container.kind())
                .field(&container.len())
                .finish(),
            Err(_) => f.write_str("Node(<borrowed>)"),
        }
    }
}

impl From<Container> for Node {
    fn from(container: Container) -> Self {
        Node::new(container)
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        Value::Node(node)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Number(x)
    }
}

impl From<i32> for Value {
    fn from(x: i32) -> Self {
        Value::Number(x as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl Value {
    /// The nested container handle, if this value is one.
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    /// The numeric scalar, if this value is one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(x) => Some(*x),
            _ => None,
        }
    }

    /// The string scalar, if this value is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Deep-clones a nested container; scalars are copied.
    ///
    /// # Errors
    /// [`CloneError::Cycle`] if the container graph contains a cycle.
    pub fn deep_clone(&self) -> Result<Value, CloneError> {
        match self {
            Value::Node(node) => deep_clone(node).map(Value::Node),
            scalar => Ok(scalar.clone()),
        }
    }

    /// Shallow-clones a nested container; scalars are copied.
    pub fn shallow_clone(&self) -> Value {
        match self {
            Value::Node(node) => Value::Node(shallow_clone(node)),
            scalar => scalar.clone(),
        }
    }

    /// Converts to JSON.
    ///
    /// Non-finite numbers become `null`.
    ///
    /// # Errors
    /// [`CloneError::Cycle`] if the container graph contains a cycle.
    pub fn to_json(&self) -> Result<serde_json::Value, CloneError> {
        let mut path = Path::default();
        to_json_inner(self, &mut path)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => Value::Node(Node::new(Container::Sequence(
                items.into_iter().map(Value::from).collect(),
            ))),
            serde_json::Value::Object(entries) => Value::Node(Node::new(Container::Record(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ))),
        }
    }
}

/// Returns a fully independent copy of `node`.
///
/// The copy has the same kind and structurally equal contents. Every nested
/// container is itself deep-cloned, so no mutation of the copy at any depth
/// is visible through the original, and vice versa.
///
/// # Errors
/// [`CloneError::Cycle`] if a container is reachable from itself.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use u_sampling::structure::{deep_clone, Value};
///
/// let original = Value::from(json!({ "a": { "b": 1 } }));
/// let root = original.as_node().unwrap();
/// let copy = deep_clone(root).unwrap();
///
/// copy.get("a").unwrap().as_node().unwrap().insert("b", 2);
/// let b = root.get("a").unwrap().as_node().unwrap().get("b");
/// assert_eq!(b, Some(Value::Number(1.0)));
/// ```
pub fn deep_clone(node: &Node) -> Result<Node, CloneError> {
    let mut path = Path::default();
    deep_clone_inner(node, &mut path)
}

/// Returns a new top-level container sharing nested containers with `node`.
///
/// Replacing a top-level entry of the copy leaves the original alone;
/// mutating a nested container through the copy mutates the original's.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use u_sampling::structure::{shallow_clone, Value};
///
/// let original = Value::from(json!({ "a": { "b": 1 } }));
/// let root = original.as_node().unwrap();
/// let copy = shallow_clone(root);
///
/// copy.get("a").unwrap().as_node().unwrap().insert("b", 2);
/// let b = root.get("a").unwrap().as_node().unwrap().get("b");
/// assert_eq!(b, Some(Value::Number(2.0)));
/// ```
pub fn shallow_clone(node: &Node) -> Node {
    // Container::clone copies scalars and clones Node handles (sharing them).
    Node::new(node.borrow().clone())
}

fn deep_clone_inner(
    node: &Node,
    path: &mut Path<Addr>,
) -> Result<Node, CloneError> {
    let addr = node.addr();
    if !path.enter(addr) {
        tracing::debug!(depth = path.depth(), "cycle detected during deep clone");
        return Err(CloneError::Cycle {
            depth: path.depth(),
        });
    }

    let copied = match &*node.borrow() {
        Container::Sequence(items) => Container::Sequence(
            items
                .iter()
                .map(|v| deep_clone_value(v, path))
                .collect::<Result<_, _>>()?,
        ),
        Container::Record(entries) => Container::Record(
            entries
                .iter()
                .map(|(k, v)| Ok((k.clone(), deep_clone_value(v, path)?)))
                .collect::<Result<_, CloneError>>()?,
        ),
    };

    path.leave(addr);
    Ok(Node::new(copied))
}

fn deep_clone_value(
    value: &Value,
    path: &mut Path<Addr>,
) -> Result<Value, CloneError> {
    match value {
        Value::Node(child) => deep_clone_inner(child, path).map(Value::Node),
        scalar => Ok(scalar.clone()),
    }
}

fn to_json_inner(
    value: &Value,
    path: &mut Path<Addr>,
) -> Result<serde_json::Value, CloneError> {
    let node = match value {
        Value::Null => return Ok(serde_json::Value::Null),
        Value::Bool(b) => return Ok(serde_json::Value::Bool(*b)),
        Value::Number(x) => {
            return Ok(serde_json::Number::from_f64(*x)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null))
        }
        Value::Text(s) => return Ok(serde_json::Value::String(s.clone())),
        Value::Node(node) => node,
    };

    let addr = node.addr();
    if !path.enter(addr) {
        return Err(CloneError::Cycle {
            depth: path.depth(),
        });
    }
    let json = match &*node.borrow() {
        Container::Sequence(items) => serde_json::Value::Array(
            items
                .iter()
                .map(|v| to_json_inner(v, path))
                .collect::<Result<_, _>>()?,
        ),
        Container::Record(entries) => serde_json::Value::Object(
            entries
                .iter()
                .map(|(k, v)| Ok((k.clone(), to_json_inner(v, path)?)))
                .collect::<Result<_, CloneError>>()?,
        ),
    };
    path.leave(addr);
    Ok(json)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
