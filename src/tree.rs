//! The main tree implementation.
//!
//! This module contains the `Tree` type, which provides the primary API for working
//! with the persistent binary search tree.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;
use std::sync::Arc;

use log::trace;

use crate::iter::{Iter, Nodes};
use crate::node::Node;

/// Which child a copied path continues into
#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

/// A persistent ordered map backed by an unbalanced binary search tree.
///
/// Every node keeps keys in its left subtree strictly less than its own key
/// and keys in its right subtree strictly greater. No rebalancing is ever
/// performed, so the shape of a tree depends on the order of the edits that
/// produced it.
///
/// This implementation is immutable - all operations that would modify the tree
/// return a new tree instance that shares unchanged subtrees with the original
/// via `Arc`. Only the nodes on the path from the root to the edit are rebuilt.
///
/// Keys must have a total order that is consistent with `Eq` and that does not
/// change while the key is stored. A key type violating this leaves lookups
/// and the ordering invariant unspecified.
pub struct Tree<K, V> {
    /// The root node, or `None` for the empty tree
    pub(crate) root: Option<Arc<Node<K, V>>>,
}

impl<K, V> Clone for Tree<K, V> {
    fn clone(&self) -> Self {
        Tree {
            root: self.root.clone(),
        }
    }
}

impl<K, V> Tree<K, V> {
    /// Creates a new, empty tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use persistent_bst::Tree;
    ///
    /// let tree = Tree::<u32, &str>::new();
    /// assert!(tree.is_empty());
    /// ```
    pub fn new() -> Self {
        Tree { root: None }
    }

    /// Returns the canonical empty tree. All empty trees are equal.
    pub fn empty() -> Self {
        Self::new()
    }

    pub(crate) fn from_node(node: Node<K, V>) -> Self {
        Tree {
            root: Some(Arc::new(node)),
        }
    }

    pub(crate) fn take_root(&mut self) -> Option<Arc<Node<K, V>>> {
        self.root.take()
    }

    /// Returns `true` if the tree contains no entries.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of entries in the tree.
    ///
    /// The count is not cached; it walks the whole tree on every call.
    ///
    /// # Examples
    ///
    /// ```
    /// use persistent_bst::Tree;
    ///
    /// let tree = Tree::new().insert(10, "ten").insert(1, "one");
    /// assert_eq!(tree.len(), 2);
    /// ```
    pub fn len(&self) -> usize {
        self.nodes().count()
    }

    /// Same as [`Tree::len`].
    pub fn size(&self) -> usize {
        self.len()
    }

    /// The key stored at the root, if the tree is not empty.
    pub fn key(&self) -> Option<&K> {
        self.root.as_ref().map(|node| node.key())
    }

    /// The value stored at the root, if the tree is not empty.
    pub fn value(&self) -> Option<&V> {
        self.root.as_ref().map(|node| node.value())
    }

    /// The left subtree of the root, or `None` if the tree or that subtree is empty.
    pub fn left(&self) -> Option<&Tree<K, V>> {
        self.root
            .as_ref()
            .map(|node| &node.left)
            .filter(|left| !left.is_empty())
    }

    /// The right subtree of the root, or `None` if the tree or that subtree is empty.
    pub fn right(&self) -> Option<&Tree<K, V>> {
        self.root
            .as_ref()
            .map(|node| &node.right)
            .filter(|right| !right.is_empty())
    }

    /// Returns an iterator over the entries in pre-order: root, then the left
    /// subtree, then the right subtree.
    ///
    /// This is not sorted order. Replaying the entries through [`Tree::insert`]
    /// starting from an empty tree rebuilds a tree equal to this one.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self)
    }

    pub(crate) fn nodes(&self) -> Nodes<'_, K, V> {
        Nodes::new(self)
    }

    /// Returns the keys in pre-order.
    ///
    /// # Examples
    ///
    /// ```
    /// use persistent_bst::Tree;
    ///
    /// let tree = Tree::new().insert(10, "ten").insert(1, "one").insert(20, "twenty");
    /// assert_eq!(tree.keys(), vec![&10, &1, &20]);
    /// ```
    pub fn keys(&self) -> Vec<&K> {
        self.iter().map(|(key, _)| key).collect()
    }

    /// Returns the entries in pre-order.
    pub fn entries(&self) -> Vec<(&K, &V)> {
        self.iter().collect()
    }
}

impl<K: Ord, V> Tree<K, V> {
    /// Retrieves a reference to the value stored for the given key, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use persistent_bst::Tree;
    ///
    /// let tree = Tree::new().insert(3, "three");
    ///
    /// assert_eq!(tree.find(&3), Some(&"three"));
    /// assert_eq!(tree.find(&4), None);
    /// ```
    pub fn find<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root.as_ref();

        while let Some(node) = current {
            current = match key.cmp(node.key().borrow()) {
                Ordering::Less => node.left.root.as_ref(),
                Ordering::Greater => node.right.root.as_ref(),
                Ordering::Equal => return Some(node.value()),
            };
        }

        None
    }

    /// Same as [`Tree::find`].
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key)
    }

    /// Returns `true` if the tree contains a value for the given key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Inserts a key-value pair, returning a new tree.
    ///
    /// If the key already exists its value is replaced and the node keeps its
    /// children; nothing else is restructured.
    ///
    /// # Examples
    ///
    /// ```
    /// use persistent_bst::Tree;
    ///
    /// let tree1 = Tree::new().insert(3, "three");
    /// let tree2 = tree1.insert(3, "drei");
    ///
    /// assert_eq!(tree1.find(&3), Some(&"three"));
    /// assert_eq!(tree2.find(&3), Some(&"drei"));
    /// ```
    pub fn insert(&self, key: K, value: V) -> Self {
        self.insert_entry(Arc::new((key, value)))
    }

    // Walks down to the insertion point, then copies the search path bottom-up
    pub(crate) fn insert_entry(&self, entry: Arc<(K, V)>) -> Self {
        let mut path = Vec::new();
        let mut current = self;

        let subtree = loop {
            let node = match &current.root {
                Some(node) => node,
                None => break Tree::from_node(Node::leaf(entry)),
            };

            match entry.0.cmp(node.key()) {
                Ordering::Less => {
                    path.push((&**node, Side::Left));
                    current = &node.left;
                }
                Ordering::Greater => {
                    path.push((&**node, Side::Right));
                    current = &node.right;
                }
                Ordering::Equal => break Tree::from_node(node.with_entry(entry)),
            }
        };

        Self::copy_path(path, subtree)
    }

    // Rebuilds the nodes on `path`, deepest first, around a new subtree
    fn copy_path(path: Vec<(&Node<K, V>, Side)>, subtree: Self) -> Self {
        path.into_iter()
            .rev()
            .fold(subtree, |child, (node, side)| match side {
                Side::Left => Tree::from_node(node.with_left(child)),
                Side::Right => Tree::from_node(node.with_right(child)),
            })
    }

    /// Removes a key, returning a new tree.
    ///
    /// When the key is absent the result shares the original root.
    ///
    /// A node with two children is replaced by its right subtree with every
    /// entry of its left subtree inserted into it, in pre-order. That costs
    /// one insert per left entry instead of splicing in a successor node.
    ///
    /// # Examples
    ///
    /// ```
    /// use persistent_bst::Tree;
    ///
    /// let tree = Tree::new().insert(10, "ten").insert(1, "one").insert(20, "twenty");
    /// let smaller = tree.delete(&10);
    ///
    /// assert_eq!(smaller.len(), 2);
    /// assert_eq!(smaller.find(&10), None);
    /// assert_eq!(tree.find(&10), Some(&"ten"));
    /// ```
    pub fn delete<Q>(&self, key: &Q) -> Self
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.delete_path(key).unwrap_or_else(|| self.clone())
    }

    // Returns `None` when the key is not in this tree
    fn delete_path<Q>(&self, key: &Q) -> Option<Self>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut path = Vec::new();
        let mut current = self;

        loop {
            let node = current.root.as_ref()?;

            match key.cmp(node.key().borrow()) {
                Ordering::Less => {
                    path.push((&**node, Side::Left));
                    current = &node.left;
                }
                Ordering::Greater => {
                    path.push((&**node, Side::Right));
                    current = &node.right;
                }
                Ordering::Equal => {
                    let merged = Self::merge(&node.left, &node.right);
                    return Some(Self::copy_path(path, merged));
                }
            }
        }
    }

    fn merge(left: &Self, right: &Self) -> Self {
        if left.is_empty() {
            return right.clone();
        }
        if right.is_empty() {
            return left.clone();
        }

        trace!(
            "merging {} left entries into right subtree of {}",
            left.len(),
            right.len()
        );
        left.nodes()
            .fold(right.clone(), |tree, node| tree.insert_entry(Arc::clone(&node.entry)))
    }

    /// Returns a tree holding every key of either input.
    ///
    /// Where both trees hold a key, the value from `preferred` wins. The result
    /// is built by inserting the entries of `preferred`, in pre-order, into
    /// `base`, so its shape depends on argument order even when its content
    /// does not.
    ///
    /// # Examples
    ///
    /// ```
    /// use persistent_bst::Tree;
    ///
    /// let one = Tree::new().insert(1, "one").insert(3, "three");
    /// let two = Tree::new().insert(3, "eerht").insert(4, "four");
    ///
    /// let union = Tree::union(&one, &two);
    /// assert_eq!(union.len(), 3);
    /// assert_eq!(union.find(&3), Some(&"three"));
    /// ```
    pub fn union(preferred: &Self, base: &Self) -> Self {
        if preferred.is_empty() {
            return base.clone();
        }

        trace!("union of {} preferred entries into {}", preferred.len(), base.len());
        preferred
            .nodes()
            .fold(base.clone(), |tree, node| tree.insert_entry(Arc::clone(&node.entry)))
    }

    /// Method form of [`Tree::union`]; entries of `self` win over `base`.
    pub fn union_with(&self, base: &Self) -> Self {
        Self::union(self, base)
    }
}

impl<K: Hash, V: Hash> Tree<K, V> {
    /// Returns a hash of the tree's shape and entries.
    ///
    /// Structurally equal trees have equal hashes. The empty tree hashes to 0.
    /// Each node caches its hash, so repeated calls are cheap and subtrees
    /// shared between trees are only hashed once.
    pub fn structural_hash(&self) -> u64 {
        self.root.as_ref().map_or(0, |node| node.hash())
    }
}

// Default implementation
impl<K, V> Default for Tree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

// Structural equality: same shape and same entries at every position
impl<K, V> PartialEq for Tree<K, V>
where
    K: PartialEq,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];

        while let Some((a, b)) = pending.pop() {
            match (&a.root, &b.root) {
                (None, None) => {}
                (Some(x), Some(y)) => {
                    // Fast path: shared subtree
                    if Arc::ptr_eq(x, y) {
                        continue;
                    }
                    if x.entry != y.entry {
                        return false;
                    }
                    pending.push((&x.right, &y.right));
                    pending.push((&x.left, &y.left));
                }
                _ => return false,
            }
        }

        true
    }
}

impl<K: Eq, V: Eq> Eq for Tree<K, V> {}

impl<K: Hash, V: Hash> Hash for Tree<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.structural_hash().hash(state);
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Tree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.root {
            None => f.write_str("Nil"),
            Some(node) => f
                .debug_struct("Node")
                .field("key", node.key())
                .field("value", node.value())
                .field("left", &node.left)
                .field("right", &node.right)
                .finish(),
        }
    }
}

/// Renders `NIL` for the empty tree, otherwise `[key=value left: .. right: ..]`
/// with empty sides left out.
impl<K: fmt::Display, V: fmt::Display> fmt::Display for Tree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = match &self.root {
            Some(node) => node,
            None => return f.write_str("NIL"),
        };

        write!(f, "[{}={}", node.key(), node.value())?;
        if !node.left.is_empty() {
            write!(f, " left: {}", node.left)?;
        }
        if !node.right.is_empty() {
            write!(f, " right: {}", node.right)?;
        }
        f.write_str("]")
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for Tree<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Tree::new(), |tree, (key, value)| tree.insert(key, value))
    }
}

impl<'a, K, V> IntoIterator for &'a Tree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
