//! Internal node implementation for the persistent tree.
//!
//! A `Node` is never mutated once it has been wrapped in an `Arc`; every edit
//! builds new nodes along the search path and shares everything else.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::tree::Tree;

/// Internal node type for the tree.
///
/// The entry is reference counted so that rebuilt nodes on a copied path,
/// and entries re-inserted by delete or union, alias the original pair
/// instead of cloning keys and values.
pub(crate) struct Node<K, V> {
    /// Subtree holding keys strictly less than this node's key
    pub left: Tree<K, V>,

    /// The key-value pair stored at this node
    pub entry: Arc<(K, V)>,

    /// Subtree holding keys strictly greater than this node's key
    pub right: Tree<K, V>,

    /// Cached structural hash of this subtree
    ///
    /// Nodes are immutable, so once computed the value never goes stale.
    pub cached_hash: OnceCell<u64>,
}

impl<K, V> Node<K, V> {
    /// Creates a node from its parts
    pub fn new(left: Tree<K, V>, entry: Arc<(K, V)>, right: Tree<K, V>) -> Self {
        Node {
            left,
            entry,
            right,
            cached_hash: OnceCell::new(),
        }
    }

    /// Creates a single-entry node with two empty children
    pub fn leaf(entry: Arc<(K, V)>) -> Self {
        Self::new(Tree::new(), entry, Tree::new())
    }

    pub fn key(&self) -> &K {
        &self.entry.0
    }

    pub fn value(&self) -> &V {
        &self.entry.1
    }

    /// Returns the number of entries stored in this subtree
    pub fn subtree_size(&self) -> usize {
        1 + self.left.len() + self.right.len()
    }

    /// Creates a copy of this node with a new left subtree
    pub fn with_left(&self, left: Tree<K, V>) -> Self {
        Self::new(left, Arc::clone(&self.entry), self.right.clone())
    }

    /// Creates a copy of this node with a new right subtree
    pub fn with_right(&self, right: Tree<K, V>) -> Self {
        Self::new(self.left.clone(), Arc::clone(&self.entry), right)
    }

    /// Creates a copy of this node with a new entry, keeping both children
    pub fn with_entry(&self, entry: Arc<(K, V)>) -> Self {
        Self::new(self.left.clone(), entry, self.right.clone())
    }

    /// Gets the structural hash of this node
    ///
    /// The hash covers the shape of the subtree as well as its entries, so it
    /// agrees with structural equality rather than content equivalence.
    pub fn hash(&self) -> u64
    where
        K: Hash,
        V: Hash,
    {
        if let Some(hash) = self.cached_hash.get() {
            return *hash;
        }

        // Post-order walk so every child is cached before its parent hashes
        let mut stack: Vec<(&Node<K, V>, bool)> = vec![(self, false)];
        while let Some((node, children_done)) = stack.pop() {
            if node.cached_hash.get().is_some() {
                continue;
            }
            if children_done {
                let _ = node.cached_hash.set(node.calculate_hash());
            } else {
                stack.push((node, true));
                stack.extend(node.right.root.as_deref().map(|child| (child, false)));
                stack.extend(node.left.root.as_deref().map(|child| (child, false)));
            }
        }

        *self.cached_hash.get_or_init(|| self.calculate_hash())
    }

    fn calculate_hash(&self) -> u64
    where
        K: Hash,
        V: Hash,
    {
        let mut hasher = DefaultHasher::new();

        self.left.structural_hash().hash(&mut hasher);
        self.key().hash(&mut hasher);
        self.value().hash(&mut hasher);
        self.right.structural_hash().hash(&mut hasher);

        hasher.finish()
    }
}

// Unbalanced trees can degenerate into long spines, and the default
// recursive drop would use one stack frame per level.
impl<K, V> Drop for Node<K, V> {
    fn drop(&mut self) {
        let mut pending: Vec<Arc<Node<K, V>>> = Vec::new();
        pending.extend(self.left.take_root());
        pending.extend(self.right.take_root());

        while let Some(child) = pending.pop() {
            // Shared children are still owned by another tree.
            if let Ok(mut node) = Arc::try_unwrap(child) {
                pending.extend(node.left.take_root());
                pending.extend(node.right.take_root());
            }
        }
    }
}
