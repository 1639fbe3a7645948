//! Pre-order traversal of a tree.

use crate::node::Node;
use crate::tree::Tree;

/// Depth-first walk over the nodes of a tree: root, left subtree, right subtree.
pub(crate) struct Nodes<'a, K, V> {
    /// Nodes still to visit; the top of the stack is visited next
    stack: Vec<&'a Node<K, V>>,
}

impl<'a, K, V> Nodes<'a, K, V> {
    pub(crate) fn new(tree: &'a Tree<K, V>) -> Self {
        Nodes {
            stack: tree.root.as_deref().into_iter().collect(),
        }
    }
}

impl<'a, K, V> Iterator for Nodes<'a, K, V> {
    type Item = &'a Node<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;

        // Right goes under left so the whole left subtree is visited first
        self.stack.extend(node.right.root.as_deref());
        self.stack.extend(node.left.root.as_deref());

        Some(node)
    }
}

/// An iterator over the entries of a [`Tree`] in pre-order.
///
/// This iterator yields `(&K, &V)` pairs: the root entry first, then the
/// entries of the left subtree, then those of the right subtree. The order
/// follows the shape of the tree, not the order of the keys.
pub struct Iter<'a, K, V> {
    nodes: Nodes<'a, K, V>,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(tree: &'a Tree<K, V>) -> Self {
        Iter {
            nodes: Nodes::new(tree),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.nodes.next().map(|node| (node.key(), node.value()))
    }
}
