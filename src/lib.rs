//! # Persistent BST
//!
//! A persistent ordered map implemented as an unbalanced binary search tree.
//!
//! Every modifying operation returns a new tree and leaves the original untouched.
//! Nodes are shared via `Arc`; an edit rebuilds only the nodes on the path from
//! the root to the edited key (path copying) and shares every other subtree.
//!
//! ## Features
//!
//! - **Immutable API**: `insert`, `delete` and `union` return new trees
//! - **Structural Sharing**: Unchanged subtrees are shared between versions
//! - **Two notions of sameness**: `==` compares shape and entries position by
//!   position, [`check::equivalent`] compares only the sets of entries
//! - **No balancing**: The shape of a tree follows the order of its edits
//!
//! ## Example
//!
//! ```rust
//! use persistent_bst::{check, Tree};
//!
//! let tree = Tree::new()
//!     .insert(10, "ten")
//!     .insert(1, "one")
//!     .insert(20, "twenty");
//!
//! assert_eq!(tree.find(&1), Some(&"one"));
//! assert_eq!(tree.len(), 3);
//!
//! // Same entries, different insertion order
//! let other = Tree::new()
//!     .insert(1, "one")
//!     .insert(10, "ten")
//!     .insert(20, "twenty");
//!
//! assert_ne!(tree, other);
//! assert!(check::equivalent(&tree, &other));
//! ```
//!
//! Keys must be totally ordered (`Ord`) with an order that agrees with `Eq`
//! and never changes while a key is stored in a tree.

pub mod check;
mod iter;
mod node;
mod tree;

// Re-export public types
pub use crate::iter::Iter;
pub use crate::tree::Tree;

/// Errors reported by [`check::validate`].
///
/// Operations on [`Tree`] never fail; these only describe trees whose
/// binary-search-tree order has been broken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A key in a left subtree is not less than the key of an ancestor
    NotLess { key: String, bound: String },
    /// A key in a right subtree is not greater than the key of an ancestor
    NotGreater { key: String, bound: String },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NotLess { key, bound } => {
                write!(f, "key {} in a left subtree is not less than {}", key, bound)
            }
            Error::NotGreater { key, bound } => {
                write!(f, "key {} in a right subtree is not greater than {}", key, bound)
            }
        }
    }
}

impl std::error::Error for Error {}
