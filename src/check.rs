//! Checks used to test trees from the outside.
//!
//! `validate` and `is_valid` verify the binary-search-tree order at every node
//! through the public accessors only. `equivalent` compares two trees as sets
//! of entries, ignoring their shape; it is a separate relation from the
//! structural `==` on [`Tree`].

use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

use crate::{Error, Tree};

/// Verifies that every key in every left subtree is less than its ancestor's
/// key and every key in every right subtree is greater.
///
/// # Examples
///
/// ```
/// use persistent_bst::{check, Tree};
///
/// let tree = Tree::new().insert(2, "two").insert(1, "one").insert(3, "three");
/// assert!(check::validate(&tree).is_ok());
/// ```
pub fn validate<K, V>(tree: &Tree<K, V>) -> Result<(), Error>
where
    K: Ord + Debug,
{
    // Each pending subtree carries the open interval its keys must fall in
    let mut pending: Vec<(&Tree<K, V>, Option<&K>, Option<&K>)> = vec![(tree, None, None)];

    while let Some((tree, lower, upper)) = pending.pop() {
        let key = match tree.key() {
            Some(key) => key,
            None => continue,
        };

        if let Some(bound) = upper {
            if key >= bound {
                return Err(Error::NotLess {
                    key: format!("{:?}", key),
                    bound: format!("{:?}", bound),
                });
            }
        }
        if let Some(bound) = lower {
            if key <= bound {
                return Err(Error::NotGreater {
                    key: format!("{:?}", key),
                    bound: format!("{:?}", bound),
                });
            }
        }

        // Right first so the left subtree is checked first
        if let Some(right) = tree.right() {
            pending.push((right, Some(key), upper));
        }
        if let Some(left) = tree.left() {
            pending.push((left, lower, Some(key)));
        }
    }

    Ok(())
}

/// Returns `true` if [`validate`] finds no ordering violation.
pub fn is_valid<K, V>(tree: &Tree<K, V>) -> bool
where
    K: Ord + Debug,
{
    validate(tree).is_ok()
}

/// Returns `true` if both trees hold the same set of entries, whatever their shape.
///
/// # Examples
///
/// ```
/// use persistent_bst::{check, Tree};
///
/// let a = Tree::new().insert(1, "one").insert(2, "two");
/// let b = Tree::new().insert(2, "two").insert(1, "one");
///
/// assert_ne!(a, b);
/// assert!(check::equivalent(&a, &b));
/// ```
pub fn equivalent<K, V>(a: &Tree<K, V>, b: &Tree<K, V>) -> bool
where
    K: Hash + Eq,
    V: Hash + Eq,
{
    let a: HashSet<(&K, &V)> = a.iter().collect();
    let b: HashSet<(&K, &V)> = b.iter().collect();
    a == b
}

/// The insertions that rebuild `tree` when applied, in order, to an empty tree.
pub fn insertions<K, V>(tree: &Tree<K, V>) -> Vec<(&K, &V)> {
    tree.entries()
}
