//! Examples of using the persistent tree
use persistent_bst::{check, Tree};

fn main() {
    // Create a new tree
    let tree = Tree::<u32, &str>::new();

    // Insert some values; each insert returns a new tree
    let tree = tree.insert(10, "ten");
    let tree = tree.insert(1, "one");
    let tree = tree.insert(20, "twenty");

    // Check values
    assert_eq!(tree.find(&10), Some(&"ten"));
    assert_eq!(tree.find(&20), Some(&"twenty"));
    assert_eq!(tree.find(&5), None);
    println!("{}", tree);

    // Older versions stay available
    let without_ten = tree.delete(&10);
    println!("after delete: {}", without_ten);
    println!("before delete: {}", tree);

    // Union keeps the first tree's value on collisions
    let other = Tree::new().insert(20, "zwanzig").insert(30, "thirty");
    let union = Tree::union(&tree, &other);
    assert_eq!(union.find(&20), Some(&"twenty"));
    println!("union: {}", union);

    // Same content, different shape
    let reordered = Tree::new().insert(1, "one").insert(10, "ten").insert(20, "twenty");
    println!(
        "equal: {}, equivalent: {}",
        tree == reordered,
        check::equivalent(&tree, &reordered)
    );
}
