//! Rendering rooted trees with termtree.

use std::fmt::{Debug, Display};
use std::hash::Hash;

use termtree::Tree;
use tracing::instrument;

use crate::store::TreeStore;

/// Conversion of a container's rooted trees into printable [`termtree`]
/// trees, one per root item, labeled by item id.
///
/// Items below a dangling parent are not reachable from any root and do
/// not appear in the rendering.
pub trait TreeRender {
    fn to_tree_strings(&self) -> Vec<Tree<String>>;
}

impl<I, P> TreeRender for TreeStore<I, P>
where
    I: Clone + Eq + Hash + Debug + Display,
{
    #[instrument(level = "debug", skip(self))]
    fn to_tree_strings(&self) -> Vec<Tree<String>> {
        fn build<I, P>(store: &TreeStore<I, P>, id: &I, parent_tree: &mut Tree<String>)
        where
            I: Clone + Eq + Hash + Debug + Display,
        {
            for child in store.get_children(id) {
                let mut child_tree = Tree::new(child.id.to_string());
                build(store, &child.id, &mut child_tree);
                parent_tree.push(child_tree);
            }
        }

        self.root_items()
            .into_iter()
            .map(|root| {
                let mut tree = Tree::new(root.id.to_string());
                build(self, &root.id, &mut tree);
                tree
            })
            .collect()
    }
}

/// Renders all rooted trees into one newline-separated block.
pub fn render_forest<S: TreeRender + ?Sized>(store: &S) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    for tree in store.to_tree_strings() {
        let _ = write!(out, "{tree}");
    }
    out
}
