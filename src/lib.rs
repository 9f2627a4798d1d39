//! treestore: an in-memory tree container indexed by item id.
//!
//! Items carry a unique id, an optional parent id (`None` is the root
//! sentinel), and an opaque payload. The store keeps the flat insertion
//! sequence, the id index, and the parent→children adjacency mutually
//! consistent across inserts, wholesale updates, and cascading subtree
//! removal.
//!
//! ```
//! use treestore::{TreeItem, TreeStore};
//!
//! let mut store = TreeStore::new([
//!     TreeItem::new(1, None, "root"),
//!     TreeItem::new(2, Some(1), "child"),
//!     TreeItem::new(3, Some(2), "leaf"),
//! ]);
//!
//! let ids: Vec<u32> = store.get_all_children(&1).iter().map(|i| i.id).collect();
//! assert_eq!(ids, vec![2, 3]);
//!
//! store.remove_item(&2);
//! assert_eq!(store.len(), 1);
//! ```

pub mod display;
pub mod error;
pub mod item;
pub mod store;

pub use display::{render_forest, TreeRender};
pub use error::{StoreError, StoreResult};
pub use item::TreeItem;
pub use store::{Ancestors, Descendants, TreeStore};
