//! Tests for descendant and ancestor traversal

use rstest::{fixture, rstest};
use treestore::{TreeItem, TreeStore};

type Store = TreeStore<u32, &'static str>;

// 1 -> {2, 3}, 2 -> {4, 6}, 3 -> {5}
#[fixture]
fn store() -> Store {
    TreeStore::new([
        TreeItem::new(1, None, "root"),
        TreeItem::new(2, Some(1), "child-1"),
        TreeItem::new(3, Some(1), "child-2"),
        TreeItem::new(4, Some(2), "leaf"),
        TreeItem::new(5, Some(3), "leaf"),
        TreeItem::new(6, Some(2), "leaf"),
    ])
}

fn ids(items: &[&TreeItem<u32, &'static str>]) -> Vec<u32> {
    items.iter().map(|item| item.id).collect()
}

// ============================================================
// Descendant Tests
// ============================================================

#[rstest]
fn given_tree_when_collecting_descendants_then_breadth_first(store: Store) {
    // All children of 1 appear before any grandchild.
    assert_eq!(ids(&store.get_all_children(&1)), vec![2, 3, 4, 6, 5]);
    assert_eq!(ids(&store.get_all_children(&2)), vec![4, 6]);
}

#[rstest]
fn given_leaf_when_collecting_descendants_then_empty(store: Store) {
    assert!(store.get_all_children(&4).is_empty());
}

#[rstest]
fn given_unknown_id_when_collecting_descendants_then_empty(store: Store) {
    assert!(store.get_all_children(&99).is_empty());
}

#[rstest]
fn given_descendants_iterator_when_taking_prefix_then_lazy(store: Store) {
    let first_level: Vec<u32> = store.descendants(&1).take(2).map(|item| item.id).collect();
    assert_eq!(first_level, vec![2, 3]);
}

// ============================================================
// Ancestor Tests
// ============================================================

#[rstest]
fn given_leaf_when_collecting_ancestors_then_walks_to_root(store: Store) {
    assert_eq!(ids(&store.get_all_parents(&4)), vec![4, 2, 1]);
}

#[rstest]
fn given_root_when_collecting_ancestors_then_only_self(store: Store) {
    assert_eq!(ids(&store.get_all_parents(&1)), vec![1]);
}

#[rstest]
fn given_unknown_id_when_collecting_ancestors_then_empty(store: Store) {
    assert!(store.get_all_parents(&99).is_empty());
}

#[rstest]
fn given_dangling_parent_when_collecting_ancestors_then_stops_at_missing(mut store: Store) {
    // Arrange
    store.add_item(TreeItem::new(7, Some(42), "orphan"));

    // Act & Assert: the chain ends at the first unresolvable parent
    assert_eq!(ids(&store.get_all_parents(&7)), vec![7]);
}

#[rstest]
fn given_ancestors_iterator_when_stepping_then_lazy(store: Store) {
    let mut chain = store.ancestors(&4);
    assert_eq!(chain.next().map(|item| item.id), Some(4));
    assert_eq!(chain.next().map(|item| item.id), Some(2));
    assert_eq!(chain.next().map(|item| item.id), Some(1));
    assert!(chain.next().is_none());
}

// ============================================================
// Cycle Guard Tests
// ============================================================

// Reparent the root under one of its own descendants, producing 1 <-> 2.
fn cyclic_store() -> Store {
    let mut store = TreeStore::new([
        TreeItem::new(1, None, "was root"),
        TreeItem::new(2, Some(1), "child"),
    ]);
    store.update_item(TreeItem::new(1, Some(2), "was root"));
    store
}

#[test]
fn given_cyclic_parent_graph_when_collecting_ancestors_then_terminates() {
    let store = cyclic_store();
    assert_eq!(ids(&store.get_all_parents(&1)), vec![1, 2]);
    assert_eq!(ids(&store.get_all_parents(&2)), vec![2, 1]);
}

#[test]
fn given_cyclic_parent_graph_when_collecting_descendants_then_terminates() {
    let store = cyclic_store();
    assert_eq!(ids(&store.get_all_children(&1)), vec![2, 1]);
}

#[test]
fn given_cyclic_parent_graph_when_removing_then_whole_cycle_removed() {
    let mut store = cyclic_store();
    store.remove_item(&1);
    assert!(store.is_empty());
}

#[test]
fn given_cyclic_parent_graph_when_validating_then_cycle_detected() {
    let store = cyclic_store();
    let err = store.validate().expect_err("cycle must be reported");
    assert!(matches!(err, treestore::StoreError::CycleDetected(_)));
}
