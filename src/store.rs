//! The indexed tree container.
//!
//! A [`TreeStore`] keeps three views over one item set: the insertion-order
//! sequence, the id index, and the parent→children adjacency. Every mutation
//! updates all three before returning, so no partially-updated state is ever
//! observable through the query surface.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::hash::Hash;

use itertools::Itertools;
use tracing::instrument;

use crate::error::{StoreError, StoreResult};
use crate::item::TreeItem;

/// In-memory tree container indexed by item id.
///
/// Items reference their parent by id; `None` is the root sentinel.
/// Dangling parent references are tolerated: the item is stored and indexed
/// under the unresolved parent key, and ancestor traversal simply stops at
/// the first id that does not resolve.
///
/// All operations are infallible. Duplicate inserts and unknown-id updates,
/// removals, and queries are silent no-ops or empty results.
#[derive(Debug)]
pub struct TreeStore<I, P> {
    /// Live ids in insertion order
    order: Vec<I>,
    /// Id → item record
    by_id: HashMap<I, TreeItem<I, P>>,
    /// Parent id → ordered child ids. Every live id has an entry, so any
    /// item can be queried as a parent without special-casing leaves.
    /// Unresolved parent ids referenced by some item also get an entry.
    children: HashMap<I, Vec<I>>,
    /// Ordered child ids of the root sentinel
    roots: Vec<I>,
}

impl<I, P> Default for TreeStore<I, P> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            by_id: HashMap::new(),
            children: HashMap::new(),
            roots: Vec::new(),
        }
    }
}

impl<I, P> TreeStore<I, P>
where
    I: Clone + Eq + Hash + fmt::Debug,
{
    /// Builds a store by inserting the supplied items in sequence order.
    ///
    /// Applies [`TreeStore::add_item`] semantics per item: duplicate ids are
    /// silently ignored, parents need not exist.
    pub fn new<T>(items: T) -> Self
    where
        T: IntoIterator<Item = TreeItem<I, P>>,
    {
        let mut store = Self::default();
        store.extend(items);
        store
    }

    /// Number of live items.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates over all items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TreeItem<I, P>> {
        self.order.iter().filter_map(|id| self.by_id.get(id))
    }

    /// Snapshot of all items in insertion order.
    ///
    /// The returned vector is an independent copy; mutating it cannot
    /// affect the store.
    #[instrument(level = "trace", skip(self))]
    pub fn get_all(&self) -> Vec<TreeItem<I, P>>
    where
        P: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Looks up an item by id.
    #[instrument(level = "trace", skip(self))]
    pub fn get_item(&self, id: &I) -> Option<&TreeItem<I, P>> {
        self.by_id.get(id)
    }

    /// Immediate children of `id`, in the order they were inserted or last
    /// reparented under it. Unknown ids behave as childless.
    #[instrument(level = "trace", skip(self))]
    pub fn get_children(&self, id: &I) -> Vec<&TreeItem<I, P>> {
        match self.children.get(id) {
            Some(ids) => ids.iter().filter_map(|cid| self.by_id.get(cid)).collect(),
            None => Vec::new(),
        }
    }

    /// All descendants of `id` in breadth-first order: every child of `id`
    /// appears before any grandchild.
    #[instrument(level = "debug", skip(self))]
    pub fn get_all_children(&self, id: &I) -> Vec<&TreeItem<I, P>> {
        self.descendants(id).collect()
    }

    /// Ancestor chain starting with the item itself, then parent-ward,
    /// stopping at the first parent id that does not resolve. Empty for
    /// unknown ids.
    #[instrument(level = "debug", skip(self))]
    pub fn get_all_parents(&self, id: &I) -> Vec<&TreeItem<I, P>> {
        self.ancestors(id).collect()
    }

    /// Lazy breadth-first traversal over the descendants of `id`.
    ///
    /// Guarded by a visited set, so it terminates even on a malformed
    /// cyclic parent graph.
    pub fn descendants(&self, id: &I) -> Descendants<'_, I, P> {
        let mut queue = VecDeque::new();
        if let Some(kids) = self.children.get(id) {
            queue.extend(kids.iter());
        }
        Descendants {
            store: self,
            queue,
            visited: HashSet::new(),
        }
    }

    /// Lazy parent-chain traversal starting at `id` itself.
    ///
    /// Guarded by a visited set, so it terminates even on a malformed
    /// cyclic parent graph.
    pub fn ancestors(&self, id: &I) -> Ancestors<'_, I, P> {
        Ancestors {
            store: self,
            current: self.by_id.get(id),
            visited: HashSet::new(),
        }
    }

    /// Inserts an item. No-op if an item with the same id already exists.
    #[instrument(level = "trace", skip(self, item))]
    pub fn add_item(&mut self, item: TreeItem<I, P>) {
        if self.by_id.contains_key(&item.id) {
            return;
        }
        self.order.push(item.id.clone());
        self.attach_child(item.parent.as_ref(), item.id.clone());
        // Register the new id as a potential parent, keeping any children
        // list that dangling references created before this insert.
        self.children.entry(item.id.clone()).or_default();
        self.by_id.insert(item.id.clone(), item);
    }

    /// Replaces the stored record for `item.id` wholesale. No-op if the id
    /// is unknown.
    ///
    /// On a parent change the id is detached from the old parent's children
    /// and appended to the end of the new parent's children. The item keeps
    /// its position in the insertion-order sequence.
    #[instrument(level = "trace", skip(self, item))]
    pub fn update_item(&mut self, item: TreeItem<I, P>) {
        let old_parent = match self.by_id.get(&item.id) {
            Some(existing) => existing.parent.clone(),
            None => return,
        };
        if old_parent != item.parent {
            self.detach_child(old_parent.as_ref(), &item.id);
            self.attach_child(item.parent.as_ref(), item.id.clone());
        }
        self.by_id.insert(item.id.clone(), item);
    }

    /// Removes the item and its entire subtree. No-op if the id is unknown.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_item(&mut self, id: &I) {
        if !self.by_id.contains_key(id) {
            return;
        }

        // Collect the subtree breadth-first. The revisit guard keeps this
        // finite on a malformed cyclic parent graph.
        let mut doomed: HashSet<I> = HashSet::new();
        let mut queue: VecDeque<I> = VecDeque::new();
        queue.push_back(id.clone());
        while let Some(current) = queue.pop_front() {
            if doomed.contains(&current) {
                continue;
            }
            if let Some(kids) = self.children.get(&current) {
                queue.extend(kids.iter().cloned());
            }
            doomed.insert(current);
        }

        self.order.retain(|oid| !doomed.contains(oid));
        for rid in &doomed {
            let parent = self.by_id.remove(rid).and_then(|item| item.parent);
            self.detach_child(parent.as_ref(), rid);
            self.children.remove(rid);
        }
    }

    /// Items whose parent is the root sentinel, in insertion order.
    pub fn root_items(&self) -> Vec<&TreeItem<I, P>> {
        self.roots.iter().filter_map(|id| self.by_id.get(id)).collect()
    }

    /// Items with no children, in insertion order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_items(&self) -> Vec<&TreeItem<I, P>> {
        self.iter()
            .filter(|item| self.children.get(&item.id).map_or(true, |kids| kids.is_empty()))
            .collect()
    }

    /// Items whose parent id does not resolve to a stored item. These are
    /// tolerated structural states, reported here for diagnostics.
    pub fn dangling_items(&self) -> Vec<&TreeItem<I, P>> {
        self.iter()
            .filter(|item| {
                matches!(&item.parent, Some(p) if !self.by_id.contains_key(p))
            })
            .collect()
    }

    /// Maximum depth over all rooted trees. An empty store has depth 0, a
    /// store of only root items depth 1. Items below a dangling parent are
    /// not reachable from a root and do not count.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut visited = HashSet::new();
        self.roots
            .iter()
            .map(|id| self.depth_below(id, &mut visited))
            .max()
            .unwrap_or(0)
    }

    fn depth_below<'a>(&'a self, id: &'a I, visited: &mut HashSet<&'a I>) -> usize {
        if !visited.insert(id) {
            return 0;
        }
        let below = self
            .children
            .get(id)
            .into_iter()
            .flatten()
            .map(|child| self.depth_below(child, visited))
            .max()
            .unwrap_or(0);
        1 + below
    }

    /// Audits the derived indices against the container invariants and the
    /// acyclicity of all parent chains. Diagnostic only; operations keep
    /// the store consistent without calling this.
    #[instrument(level = "debug", skip(self))]
    pub fn validate(&self) -> StoreResult<()> {
        if let Some(dup) = self.order.iter().duplicates().next() {
            return Err(StoreError::DuplicateId(format!("{dup:?}")));
        }
        if self.order.len() != self.by_id.len() {
            return Err(StoreError::IndexOutOfSync(format!(
                "sequence has {} ids, index has {}",
                self.order.len(),
                self.by_id.len()
            )));
        }
        for id in &self.order {
            if !self.by_id.contains_key(id) {
                return Err(StoreError::IndexOutOfSync(format!("{id:?}")));
            }
            if !self.children.contains_key(id) {
                return Err(StoreError::MissingChildrenEntry(format!("{id:?}")));
            }
        }
        for item in self.iter() {
            let siblings: &[I] = match &item.parent {
                Some(p) => self.children.get(p).map_or(&[], |kids| kids.as_slice()),
                None => self.roots.as_slice(),
            };
            let registered = siblings.iter().filter(|cid| **cid == item.id).count();
            if registered != 1 {
                return Err(StoreError::BrokenChildLink(format!(
                    "{:?} registered {registered} times",
                    item.id
                )));
            }
        }
        for start in &self.order {
            self.check_parent_chain(start)?;
        }
        Ok(())
    }

    fn check_parent_chain(&self, start: &I) -> StoreResult<()> {
        let mut seen = HashSet::new();
        let mut current = self.by_id.get(start);
        while let Some(item) = current {
            if !seen.insert(&item.id) {
                return Err(StoreError::CycleDetected(format!("{start:?}")));
            }
            current = item.parent.as_ref().and_then(|p| self.by_id.get(p));
        }
        Ok(())
    }

    /// Appends `id` to the children list of `parent`, creating the list if
    /// absent. The root sentinel list always exists.
    fn attach_child(&mut self, parent: Option<&I>, id: I) {
        match parent {
            Some(p) => self.children.entry(p.clone()).or_default().push(id),
            None => self.roots.push(id),
        }
    }

    /// Drops `id` from the children list of `parent`, if that list exists.
    fn detach_child(&mut self, parent: Option<&I>, id: &I) {
        let list = match parent {
            Some(p) => match self.children.get_mut(p) {
                Some(list) => list,
                None => return,
            },
            None => &mut self.roots,
        };
        list.retain(|child| child != id);
    }
}

impl<I, P> Extend<TreeItem<I, P>> for TreeStore<I, P>
where
    I: Clone + Eq + Hash + fmt::Debug,
{
    fn extend<T: IntoIterator<Item = TreeItem<I, P>>>(&mut self, items: T) {
        for item in items {
            self.add_item(item);
        }
    }
}

impl<I, P> FromIterator<TreeItem<I, P>> for TreeStore<I, P>
where
    I: Clone + Eq + Hash + fmt::Debug,
{
    fn from_iter<T: IntoIterator<Item = TreeItem<I, P>>>(items: T) -> Self {
        Self::new(items)
    }
}

/// Breadth-first iterator over the descendants of one item.
///
/// Yields every child of the start id before any grandchild, each item at
/// most once.
pub struct Descendants<'a, I, P> {
    store: &'a TreeStore<I, P>,
    queue: VecDeque<&'a I>,
    visited: HashSet<&'a I>,
}

impl<'a, I, P> Iterator for Descendants<'a, I, P>
where
    I: Clone + Eq + Hash + fmt::Debug,
{
    type Item = &'a TreeItem<I, P>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.queue.pop_front() {
            if !self.visited.insert(id) {
                continue;
            }
            let Some(item) = self.store.by_id.get(id) else {
                continue;
            };
            if let Some(kids) = self.store.children.get(id) {
                self.queue.extend(kids.iter());
            }
            return Some(item);
        }
        None
    }
}

/// Iterator over an item and its ancestor chain, leaf-ward to root-ward.
///
/// Stops at the first parent id that does not resolve, or on a revisit if
/// the parent graph is cyclic.
pub struct Ancestors<'a, I, P> {
    store: &'a TreeStore<I, P>,
    current: Option<&'a TreeItem<I, P>>,
    visited: HashSet<&'a I>,
}

impl<'a, I, P> Iterator for Ancestors<'a, I, P>
where
    I: Clone + Eq + Hash + fmt::Debug,
{
    type Item = &'a TreeItem<I, P>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.current.take()?;
        if !self.visited.insert(&item.id) {
            return None;
        }
        self.current = item.parent.as_ref().and_then(|p| self.store.by_id.get(p));
        Some(item)
    }
}
