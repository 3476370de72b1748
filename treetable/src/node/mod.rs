//! Expand/collapse aware tree nodes.
//!
//! An [`ExpandCollapseNode`] owns its element, its children and its expand
//! state. Every structural operation returns a [`Change`] describing which of
//! the node's child rows appeared, disappeared or need reloading, given the
//! node's current expand state.
//!
//! # Example
//!
//! ```
//! use treetable::{ExpandCollapseNode, ExpandState};
//!
//! let mut root = ExpandCollapseNode::new(0);
//! root.append(ExpandCollapseNode::new(10));
//! root.append(ExpandCollapseNode::new(11));
//!
//! let change = root.update_state(ExpandState::Expand);
//! assert_eq!(change.insertion_rows(), &[0, 1]);
//! assert_eq!(root.visible_row_count(), 3);
//! assert_eq!(root.child(1).map(|c| c.level()), Some(1));
//! ```

mod diff;
mod flatten;
mod storage;

use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::change::Change;

pub use storage::NodeStorage;

/// Bounds required of the payload stored at each node.
///
/// Elements are compared by value when children are reconciled, so an
/// element must be unique among its siblings.
pub trait Element: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static {}

impl<T> Element for T where T: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static {}

/// Process-unique identifier assigned to every node at construction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct NodeId(Uuid);

impl NodeId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a node's children are shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpandState {
    /// Children are visible.
    Expand,
    /// Children are hidden.
    #[default]
    Collapse,
}

impl ExpandState {
    /// The opposite state.
    pub fn toggled(self) -> Self {
        match self {
            Self::Expand => Self::Collapse,
            Self::Collapse => Self::Expand,
        }
    }
}

/// A tree node with expand/collapse state.
///
/// The node exclusively owns its children. The parent link is the parent's
/// [`NodeId`] and carries no ownership; it is set whenever a child is
/// attached through one of the mutation methods and cleared when the child is
/// detached, so `child.parent() == Some(owner.id())` holds exactly for the
/// owner's children. `level` is the depth below the root of the tree the
/// node is attached to, and is pushed down to all descendants on reparenting.
#[derive(Debug)]
pub struct ExpandCollapseNode<E: Element> {
    id: NodeId,
    storage: NodeStorage<E>,
    state: ExpandState,
    parent: Option<NodeId>,
    level: usize,
}

impl<E: Element> ExpandCollapseNode<E> {
    /// Create a collapsed leaf.
    pub fn new(element: E) -> Self {
        Self::with_children(element, Vec::new(), ExpandState::Collapse)
    }

    /// Create a node with children and an initial state.
    ///
    /// An empty `children` list produces a leaf.
    pub fn with_children(element: E, children: Vec<Self>, state: ExpandState) -> Self {
        let mut node = Self {
            id: NodeId::new(),
            storage: NodeStorage::Leaf(element),
            state,
            parent: None,
            level: 0,
        };
        node.attach_all(children);
        node
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn element(&self) -> &E {
        self.storage.element()
    }

    pub fn into_element(self) -> E {
        self.storage.into_parts().0
    }

    pub fn storage(&self) -> &NodeStorage<E> {
        &self.storage
    }

    pub fn state(&self) -> ExpandState {
        self.state
    }

    pub fn is_expanded(&self) -> bool {
        self.state == ExpandState::Expand
    }

    /// Depth below the root (root = 0).
    pub fn level(&self) -> usize {
        self.level
    }

    /// Id of the node owning this one, if attached.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[Self] {
        self.storage.children()
    }

    pub fn child_count(&self) -> usize {
        self.storage.child_count()
    }

    pub fn has_children(&self) -> bool {
        self.child_count() > 0
    }

    /// Bounds-checked child access.
    pub fn child(&self, index: usize) -> Option<&Self> {
        self.children().get(index)
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut Self> {
        self.storage.children_mut().get_mut(index)
    }

    /// Follows a child index path from this node.
    pub fn node_at(&self, path: &[usize]) -> Option<&Self> {
        path.iter().try_fold(self, |node, &index| node.child(index))
    }

    pub fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut Self> {
        path.iter()
            .try_fold(self, |node, &index| node.child_mut(index))
    }

    /// Number of rows this node occupies in the flat presentation.
    ///
    /// Always counts the node itself; children only count while this node is
    /// expanded.
    pub fn visible_row_count(&self) -> usize {
        if !self.is_expanded() {
            return 1;
        }
        self.children()
            .iter()
            .fold(1, |count, child| count + child.visible_row_count())
    }

    // -------------------------------------------------------------------------
    // State
    // -------------------------------------------------------------------------

    /// Set the expand state and report the child rows it shows or hides.
    ///
    /// The state is stored even when the node has no children.
    pub fn update_state(&mut self, state: ExpandState) -> Change {
        let count = self.child_count();
        self.state = state;

        if count == 0 {
            return Change::empty();
        }
        match state {
            ExpandState::Expand => Change::insertions(0..count),
            ExpandState::Collapse => Change::deletions(0..count),
        }
    }

    // -------------------------------------------------------------------------
    // Structure
    // -------------------------------------------------------------------------

    /// Insert `child` at `index`.
    ///
    /// Returns an empty change and drops `child` when `index` is past the end;
    /// use [`try_insert`](Self::try_insert) to keep it.
    pub fn insert(&mut self, child: Self, index: usize) -> Change {
        self.try_insert(child, index).unwrap_or_default()
    }

    /// Insert `child` at `index`, handing it back if `index` is invalid.
    pub fn try_insert(&mut self, mut child: Self, index: usize) -> Result<Change, Self> {
        child.attach_to(self.id, self.level);
        match self.storage.insert(index, child) {
            Ok(()) => Ok(Change::new(Vec::new(), vec![index], Vec::new())),
            Err(mut child) => {
                child.detach();
                Err(child)
            }
        }
    }

    /// Append `child` after the last child.
    pub fn append(&mut self, child: Self) -> Change {
        let index = self.child_count();
        self.insert(child, index)
    }

    /// Detach and return the child at `index`.
    pub fn remove(&mut self, index: usize) -> Option<(Self, Change)> {
        let mut removed = self.storage.remove(index)?;
        removed.detach();
        Some((removed, Change::new(vec![index], Vec::new(), Vec::new())))
    }

    pub fn remove_first(&mut self) -> Option<(Self, Change)> {
        self.remove(0)
    }

    pub fn remove_last(&mut self) -> Option<(Self, Change)> {
        let last = self.child_count().checked_sub(1)?;
        self.remove(last)
    }

    /// Drop every child and turn the node into a leaf.
    pub fn remove_all(&mut self) -> Change {
        let mut removed = self.storage.remove_all();
        removed.iter_mut().for_each(Self::detach);
        Change::deletions(0..removed.len())
    }

    /// Write form of indexed access.
    ///
    /// `Some` inserts at `index`, `None` removes the child at `index`;
    /// invalid indices are ignored. The resulting change is discarded, so this
    /// is only meant for traversal code that rebuilds rows afterwards.
    pub fn set_child(&mut self, index: usize, child: Option<Self>) {
        match child {
            Some(child) => {
                let _ = self.try_insert(child, index);
            }
            None => {
                let _ = self.remove(index);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Parent links
    // -------------------------------------------------------------------------

    /// Replace the children wholesale, attaching every new child.
    fn attach_all(&mut self, children: Vec<Self>) -> Vec<Self> {
        let (id, level) = (self.id, self.level);
        let mut children = children;
        for child in &mut children {
            child.attach_to(id, level);
        }
        self.storage.replace_children(children)
    }

    fn attach_to(&mut self, parent: NodeId, parent_level: usize) {
        self.parent = Some(parent);
        self.relevel(parent_level + 1);
    }

    fn detach(&mut self) {
        self.parent = None;
        self.relevel(0);
    }

    /// Set this node's level and push the new depth down to every descendant.
    fn relevel(&mut self, level: usize) {
        if self.level == level {
            return;
        }

        let mut stack = vec![(self, level)];
        while let Some((node, level)) = stack.pop() {
            node.level = level;
            stack.extend(
                node.storage
                    .children_mut()
                    .iter_mut()
                    .map(|child| (child, level + 1)),
            );
        }
    }
}
