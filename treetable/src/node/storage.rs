//! Leaf/branch storage for a tree node.

use super::{Element, ExpandCollapseNode};

/// The element of a node plus its ordered children, if any.
///
/// A `Branch` never holds an empty child list. Every edit goes through
/// [`NodeStorage::from_parts`] or [`NodeStorage::edit_children`], which
/// re-derive the variant from the child count after the edit.
#[derive(Debug)]
pub enum NodeStorage<E: Element> {
    /// A node without children.
    Leaf(E),
    /// A node with at least one child.
    Branch(E, Vec<ExpandCollapseNode<E>>),
}

impl<E: Element> NodeStorage<E> {
    /// Builds storage from an element and a child list of any length.
    pub fn from_parts(element: E, children: Vec<ExpandCollapseNode<E>>) -> Self {
        if children.is_empty() {
            Self::Leaf(element)
        } else {
            Self::Branch(element, children)
        }
    }

    /// Splits the storage back into its element and children.
    pub fn into_parts(self) -> (E, Vec<ExpandCollapseNode<E>>) {
        match self {
            Self::Leaf(element) => (element, Vec::new()),
            Self::Branch(element, children) => (element, children),
        }
    }

    pub fn element(&self) -> &E {
        match self {
            Self::Leaf(element) | Self::Branch(element, _) => element,
        }
    }

    /// Children in order; empty for a leaf.
    pub fn children(&self) -> &[ExpandCollapseNode<E>] {
        match self {
            Self::Leaf(_) => &[],
            Self::Branch(_, children) => children,
        }
    }

    pub(crate) fn children_mut(&mut self) -> &mut [ExpandCollapseNode<E>] {
        match self {
            Self::Leaf(_) => &mut [],
            Self::Branch(_, children) => children,
        }
    }

    pub fn child_count(&self) -> usize {
        self.children().len()
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// Runs `edit` against the child list and fixes up the variant afterwards.
    ///
    /// The element is only cloned when the edit switches between leaf and
    /// branch.
    pub(crate) fn edit_children<R>(
        &mut self,
        edit: impl FnOnce(&mut Vec<ExpandCollapseNode<E>>) -> R,
    ) -> R {
        let result = match self {
            Self::Branch(_, children) => edit(children),
            Self::Leaf(element) => {
                let mut children = Vec::new();
                let result = edit(&mut children);
                if !children.is_empty() {
                    *self = Self::Branch(element.clone(), children);
                }
                return result;
            }
        };

        if let Self::Branch(element, children) = self
            && children.is_empty()
        {
            *self = Self::Leaf(element.clone());
        }
        result
    }

    /// Inserts at `index`, handing the node back if `index > child_count`.
    pub(crate) fn insert(
        &mut self,
        index: usize,
        node: ExpandCollapseNode<E>,
    ) -> Result<(), ExpandCollapseNode<E>> {
        if index > self.child_count() {
            return Err(node);
        }
        self.edit_children(|children| children.insert(index, node));
        Ok(())
    }

    pub(crate) fn remove(&mut self, index: usize) -> Option<ExpandCollapseNode<E>> {
        if index >= self.child_count() {
            return None;
        }
        Some(self.edit_children(|children| children.remove(index)))
    }

    pub(crate) fn remove_all(&mut self) -> Vec<ExpandCollapseNode<E>> {
        self.edit_children(std::mem::take)
    }

    /// Replaces the whole child list, returning the previous one.
    pub(crate) fn replace_children(
        &mut self,
        children: Vec<ExpandCollapseNode<E>>,
    ) -> Vec<ExpandCollapseNode<E>> {
        self.edit_children(|current| std::mem::replace(current, children))
    }
}
