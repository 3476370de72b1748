//! Pre-order flattening of a node tree.

use super::{Element, ExpandCollapseNode};

impl<E: Element> ExpandCollapseNode<E> {
    /// Every node of the subtree in pre-order, ignoring expand state.
    pub fn total_nodes(&self) -> Vec<&Self> {
        let mut nodes = Vec::new();
        self.walk(false, |_, node| nodes.push(node));
        nodes
    }

    /// The nodes currently visible in the flat presentation, in row order.
    ///
    /// A collapsed node is listed but its subtree is skipped.
    pub fn expand_nodes(&self) -> Vec<&Self> {
        let mut nodes = Vec::new();
        self.walk(true, |_, node| nodes.push(node));
        nodes
    }

    /// Visit the visible nodes in row order together with their child index
    /// path from `self`.
    pub fn visit_expanded<'a>(&'a self, visit: impl FnMut(&[usize], &'a Self)) {
        self.walk(true, visit);
    }

    /// Iterative depth-first walk with an explicit stack of
    /// `(node, next child index)` frames.
    fn walk<'a>(&'a self, only_expanded: bool, mut visit: impl FnMut(&[usize], &'a Self)) {
        let descend = |node: &Self| node.has_children() && (!only_expanded || node.is_expanded());

        let mut path: Vec<usize> = Vec::new();
        let mut stack: Vec<(&'a Self, usize)> = Vec::new();

        visit(&path, self);
        if descend(self) {
            stack.push((self, 0));
        }

        while let Some(frame) = stack.last_mut() {
            let (node, index) = *frame;
            frame.1 += 1;

            match node.child(index) {
                Some(child) => {
                    path.push(index);
                    visit(&path, child);
                    if descend(child) {
                        stack.push((child, 0));
                    } else {
                        path.pop();
                    }
                }
                None => {
                    stack.pop();
                    path.pop();
                }
            }
        }
    }
}
