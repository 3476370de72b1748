//! Child list reconciliation.

use std::collections::{HashMap, HashSet, VecDeque};

use log::{debug, error};

use super::{Element, ExpandCollapseNode, NodeStorage};
use crate::change::Change;
use crate::error::TreeError;

impl<E: Element> ExpandCollapseNode<E> {
    /// Replace this node's children with `children`.
    ///
    /// Old and new children are matched by element. Old children whose
    /// element is gone are deletions (old positions), new elements are
    /// insertions (new positions), and elements present on both sides are
    /// modifications (old positions). A modified child keeps its id, expand
    /// state and children from the old tree and takes the element from the
    /// new list.
    ///
    /// While the node is collapsed nothing is visible, so the change is empty
    /// and the new children are taken as they are.
    ///
    /// The children are always replaced and attached. Elements must be unique
    /// among `children`; duplicated elements can leave an old modified child
    /// without a partner, which is reported as
    /// [`TreeError::UnmatchedModification`] after the replacement.
    pub fn update(&mut self, children: Vec<Self>) -> Result<Change, TreeError> {
        if !self.is_expanded() {
            self.attach_all(children);
            return Ok(Change::empty());
        }

        let old = self.attach_all(Vec::new());
        if old.is_empty() {
            let change = Change::insertions(0..children.len());
            self.attach_all(children);
            return Ok(change);
        }
        if children.is_empty() {
            return Ok(Change::deletions(0..old.len()));
        }

        let Reconciled {
            children,
            change,
            unmatched,
        } = reconcile(old, children);
        debug!("reconciled children of {}: {}", self.id, change);
        self.attach_all(children);

        match unmatched {
            Some(position) => Err(TreeError::UnmatchedModification { position }),
            None => Ok(change),
        }
    }

    /// Move this node's id, state and subtree onto `replacement`'s element.
    fn carry_onto(mut self, replacement: Self) -> Self {
        let children = self.storage.remove_all();
        Self {
            id: self.id,
            storage: NodeStorage::from_parts(replacement.into_element(), children),
            state: self.state,
            parent: None,
            level: 0,
        }
    }
}

struct Reconciled<E: Element> {
    children: Vec<ExpandCollapseNode<E>>,
    change: Change,
    unmatched: Option<usize>,
}

fn reconcile<E: Element>(
    old: Vec<ExpandCollapseNode<E>>,
    new: Vec<ExpandCollapseNode<E>>,
) -> Reconciled<E> {
    let mut deletions = Vec::new();
    let mut insertions = Vec::new();
    let mut modifications = Vec::new();
    let mut matches: HashMap<usize, usize> = HashMap::new();
    let mut unmatched = None;

    {
        let old_keys: HashSet<&E> = old.iter().map(|node| node.element()).collect();
        let new_keys: HashSet<&E> = new.iter().map(|node| node.element()).collect();

        for (position, node) in old.iter().enumerate() {
            if new_keys.contains(node.element()) {
                modifications.push(position);
            } else {
                deletions.push(position);
            }
        }

        // New-side positions of shared elements, queued per element in scan
        // order so each old child takes the first unclaimed match.
        let mut pending: HashMap<&E, VecDeque<usize>> = HashMap::new();
        for (position, node) in new.iter().enumerate() {
            if old_keys.contains(node.element()) {
                pending.entry(node.element()).or_default().push_back(position);
            } else {
                insertions.push(position);
            }
        }

        for &old_position in &modifications {
            let element = old[old_position].element();
            match pending.get_mut(element).and_then(VecDeque::pop_front) {
                Some(new_position) => {
                    matches.insert(old_position, new_position);
                }
                None => {
                    error!(
                        "modified child {:?} at old position {} has no partner in the new children",
                        element, old_position
                    );
                    unmatched = unmatched.or(Some(old_position));
                }
            }
        }
    }

    let mut carried: HashMap<usize, ExpandCollapseNode<E>> = HashMap::with_capacity(matches.len());
    for (old_position, node) in old.into_iter().enumerate() {
        if let Some(&new_position) = matches.get(&old_position) {
            carried.insert(new_position, node);
        }
    }

    let children = new
        .into_iter()
        .enumerate()
        .map(|(position, node)| match carried.remove(&position) {
            Some(previous) => previous.carry_onto(node),
            None => node,
        })
        .collect();

    Reconciled {
        children,
        change: Change::new(deletions, insertions, modifications),
        unmatched,
    }
}
