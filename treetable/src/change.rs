//! Row-level change descriptions.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Row deletions, insertions and modifications produced by one mutation.
///
/// Indices are local to a node's child sequence when returned from
/// [`ExpandCollapseNode`](crate::node::ExpandCollapseNode) operations, and
/// global table rows once translated by [`rows::translate`](crate::rows::translate).
/// Each sequence is ascending in the order it was produced.
///
/// # Example
///
/// ```
/// use treetable::Change;
///
/// let change = Change::insertions(0..3);
/// assert_eq!(change.insertion_rows(), &[0, 1, 2]);
/// assert!(!change.is_empty());
/// assert!(Change::empty().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    deletions: Vec<usize>,
    insertions: Vec<usize>,
    modifications: Vec<usize>,
}

impl Change {
    /// Creates a change from its three row sequences.
    pub fn new(deletions: Vec<usize>, insertions: Vec<usize>, modifications: Vec<usize>) -> Self {
        Self {
            deletions,
            insertions,
            modifications,
        }
    }

    /// The change that affects no rows.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a change that only inserts `rows`.
    pub fn insertions(rows: Range<usize>) -> Self {
        Self {
            insertions: rows.collect(),
            ..Default::default()
        }
    }

    /// Creates a change that only deletes `rows`.
    pub fn deletions(rows: Range<usize>) -> Self {
        Self {
            deletions: rows.collect(),
            ..Default::default()
        }
    }

    /// Rows removed from the presentation.
    pub fn deletion_rows(&self) -> &[usize] {
        &self.deletions
    }

    /// Rows added to the presentation.
    pub fn insertion_rows(&self) -> &[usize] {
        &self.insertions
    }

    /// Rows whose content should be reloaded in place.
    pub fn modification_rows(&self) -> &[usize] {
        &self.modifications
    }

    /// Returns `true` if no row is affected.
    pub fn is_empty(&self) -> bool {
        self.deletions.is_empty() && self.insertions.is_empty() && self.modifications.is_empty()
    }

    /// Concatenates the row sequences of two changes.
    ///
    /// The empty change is the identity on both sides.
    pub fn merge(self, other: Change) -> Change {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }

        let Change {
            mut deletions,
            mut insertions,
            mut modifications,
        } = self;
        deletions.extend(other.deletions);
        insertions.extend(other.insertions);
        modifications.extend(other.modifications);

        Change {
            deletions,
            insertions,
            modifications,
        }
    }

    /// Splits the change into `(deletions, insertions, modifications)`.
    pub fn into_parts(self) -> (Vec<usize>, Vec<usize>, Vec<usize>) {
        (self.deletions, self.insertions, self.modifications)
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "delete {:?}, insert {:?}, modify {:?}",
            self.deletions, self.insertions, self.modifications
        )
    }
}
