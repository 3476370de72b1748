//! Flat row cache and row index translation.
//!
//! Node operations report changes relative to one node's child list. A list
//! widget needs global row numbers instead, and removing or adding a single
//! expanded child hides or reveals all of its visible descendants as well.
//! [`translate`] turns a node-local [`Change`] into global rows by expanding
//! every affected child to the full run of rows it occupies.

use std::ops::Range;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::change::Change;
use crate::node::{Element, ExpandCollapseNode, NodeId};

/// One visible row of the flattened tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatRow {
    /// Id of the node shown in this row.
    pub id: NodeId,
    /// Child index path from the root to the node.
    pub path: Vec<usize>,
    /// Depth of the node (root = 0).
    pub level: usize,
}

/// Flatten the visible part of the tree under `root` into rows.
pub fn flatten<E: Element>(root: &ExpandCollapseNode<E>) -> Vec<FlatRow> {
    let mut rows = Vec::new();
    root.visit_expanded(|path, node| {
        rows.push(FlatRow {
            id: node.id(),
            path: path.to_vec(),
            level: node.level(),
        })
    });
    rows
}

/// Translate a change produced at `node` into global rows.
///
/// `row` is the node's row and `old_rows` the rows as they were before the
/// mutation. Deletions and modifications are resolved against the children
/// visible in `old_rows`; insertions against the node's current children.
/// Each affected child contributes its whole visible row range. Children of
/// a node that was collapsed before (or is collapsed after) the mutation have
/// no rows and contribute nothing.
pub fn translate<E: Element>(
    change: &Change,
    row: usize,
    old_rows: &[FlatRow],
    node: &ExpandCollapseNode<E>,
) -> Change {
    let Some(anchor) = old_rows.get(row) else {
        warn!("cannot translate change for row {} of {}", row, old_rows.len());
        return Change::empty();
    };

    let old_spans = old_child_spans(row, anchor.level, old_rows);
    let new_spans = new_child_spans(row, node);

    Change::new(
        expand(change.deletion_rows(), &old_spans, "deletion"),
        expand(change.insertion_rows(), &new_spans, "insertion"),
        expand(change.modification_rows(), &old_spans, "modification"),
    )
}

/// Row ranges of the direct children listed after `row` in `rows`.
///
/// The walk stops at the first row that is not a descendant of `row`.
fn old_child_spans(row: usize, level: usize, rows: &[FlatRow]) -> Vec<Range<usize>> {
    let mut spans: Vec<Range<usize>> = Vec::new();
    for (index, flat) in rows.iter().enumerate().skip(row + 1) {
        if flat.level <= level {
            break;
        }
        if flat.level == level + 1 {
            spans.push(index..index + 1);
        } else if let Some(last) = spans.last_mut() {
            last.end = index + 1;
        }
    }
    spans
}

/// Row ranges the node's current children occupy below `row`.
fn new_child_spans<E: Element>(row: usize, node: &ExpandCollapseNode<E>) -> Vec<Range<usize>> {
    if !node.is_expanded() {
        return Vec::new();
    }
    let mut start = row + 1;
    node.children()
        .iter()
        .map(|child| {
            let span = start..start + child.visible_row_count();
            start = span.end;
            span
        })
        .collect()
}

fn expand(local: &[usize], spans: &[Range<usize>], kind: &str) -> Vec<usize> {
    if spans.is_empty() {
        return Vec::new();
    }
    let mut rows = Vec::with_capacity(local.len());
    for &index in local {
        match spans.get(index) {
            Some(span) => rows.extend(span.clone()),
            None => warn!(
                "{} index {} has no child row (only {} children)",
                kind,
                index,
                spans.len()
            ),
        }
    }
    rows
}
