use treetable::rows::{self, FlatRow};
use treetable::{Change, ExpandCollapseNode, ExpandState};

type Node = ExpandCollapseNode<u32>;

fn leaves(elements: &[u32]) -> Vec<Node> {
    elements.iter().copied().map(Node::new).collect()
}

fn levels(rows: &[FlatRow]) -> Vec<usize> {
    rows.iter().map(|row| row.level).collect()
}

fn visible(root: &Node) -> Vec<u32> {
    root.expand_nodes().iter().map(|node| *node.element()).collect()
}

/// Apply `mutate` to the node at `row` and translate its change.
fn mutate_row(root: &mut Node, row: usize, mutate: impl FnOnce(&mut Node) -> Change) -> Change {
    let old_rows = rows::flatten(root);
    let node = root.node_at_mut(&old_rows[row].path).unwrap();
    let local = mutate(node);
    rows::translate(&local, row, &old_rows, node)
}

// ============================================================================
// Flattening
// ============================================================================

#[test]
fn test_flatten_records_paths_and_levels() {
    let inner = Node::with_children(11, leaves(&[110, 111]), ExpandState::Expand);
    let root = Node::with_children(0, vec![Node::new(10), inner, Node::new(12)], ExpandState::Expand);

    let rows = rows::flatten(&root);

    assert_eq!(levels(&rows), vec![0, 1, 1, 2, 2, 1]);
    assert_eq!(rows[3].path, vec![1, 0]);
    assert_eq!(rows[5].path, vec![2]);
    assert_eq!(rows[0].id, root.id());
    for row in &rows {
        assert_eq!(root.node_at(&row.path).map(|n| n.id()), Some(row.id));
    }
}

// ============================================================================
// Translation
// ============================================================================

#[test]
fn test_expand_root_then_child() {
    let mut root = Node::with_children(0, leaves(&[10, 11, 12]), ExpandState::Collapse);

    let change = mutate_row(&mut root, 0, |node| node.update_state(ExpandState::Expand));
    assert_eq!(change.insertion_rows(), &[1, 2, 3]);

    let change = mutate_row(&mut root, 2, |node| {
        node.update_state(ExpandState::Expand);
        node.update(leaves(&[110, 111])).unwrap()
    });
    assert_eq!(change.insertion_rows(), &[3, 4]);
    assert_eq!(visible(&root), vec![0, 10, 11, 110, 111, 12]);
}

#[test]
fn test_expand_then_collapse_is_symmetric() {
    // 11 stays expanded while its parent is collapsed.
    let inner = Node::with_children(11, leaves(&[110, 111]), ExpandState::Expand);
    let mid = Node::with_children(1, vec![Node::new(10), inner, Node::new(12)], ExpandState::Collapse);
    let mut root = Node::with_children(0, vec![mid, Node::new(2)], ExpandState::Expand);

    let expand = mutate_row(&mut root, 1, |node| node.update_state(ExpandState::Expand));
    assert_eq!(expand.insertion_rows(), &[2, 3, 4, 5, 6]);
    assert_eq!(visible(&root), vec![0, 1, 10, 11, 110, 111, 12, 2]);

    let collapse = mutate_row(&mut root, 1, |node| node.update_state(ExpandState::Collapse));
    assert_eq!(collapse.deletion_rows(), expand.insertion_rows());
    assert_eq!(visible(&root), vec![0, 1, 2]);
}

#[test]
fn test_delete_expanded_child_removes_its_rows() {
    let inner = Node::with_children(11, leaves(&[110, 111]), ExpandState::Expand);
    let mut root = Node::with_children(0, vec![Node::new(10), inner, Node::new(12)], ExpandState::Expand);

    let change = mutate_row(&mut root, 0, |node| node.update(leaves(&[10, 12, 13])).unwrap());

    assert_eq!(change.deletion_rows(), &[2, 3, 4]);
    assert_eq!(change.modification_rows(), &[1, 5]);
    assert_eq!(change.insertion_rows(), &[3]);
    assert_eq!(visible(&root), vec![0, 10, 12, 13]);
}

#[test]
fn test_modified_child_keeps_rows_on_refresh() {
    let inner = Node::with_children(11, leaves(&[110, 111]), ExpandState::Expand);
    let mut root = Node::with_children(0, vec![Node::new(10), inner, Node::new(12)], ExpandState::Expand);

    let change = mutate_row(&mut root, 0, |node| node.update(leaves(&[11, 12, 13])).unwrap());

    assert_eq!(change.deletion_rows(), &[1]);
    assert_eq!(change.modification_rows(), &[2, 3, 4, 5]);
    assert_eq!(change.insertion_rows(), &[5]);
    assert_eq!(visible(&root), vec![0, 11, 110, 111, 12, 13]);
}

#[test]
fn test_last_child_stops_at_parent_sibling() {
    let inner = Node::with_children(11, leaves(&[110]), ExpandState::Expand);
    let mid = Node::with_children(1, vec![Node::new(10), inner], ExpandState::Expand);
    let twenty = Node::with_children(20, leaves(&[200]), ExpandState::Expand);
    let tail = Node::with_children(2, vec![twenty], ExpandState::Expand);
    let mut root = Node::with_children(0, vec![mid, tail], ExpandState::Expand);
    assert_eq!(visible(&root), vec![0, 1, 10, 11, 110, 2, 20, 200]);

    // 11 is the last child of 1; its rows end where 2 starts.
    let change = mutate_row(&mut root, 3, |node| node.update(leaves(&[110, 111])).unwrap());

    assert_eq!(change.modification_rows(), &[4]);
    assert_eq!(change.insertion_rows(), &[5]);
    assert_eq!(visible(&root), vec![0, 1, 10, 11, 110, 111, 2, 20, 200]);
}

#[test]
fn test_mutating_collapsed_node_shows_no_rows() {
    let mut root = Node::with_children(0, leaves(&[10, 11]), ExpandState::Expand);

    let change = mutate_row(&mut root, 1, |node| node.append(Node::new(100)));
    assert!(change.is_empty(), "{change}");

    let change = mutate_row(&mut root, 1, |node| node.remove_last().unwrap().1);
    assert!(change.is_empty(), "{change}");
    assert_eq!(visible(&root), vec![0, 10, 11]);
}

#[test]
fn test_insert_into_expanded_node_counts_visible_siblings() {
    let inner = Node::with_children(11, leaves(&[110, 111]), ExpandState::Expand);
    let mut root = Node::with_children(0, vec![Node::new(10), inner], ExpandState::Expand);

    let change = mutate_row(&mut root, 0, |node| node.append(Node::new(12)));

    assert_eq!(change.insertion_rows(), &[5]);
    assert_eq!(visible(&root), vec![0, 10, 11, 110, 111, 12]);
}

#[test]
fn test_translate_unknown_row() {
    let root = Node::new(0);
    let rows = rows::flatten(&root);
    let change = rows::translate(&Change::insertions(0..1), 4, &rows, &root);
    assert!(change.is_empty());
}
