use treetable::{Change, ExpandCollapseNode, ExpandState};

type Node = ExpandCollapseNode<u32>;

fn leaves(elements: &[u32]) -> Vec<Node> {
    elements.iter().copied().map(Node::new).collect()
}

fn child_elements(node: &Node) -> Vec<u32> {
    node.children().iter().map(|child| *child.element()).collect()
}

fn assert_attached(node: &Node) {
    for child in node.children() {
        assert_eq!(child.parent(), Some(node.id()), "parent of {}", child.element());
        assert_eq!(child.level(), node.level() + 1, "level of {}", child.element());
        assert_attached(child);
    }
}

// ============================================================================
// Leaf / Branch
// ============================================================================

#[test]
fn test_new_node_is_collapsed_leaf() {
    let node = Node::new(1);
    assert_eq!(node.state(), ExpandState::Collapse);
    assert!(node.storage().is_leaf());
    assert_eq!(node.child_count(), 0);
    assert_eq!(node.level(), 0);
    assert_eq!(node.parent(), None);
}

#[test]
fn test_with_empty_children_is_leaf() {
    let node = Node::with_children(1, Vec::new(), ExpandState::Expand);
    assert!(node.storage().is_leaf());
    assert_eq!(node.visible_row_count(), 1);
}

#[test]
fn test_removing_every_child_returns_to_leaf() {
    let mut node = Node::with_children(1, leaves(&[10, 11, 12]), ExpandState::Expand);

    while node.remove_last().is_some() {
        assert_eq!(node.storage().is_leaf(), node.child_count() == 0);
    }

    assert!(node.storage().is_leaf());
    assert_eq!(node.child_count(), 0);
    assert!(node.child(0).is_none());
    assert!(node.remove_first().is_none());
    assert_eq!(node.update_state(ExpandState::Collapse), Change::empty());
    assert_eq!(node.visible_row_count(), 1);
}

// ============================================================================
// Insert / Append / Remove
// ============================================================================

#[test]
fn test_insert_reports_local_index() {
    let mut node = Node::with_children(1, leaves(&[10, 12]), ExpandState::Expand);

    let change = node.insert(Node::new(11), 1);
    assert_eq!(change.insertion_rows(), &[1]);
    assert_eq!(child_elements(&node), vec![10, 11, 12]);
    assert_attached(&node);
}

#[test]
fn test_insert_at_end_is_allowed() {
    let mut node = Node::new(1);
    assert_eq!(node.insert(Node::new(10), 0).insertion_rows(), &[0]);
    assert_eq!(node.insert(Node::new(11), 1).insertion_rows(), &[1]);
    assert_eq!(child_elements(&node), vec![10, 11]);
}

#[test]
fn test_insert_out_of_range_is_noop() {
    let mut node = Node::with_children(1, leaves(&[10]), ExpandState::Expand);

    assert!(node.insert(Node::new(11), 2).is_empty());
    assert_eq!(child_elements(&node), vec![10]);

    let rejected = node.try_insert(Node::new(12), 5).unwrap_err();
    assert_eq!(*rejected.element(), 12);
    assert_eq!(rejected.parent(), None);
    assert_eq!(rejected.level(), 0);
}

#[test]
fn test_append_reports_last_index() {
    let mut node = Node::new(1);
    assert_eq!(node.append(Node::new(10)).insertion_rows(), &[0]);
    assert_eq!(node.append(Node::new(11)).insertion_rows(), &[1]);
    assert_attached(&node);
}

#[test]
fn test_remove_detaches_child() {
    let grandchild = Node::new(100);
    let child = Node::with_children(10, vec![grandchild], ExpandState::Expand);
    let mut node = Node::with_children(1, vec![child, Node::new(11)], ExpandState::Expand);

    let (removed, change) = node.remove(0).unwrap();
    assert_eq!(change.deletion_rows(), &[0]);
    assert_eq!(*removed.element(), 10);
    assert_eq!(removed.parent(), None);
    assert_eq!(removed.level(), 0);
    assert_eq!(removed.child(0).map(|c| c.level()), Some(1));
    assert_eq!(child_elements(&node), vec![11]);
}

#[test]
fn test_remove_invalid_index() {
    let mut node = Node::with_children(1, leaves(&[10]), ExpandState::Expand);
    assert!(node.remove(1).is_none());
    assert!(Node::new(2).remove(0).is_none());
    assert!(Node::new(2).remove_last().is_none());
}

#[test]
fn test_remove_first_and_last() {
    let mut node = Node::with_children(1, leaves(&[10, 11, 12]), ExpandState::Expand);

    let (first, change) = node.remove_first().unwrap();
    assert_eq!(*first.element(), 10);
    assert_eq!(change.deletion_rows(), &[0]);

    let (last, change) = node.remove_last().unwrap();
    assert_eq!(*last.element(), 12);
    assert_eq!(change.deletion_rows(), &[1]);

    assert_eq!(child_elements(&node), vec![11]);
}

#[test]
fn test_remove_all() {
    let mut node = Node::with_children(1, leaves(&[10, 11, 12]), ExpandState::Expand);
    let change = node.remove_all();

    assert_eq!(change.deletion_rows(), &[0, 1, 2]);
    assert!(node.storage().is_leaf());
    assert!(node.remove_all().is_empty());
}

#[test]
fn test_set_child_without_change() {
    let mut node = Node::with_children(1, leaves(&[10]), ExpandState::Expand);

    node.set_child(1, Some(Node::new(11)));
    assert_eq!(child_elements(&node), vec![10, 11]);
    assert_attached(&node);

    node.set_child(0, None);
    assert_eq!(child_elements(&node), vec![11]);

    node.set_child(7, Some(Node::new(99)));
    node.set_child(7, None);
    assert_eq!(child_elements(&node), vec![11]);
}

// ============================================================================
// State
// ============================================================================

#[test]
fn test_update_state_on_leaf_still_stores_state() {
    let mut node = Node::new(1);
    assert!(node.update_state(ExpandState::Expand).is_empty());
    assert_eq!(node.state(), ExpandState::Expand);
}

#[test]
fn test_update_state_rows() {
    let mut node = Node::with_children(1, leaves(&[10, 11, 12]), ExpandState::Collapse);

    let expand = node.update_state(ExpandState::Expand);
    assert_eq!(expand.insertion_rows(), &[0, 1, 2]);
    assert!(expand.deletion_rows().is_empty());

    let collapse = node.update_state(ExpandState::Collapse);
    assert_eq!(collapse.deletion_rows(), &[0, 1, 2]);
    assert!(collapse.insertion_rows().is_empty());
}

#[test]
fn test_visible_row_count() {
    let inner = Node::with_children(11, leaves(&[110, 111]), ExpandState::Expand);
    let mut node = Node::with_children(1, vec![Node::new(10), inner], ExpandState::Collapse);

    assert_eq!(node.visible_row_count(), 1);

    node.update_state(ExpandState::Expand);
    assert_eq!(node.visible_row_count(), 1 + 1 + 3);

    node.child_mut(1).unwrap().update_state(ExpandState::Collapse);
    assert_eq!(node.visible_row_count(), 3);
}

// ============================================================================
// Levels
// ============================================================================

#[test]
fn test_reparenting_updates_descendant_levels() {
    let deep = Node::with_children(
        2,
        vec![Node::with_children(3, leaves(&[4]), ExpandState::Collapse)],
        ExpandState::Collapse,
    );
    let mut root = Node::with_children(0, vec![Node::with_children(1, vec![deep], ExpandState::Expand)], ExpandState::Expand);

    let subtree = Node::with_children(
        50,
        vec![Node::with_children(51, leaves(&[52]), ExpandState::Collapse)],
        ExpandState::Collapse,
    );
    assert_eq!(subtree.node_at(&[0, 0]).map(|n| n.level()), Some(2));

    let target = root.node_at_mut(&[0, 0, 0]).unwrap();
    assert_eq!(target.level(), 3);
    target.append(subtree);

    assert_eq!(root.node_at(&[0, 0, 0, 1]).map(|n| n.level()), Some(4));
    assert_eq!(root.node_at(&[0, 0, 0, 1, 0]).map(|n| n.level()), Some(5));
    assert_eq!(root.node_at(&[0, 0, 0, 1, 0, 0]).map(|n| n.level()), Some(6));
    assert_attached(&root);

    let (detached, _) = root.node_at_mut(&[0, 0, 0]).unwrap().remove(1).unwrap();
    assert_eq!(detached.level(), 0);
    assert_eq!(detached.node_at(&[0, 0]).map(|n| n.level()), Some(2));
    assert_attached(&detached);
}

#[test]
fn test_node_ids_are_unique() {
    let a = Node::new(1);
    let b = Node::new(1);
    assert_ne!(a.id(), b.id());
    assert_ne!(a.id().to_string(), b.id().to_string());
}
