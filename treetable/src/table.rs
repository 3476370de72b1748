//! Row-oriented data source over an expand/collapse tree.
//!
//! [`ExpandTable`] is what a list widget binds to: it answers row count and
//! per-row lookups from a cached flat row list, toggles nodes on selection,
//! applies asynchronously fetched children, and sends every resulting
//! row-level [`Change`] to a single consumer channel in commit order.
//!
//! # Example
//!
//! ```
//! use treetable::{ExpandCollapseNode, ExpandTable, SelectOutcome, TableConfig};
//!
//! let root = ExpandCollapseNode::with_children(
//!     0,
//!     vec![ExpandCollapseNode::new(10), ExpandCollapseNode::new(11)],
//!     Default::default(),
//! );
//! let (table, mut changes) = ExpandTable::new(root, TableConfig::default());
//! assert_eq!(table.row_count(), 1);
//!
//! let SelectOutcome::Toggled { change, .. } = table.select_row(0) else {
//!     panic!("row 0 exists and nothing else is running");
//! };
//! assert_eq!(change.insertion_rows(), &[1, 2]);
//! assert_eq!(changes.try_recv().unwrap(), change);
//! assert_eq!(table.elements(), vec![0, 10, 11]);
//! ```

use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use log::{debug, error, trace, warn};
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::change::Change;
use crate::config::TableConfig;
use crate::coordinator::RefreshCoordinator;
use crate::error::{TableError, TreeError};
use crate::node::{Element, ExpandCollapseNode, ExpandState, NodeId};
use crate::provider::ChildProvider;
use crate::rows::{self, FlatRow};

/// Receiving end for the changes committed by an [`ExpandTable`].
pub type ChangeReceiver = mpsc::UnboundedReceiver<Change>;

/// Result of [`ExpandTable::select_row`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The node was toggled into `state`; `change` is in global rows.
    Toggled { state: ExpandState, change: Change },
    /// Another operator was running; the selection was dropped.
    Busy,
    /// No row at that index.
    NoSuchRow,
}

/// Result of [`ExpandTable::apply_refresh_result`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The children were replaced; the change is in global rows.
    Applied(Change),
    /// The row no longer shows the node the children were fetched for.
    Stale,
    /// Another operator was still running after the retry.
    Busy,
}

struct TableState<E: Element> {
    root: ExpandCollapseNode<E>,
    rows: Vec<FlatRow>,
}

impl<E: Element> TableState<E> {
    fn node(&self, row: usize) -> Option<&ExpandCollapseNode<E>> {
        self.rows
            .get(row)
            .and_then(|flat| self.root.node_at(&flat.path))
    }

    fn refresh_rows(&mut self) {
        self.rows = rows::flatten(&self.root);
        trace!(
            "rows: {:?}",
            self.root
                .expand_nodes()
                .iter()
                .map(|node| node.element())
                .collect::<Vec<_>>()
        );
    }
}

struct TableInner<E: Element> {
    state: RwLock<TableState<E>>,
    coordinator: RefreshCoordinator,
    changes: mpsc::UnboundedSender<Change>,
    provider: Option<Arc<dyn ChildProvider<E>>>,
    config: TableConfig,
}

/// Flat, row-addressed view of an [`ExpandCollapseNode`] tree.
///
/// Cheap to clone; clones share the same tree. Only the holder of the
/// table's single operator lease mutates the tree, so at most one selection
/// or refresh is being applied at any time.
pub struct ExpandTable<E: Element> {
    inner: Arc<TableInner<E>>,
}

impl<E: Element> Clone for ExpandTable<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: Element> ExpandTable<E> {
    /// Create a table without a child provider.
    pub fn new(root: ExpandCollapseNode<E>, config: TableConfig) -> (Self, ChangeReceiver) {
        Self::build(root, config, None)
    }

    /// Create a table that fetches children from `provider` on expand.
    pub fn with_provider(
        root: ExpandCollapseNode<E>,
        config: TableConfig,
        provider: impl ChildProvider<E> + 'static,
    ) -> (Self, ChangeReceiver) {
        Self::build(root, config, Some(Arc::new(provider)))
    }

    fn build(
        root: ExpandCollapseNode<E>,
        config: TableConfig,
        provider: Option<Arc<dyn ChildProvider<E>>>,
    ) -> (Self, ChangeReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = TableState {
            root,
            rows: Vec::new(),
        };
        state.refresh_rows();

        let table = Self {
            inner: Arc::new(TableInner {
                state: RwLock::new(state),
                coordinator: RefreshCoordinator::new(),
                changes: tx,
                provider,
                config,
            }),
        };
        (table, rx)
    }

    pub fn config(&self) -> &TableConfig {
        &self.inner.config
    }

    // -------------------------------------------------------------------------
    // Row access
    // -------------------------------------------------------------------------

    /// Number of visible rows.
    pub fn row_count(&self) -> usize {
        self.inner.state.read().map(|g| g.rows.len()).unwrap_or(0)
    }

    /// Element shown at `row`.
    pub fn element(&self, row: usize) -> Option<E> {
        self.inner
            .state
            .read()
            .ok()
            .and_then(|g| g.node(row).map(|node| node.element().clone()))
    }

    /// Depth of the node shown at `row`.
    pub fn level(&self, row: usize) -> Option<usize> {
        self.inner
            .state
            .read()
            .ok()
            .and_then(|g| g.rows.get(row).map(|flat| flat.level))
    }

    /// Id of the node shown at `row`.
    pub fn node_id(&self, row: usize) -> Option<NodeId> {
        self.inner
            .state
            .read()
            .ok()
            .and_then(|g| g.rows.get(row).map(|flat| flat.id))
    }

    /// Expand state of the node shown at `row`.
    pub fn state(&self, row: usize) -> Option<ExpandState> {
        self.inner
            .state
            .read()
            .ok()
            .and_then(|g| g.node(row).map(|node| node.state()))
    }

    /// Snapshot of the visible rows.
    pub fn rows(&self) -> Vec<FlatRow> {
        self.inner
            .state
            .read()
            .map(|g| g.rows.clone())
            .unwrap_or_default()
    }

    /// Snapshot of the visible elements in row order.
    pub fn elements(&self) -> Vec<E> {
        self.inner
            .state
            .read()
            .map(|g| {
                g.root
                    .expand_nodes()
                    .into_iter()
                    .map(|node| node.element().clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns `true` if an operator currently holds the table.
    pub fn is_busy(&self) -> bool {
        self.inner.coordinator.is_busy()
    }

    /// The coordinator serializing this table's operators.
    ///
    /// Holding one of its leases keeps selections and refreshes out.
    pub fn coordinator(&self) -> &RefreshCoordinator {
        &self.inner.coordinator
    }

    // -------------------------------------------------------------------------
    // Operators
    // -------------------------------------------------------------------------

    /// Toggle the node at `row` between expanded and collapsed.
    ///
    /// Dropped without effect if another operator is running. Expanding a
    /// node also starts a child fetch when a provider is attached and
    /// [`TableConfig::refresh_after_expand`] is set; the fetch runs on the
    /// current Tokio runtime.
    pub fn select_row(&self, row: usize) -> SelectOutcome {
        let Some(lease) = self.inner.coordinator.acquire() else {
            debug!("select row {} dropped: table busy", row);
            return SelectOutcome::Busy;
        };
        debug!("select row {} under operator {}", row, lease.id());

        let mut guard = self.write_state();
        let state = &mut *guard;
        let Some(path) = state.rows.get(row).map(|flat| flat.path.clone()) else {
            debug!("select row {} of {}: no such row", row, state.rows.len());
            return SelectOutcome::NoSuchRow;
        };
        let Some(node) = state.root.node_at_mut(&path) else {
            error!("row {} points at missing path {:?}", row, path);
            return SelectOutcome::NoSuchRow;
        };

        let next = node.state().toggled();
        let local = node.update_state(next);
        let change = rows::translate(&local, row, &state.rows, node);
        let refresh = (next == ExpandState::Expand && self.inner.config.refresh_after_expand)
            .then(|| (node.id(), node.element().clone()));
        debug!("row {} -> {:?}: {}", row, next, change);

        state.refresh_rows();
        self.deliver(&change);
        drop(guard);
        drop(lease);

        if let Some((id, element)) = refresh {
            self.spawn_refresh(row, id, element);
        }
        SelectOutcome::Toggled {
            state: next,
            change,
        }
    }

    /// Fetch fresh children for the node at `row` from the provider.
    ///
    /// Returns `false` if there is no provider, no such row, or no Tokio
    /// runtime to run the fetch on.
    pub fn request_refresh(&self, row: usize) -> bool {
        let target = self.inner.state.read().ok().and_then(|g| {
            g.node(row)
                .map(|node| (node.id(), node.element().clone()))
        });
        match target {
            Some((id, element)) => self.spawn_refresh(row, id, element),
            None => false,
        }
    }

    /// Replace the children of the node at `row` with `elements`.
    ///
    /// `node_id` must still be the id of the node at `row`, otherwise the
    /// result is stale and dropped. If another operator is running the call
    /// waits [`TableConfig::retry_delay`] and tries once more.
    pub async fn apply_refresh_result(
        &self,
        row: usize,
        node_id: NodeId,
        elements: Vec<E>,
    ) -> Result<RefreshOutcome, TableError> {
        let retry_delay = self.inner.config.retry_delay;
        let Some(lease) = self.inner.coordinator.acquire_with_retry(retry_delay).await else {
            warn!("refresh of row {} dropped: table still busy after retry", row);
            return Ok(RefreshOutcome::Busy);
        };
        debug!(
            "apply {} children to row {} under operator {}",
            elements.len(),
            row,
            lease.id()
        );

        let outcome = self.commit_refresh(row, node_id, elements);
        drop(lease);
        outcome.map_err(TableError::from)
    }

    fn commit_refresh(
        &self,
        row: usize,
        node_id: NodeId,
        elements: Vec<E>,
    ) -> Result<RefreshOutcome, TreeError> {
        let mut guard = self.write_state();
        let state = &mut *guard;

        let path = match state.rows.get(row) {
            Some(flat) if flat.id == node_id => flat.path.clone(),
            Some(flat) => {
                debug!("stale refresh for row {}: {} is now {}", row, node_id, flat.id);
                return Ok(RefreshOutcome::Stale);
            }
            None => {
                debug!("stale refresh for row {}: row is gone", row);
                return Ok(RefreshOutcome::Stale);
            }
        };
        let Some(node) = state.root.node_at_mut(&path) else {
            error!("row {} points at missing path {:?}", row, path);
            return Ok(RefreshOutcome::Stale);
        };

        let children = elements.into_iter().map(ExpandCollapseNode::new).collect();
        let updated = node.update(children);
        let change = match &updated {
            Ok(local) => rows::translate(local, row, &state.rows, node),
            Err(_) => Change::empty(),
        };
        state.refresh_rows();

        match updated {
            Ok(_) => {
                debug!("refresh of row {}: {}", row, change);
                self.deliver(&change);
                Ok(RefreshOutcome::Applied(change))
            }
            Err(err) => {
                error!("refresh of row {} left the rows inconsistent: {}", row, err);
                Err(err)
            }
        }
    }

    fn spawn_refresh(&self, row: usize, id: NodeId, element: E) -> bool {
        let Some(provider) = self.inner.provider.clone() else {
            return false;
        };
        let Ok(handle) = Handle::try_current() else {
            warn!("no Tokio runtime to fetch children of row {}", row);
            return false;
        };

        let table = self.clone();
        handle.spawn(async move {
            match provider.fetch_children(&element).await {
                Ok(children) => {
                    if let Err(err) = table.apply_refresh_result(row, id, children).await {
                        error!("children of {:?} not applied: {}", element, err);
                    }
                }
                Err(err) => warn!("fetching children of {:?} failed: {}", element, err),
            }
        });
        true
    }

    fn deliver(&self, change: &Change) {
        if change.is_empty() {
            return;
        }
        if self.inner.changes.send(change.clone()).is_err() {
            debug!("change consumer gone, dropping {}", change);
        }
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, TableState<E>> {
        self.inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
