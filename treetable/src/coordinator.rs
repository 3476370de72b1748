//! Single-flight coordination of tree operators.
//!
//! Selecting a row and applying fetched children both restructure the tree
//! and rebuild the row cache. Only one such operator may run at a time; the
//! coordinator hands out a single lease and refuses further requests until
//! it is released.

use std::fmt;
use std::sync::Mutex;
use std::time::Duration;

use log::{debug, warn};
use uuid::Uuid;

/// Identifier of an in-flight operator.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct OperatorId(Uuid);

impl OperatorId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for OperatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out at most one [`OperatorLease`] at a time.
///
/// Acquisition never waits: a busy coordinator answers `None` immediately.
///
/// # Example
///
/// ```
/// use treetable::RefreshCoordinator;
///
/// let coordinator = RefreshCoordinator::new();
/// let lease = coordinator.acquire().expect("idle coordinator");
/// assert!(coordinator.acquire().is_none());
///
/// drop(lease);
/// assert!(coordinator.acquire().is_some());
/// ```
#[derive(Debug, Default)]
pub struct RefreshCoordinator {
    current: Mutex<Option<OperatorId>>,
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the lease if no operator holds it.
    pub fn acquire(&self) -> Option<OperatorLease<'_>> {
        let mut guard = self.current.lock().ok()?;
        if let Some(current) = *guard {
            debug!("operator {} still in flight", current);
            return None;
        }

        let id = OperatorId::new();
        *guard = Some(id);
        debug!("operator {} acquired", id);
        Some(OperatorLease {
            coordinator: self,
            id,
        })
    }

    /// Try once, and if busy try a single time more after `delay`.
    pub async fn acquire_with_retry(&self, delay: Duration) -> Option<OperatorLease<'_>> {
        if let Some(lease) = self.acquire() {
            return Some(lease);
        }
        tokio::time::sleep(delay).await;
        self.acquire()
    }

    /// Release the lease held by `id`.
    ///
    /// Returns `false` and changes nothing if `id` is not the current holder.
    pub fn release(&self, id: &OperatorId) -> bool {
        let Ok(mut guard) = self.current.lock() else {
            return false;
        };
        if guard.as_ref() != Some(id) {
            warn!("operator {} released but {:?} holds the lease", id, *guard);
            return false;
        }

        *guard = None;
        debug!("operator {} finished", id);
        true
    }

    /// The operator currently holding the lease.
    pub fn current(&self) -> Option<OperatorId> {
        self.current.lock().ok().and_then(|guard| *guard)
    }

    pub fn is_busy(&self) -> bool {
        self.current().is_some()
    }
}

/// Proof of holding the coordinator. Released on drop.
#[derive(Debug)]
pub struct OperatorLease<'a> {
    coordinator: &'a RefreshCoordinator,
    id: OperatorId,
}

impl OperatorLease<'_> {
    pub fn id(&self) -> OperatorId {
        self.id
    }
}

impl Drop for OperatorLease<'_> {
    fn drop(&mut self) {
        self.coordinator.release(&self.id);
    }
}
