//! Expand/collapse tree backing a flat, row-addressed list.
//!
//! The crate keeps a lazily expandable tree of elements in sync with a flat
//! list presentation. Tree operations report their effect as row-level
//! [`Change`]s, a reconciling update carries expansion state across child
//! refreshes, and [`ExpandTable`] serializes selections and asynchronous
//! child refreshes so a widget receives changes one commit at a time.

pub mod change;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod node;
pub mod provider;
pub mod rows;
pub mod table;

pub use change::Change;
pub use config::TableConfig;
pub use coordinator::{OperatorId, OperatorLease, RefreshCoordinator};
pub use error::{ProviderError, TableError, TreeError};
pub use node::{Element, ExpandCollapseNode, ExpandState, NodeId, NodeStorage};
pub use provider::ChildProvider;
pub use rows::FlatRow;
pub use table::{ChangeReceiver, ExpandTable, RefreshOutcome, SelectOutcome};
