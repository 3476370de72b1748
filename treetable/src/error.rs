//! Error types.

use std::error::Error as StdError;

/// Internal-consistency failures while restructuring a tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// A child kept across an update found no partner in the new children.
    ///
    /// Only happens when sibling elements are not unique. The children were
    /// still replaced, so rows derived from the old tree are out of date.
    #[error("modified child at old position {position} has no partner in the new children")]
    UnmatchedModification {
        /// Position of the child in the old child list.
        position: usize,
    },
}

/// Errors surfaced by [`ExpandTable`](crate::ExpandTable) operations.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// Applying new children broke a tree invariant.
    #[error("tree update failed: {0}")]
    Tree(#[from] TreeError),
}

/// Failure reported by a [`ChildProvider`](crate::ChildProvider).
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ProviderError {
    /// Error message.
    pub message: String,
    /// Underlying cause, if any.
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

impl ProviderError {
    /// Creates a provider error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a provider error wrapping an underlying cause.
    pub fn with_source(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl From<std::io::Error> for ProviderError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(err.to_string(), err)
    }
}

impl From<String> for ProviderError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for ProviderError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}
