//! Asynchronous child source.

use async_trait::async_trait;

use crate::error::ProviderError;

/// Supplies the children of an element on demand.
///
/// An [`ExpandTable`](crate::ExpandTable) calls the provider after a node is
/// expanded and applies the answer through
/// [`ExpandTable::apply_refresh_result`](crate::ExpandTable::apply_refresh_result).
/// A fetch is never cancelled; answers that arrive after the node has moved
/// away from its row are discarded.
///
/// # Example
///
/// ```
/// use async_trait::async_trait;
/// use treetable::{ChildProvider, ProviderError};
///
/// struct Decimal;
///
/// #[async_trait]
/// impl ChildProvider<u32> for Decimal {
///     async fn fetch_children(&self, element: &u32) -> Result<Vec<u32>, ProviderError> {
///         Ok((1..=3).map(|digit| element * 10 + digit).collect())
///     }
/// }
/// ```
#[async_trait]
pub trait ChildProvider<E>: Send + Sync {
    /// Fetch the ordered children of `element`.
    ///
    /// Children must be unique among themselves.
    async fn fetch_children(&self, element: &E) -> Result<Vec<E>, ProviderError>;
}
