//! Table configuration

use std::time::Duration;

/// Behaviour settings for an [`ExpandTable`](crate::ExpandTable).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use treetable::TableConfig;
///
/// let config = TableConfig::default()
///     .with_refresh_after_expand(false)
///     .with_retry_delay(Duration::from_millis(100));
/// assert!(!config.refresh_after_expand);
/// ```
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Fetch a node's children from the provider every time it is expanded.
    ///
    /// Default: `true`
    pub refresh_after_expand: bool,

    /// Delay before the single retry when a refresh result finds another
    /// operator in flight.
    ///
    /// Default: 500 milliseconds
    pub retry_delay: Duration,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            refresh_after_expand: true,
            retry_delay: Duration::from_millis(500),
        }
    }
}

impl TableConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether expanding a node triggers a child refresh.
    pub fn with_refresh_after_expand(mut self, enabled: bool) -> Self {
        self.refresh_after_expand = enabled;
        self
    }

    /// Sets the refresh retry delay.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }
}
