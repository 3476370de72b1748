//! Demo settings

use std::path::PathBuf;
use std::time::Duration;

/// Settings for one scripted demo run.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    /// Seed for both the child generator and the tap script.
    ///
    /// Default: 7
    pub seed: u64,

    /// Number of scripted row selections after the root is expanded.
    ///
    /// Default: 8
    pub taps: usize,

    /// Simulated latency of every child fetch.
    ///
    /// Default: 150 milliseconds
    pub fetch_delay: Duration,

    /// File receiving the debug log.
    ///
    /// Default: `treetable-demo.log`
    pub log_path: PathBuf,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            seed: 7,
            taps: 8,
            fetch_delay: Duration::from_millis(150),
            log_path: PathBuf::from("treetable-demo.log"),
        }
    }
}

impl DemoConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_taps(mut self, taps: usize) -> Self {
        self.taps = taps;
        self
    }

    /// Longest time to wait for a refresh to land after a tap.
    pub fn settle_timeout(&self) -> Duration {
        self.fetch_delay * 4 + Duration::from_millis(100)
    }
}
