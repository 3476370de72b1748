//! Random child generator standing in for a remote data source.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use treetable::{ChildProvider, ProviderError};

/// Answers two or three distinct children `element * 10 + digit` after a delay.
pub struct RandomChildren {
    rng: Mutex<StdRng>,
    delay: Duration,
}

impl RandomChildren {
    pub fn new(seed: u64, delay: Duration) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            delay,
        }
    }

    fn pick_digits(&self) -> Result<Vec<u64>, ProviderError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| ProviderError::new("child generator poisoned"))?;
        let count = rng.random_range(2..=3);
        let mut digits: Vec<u64> = (1..=9).collect();
        digits.shuffle(&mut *rng);
        digits.truncate(count);
        digits.sort_unstable();
        Ok(digits)
    }
}

#[async_trait]
impl ChildProvider<u64> for RandomChildren {
    async fn fetch_children(&self, element: &u64) -> Result<Vec<u64>, ProviderError> {
        let digits = self.pick_digits()?;
        tokio::time::sleep(self.delay).await;

        let base = element
            .checked_mul(10)
            .ok_or_else(|| ProviderError::new(format!("{} is too deep to expand", element)))?;
        let children: Vec<u64> = digits.into_iter().map(|digit| base + digit).collect();
        debug!("children of {}: {:?}", element, children);
        Ok(children)
    }
}
