//! Action and observation space descriptions

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::sim::Observation;

/// `n` discrete actions numbered `0..n`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discrete {
    pub n: usize,
}

impl Discrete {
    pub fn new(n: usize) -> Self {
        Self { n }
    }

    pub fn contains(&self, action: i64) -> bool {
        usize::try_from(action).is_ok_and(|a| a < self.n)
    }

    /// Uniformly sample an action
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        rng.random_range(0..i64::try_from(self.n).unwrap_or(i64::MAX))
    }
}

/// Binary vectors of length `n`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiBinary {
    pub n: usize,
}

impl MultiBinary {
    pub fn new(n: usize) -> Self {
        Self { n }
    }

    pub fn contains(&self, obs: &Observation) -> bool {
        obs.len() == self.n && obs.as_slice().iter().all(|&v| v <= 1)
    }
}
