//! World state and core simulation types
//!
//! Everything needed to reproduce an episode from its seed lives here.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Direction the leader is currently travelling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaderDirection {
    /// Towards `min`
    Negative,
    /// Towards `max`
    Positive,
}

impl LeaderDirection {
    /// Signed unit step (-1 or +1)
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            LeaderDirection::Negative => -1.0,
            LeaderDirection::Positive => 1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            LeaderDirection::Negative => LeaderDirection::Positive,
            LeaderDirection::Positive => LeaderDirection::Negative,
        }
    }
}

/// Bounds and speed shared by both agents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldParams {
    pub min: i32,
    pub max: i32,
    pub speed: f64,
}

impl Default for WorldParams {
    fn default() -> Self {
        Self {
            min: MIN,
            max: MAX,
            speed: SPEED,
        }
    }
}

impl WorldParams {
    #[inline]
    pub fn lower(&self) -> f64 {
        f64::from(self.min)
    }

    #[inline]
    pub fn upper(&self) -> f64 {
        f64::from(self.max)
    }

    /// Clamp a position into `[min, max]`
    #[inline]
    pub fn clamp(&self, position: f64) -> f64 {
        position.clamp(self.lower(), self.upper())
    }

    /// Whether a position lies within `[min, max]`
    pub fn contains(&self, position: f64) -> bool {
        position >= self.lower() && position <= self.upper()
    }
}

/// Complete world state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    /// Leader position in `[min, max]`
    pub leader_position: f64,
    /// Current leader heading
    pub leader_direction: LeaderDirection,
    /// Follower position in `[min, max]`
    pub follower_position: f64,
    /// Ticks since the last reset
    pub time_ticks: u64,
}

impl WorldState {
    /// Build a state at explicit positions
    pub fn new(leader_position: f64, leader_direction: LeaderDirection, follower_position: f64) -> Self {
        Self {
            leader_position,
            leader_direction,
            follower_position,
            time_ticks: 0,
        }
    }

    /// Draw a fresh state: both positions uniformly from the integers in
    /// `[min + 1, max)`, leader direction uniformly from {-1, +1}.
    ///
    /// Draw order is leader position, leader direction, follower position.
    /// `params` must describe a non-empty range (validated by the config).
    pub fn randomized<R: Rng + ?Sized>(params: &WorldParams, rng: &mut R) -> Self {
        let leader_position = f64::from(rng.random_range((params.min + 1)..params.max));
        let leader_direction = if rng.random_bool(0.5) {
            LeaderDirection::Positive
        } else {
            LeaderDirection::Negative
        };
        let follower_position = f64::from(rng.random_range((params.min + 1)..params.max));

        Self::new(leader_position, leader_direction, follower_position)
    }

    /// Signed offset from follower to leader
    #[inline]
    pub fn offset(&self) -> f64 {
        self.leader_position - self.follower_position
    }

    /// Absolute distance between leader and follower
    #[inline]
    pub fn distance(&self) -> f64 {
        self.offset().abs()
    }

    /// Positions as consumed by an external renderer: `(leader, follower)`
    pub fn positions(&self) -> (f64, f64) {
        (self.leader_position, self.follower_position)
    }
}
