//! Fixed-order simulation tick
//!
//! Advances the world one step: follower moves, reward is scored against the
//! leader position the agent observed, then the leader moves.

use serde::{Deserialize, Serialize};

use super::state::{LeaderDirection, WorldParams, WorldState};
use crate::error::EnvError;

/// Follower action for a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Action 0
    Left,
    /// Action 1
    Right,
}

impl Action {
    /// Signed unit step (-1 or +1)
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Action::Left => -1.0,
            Action::Right => 1.0,
        }
    }
}

impl TryFrom<i64> for Action {
    type Error = EnvError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Action::Left),
            1 => Ok(Action::Right),
            other => Err(EnvError::InvalidAction(other)),
        }
    }
}

impl From<Action> for i64 {
    fn from(action: Action) -> Self {
        match action {
            Action::Left => 0,
            Action::Right => 1,
        }
    }
}

/// Move the follower one step, holding it at the wall it is pushing against
pub fn move_follower(state: &mut WorldState, params: &WorldParams, action: Action) {
    let pos = state.follower_position;
    state.follower_position = match action {
        Action::Right if pos >= params.upper() => params.upper(),
        Action::Left if pos <= params.lower() => params.lower(),
        _ => params.clamp(pos + action.sign() * params.speed),
    };
}

/// Bounce the leader off a wall it has reached, then move it one step
pub fn move_leader(state: &mut WorldState, params: &WorldParams) {
    let pos = state.leader_position;
    match state.leader_direction {
        LeaderDirection::Negative if pos <= params.lower() => {
            state.leader_direction = LeaderDirection::Positive;
        }
        LeaderDirection::Positive if pos >= params.upper() => {
            state.leader_direction = LeaderDirection::Negative;
        }
        _ => {}
    }

    state.leader_position = params.clamp(pos + params.speed * state.leader_direction.sign());
}

/// Proximity reward for a given leader/follower distance.
///
/// Returns 1.0 within one unit, otherwise `1 / distance`. Always in (0, 1].
#[inline]
pub fn reward_for_distance(distance: f64) -> f64 {
    let d = distance.abs();
    if d <= 1.0 { 1.0 } else { 1.0 / d }
}

/// Reward for the current positions
pub fn reward(state: &WorldState) -> f64 {
    reward_for_distance(state.distance())
}

/// Advance the world by one tick and return the reward.
///
/// The reward uses the new follower position and the leader position from
/// before this tick's leader move.
pub fn tick(state: &mut WorldState, params: &WorldParams, action: Action) -> f64 {
    move_follower(state, params, action);
    let reward = reward(state);
    move_leader(state, params);
    state.time_ticks += 1;
    reward
}
