//! Deterministic simulation module
//!
//! All environment logic lives here. This module must be pure and deterministic:
//! - Randomness only through an explicitly passed RNG
//! - Fixed step order (follower, reward, leader, sensor)
//! - No rendering or platform dependencies

pub mod sensor;
pub mod state;
pub mod tick;

pub use sensor::{Beam, BeamKind, BeamReading, Observation, SensorAlgorithm, SensorGeometry};
pub use state::{LeaderDirection, WorldParams, WorldState};
pub use tick::{Action, move_follower, move_leader, reward, reward_for_distance, tick};
