//! Follow the Leader - a one-dimensional pursuit environment
//!
//! Core modules:
//! - `sim`: Deterministic simulation (world dynamics, beam sensors)
//! - `env`: Reset/step session wrapping the simulation
//! - `spaces`: Action and observation space descriptions
//! - `config`: Construction-time configuration
//! - `error`: Error types

pub mod config;
pub mod env;
pub mod error;
pub mod sim;
pub mod spaces;

pub use config::EnvConfig;
pub use env::{FollowTheLeaderEnv, Info, Metadata, StepResult};
pub use error::{ConfigError, EnvError};
pub use sim::{Observation, SensorAlgorithm};

/// World configuration constants
pub mod consts {
    /// Lower world bound
    pub const MIN: i32 = 0;
    /// Upper world bound
    pub const MAX: i32 = 100;
    /// Distance covered per tick by both agents
    pub const SPEED: f64 = 1.0;

    /// Projection distance used to place a beam footprint
    pub const SENSING_DISTANCE: f64 = 100.0;
    /// Default beams per side
    pub const DEFAULT_BEAM_COUNT: usize = 2;
    /// Upper limit on beams per side
    pub const MAX_BEAM_COUNT: usize = 1 << 16;

    /// Detection tolerance for the threshold-window sensor
    pub const THRESHOLD_WINDOW_SIZE: f64 = 0.1;
    /// Detection tolerance for the nearest-beam sensor
    pub const NEAREST_BEAM_WINDOW_SIZE: f64 = 5.0;
    /// Angular spacing between adjacent nearest-beam rays (degrees)
    pub const NEAREST_BEAM_SPACING_DEG: f64 = 3.0;

    /// Angle of the straight-ahead beam (degrees)
    pub const STRAIGHT_AHEAD_DEG: f64 = 90.0;
}
