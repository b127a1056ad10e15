//! Reset/step session around the simulation
//!
//! One environment instance serves one sequential caller. It owns its random
//! source, so independently constructed environments never share RNG state.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::config::EnvConfig;
use crate::error::EnvError;
use crate::sim::{Action, Observation, SensorGeometry, WorldParams, WorldState, tick};
use crate::spaces::{Discrete, MultiBinary};

/// Auxiliary per-call information (always empty)
pub type Info = BTreeMap<String, serde_json::Value>;

/// Rendering hints for an external renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub render_modes: &'static [&'static str],
    pub render_fps: u32,
}

pub const METADATA: Metadata = Metadata {
    render_modes: &["human"],
    render_fps: 4,
};

/// Result of a single [`FollowTheLeaderEnv::step`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepResult {
    pub observation: Observation,
    pub reward: f64,
    /// Episodes never terminate on their own
    pub done: bool,
    pub info: Info,
}

/// The follow-the-leader environment
#[derive(Debug, Clone)]
pub struct FollowTheLeaderEnv {
    config: EnvConfig,
    params: WorldParams,
    geometry: SensorGeometry,
    rng: Pcg32,
    /// Seed passed to the most recent seeded reset
    seed: Option<u64>,
    /// `None` until the first reset
    world: Option<WorldState>,
}

impl FollowTheLeaderEnv {
    /// Create an environment with an entropy-seeded random source
    pub fn new(config: EnvConfig) -> Result<Self, EnvError> {
        Self::with_rng(config, Pcg32::from_rng(&mut rand::rng()))
    }

    /// Create an environment around an explicit random source
    pub fn with_rng(config: EnvConfig, rng: Pcg32) -> Result<Self, EnvError> {
        config.validate()?;
        let params = config.world_params();
        let geometry = config.sensor_geometry()?;

        log::debug!(
            "Created {} environment: {} beams per side, angles {:?}",
            geometry.algorithm(),
            geometry.beam_count(),
            geometry.beam_angles()
        );

        Ok(Self {
            config,
            params,
            geometry,
            rng,
            seed: None,
            world: None,
        })
    }

    /// Start a new episode.
    ///
    /// With a seed, the environment's random source is reseeded before any
    /// draw, so equal seeds give equal episodes.
    pub fn reset(&mut self, seed: Option<u64>) -> Result<(Observation, Info), EnvError> {
        if let Some(seed) = seed {
            self.rng = Pcg32::seed_from_u64(seed);
            self.seed = Some(seed);
        }

        let world = WorldState::randomized(&self.params, &mut self.rng);
        log::info!(
            "Reset (seed {:?}): leader={} {:?}, follower={}",
            seed,
            world.leader_position,
            world.leader_direction,
            world.follower_position
        );
        self.install(world)
    }

    /// Start a new episode from an explicit state.
    ///
    /// Fails with `InvalidState` if either position is outside the bounds.
    pub fn reset_to(&mut self, world: WorldState) -> Result<(Observation, Info), EnvError> {
        if !self.params.contains(world.leader_position)
            || !self.params.contains(world.follower_position)
        {
            return Err(EnvError::InvalidState(format!(
                "positions ({}, {}) outside [{}, {}]",
                world.leader_position, world.follower_position, self.params.min, self.params.max
            )));
        }
        self.install(world)
    }

    fn install(&mut self, world: WorldState) -> Result<(Observation, Info), EnvError> {
        let observation = self
            .geometry
            .observe(world.leader_position, world.follower_position)?;
        self.world = Some(world);
        Ok((observation, Info::new()))
    }

    /// Apply one action (0 = left, 1 = right) and advance one tick
    pub fn step(&mut self, action: i64) -> Result<StepResult, EnvError> {
        let action = Action::try_from(action)?;
        let world = self.world.as_mut().ok_or(EnvError::NotReset)?;

        let reward = tick(world, &self.params, action);
        let reading = self
            .geometry
            .read(world.leader_position, world.follower_position)?;
        log::trace!("Tick {}: {:?}", world.time_ticks, reading);

        let observation = self.geometry.to_observation(&reading);

        log::debug!(
            "Tick {}: {:?} -> reward {:.4}, slot {:?}",
            world.time_ticks,
            action,
            reward,
            reading.slot
        );

        Ok(StepResult {
            observation,
            reward,
            done: false,
            info: Info::new(),
        })
    }

    /// `(leader_position, follower_position)` for an external renderer
    pub fn render_state(&self) -> Option<(f64, f64)> {
        self.world.as_ref().map(WorldState::positions)
    }

    /// Teardown hook; nothing to release
    pub fn close(&mut self) {}

    pub fn metadata(&self) -> Metadata {
        METADATA
    }

    /// Two actions: 0 = left, 1 = right
    pub fn action_space(&self) -> Discrete {
        Discrete::new(2)
    }

    pub fn observation_space(&self) -> MultiBinary {
        MultiBinary::new(self.geometry.observation_len())
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn geometry(&self) -> &SensorGeometry {
        &self.geometry
    }

    pub fn world(&self) -> Option<&WorldState> {
        self.world.as_ref()
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{LeaderDirection, SensorAlgorithm};

    fn env(algorithm: SensorAlgorithm, beams: usize) -> FollowTheLeaderEnv {
        FollowTheLeaderEnv::new(EnvConfig::for_algorithm(algorithm).with_beam_count(beams)).unwrap()
    }

    #[test]
    fn test_construction_rejects_zero_beams() {
        let err = FollowTheLeaderEnv::new(EnvConfig::default().with_beam_count(0)).unwrap_err();
        assert!(matches!(err, EnvError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_step_before_reset() {
        let mut env = env(SensorAlgorithm::ThresholdWindow, 2);
        assert_eq!(env.step(0), Err(EnvError::NotReset));
        assert_eq!(env.render_state(), None);
    }

    #[test]
    fn test_invalid_action() {
        let mut env = env(SensorAlgorithm::ThresholdWindow, 2);
        env.reset(Some(1)).unwrap();
        assert_eq!(env.step(2), Err(EnvError::InvalidAction(2)));
        assert_eq!(env.step(-1), Err(EnvError::InvalidAction(-1)));
        // Rejected actions leave the world untouched
        assert_eq!(env.world().unwrap().time_ticks, 0);
    }

    #[test]
    fn test_same_seed_same_episode() {
        for algorithm in [SensorAlgorithm::ThresholdWindow, SensorAlgorithm::NearestBeam] {
            let mut a = env(algorithm, 4);
            let mut b = env(algorithm, 4);

            let (obs_a, _) = a.reset(Some(2024)).unwrap();
            let (obs_b, _) = b.reset(Some(2024)).unwrap();
            assert_eq!(obs_a, obs_b);
            assert_eq!(a.world(), b.world());
            assert_eq!(a.seed(), Some(2024));

            for i in 0..200 {
                let action = i % 3 % 2;
                assert_eq!(a.step(action).unwrap(), b.step(action).unwrap());
            }
        }
    }

    #[test]
    fn test_reseeding_restarts_sequence() {
        let mut env = env(SensorAlgorithm::NearestBeam, 3);
        env.reset(Some(5)).unwrap();
        let first = env.world().cloned();
        env.reset(None).unwrap();
        env.reset(Some(5)).unwrap();
        assert_eq!(env.world().cloned(), first);
    }

    #[test]
    fn test_instances_do_not_share_rng() {
        let mut a = FollowTheLeaderEnv::with_rng(EnvConfig::default(), Pcg32::seed_from_u64(9)).unwrap();
        let mut b = FollowTheLeaderEnv::with_rng(EnvConfig::default(), Pcg32::seed_from_u64(9)).unwrap();

        // Drawing from `a` repeatedly must not advance `b`
        for _ in 0..10 {
            a.reset(None).unwrap();
        }
        b.reset(None).unwrap();

        let mut c = FollowTheLeaderEnv::with_rng(EnvConfig::default(), Pcg32::seed_from_u64(9)).unwrap();
        c.reset(None).unwrap();
        assert_eq!(b.world(), c.world());
    }

    #[test]
    fn test_step_contract() {
        let mut env = env(SensorAlgorithm::ThresholdWindow, 2);
        let (obs, info) = env.reset(Some(11)).unwrap();
        assert!(info.is_empty());
        assert!(env.observation_space().contains(&obs));

        for i in 0..500 {
            let result = env.step(i % 2).unwrap();
            assert!(!result.done);
            assert!(result.info.is_empty());
            assert!(result.reward > 0.0 && result.reward <= 1.0);
            assert!(env.observation_space().contains(&result.observation));
            assert!(result.observation.count_hot() <= 1);
        }
        assert_eq!(env.world().unwrap().time_ticks, 500);
    }

    #[test]
    fn test_nearest_beam_always_reports() {
        let mut env = env(SensorAlgorithm::NearestBeam, 4);
        let (obs, _) = env.reset(Some(77)).unwrap();
        assert_eq!(obs.count_hot(), 1);
        for i in 0..300 {
            let result = env.step(i % 2).unwrap();
            assert_eq!(result.observation.len(), 9);
            assert_eq!(result.observation.count_hot(), 1);
        }
    }

    #[test]
    fn test_step_reward_uses_stale_leader() {
        let mut env = env(SensorAlgorithm::ThresholdWindow, 2);
        env.reset_to(WorldState::new(49.0, LeaderDirection::Positive, 50.0))
            .unwrap();

        // Follower 50 -> 49 meets the leader before it moves on to 50
        let result = env.step(0).unwrap();
        assert_eq!(result.reward, 1.0);
        assert_eq!(env.render_state(), Some((50.0, 49.0)));

        // Reward sees the overlap, the observation sees the leader already gone
        env.reset_to(WorldState::new(50.0, LeaderDirection::Negative, 51.0))
            .unwrap();
        let result = env.step(0).unwrap();
        assert_eq!(env.render_state(), Some((49.0, 50.0)));
        assert_eq!(result.reward, 1.0);
        assert_eq!(result.observation.count_hot(), 0);
    }

    #[test]
    fn test_reset_to_center_observation() {
        let mut env = env(SensorAlgorithm::ThresholdWindow, 2);
        let (obs, _) = env
            .reset_to(WorldState::new(50.0, LeaderDirection::Positive, 50.0))
            .unwrap();
        assert_eq!(obs.as_slice(), &[0, 0, 1, 0, 0]);

        let err = env
            .reset_to(WorldState::new(101.0, LeaderDirection::Positive, 50.0))
            .unwrap_err();
        assert!(matches!(err, EnvError::InvalidState(_)));
    }

    #[test]
    fn test_render_state_is_idempotent() {
        let mut env = env(SensorAlgorithm::NearestBeam, 2);
        env.reset(Some(3)).unwrap();
        let before = env.world().cloned();
        let first = env.render_state();
        let second = env.render_state();
        assert_eq!(first, second);
        assert_eq!(env.world().cloned(), before);
        env.close();
    }

    #[test]
    fn test_spaces_and_metadata() {
        let env = env(SensorAlgorithm::ThresholdWindow, 3);
        assert_eq!(env.action_space(), Discrete::new(2));
        assert_eq!(env.observation_space(), MultiBinary::new(7));
        assert_eq!(env.metadata().render_modes, &["human"]);
        assert_eq!(env.metadata().render_fps, 4);
    }
}
