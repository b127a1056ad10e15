//! Beam sensor array
//!
//! Converts the horizontal offset between leader and follower into a binary
//! observation, one slot per beam. Slot `beam_count` is straight ahead.
//!
//! Two algorithms are supported:
//! - `ThresholdWindow`: beams equally spaced over each quarter-plane with a
//!   dedicated 90° beam. The first beam whose footprint lies within the
//!   window wins; the observation may be all zero.
//! - `NearestBeam`: beams fanned out at a fixed angular spacing. The beam
//!   (or the center) closest to the leader always wins.

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::EnvError;

/// Sensor algorithm selected at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorAlgorithm {
    /// First beam within the detection window wins
    #[default]
    ThresholdWindow,
    /// Closest beam footprint always wins
    NearestBeam,
}

impl SensorAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorAlgorithm::ThresholdWindow => "threshold_window",
            SensorAlgorithm::NearestBeam => "nearest_beam",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "threshold_window" | "threshold" => Some(SensorAlgorithm::ThresholdWindow),
            "nearest_beam" | "nearest" => Some(SensorAlgorithm::NearestBeam),
            _ => None,
        }
    }

    /// Detection tolerance this algorithm was tuned with
    pub fn default_window_size(&self) -> f64 {
        match self {
            SensorAlgorithm::ThresholdWindow => THRESHOLD_WINDOW_SIZE,
            SensorAlgorithm::NearestBeam => NEAREST_BEAM_WINDOW_SIZE,
        }
    }
}

impl fmt::Display for SensorAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of straight-ahead a beam points to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BeamKind {
    /// Angle below 90°
    Lesser,
    /// Exactly 90°
    Center,
    /// Angle above 90°
    Greater,
}

/// A single directional beam
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Beam {
    /// Angle from the follower's forward axis (degrees)
    pub angle_deg: f64,
    pub kind: BeamKind,
    /// Observation slot this beam reports into
    pub slot: usize,
}

/// Binary observation vector, one slot per beam
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Observation(Vec<u8>);

impl Observation {
    pub fn zeros(len: usize) -> Self {
        Self(vec![0; len])
    }

    /// All zero except `slot`
    pub fn one_hot(len: usize, slot: usize) -> Self {
        let mut obs = Self::zeros(len);
        obs.0[slot] = 1;
        obs
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Index of the first set slot
    pub fn hot_slot(&self) -> Option<usize> {
        self.0.iter().position(|&v| v == 1)
    }

    /// Number of set slots
    pub fn count_hot(&self) -> usize {
        self.0.iter().filter(|&&v| v == 1).count()
    }
}

impl From<Observation> for Vec<u8> {
    fn from(obs: Observation) -> Self {
        obs.0
    }
}

/// Outcome of one sensor evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamReading {
    /// Slot set in the observation, if any
    pub slot: Option<usize>,
    /// Distance from the leader to the winning footprint (or the closest
    /// footprint when nothing was detected)
    pub distance: f64,
    /// Whether `distance` is inside the detection window
    pub in_window: bool,
}

/// Fixed beam geometry for one sensor array.
///
/// Only built through [`SensorGeometry::new`], which keeps `beams` and
/// `beam_count` consistent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorGeometry {
    algorithm: SensorAlgorithm,
    beam_count: usize,
    window_size: f64,
    sensing_distance: f64,
    /// Beams in scan order
    beams: Vec<Beam>,
}

impl SensorGeometry {
    /// Build the beam fan for `beam_count` beams per side
    pub fn new(
        algorithm: SensorAlgorithm,
        beam_count: usize,
        window_size: f64,
        sensing_distance: f64,
    ) -> Result<Self, EnvError> {
        if beam_count == 0 {
            return Err(EnvError::InvalidConfiguration(
                "beam_count must be greater than zero".into(),
            ));
        }
        if beam_count > MAX_BEAM_COUNT {
            return Err(EnvError::InvalidConfiguration(format!(
                "beam_count {beam_count} exceeds the limit of {MAX_BEAM_COUNT}"
            )));
        }
        if !(window_size.is_finite() && window_size > 0.0) {
            return Err(EnvError::InvalidConfiguration(format!(
                "window_size must be positive and finite, got {window_size}"
            )));
        }
        if !(sensing_distance.is_finite() && sensing_distance > 0.0) {
            return Err(EnvError::InvalidConfiguration(format!(
                "sensing_distance must be positive and finite, got {sensing_distance}"
            )));
        }

        let beams = match algorithm {
            SensorAlgorithm::ThresholdWindow => threshold_window_beams(beam_count),
            SensorAlgorithm::NearestBeam => {
                let widest = beam_count as f64 * NEAREST_BEAM_SPACING_DEG;
                if widest >= STRAIGHT_AHEAD_DEG {
                    return Err(EnvError::InvalidConfiguration(format!(
                        "nearest-beam fan of {beam_count} beams at {NEAREST_BEAM_SPACING_DEG}° \
                         spacing reaches {widest}° from straight ahead"
                    )));
                }
                nearest_beam_beams(beam_count)
            }
        };

        Ok(Self {
            algorithm,
            beam_count,
            window_size,
            sensing_distance,
            beams,
        })
    }

    pub fn algorithm(&self) -> SensorAlgorithm {
        self.algorithm
    }

    pub fn beam_count(&self) -> usize {
        self.beam_count
    }

    pub fn window_size(&self) -> f64 {
        self.window_size
    }

    pub fn sensing_distance(&self) -> f64 {
        self.sensing_distance
    }

    pub fn beams(&self) -> &[Beam] {
        &self.beams
    }

    /// Beam angles in scan order (degrees)
    pub fn beam_angles(&self) -> Vec<f64> {
        self.beams.iter().map(|b| b.angle_deg).collect()
    }

    /// Observation length, always `2 * beam_count + 1`
    #[inline]
    pub fn observation_len(&self) -> usize {
        2 * self.beam_count + 1
    }

    /// Straight-ahead slot
    #[inline]
    pub fn center_slot(&self) -> usize {
        self.observation_len().div_ceil(2) - 1
    }

    /// Ground position hit by `beam` from a follower at `follower`.
    ///
    /// The center beam has no footprint: tan(90°) is undefined.
    pub fn footprint(&self, beam: &Beam, follower: f64) -> Option<f64> {
        let rad = beam.angle_deg.to_radians();
        match (self.algorithm, beam.kind) {
            (_, BeamKind::Center) => None,
            (SensorAlgorithm::ThresholdWindow, _) => Some(self.sensing_distance * rad.tan() + follower),
            (SensorAlgorithm::NearestBeam, BeamKind::Lesser) => {
                Some(follower - self.sensing_distance / rad.tan())
            }
            (SensorAlgorithm::NearestBeam, BeamKind::Greater) => {
                Some(follower + self.sensing_distance / (PI - rad).tan())
            }
        }
    }

    /// Evaluate the sensor for the given positions
    pub fn read(&self, leader: f64, follower: f64) -> Result<BeamReading, EnvError> {
        match self.algorithm {
            SensorAlgorithm::ThresholdWindow => Ok(self.read_threshold_window(leader, follower)),
            SensorAlgorithm::NearestBeam => self.read_nearest_beam(leader, follower),
        }
    }

    /// Observation for the given positions
    pub fn observe(&self, leader: f64, follower: f64) -> Result<Observation, EnvError> {
        let reading = self.read(leader, follower)?;
        Ok(self.to_observation(&reading))
    }

    /// Observation vector for a reading
    pub fn to_observation(&self, reading: &BeamReading) -> Observation {
        let len = self.observation_len();
        match reading.slot {
            Some(slot) => Observation::one_hot(len, slot),
            None => Observation::zeros(len),
        }
    }

    fn read_threshold_window(&self, leader: f64, follower: f64) -> BeamReading {
        let mut closest = f64::INFINITY;

        for beam in &self.beams {
            let distance = match self.footprint(beam, follower) {
                Some(x) => (leader - x).abs(),
                None => (leader - follower).abs(),
            };
            if distance < self.window_size {
                return BeamReading {
                    slot: Some(beam.slot),
                    distance,
                    in_window: true,
                };
            }
            closest = closest.min(distance);
        }

        BeamReading {
            slot: None,
            distance: closest,
            in_window: false,
        }
    }

    fn read_nearest_beam(&self, leader: f64, follower: f64) -> Result<BeamReading, EnvError> {
        let mut best: Option<usize> = None;
        let mut best_distance = f64::INFINITY;

        for beam in &self.beams {
            let Some(x) = self.footprint(beam, follower) else {
                continue;
            };
            let distance = (leader - x).abs();
            if distance < best_distance {
                best = Some(beam.slot);
                best_distance = distance;
            }
        }

        let mut slot = best.ok_or_else(|| {
            EnvError::SensorInvariantViolation(format!(
                "no beam resolved for leader={leader}, follower={follower}"
            ))
        })?;

        let center_distance = (leader - follower).abs();
        if self.observation_len() % 2 == 1 && center_distance < best_distance {
            slot = self.center_slot();
            best_distance = center_distance;
        }

        Ok(BeamReading {
            slot: Some(slot),
            distance: best_distance,
            in_window: best_distance < self.window_size,
        })
    }
}

/// Evenly spaced over each quarter-plane, plus the 90° beam
fn threshold_window_beams(beam_count: usize) -> Vec<Beam> {
    let increment = STRAIGHT_AHEAD_DEG / (beam_count as f64 + 1.0);
    let lesser: Vec<f64> = (1..=beam_count).map(|i| i as f64 * increment).collect();

    let mut beams = Vec::with_capacity(2 * beam_count + 1);
    beams.extend(lesser.iter().map(|&angle_deg| Beam {
        angle_deg,
        kind: BeamKind::Lesser,
        slot: 0,
    }));
    beams.push(Beam {
        angle_deg: STRAIGHT_AHEAD_DEG,
        kind: BeamKind::Center,
        slot: 0,
    });
    beams.extend(lesser.iter().map(|&a| Beam {
        angle_deg: STRAIGHT_AHEAD_DEG + a,
        kind: BeamKind::Greater,
        slot: 0,
    }));

    for (slot, beam) in beams.iter_mut().enumerate() {
        beam.slot = slot;
    }
    beams
}

/// Fixed angular spacing, no center beam; the center slot is implicit
fn nearest_beam_beams(beam_count: usize) -> Vec<Beam> {
    let lesser = (1..=beam_count).rev().enumerate().map(|(slot, i)| Beam {
        angle_deg: STRAIGHT_AHEAD_DEG - i as f64 * NEAREST_BEAM_SPACING_DEG,
        kind: BeamKind::Lesser,
        slot,
    });
    let greater = (1..=beam_count).map(|i| Beam {
        angle_deg: STRAIGHT_AHEAD_DEG + i as f64 * NEAREST_BEAM_SPACING_DEG,
        kind: BeamKind::Greater,
        slot: beam_count + i,
    });
    lesser.chain(greater).collect()
}
