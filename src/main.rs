//! Follow the Leader demo driver
//!
//! Steps the environment with random actions and draws the two agents as a
//! text strip, leader on top and follower below.
//!
//! Usage: `follow-the-leader [config.json | threshold | nearest] [ticks]`

use rand::SeedableRng;
use rand_pcg::Pcg32;

use follow_the_leader::{EnvConfig, EnvError, FollowTheLeaderEnv, SensorAlgorithm};

const DEFAULT_TICKS: usize = 1000;
const STRIP_WIDTH: usize = 51;

/// Draw one agent as a marker on a strip spanning `[min, max]`
fn draw_strip(position: f64, min: f64, max: f64, marker: char) -> String {
    let t = ((position - min) / (max - min)).clamp(0.0, 1.0);
    let col = (t * (STRIP_WIDTH - 1) as f64).round() as usize;
    (0..STRIP_WIDTH)
        .map(|i| if i == col { marker } else { '.' })
        .collect()
}

fn run(config: EnvConfig, ticks: usize) -> Result<(), EnvError> {
    let (min, max) = (f64::from(config.min), f64::from(config.max));
    let mut env = FollowTheLeaderEnv::new(config)?;
    let mut policy_rng = Pcg32::from_rng(&mut rand::rng());
    let action_space = env.action_space();

    env.reset(None)?;
    let mut total_reward = 0.0;

    for _ in 0..ticks {
        let action = action_space.sample(&mut policy_rng);
        let result = env.step(action)?;
        total_reward += result.reward;

        if let Some((leader, follower)) = env.render_state() {
            println!("{}", draw_strip(leader, min, max, 'L'));
            println!("{}  {:?}", draw_strip(follower, min, max, 'F'), result.observation.as_slice());
        }
    }

    env.close();
    log::info!(
        "Ran {} ticks, mean reward {:.4}",
        ticks,
        total_reward / ticks.max(1) as f64
    );
    Ok(())
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(arg) => match SensorAlgorithm::from_str(&arg) {
            Some(algorithm) => EnvConfig::for_algorithm(algorithm),
            None => match EnvConfig::from_json_file(&arg) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("Falling back to default config: {}", e);
                    EnvConfig::default()
                }
            },
        },
        None => EnvConfig::default(),
    };
    let ticks = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_TICKS);

    if let Err(e) = run(config, ticks) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
