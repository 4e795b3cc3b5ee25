//! CartPole with a continuous action.
//!
//! The classic cart-pole balancing task, where the action is a scalar in
//! `[-1, 1]` scaling the force applied to the cart.
//!
//! ```no_run
//! use a2c_cartpole_env::{register, ContinuousCartPoleEnv, ENV_ID};
//! use a2c_core::{EnvRegistry, Env};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut registry = EnvRegistry::<ContinuousCartPoleEnv>::new();
//! register(&mut registry)?;
//! let mut env = registry.make(ENV_ID, 42)?;
//! let _obs = env.reset()?;
//! # Ok(())
//! # }
//! ```
mod act;
mod base;
mod config;
mod error;
mod obs;
pub use act::CartPoleAct;
pub use base::ContinuousCartPoleEnv;
pub use config::CartPoleConfig;
pub use error::CartPoleError;
pub use obs::CartPoleObs;

use a2c_core::{error::CoreError, EnvRegistry, EnvSpec};

/// Identifier of the environment.
pub const ENV_ID: &str = "CartPoleContinuous-v0";

/// Episodes are truncated after this number of steps.
pub const MAX_EPISODE_STEPS: usize = 500;

/// Return above which the task is considered solved.
pub const REWARD_THRESHOLD: f32 = 475.0;

/// Registers [`ContinuousCartPoleEnv`] with the default configuration as [`ENV_ID`].
pub fn register(registry: &mut EnvRegistry<ContinuousCartPoleEnv>) -> Result<(), CoreError> {
    register_with_config(registry, CartPoleConfig::default())
}

/// Registers [`ContinuousCartPoleEnv`] with the given configuration as [`ENV_ID`].
pub fn register_with_config(
    registry: &mut EnvRegistry<ContinuousCartPoleEnv>,
    config: CartPoleConfig,
) -> Result<(), CoreError> {
    registry.register(
        EnvSpec::new(ENV_ID, config)
            .max_episode_steps(MAX_EPISODE_STEPS)
            .reward_threshold(REWARD_THRESHOLD),
    )
}
