#![warn(missing_docs)]
//! Core traits and the online training loop of actor-critic agents.
//!
//! The crate is independent of any deep learning backend. An agent implements
//! [`Policy`] and [`Agent`], an environment implements [`Env`], and [`Trainer`]
//! runs episodes in which every environment step is immediately followed by one
//! optimization step of the agent on that single [`Transition`].
pub mod dummy;
pub mod error;
pub mod record;

mod base;
pub use base::{Act, Agent, Env, Info, Obs, Policy, Space, Step, Transition};

mod env;
pub use env::{EnvRegistry, EnvSpec, TimeLimit, TimeLimitConfig};

mod evaluator;
pub use evaluator::{DefaultEvaluator, Evaluator};

mod trainer;
pub use trainer::{RewardShaping, Trainer, TrainerConfig, TrainingState};
