//! Advantage actor-critic (A2C) agent trained online.
//!
//! The agent performs one gradient step per environment step on the single
//! transition of that step. The policy is Gaussian with a state-dependent
//! mean and standard deviation, and the critic estimates the state value.
mod base;
mod config;
mod model;
pub use base::{A2c, A2cLosses};
pub use config::A2cConfig;
pub use model::{ActorCritic, ActorCriticConfig};
