//! Agent.
use super::{Env, Policy, Transition};
use crate::record::Record;
use anyhow::Result;
use std::path::Path;

/// Represents a policy trained online on an environment.
///
/// There is no replay buffer. Each transition is handed to the agent once,
/// right after the environment step that produced it, and is dropped afterwards.
pub trait Agent<E: Env>: Policy<E> {
    /// Set the policy to training mode.
    fn train(&mut self);

    /// Set the policy to evaluation mode.
    fn eval(&mut self);

    /// Return if it is in training mode.
    fn is_train(&self) -> bool;

    /// Performs an optimization step on a single transition and returns
    /// the losses of the step.
    fn opt_with_record(&mut self, transition: &Transition<E>) -> Result<Record>;

    /// Save the parameters of the agent in the given directory.
    fn save_params(&self, path: &Path) -> Result<()>;

    /// Load the parameters of the agent from the given directory.
    fn load_params(&mut self, path: &Path) -> Result<()>;
}
