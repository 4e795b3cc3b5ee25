//! Registry of environment specifications.
use super::{TimeLimit, TimeLimitConfig};
use crate::{error::CoreError, Env};
use anyhow::Result;
use log::info;
use std::collections::HashMap;

/// Specification of a registered environment.
#[derive(Debug, Clone)]
pub struct EnvSpec<C> {
    /// Identifier, e.g. `CartPoleContinuous-v0`.
    pub id: String,

    /// Configuration used to build the environment.
    pub config: C,

    /// Episodes are truncated after this number of steps.
    pub max_episode_steps: Option<usize>,

    /// Episode return above which the task is considered solved.
    pub reward_threshold: Option<f32>,
}

impl<C> EnvSpec<C> {
    /// Constructs a specification without step limit and reward threshold.
    pub fn new(id: impl Into<String>, config: C) -> Self {
        Self {
            id: id.into(),
            config,
            max_episode_steps: None,
            reward_threshold: None,
        }
    }

    /// Sets the step limit of episodes.
    pub fn max_episode_steps(mut self, v: usize) -> Self {
        self.max_episode_steps = Some(v);
        self
    }

    /// Sets the reward threshold.
    pub fn reward_threshold(mut self, v: f32) -> Self {
        self.reward_threshold = Some(v);
        self
    }
}

/// Binds identifiers to environment specifications.
pub struct EnvRegistry<E: Env> {
    specs: HashMap<String, EnvSpec<E::Config>>,
}

impl<E: Env> Default for EnvRegistry<E> {
    fn default() -> Self {
        Self {
            specs: HashMap::new(),
        }
    }
}

impl<E: Env> EnvRegistry<E> {
    /// Constructs an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a specification.
    ///
    /// Registering the same id twice is an error.
    pub fn register(&mut self, spec: EnvSpec<E::Config>) -> Result<(), CoreError> {
        if self.specs.contains_key(&spec.id) {
            return Err(CoreError::EnvAlreadyRegistered(spec.id));
        }
        info!("Registered environment {}", spec.id);
        self.specs.insert(spec.id.clone(), spec);
        Ok(())
    }

    /// Returns the specification registered with `id`.
    pub fn spec(&self, id: &str) -> Result<&EnvSpec<E::Config>, CoreError> {
        self.specs
            .get(id)
            .ok_or_else(|| CoreError::EnvNotRegistered(id.to_string()))
    }

    /// Returns the configuration of the environment registered with `id`,
    /// wrapped in [`TimeLimitConfig`].
    pub fn config(&self, id: &str) -> Result<TimeLimitConfig<E::Config>, CoreError> {
        let spec = self.spec(id)?;
        Ok(TimeLimitConfig::new(
            spec.config.clone(),
            spec.max_episode_steps,
        ))
    }

    /// Builds the environment registered with `id`.
    pub fn make(&self, id: &str, seed: i64) -> Result<TimeLimit<E>> {
        let config = self.config(id)?;
        TimeLimit::build(&config, seed)
    }
}
