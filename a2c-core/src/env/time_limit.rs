//! Episode length limit.
use crate::{record::Record, Env, Space, Step};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Configuration of [`TimeLimit`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TimeLimitConfig<C> {
    /// Configuration of the wrapped environment.
    pub env_config: C,

    /// The number of steps after which an episode is truncated.
    ///
    /// `None` never truncates.
    pub max_episode_steps: Option<usize>,
}

impl<C> TimeLimitConfig<C> {
    /// Constructs a configuration.
    pub fn new(env_config: C, max_episode_steps: Option<usize>) -> Self {
        Self {
            env_config,
            max_episode_steps,
        }
    }
}

/// Truncates episodes of the wrapped environment.
///
/// The step that reaches `max_episode_steps` has `is_truncated = true`, even if
/// the wrapped environment terminated on the same step.
pub struct TimeLimit<E: Env> {
    env: E,
    max_episode_steps: Option<usize>,
    elapsed_steps: usize,
}

impl<E: Env> TimeLimit<E> {
    /// Wraps an environment.
    pub fn new(env: E, max_episode_steps: Option<usize>) -> Self {
        Self {
            env,
            max_episode_steps,
            elapsed_steps: 0,
        }
    }

    /// Steps taken since the last reset.
    pub fn elapsed_steps(&self) -> usize {
        self.elapsed_steps
    }
}

impl<E: Env> Env for TimeLimit<E> {
    type Config = TimeLimitConfig<E::Config>;
    type Obs = E::Obs;
    type Act = E::Act;
    type Info = E::Info;

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        let env = E::build(&config.env_config, seed)?;
        Ok(Self::new(env, config.max_episode_steps))
    }

    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
        let (step, record) = self.env.step(a)?;
        self.elapsed_steps += 1;

        let is_truncated = step.is_truncated
            || matches!(self.max_episode_steps, Some(max) if self.elapsed_steps >= max);
        let step = Step::new(
            step.obs,
            step.act,
            step.reward,
            step.is_terminated,
            is_truncated,
            step.info,
        );

        Ok((step, record))
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        self.elapsed_steps = 0;
        self.env.reset()
    }

    fn reset_with_index(&mut self, ix: usize) -> Result<Self::Obs> {
        self.elapsed_steps = 0;
        self.env.reset_with_index(ix)
    }

    fn observation_space(&self) -> Space {
        self.env.observation_space()
    }

    fn action_space(&self) -> Space {
        self.env.action_space()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy::{DummyAct, DummyEnv, DummyEnvConfig};

    #[test]
    fn test_truncates_at_max_steps() -> Result<()> {
        let config = TimeLimitConfig::new(DummyEnvConfig::default(), Some(3));
        let mut env = TimeLimit::<DummyEnv>::build(&config, 0)?;

        for _ in 0..2 {
            env.reset()?;
            let mut n_steps = 0;
            loop {
                let (step, _) = env.step(&DummyAct(0.0))?;
                n_steps += 1;
                if step.is_done() {
                    assert!(step.is_truncated);
                    assert!(!step.is_terminated);
                    break;
                }
            }
            assert_eq!(n_steps, 3);
            assert_eq!(env.elapsed_steps(), 3);
        }
        Ok(())
    }

    #[test]
    fn test_terminated_on_last_step_is_also_truncated() -> Result<()> {
        let config = TimeLimitConfig::new(DummyEnvConfig::default().terminate_after(2), Some(2));
        let mut env = TimeLimit::<DummyEnv>::build(&config, 0)?;
        env.reset()?;
        let (step, _) = env.step(&DummyAct(0.0))?;
        assert!(!step.is_done());
        let (step, _) = env.step(&DummyAct(0.0))?;
        assert!(step.is_terminated);
        assert!(step.is_truncated);
        Ok(())
    }

    #[test]
    fn test_no_limit() -> Result<()> {
        let config = TimeLimitConfig::new(DummyEnvConfig::default(), None);
        let mut env = TimeLimit::<DummyEnv>::build(&config, 0)?;
        env.reset()?;
        for _ in 0..1000 {
            let (step, _) = env.step(&DummyAct(0.0))?;
            assert!(!step.is_done());
        }
        Ok(())
    }
}
