//! Default implementation of the [`Evaluator`] trait.
use super::Evaluator;
use crate::{
    record::{Record, RecordValue},
    Env, Policy,
};
use anyhow::Result;

/// Runs a fixed number of episodes and reports the average return.
///
/// The returned record has `episode_return` (mean over episodes),
/// `episode_return_min`, `episode_return_max` and `episode_length`
/// (mean number of steps).
pub struct DefaultEvaluator<E: Env> {
    /// The number of episodes to run during evaluation.
    n_episodes: usize,

    /// The environment instance used for evaluation.
    env: E,
}

impl<E: Env> Evaluator<E> for DefaultEvaluator<E> {
    fn evaluate<P: Policy<E>>(&mut self, policy: &mut P) -> Result<Record> {
        let mut returns = Vec::with_capacity(self.n_episodes);
        let mut n_steps = 0usize;

        for ix in 0..self.n_episodes {
            let mut prev_obs = self.env.reset_with_index(ix)?;
            let mut r_total = 0f32;

            loop {
                let act = policy.sample(&prev_obs)?;
                let (step, _) = self.env.step(&act)?;
                r_total += step.reward;
                n_steps += 1;
                if step.is_done() {
                    break;
                }
                prev_obs = step.obs;
            }
            returns.push(r_total);
        }

        let n = self.n_episodes.max(1) as f32;
        let min = returns.iter().copied().fold(f32::INFINITY, f32::min);
        let max = returns.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        Ok(Record::from_slice(&[
            (
                "episode_return",
                RecordValue::Scalar(returns.iter().sum::<f32>() / n),
            ),
            ("episode_return_min", RecordValue::Scalar(min)),
            ("episode_return_max", RecordValue::Scalar(max)),
            ("episode_length", RecordValue::Scalar(n_steps as f32 / n)),
        ]))
    }
}

impl<E: Env> DefaultEvaluator<E> {
    /// Constructs a new [`DefaultEvaluator`].
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration for the environment
    /// * `seed` - Random seed for environment initialization
    /// * `n_episodes` - Number of episodes to run during evaluation
    pub fn new(config: &E::Config, seed: i64, n_episodes: usize) -> Result<Self> {
        Ok(Self::from_env(E::build(config, seed)?, n_episodes))
    }

    /// Constructs a new [`DefaultEvaluator`] on an environment built elsewhere,
    /// e.g. with [`EnvRegistry::make`](crate::EnvRegistry::make).
    pub fn from_env(env: E, n_episodes: usize) -> Self {
        Self { n_episodes, env }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dummy::{DummyAgent, DummyEnv, DummyEnvConfig},
        TimeLimit, TimeLimitConfig,
    };

    #[test]
    fn test_evaluate() -> Result<()> {
        let config = TimeLimitConfig::new(DummyEnvConfig::default().reward(0.5), Some(4));
        let mut evaluator = DefaultEvaluator::<TimeLimit<DummyEnv>>::new(&config, 0, 3)?;
        let mut policy = DummyAgent::new();

        let record = evaluator.evaluate(&mut policy)?;
        assert_eq!(record.get_scalar("episode_return")?, 2.0);
        assert_eq!(record.get_scalar("episode_return_min")?, 2.0);
        assert_eq!(record.get_scalar("episode_length")?, 4.0);
        Ok(())
    }
}
