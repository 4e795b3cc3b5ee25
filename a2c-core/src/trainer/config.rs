//! Configuration of [`Trainer`](super::Trainer).
use crate::{Env, Step};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Reward the agent is trained with, derived from the flags of a [`Step`].
///
/// The environment reward is only used for the episode score.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct RewardShaping {
    /// Reward of a step that does not end the episode by failure.
    pub step_reward: f32,

    /// Reward of a step on which the episode terminated before the time limit.
    pub failure_reward: f32,
}

impl Default for RewardShaping {
    fn default() -> Self {
        Self {
            step_reward: 0.1,
            failure_reward: -1.0,
        }
    }
}

impl RewardShaping {
    /// Returns the shaped reward of the step.
    ///
    /// A step that is both terminated and truncated reached the time limit and
    /// is not a failure.
    pub fn shape<E: Env>(&self, step: &Step<E>) -> f32 {
        if step.is_terminated && !step.is_truncated {
            self.failure_reward
        } else {
            self.step_reward
        }
    }
}

/// Configuration of [`Trainer`](super::Trainer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct TrainerConfig {
    /// The maximum number of episodes.
    pub max_episodes: usize,

    /// Interval of saving model parameters in episodes. `0` disables it.
    pub save_interval: usize,

    /// Training stops once the smoothed score exceeds this value.
    pub score_threshold: f32,

    /// Weight of the previous smoothed score in the exponential moving average.
    pub score_smoothing: f32,

    /// Reward shaping.
    pub reward_shaping: RewardShaping,

    /// Where to save the trained model. `None` disables saving.
    pub model_dir: Option<String>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            max_episodes: 1000,
            save_interval: 50,
            score_threshold: 350.0,
            score_smoothing: 0.9,
            reward_shaping: RewardShaping::default(),
            model_dir: Some("./save_model".to_string()),
        }
    }
}

impl TrainerConfig {
    /// Sets the maximum number of episodes.
    pub fn max_episodes(mut self, v: usize) -> Self {
        self.max_episodes = v;
        self
    }

    /// Sets the interval of saving in episodes.
    pub fn save_interval(mut self, v: usize) -> Self {
        self.save_interval = v;
        self
    }

    /// Sets the score above which training stops.
    pub fn score_threshold(mut self, v: f32) -> Self {
        self.score_threshold = v;
        self
    }

    /// Sets the smoothing factor of the score.
    pub fn score_smoothing(mut self, v: f32) -> Self {
        self.score_smoothing = v;
        self
    }

    /// Sets the reward shaping.
    pub fn reward_shaping(mut self, v: RewardShaping) -> Self {
        self.reward_shaping = v;
        self
    }

    /// Sets the directory where the model is saved.
    pub fn model_dir(mut self, model_dir: impl Into<String>) -> Self {
        self.model_dir = Some(model_dir.into());
        self
    }

    /// Constructs [`TrainerConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`TrainerConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
