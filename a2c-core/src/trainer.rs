//! Train [`Agent`] online.
mod config;
mod state;
use crate::{
    record::{
        Record, RecordStorage,
        RecordValue::{DateTime, Scalar},
        Recorder,
    },
    Agent, Env, Transition,
};
use anyhow::Result;
use chrono::Local;
pub use config::{RewardShaping, TrainerConfig};
use log::{debug, info, warn};
pub use state::TrainingState;
use std::path::Path;

/// Manages the online training loop.
///
/// # Training loop
///
/// 1. For each episode `e` in `0..max_episodes`, reset [`Env`] and set `score = 0`.
/// 2. Sample an action from the agent and perform an environment step.
/// 3. Add the environment reward to `score` and compute the shaped reward with
///    [`RewardShaping`].
/// 4. Hand the single [`Transition`] to [`Agent::opt_with_record`]. The transition
///    is dropped afterwards.
/// 5. Repeat from 2 until the step is terminated or truncated.
/// 6. Update the smoothed score of [`TrainingState`], log the episode and write
///    a record with `episode`, `score`, `score_avg`, `datetime` and the mean
///    losses of the episode to the [`Recorder`].
/// 7. If `score_avg > score_threshold`, save the model and return.
/// 8. If `e % save_interval == 0`, save the model.
pub struct Trainer {
    /// Where to save the trained model.
    model_dir: Option<String>,

    /// The maximum number of episodes.
    max_episodes: usize,

    /// Interval of saving the model in episodes.
    save_interval: usize,

    /// Score above which training stops.
    score_threshold: f32,

    /// Smoothing factor of the score.
    score_smoothing: f32,

    reward_shaping: RewardShaping,
}

impl Trainer {
    /// Constructs a trainer.
    pub fn build(config: TrainerConfig) -> Self {
        Self {
            model_dir: config.model_dir,
            max_episodes: config.max_episodes,
            save_interval: config.save_interval,
            score_threshold: config.score_threshold,
            score_smoothing: config.score_smoothing,
            reward_shaping: config.reward_shaping,
        }
    }

    fn save_model<E: Env, A: Agent<E>>(agent: &A, model_dir: &Option<String>) {
        if let Some(model_dir) = model_dir {
            match agent.save_params(Path::new(model_dir)) {
                Ok(()) => info!("Saved the model in {:?}.", model_dir),
                Err(e) => warn!("Failed to save model in {:?}: {}", model_dir, e),
            }
        }
    }

    /// Runs an episode and returns its score and the aggregated losses.
    fn run_episode<E, A>(
        &self,
        env: &mut E,
        agent: &mut A,
        state: &mut TrainingState,
        storage: &mut RecordStorage,
    ) -> Result<(f32, Record)>
    where
        E: Env,
        A: Agent<E>,
    {
        let mut obs = env.reset()?;
        let mut score = 0f32;

        loop {
            let act = agent.sample(&obs)?;
            let (step, _) = env.step(&act)?;
            score += step.reward;

            let reward = self.reward_shaping.shape(&step);
            let is_done = step.is_done();
            let transition = Transition::new(obs, act, reward, step.obs, is_done);
            storage.store(agent.opt_with_record(&transition)?);
            state.opt_steps += 1;

            if is_done {
                break;
            }
            obs = transition.next_obs;
        }

        Ok((score, storage.aggregate()?))
    }

    /// Train the agent.
    ///
    /// Returns when the smoothed score exceeds the threshold or after the
    /// maximum number of episodes.
    pub fn train<E, A>(
        &mut self,
        env: &mut E,
        agent: &mut A,
        recorder: &mut dyn Recorder,
    ) -> Result<TrainingState>
    where
        E: Env,
        A: Agent<E>,
    {
        let mut state = TrainingState::default();
        let mut storage = RecordStorage::new();
        agent.train();

        for e in 0..self.max_episodes {
            let (score, mut record) = self.run_episode(env, agent, &mut state, &mut storage)?;
            state.update_score(e, score, self.score_smoothing);

            let loss = record.get_scalar("loss").unwrap_or(f32::NAN);
            info!(
                "episode: {:3} | score avg: {:3.2} | loss: {:.3}",
                e, state.score_avg, loss
            );
            debug!("score: {}, opt_steps: {}", score, state.opt_steps);

            record.insert("episode", Scalar(e as f32));
            record.insert("score", Scalar(score));
            record.insert("score_avg", Scalar(state.score_avg));
            record.insert("datetime", DateTime(Local::now()));
            recorder.write(record)?;

            if state.score_avg > self.score_threshold {
                Self::save_model::<E, A>(agent, &self.model_dir);
                state.solved = true;
                info!("Solved after {} episodes", e + 1);
                break;
            }

            if self.save_interval > 0 && e % self.save_interval == 0 {
                Self::save_model::<E, A>(agent, &self.model_dir);
            }
        }

        recorder.flush()?;
        Ok(state)
    }
}
