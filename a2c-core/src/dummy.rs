//! Environment and agent doubles used in tests.
use crate::{record::Record, Act, Agent, Env, Obs, Policy, Space, Step, Transition};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    cell::RefCell,
    path::{Path, PathBuf},
};

/// Observation of [`DummyEnv`], the number of steps since the last reset.
#[derive(Clone, Debug, PartialEq)]
pub struct DummyObs(pub usize);

impl Obs for DummyObs {
    fn len(&self) -> usize {
        1
    }
}

impl From<DummyObs> for Vec<f32> {
    fn from(obs: DummyObs) -> Self {
        vec![obs.0 as f32]
    }
}

/// Action of [`DummyEnv`].
#[derive(Clone, Debug, PartialEq)]
pub struct DummyAct(pub f32);

impl Act for DummyAct {
    fn len(&self) -> usize {
        1
    }
}

impl From<DummyAct> for Vec<f32> {
    fn from(act: DummyAct) -> Self {
        vec![act.0]
    }
}

impl From<f32> for DummyAct {
    fn from(v: f32) -> Self {
        Self(v)
    }
}

impl From<Vec<f32>> for DummyAct {
    fn from(v: Vec<f32>) -> Self {
        Self(v.first().copied().unwrap_or_default())
    }
}

/// Configuration of [`DummyEnv`].
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct DummyEnvConfig {
    /// The episode terminates at this step. `None` never terminates.
    pub terminate_after: Option<usize>,

    /// Reward of every step.
    pub reward: f32,
}

impl Default for DummyEnvConfig {
    fn default() -> Self {
        Self {
            terminate_after: None,
            reward: 1.0,
        }
    }
}

impl DummyEnvConfig {
    /// Sets the step at which episodes terminate.
    pub fn terminate_after(mut self, v: usize) -> Self {
        self.terminate_after = Some(v);
        self
    }

    /// Sets the reward of every step.
    pub fn reward(mut self, v: f32) -> Self {
        self.reward = v;
        self
    }
}

/// An environment with a fixed episode length and a constant reward.
pub struct DummyEnv {
    config: DummyEnvConfig,
    t: usize,
}

impl Env for DummyEnv {
    type Config = DummyEnvConfig;
    type Obs = DummyObs;
    type Act = DummyAct;
    type Info = ();

    fn build(config: &Self::Config, _seed: i64) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            t: 0,
        })
    }

    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
        self.t += 1;
        let is_terminated = matches!(self.config.terminate_after, Some(n) if self.t >= n);
        let step = Step::new(
            DummyObs(self.t),
            a.clone(),
            self.config.reward,
            is_terminated,
            false,
            (),
        );
        Ok((step, Record::empty()))
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        self.t = 0;
        Ok(DummyObs(0))
    }

    fn reset_with_index(&mut self, _ix: usize) -> Result<Self::Obs> {
        self.reset()
    }

    fn observation_space(&self) -> Space {
        Space::uniform(1, 0.0, f32::MAX)
    }

    fn action_space(&self) -> Space {
        Space::uniform(1, -1.0, 1.0)
    }
}

/// An agent that does not learn and keeps track of the calls it receives.
#[derive(Default)]
pub struct DummyAgent {
    train: bool,

    /// Number of optimization steps.
    pub n_opts: usize,

    /// Rewards of the transitions handed to the agent.
    pub rewards: Vec<f32>,

    /// Done flags of the transitions handed to the agent.
    pub dones: Vec<bool>,

    /// Directories passed to [`Agent::save_params`] with `n_opts` at that time.
    pub saves: RefCell<Vec<(PathBuf, usize)>>,
}

impl DummyAgent {
    /// Constructs the agent.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: Env> Policy<E> for DummyAgent
where
    E::Act: From<f32>,
{
    fn sample(&mut self, _obs: &E::Obs) -> Result<E::Act> {
        Ok(0f32.into())
    }
}

impl<E: Env> Agent<E> for DummyAgent
where
    E::Act: From<f32>,
{
    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    fn opt_with_record(&mut self, transition: &Transition<E>) -> Result<Record> {
        self.n_opts += 1;
        self.rewards.push(transition.reward);
        self.dones.push(transition.is_done);
        Ok(Record::from_scalar("loss", transition.reward))
    }

    fn save_params(&self, path: &Path) -> Result<()> {
        self.saves.borrow_mut().push((path.to_path_buf(), self.n_opts));
        Ok(())
    }

    fn load_params(&mut self, _path: &Path) -> Result<()> {
        Ok(())
    }
}
