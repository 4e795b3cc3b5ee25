use super::A2cConfig;
use crate::{
    model::SubModel1,
    opt::{clip_grad_norm, Optimizer},
    util::{normal_density, sample_clipped, td_target, to_tensor},
};
use a2c_core::{
    record::{Record, RecordValue},
    Agent, Env, Policy, Transition,
};
use anyhow::{Context, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::{VarBuilder, VarMap};
use log::{info, trace};
use rand::{rngs::SmallRng, SeedableRng};
use serde::{de::DeserializeOwned, Serialize};
use std::{convert::TryInto, fmt::Debug, fs, marker::PhantomData, path::Path};

const MODEL_FILE: &str = "a2c.safetensors";

type Mu = Tensor;
type Sigma = Tensor;
type Value = Tensor;

/// Losses of a single optimization step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct A2cLosses {
    /// `actor_loss_coef * actor_loss + critic_loss`.
    pub loss: f32,

    /// Negative log density of the action weighted by the advantage.
    pub actor_loss: f32,

    /// Half of the squared TD error.
    pub critic_loss: f32,
}

impl From<A2cLosses> for Record {
    fn from(losses: A2cLosses) -> Self {
        Record::from_slice(&[
            ("loss", RecordValue::Scalar(losses.loss)),
            ("actor_loss", RecordValue::Scalar(losses.actor_loss)),
            ("critic_loss", RecordValue::Scalar(losses.critic_loss)),
        ])
    }
}

/// Advantage actor-critic agent.
///
/// Observations and actions are converted to and from `Vec<f32>`. A batch
/// always consists of the single transition of the latest environment step.
pub struct A2c<E, M>
where
    E: Env,
    M: SubModel1<Input = Tensor, Output = (Mu, Sigma, Value)>,
    M::Config: DeserializeOwned + Serialize + Debug + PartialEq + Clone,
    E::Obs: Into<Vec<f32>>,
    E::Act: Into<Vec<f32>> + From<Vec<f32>>,
{
    varmap: VarMap,
    model: M,
    opt: Optimizer,
    gamma: f64,
    actor_loss_coef: f64,
    prob_eps: f64,
    max_grad_norm: Option<f64>,
    max_action: f32,
    rng: SmallRng,
    train: bool,
    n_opts: usize,
    device: Device,
    phantom: PhantomData<E>,
}

impl<E, M> A2c<E, M>
where
    E: Env,
    M: SubModel1<Input = Tensor, Output = (Mu, Sigma, Value)>,
    M::Config: DeserializeOwned + Serialize + Debug + PartialEq + Clone,
    E::Obs: Into<Vec<f32>>,
    E::Act: Into<Vec<f32>> + From<Vec<f32>>,
{
    /// Constructs [`A2c`] agent.
    ///
    /// The agent is in training mode after construction.
    pub fn build(config: A2cConfig<M::Config>) -> Result<Self> {
        let device: Device = config.device.unwrap_or_default().try_into()?;
        let model_config = config
            .model_config
            .context("model_config is not set.")?;
        let varmap = VarMap::new();
        let model = {
            let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
            M::build(vb, model_config)?
        };
        let opt = config.opt_config.build(varmap.all_vars())?;

        Ok(Self {
            varmap,
            model,
            opt,
            gamma: config.gamma,
            actor_loss_coef: config.actor_loss_coef,
            prob_eps: config.prob_eps,
            max_grad_norm: config.max_grad_norm,
            max_action: config.max_action,
            rng: SmallRng::seed_from_u64(config.seed),
            train: true,
            n_opts: 0,
            device,
            phantom: PhantomData,
        })
    }

    fn obs_to_tensor(&self, obs: &E::Obs) -> Result<Tensor> {
        let obs: Vec<f32> = obs.clone().into();
        to_tensor(&obs, &self.device)
    }

    /// Returns `(mu, sigma, value)` of an observation, each with a batch
    /// dimension of 1.
    pub fn forward(&self, obs: &E::Obs) -> Result<(Mu, Sigma, Value)> {
        self.model.forward(&self.obs_to_tensor(obs)?)
    }

    /// Returns an action for the observation.
    ///
    /// In training mode the action is drawn from `N(mu, sigma)`, in evaluation
    /// mode it is `mu`. Either way it is clipped to `[-max_action, max_action]`.
    pub fn get_action(&mut self, obs: &E::Obs) -> Result<E::Act> {
        let (mu, sigma, _) = self.forward(obs)?;
        let mu = mu.get(0)?.to_vec1::<f32>()?;

        let act = if self.train {
            let sigma = sigma.get(0)?.to_vec1::<f32>()?;
            sample_clipped(&mu, &sigma, self.max_action, &mut self.rng)?
        } else {
            mu.iter()
                .map(|m| m.clamp(-self.max_action, self.max_action))
                .collect()
        };

        Ok(act.into())
    }

    /// Performs one optimization step on a single transition.
    ///
    /// The actor is trained on the density of the given action, i.e., after
    /// clipping, under the unclipped Gaussian.
    pub fn train_model(
        &mut self,
        obs: &E::Obs,
        act: &E::Act,
        reward: f32,
        next_obs: &E::Obs,
        is_done: bool,
    ) -> Result<A2cLosses> {
        let act: Vec<f32> = act.clone().into();
        let act = to_tensor(&act, &self.device)?;
        let (mu, sigma, value) = self.forward(obs)?;
        let (_, _, next_value) = self.forward(next_obs)?;

        let target = td_target(reward, is_done, self.gamma, &next_value)?;
        let td_error = (&target - &value)?;
        let critic_loss = (td_error.sqr()? * 0.5)?.mean_all()?;
        let advantage = td_error.detach();

        let prob = normal_density(&act, &mu, &sigma)?;
        let actor_loss = (prob + self.prob_eps)?
            .log()?
            .neg()?
            .broadcast_mul(&advantage)?
            .mean_all()?;

        let loss = ((&actor_loss * self.actor_loss_coef)? + &critic_loss)?;

        trace!("backward");
        let mut grads = loss.backward()?;
        if let Some(max_norm) = self.max_grad_norm {
            clip_grad_norm(&self.varmap.all_vars(), &mut grads, max_norm)?;
        }
        self.opt.step(&grads)?;
        self.n_opts += 1;

        Ok(A2cLosses {
            loss: loss.to_scalar::<f32>()?,
            actor_loss: actor_loss.to_scalar::<f32>()?,
            critic_loss: critic_loss.to_scalar::<f32>()?,
        })
    }

    /// Number of optimization steps so far.
    pub fn n_opts(&self) -> usize {
        self.n_opts
    }

    /// Parameters of the model.
    pub fn varmap(&self) -> &VarMap {
        &self.varmap
    }
}

impl<E, M> Policy<E> for A2c<E, M>
where
    E: Env,
    M: SubModel1<Input = Tensor, Output = (Mu, Sigma, Value)>,
    M::Config: DeserializeOwned + Serialize + Debug + PartialEq + Clone,
    E::Obs: Into<Vec<f32>>,
    E::Act: Into<Vec<f32>> + From<Vec<f32>>,
{
    fn sample(&mut self, obs: &E::Obs) -> Result<E::Act> {
        self.get_action(obs)
    }
}

impl<E, M> Agent<E> for A2c<E, M>
where
    E: Env,
    M: SubModel1<Input = Tensor, Output = (Mu, Sigma, Value)>,
    M::Config: DeserializeOwned + Serialize + Debug + PartialEq + Clone,
    E::Obs: Into<Vec<f32>>,
    E::Act: Into<Vec<f32>> + From<Vec<f32>>,
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
        let losses = self.train_model(
            &transition.obs,
            &transition.act,
            transition.reward,
            &transition.next_obs,
            transition.is_done,
        )?;
        Ok(losses.into())
    }

    fn save_params(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        let path = path.join(MODEL_FILE);
        self.varmap.save(&path)?;
        info!("Save A2C agent to {:?}", path);
        Ok(())
    }

    fn load_params(&mut self, path: &Path) -> Result<()> {
        let path = path.join(MODEL_FILE);
        self.varmap.load(&path)?;
        info!("Load A2C agent from {:?}", path);
        Ok(())
    }
}
