//! Configuration of A2C agent.
use crate::{opt::OptimizerConfig, Device};
use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`A2c`](super::A2c).
///
/// `C` is the configuration of the model.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct A2cConfig<C> {
    /// Configuration of the actor-critic model.
    pub model_config: Option<C>,

    /// Configuration of the optimizer.
    pub opt_config: OptimizerConfig,

    /// Discount factor.
    pub gamma: f64,

    /// Weight of the actor loss in the total loss.
    pub actor_loss_coef: f64,

    /// Added to the action density before taking the logarithm.
    pub prob_eps: f64,

    /// Maximum L2 norm of the gradient of each parameter tensor.
    pub max_grad_norm: Option<f64>,

    /// Actions are clipped to `[-max_action, max_action]`.
    pub max_action: f32,

    /// Random seed of action sampling.
    pub seed: u64,

    /// Device for the model.
    pub device: Option<Device>,
}

impl<C> Default for A2cConfig<C> {
    fn default() -> Self {
        Self {
            model_config: None,
            opt_config: OptimizerConfig::default(),
            gamma: 0.99,
            actor_loss_coef: 0.1,
            prob_eps: 1e-5,
            max_grad_norm: Some(1.0),
            max_action: 1.0,
            seed: 42,
            device: None,
        }
    }
}

impl<C> A2cConfig<C> {
    /// Configuration of the model.
    pub fn model_config(mut self, v: C) -> Self {
        self.model_config = Some(v);
        self
    }

    /// Configuration of the optimizer.
    pub fn opt_config(mut self, v: OptimizerConfig) -> Self {
        self.opt_config = v;
        self
    }

    /// Discount factor.
    pub fn discount_factor(mut self, v: f64) -> Self {
        self.gamma = v;
        self
    }

    /// Weight of the actor loss.
    pub fn actor_loss_coef(mut self, v: f64) -> Self {
        self.actor_loss_coef = v;
        self
    }

    /// Gradient clipping. `None` disables it.
    pub fn max_grad_norm(mut self, v: Option<f64>) -> Self {
        self.max_grad_norm = v;
        self
    }

    /// Bound of the action.
    pub fn max_action(mut self, v: f32) -> Self {
        self.max_action = v;
        self
    }

    /// Random seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Device.
    pub fn device(mut self, v: Device) -> Self {
        self.device = Some(v);
        self
    }
}

impl<C> A2cConfig<C>
where
    C: Serialize + for<'de> Deserialize<'de>,
{
    /// Constructs [`A2cConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load config of A2C agent from {:?}", path_);
        Ok(b)
    }

    /// Saves [`A2cConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save config of A2C agent into {:?}", path_);
        Ok(())
    }
}
